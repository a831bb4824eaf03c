use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use crate::error::Result;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Download `url` into `dir/filename`. Failures are logged and yield `None`.
pub async fn download(client: &Client, url: &str, dir: &Path, filename: &str) -> Option<PathBuf> {
    info!("Downloading: {}", filename);
    match try_download(client, url, dir, filename).await {
        Ok(path) => {
            info!("Downloaded: {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Error downloading {}: {}", url, e);
            None
        }
    }
}

async fn try_download(client: &Client, url: &str, dir: &Path, filename: &str) -> Result<PathBuf> {
    let bytes = client
        .get(url)
        .timeout(DOWNLOAD_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let path = dir.join(filename);
    std::fs::write(&path, &bytes)?;
    info!("Saved {} bytes", bytes.len());
    Ok(path)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_body_to_scratch_dir() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/agenda.pdf")
            .with_status(200)
            .with_body(b"%PDF-1.5 fake body")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/agenda.pdf", server.url());
        let path = download(&Client::new(), &url, dir.path(), "meeting_2026-01-14_City_Council.pdf")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("meeting_2026-01-14_City_Council.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5 fake body");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/agenda.pdf")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), "old contents").unwrap();
        let url = format!("{}/agenda.pdf", server.url());
        let path = download(&Client::new(), &url, dir.path(), "a.pdf").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }

    #[tokio::test]
    async fn not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.pdf")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/missing.pdf", server.url());
        assert!(download(&Client::new(), &url, dir.path(), "x.pdf").await.is_none());
        assert!(!dir.path().join("x.pdf").exists());
    }

    #[tokio::test]
    async fn missing_dir_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/agenda.pdf")
            .with_status(200)
            .with_body("x")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/agenda.pdf", server.url());
        let nowhere = dir.path().join("does/not/exist");
        assert!(download(&Client::new(), &url, &nowhere, "x.pdf").await.is_none());
    }
}
