use std::path::Path;

use lopdf::Document;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};

/// Text of the first `max_pages` pages, each followed by a blank line.
/// Unreadable documents are logged and yield `None`.
pub fn extract_text(path: &Path, max_pages: usize) -> Option<String> {
    info!(
        "Extracting text from {} (first {} pages)",
        path.display(),
        max_pages
    );
    match try_extract(path, max_pages) {
        Ok((text, pages)) => {
            info!("Extracted {} characters from {} pages", text.chars().count(), pages);
            Some(text)
        }
        Err(e) => {
            warn!("Error extracting text from {}: {}", path.display(), e);
            None
        }
    }
}

fn try_extract(path: &Path, max_pages: usize) -> Result<(String, usize)> {
    let doc = Document::load(path)?;
    let pages: Vec<u32> = doc.get_pages().into_keys().take(max_pages).collect();

    let mut text = String::new();
    for page in &pages {
        text.push_str(&doc.extract_text(&[*page])?);
        text.push_str("\n\n");
    }

    if text.trim().is_empty() {
        return Err(PipelineError::Extraction("document has no extractable text".into()));
    }
    Ok((text, pages.len()))
}

// ── Tests ──

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Minimal PDF with one line of Courier text per page.
    pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn write_pdf(dir: &Path, pages: &[&str]) -> std::path::PathBuf {
        let path = dir.join("agenda.pdf");
        std::fs::write(&path, sample_pdf(pages)).unwrap();
        path
    }

    #[test]
    fn extracts_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &["CALL TO ORDER", "CONSENT CALENDAR"]);
        let text = extract_text(&path, 20).unwrap();
        let first = text.find("CALL TO ORDER").unwrap();
        let second = text.find("CONSENT CALENDAR").unwrap();
        assert!(first < second);
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn stops_at_page_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &["Page one", "Page two", "Page three"]);
        let text = extract_text(&path, 2).unwrap();
        assert!(text.contains("Page one"));
        assert!(text.contains("Page two"));
        assert!(!text.contains("Page three"));
    }

    #[test]
    fn not_a_pdf_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.pdf");
        std::fs::write(&path, "<html>Agenda coming soon</html>").unwrap();
        assert!(extract_text(&path, 20).is_none());
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(extract_text(&dir.path().join("nope.pdf"), 20).is_none());
    }
}
