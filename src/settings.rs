use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "agenda_digest.toml";
const ENV_PREFIX: &str = "AGENDA_DIGEST";
const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub calendar_url: String,
    pub site_base: String,
    pub jurisdiction: String,
    pub window_days: i64,
    pub limit: usize,
    pub max_pages: usize,
    pub output: PathBuf,
    pub model: String,
    pub max_tokens: u32,
    pub api_base: String,
    pub anthropic_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            calendar_url: "https://lincoln.granicus.com/ViewPublisher.php?view_id=2".into(),
            site_base: "https://lincoln.granicus.com".into(),
            jurisdiction: "Lincoln, CA".into(),
            window_days: 90,
            limit: 10,
            max_pages: 20,
            output: PathBuf::from("lincoln_meetings_report.md"),
            model: "claude-sonnet-4-20250514".into(),
            max_tokens: 1500,
            api_base: "https://api.anthropic.com".into(),
            anthropic_api_key: None,
        }
    }
}

impl Settings {
    /// Defaults, then the optional TOML file, then `AGENDA_DIGEST_*` variables.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}

/// Where the summarization credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `ANTHROPIC_API_KEY` in the process environment.
    Environment,
    /// `anthropic_api_key` in the settings file or `AGENDA_DIGEST_ANTHROPIC_API_KEY`.
    Settings,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "{} environment variable", API_KEY_VAR),
            CredentialSource::Settings => write!(f, "settings"),
        }
    }
}

#[derive(Clone)]
pub struct Credential {
    pub key: String,
    pub source: CredentialSource,
}

// Keep the key itself out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Pick the credential: the environment wins over settings, blanks count as absent.
pub fn resolve_credential(env_value: Option<String>, settings: &Settings) -> Option<Credential> {
    let non_blank = |v: &String| !v.trim().is_empty();

    if let Some(key) = env_value.filter(non_blank) {
        return Some(Credential {
            key: key.trim().to_string(),
            source: CredentialSource::Environment,
        });
    }
    settings
        .anthropic_api_key
        .clone()
        .filter(non_blank)
        .map(|key| Credential {
            key: key.trim().to_string(),
            source: CredentialSource::Settings,
        })
}

/// Resolve the credential from the real environment and report the outcome.
pub fn load_credential(settings: &Settings) -> Option<Credential> {
    let credential = resolve_credential(std::env::var(API_KEY_VAR).ok(), settings);
    match &credential {
        Some(c) => info!("Loaded API key from {}", c.source),
        None => {
            warn!("No {} found; summaries will be skipped", API_KEY_VAR);
            warn!("  Option 1: export {}='your-key'", API_KEY_VAR);
            warn!(
                "  Option 2: set anthropic_api_key in {}",
                DEFAULT_CONFIG_FILE
            );
        }
    }
    credential
}

// ── Tests ──
