use thiserror::Error;

/// Failures a pipeline stage can hit. None of these end the run: each stage
/// logs and degrades to an empty result, a placeholder, or a dropped meeting.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("summarization error: {0}")]
    Summarization(String),

    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no meetings were processed successfully")]
    NothingToReport,
}

impl From<lopdf::Error> for PipelineError {
    fn from(e: lopdf::Error) -> Self {
        PipelineError::Extraction(e.to_string())
    }
}

impl From<url::ParseError> for PipelineError {
    fn from(e: url::ParseError) -> Self {
        PipelineError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
