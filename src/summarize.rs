use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::meeting::MeetingRecord;
use crate::settings::{Credential, Settings};

const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_PROMPT_CHARS: usize = 15_000;

const SKIPPED_TEXT: &str = "AI summarization skipped (no API key provided)";

/// Labels the model is asked to emit, and that responses are split on.
#[derive(Debug, Clone, Copy)]
pub struct ResponseSchema {
    pub version: u32,
    pub brief_label: &'static str,
    pub detailed_label: &'static str,
}

pub const SCHEMA_V1: ResponseSchema = ResponseSchema {
    version: 1,
    brief_label: "BRIEF:",
    detailed_label: "DETAILED:",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarySections {
    Structured { brief: String, detailed: String },
    Unstructured(String),
}

impl ResponseSchema {
    fn format_block(&self) -> String {
        format!(
            "{}\n[2-3 sentence summary here]\n\n{}\n[Detailed summary here]",
            self.brief_label, self.detailed_label
        )
    }

    /// Split at the first detailed label. Without it the text is unstructured.
    pub fn parse(&self, text: &str) -> SummarySections {
        match text.split_once(self.detailed_label) {
            Some((head, tail)) => {
                let head = head.trim();
                let brief = head.strip_prefix(self.brief_label).unwrap_or(head);
                SummarySections::Structured {
                    brief: brief.trim().to_string(),
                    detailed: tail.trim().to_string(),
                }
            }
            None => SummarySections::Unstructured(text.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Generated(String),
    /// No credential was configured.
    Skipped,
    Failed(String),
}

impl Summary {
    /// Text that goes into the report verbatim.
    pub fn text(&self) -> String {
        match self {
            Summary::Generated(text) => text.clone(),
            Summary::Skipped => SKIPPED_TEXT.to_string(),
            Summary::Failed(reason) => format!("Error generating summary: {}", reason),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

pub struct Summarizer {
    client: Client,
    credential: Option<Credential>,
    api_base: String,
    model: String,
    max_tokens: u32,
    jurisdiction: String,
    schema: ResponseSchema,
}

impl Summarizer {
    pub fn new(client: Client, credential: Option<Credential>, settings: &Settings) -> Self {
        Summarizer {
            client,
            credential,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            jurisdiction: settings.jurisdiction.clone(),
            schema: SCHEMA_V1,
        }
    }

    pub fn schema(&self) -> &ResponseSchema {
        &self.schema
    }

    /// One request per meeting. Never fails: a missing credential gives
    /// `Summary::Skipped`, any other problem `Summary::Failed`.
    pub async fn summarize(&self, text: &str, meeting: &MeetingRecord) -> Summary {
        match self.try_summarize(text, meeting).await {
            Ok(summary) => {
                info!("Summary generated ({} chars)", summary.chars().count());
                Summary::Generated(summary)
            }
            Err(PipelineError::ConfigurationMissing(what)) => {
                warn!("No {} - skipping AI summarization", what);
                Summary::Skipped
            }
            Err(e) => {
                warn!("Error generating summary for {}: {}", meeting.title, e);
                Summary::Failed(e.to_string())
            }
        }
    }

    async fn try_summarize(&self, text: &str, meeting: &MeetingRecord) -> Result<String> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| PipelineError::ConfigurationMissing("API key provided".into()))?;

        info!("Generating AI summary for {}", meeting.title);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: self.prompt(text, meeting),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", &credential.key)
            .header("anthropic-version", API_VERSION)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Summarization(format!("{}: {}", status, body)));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Summarization(format!("unreadable response: {}", e)))?;
        parsed
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .map(|b| b.text)
            .ok_or_else(|| PipelineError::Summarization("no text content returned".into()))
    }

    pub fn prompt(&self, text: &str, meeting: &MeetingRecord) -> String {
        let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        format!(
            "You are analyzing a city council meeting agenda for {jurisdiction}.

Meeting: {title}
Date: {date}
Type: {kind}

Please provide TWO summaries:

1. **BRIEF SUMMARY** (2-3 sentences max): The absolute essentials - what happened and what matters most to residents.

2. **DETAILED SUMMARY** (300-500 words): Cover:
   - Key Decisions & Votes: What major items are on the agenda or were decided?
   - Public Impact: Which items would most affect residents?
   - Financial Items: Any budget items, expenditures, or fiscal decisions?
   - Development/Planning: Any zoning, construction, or development items?
   - Upcoming Actions: What's coming next or needs public input?

Format your response EXACTLY like this (format v{version}):

{format}

Make it accessible to everyday citizens. Use clear language, avoid jargon.

Here's the meeting agenda text:

{excerpt}
",
            jurisdiction = self.jurisdiction,
            title = meeting.title,
            date = meeting.date.format("%Y-%m-%d"),
            kind = meeting.kind,
            version = self.schema.version,
            format = self.schema.format_block(),
            excerpt = excerpt,
        )
    }
}

// ── Tests ──
