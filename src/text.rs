use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUNS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

const PREVIEW_CHARS: usize = 500;

/// Collapse 3+ newlines to a blank line, runs of spaces to one, then trim.
pub fn normalize(text: &str) -> String {
    let text = BLANK_RUNS_RE.replace_all(text, "\n\n");
    let text = SPACE_RUNS_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Leading slice of the document kept alongside its summary.
pub fn preview(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──
