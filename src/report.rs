use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::meeting::{MeetingRecord, ProcessedMeeting};
use crate::summarize::{ResponseSchema, Summary, SummarySections};

const RULE_WIDTH: usize = 60;

/// Render the Markdown report. Sections follow the order of `meetings`.
pub fn render(meetings: &[ProcessedMeeting], jurisdiction: &str, generated_at: NaiveDateTime) -> String {
    let mut out = format!(
        "# {jurisdiction} City Council Meetings Summary\n\
         Generated: {}\n\
         \n\
         This report summarizes recent {jurisdiction} city council meetings to help residents stay informed about local government decisions.\n\
         \n\
         ---\n\
         \n",
        generated_at.format("%B %d, %Y at %I:%M %p"),
    );

    for item in meetings {
        let m = &item.meeting;
        out.push_str(&format!(
            "\n## {}\n\
             **Date:** {}  \n\
             **Type:** {}  \n\
             **Agenda:** [View PDF]({})\n\
             \n\
             ### Summary\n\
             {}\n\
             \n\
             ---\n\
             \n",
            m.title,
            m.date.format("%Y-%m-%d"),
            m.kind,
            m.agenda_url,
            item.summary.text(),
        ));
    }
    out
}

/// Write the report to `path`, replacing any existing file. With no
/// meetings nothing is written and `NothingToReport` is returned.
pub fn write_report(
    meetings: &[ProcessedMeeting],
    path: &Path,
    jurisdiction: &str,
    generated_at: NaiveDateTime,
) -> Result<PathBuf> {
    if meetings.is_empty() {
        return Err(PipelineError::NothingToReport);
    }

    info!("Generating report: {}", path.display());
    std::fs::write(path, render(meetings, jurisdiction, generated_at))?;
    info!("Report saved to: {}", path.display());
    Ok(path.to_path_buf())
}

/// Console rendering of one summary. Skipped summaries have no preview.
pub fn console_preview(meeting: &MeetingRecord, summary: &Summary, schema: &ResponseSchema) -> Option<String> {
    let rule = "=".repeat(RULE_WIDTH);
    let text = match summary {
        Summary::Skipped => return None,
        other => other.text(),
    };

    let body = match schema.parse(&text) {
        SummarySections::Structured { brief, detailed } => format!(
            "{rule}\n{}\n{rule}\n\nBRIEF SUMMARY:\n{brief}\n\nDETAILED SUMMARY:\n{detailed}\n{rule}\n",
            meeting.title
        ),
        SummarySections::Unstructured(text) => {
            format!("{rule}\nSUMMARY: {}\n{rule}\n{text}\n{rule}\n", meeting.title)
        }
    };
    Some(body)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::SCHEMA_V1;
    use chrono::NaiveDate;

    fn processed(title: &str, day: u32, summary: Summary) -> ProcessedMeeting {
        ProcessedMeeting {
            meeting: MeetingRecord::from_title(
                title,
                NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
                &format!("https://www.lincolnca.gov/media/{}.pdf", day),
            ),
            summary,
            full_text_preview: "CALL TO ORDER...".into(),
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 22)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    #[test]
    fn renders_header_and_section() {
        let items = vec![processed(
            "Regular City Council Meeting",
            14,
            Summary::Generated("BRIEF:\nBudget adopted.\n\nDETAILED:\nDetails.".into()),
        )];
        let md = render(&items, "Lincoln, CA", generated_at());
        let expected = "# Lincoln, CA City Council Meetings Summary\n\
Generated: January 22, 2026 at 02:05 PM\n\
\n\
This report summarizes recent Lincoln, CA city council meetings to help residents stay informed about local government decisions.\n\
\n\
---\n\
\n\
\n\
## Regular City Council Meeting\n\
**Date:** 2026-01-14  \n\
**Type:** City Council  \n\
**Agenda:** [View PDF](https://www.lincolnca.gov/media/14.pdf)\n\
\n\
### Summary\n\
BRIEF:\nBudget adopted.\n\nDETAILED:\nDetails.\n\
\n\
---\n\
\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn sections_follow_input_order() {
        let items = vec![
            processed("Third Council Session", 3, Summary::Skipped),
            processed("First Council Session", 1, Summary::Skipped),
            processed("Second Council Session", 2, Summary::Skipped),
        ];
        let md = render(&items, "Lincoln, CA", generated_at());
        let headings: Vec<&str> = md.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(
            headings,
            vec![
                "## Third Council Session",
                "## First Council Session",
                "## Second Council Session"
            ]
        );
    }

    #[test]
    fn placeholder_summaries_are_verbatim() {
        let items = vec![processed("Council", 5, Summary::Failed("timed out".into()))];
        let md = render(&items, "Lincoln, CA", generated_at());
        assert!(md.contains("### Summary\nError generating summary: timed out\n"));
    }

    #[test]
    fn zero_meetings_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let err = write_report(&[], &path, "Lincoln, CA", generated_at()).unwrap_err();
        assert!(matches!(err, PipelineError::NothingToReport));
        assert!(!path.exists());
    }

    #[test]
    fn overwrites_existing_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        std::fs::write(&path, "stale report").unwrap();
        let items = vec![processed("Regular City Council Meeting", 14, Summary::Skipped)];
        let written = write_report(&items, &path, "Lincoln, CA", generated_at()).unwrap();
        let md = std::fs::read_to_string(written).unwrap();
        assert!(!md.contains("stale report"));
        assert!(md.contains("AI summarization skipped (no API key provided)"));
    }

    #[test]
    fn preview_splits_brief_and_detailed() {
        let item = processed(
            "Regular City Council Meeting",
            14,
            Summary::Generated("BRIEF:\nBudget adopted.\n\nDETAILED:\nThe council voted 4-1.".into()),
        );
        let preview = console_preview(&item.meeting, &item.summary, &SCHEMA_V1).unwrap();
        assert!(preview.contains("BRIEF SUMMARY:\nBudget adopted.\n\nDETAILED SUMMARY:\nThe council voted 4-1.\n"));
        assert!(!preview.contains("BRIEF:"));
    }

    #[test]
    fn preview_unstructured_fallback() {
        let item = processed("Council", 14, Summary::Generated("Just one paragraph.".into()));
        let preview = console_preview(&item.meeting, &item.summary, &SCHEMA_V1).unwrap();
        assert!(preview.contains("SUMMARY: Council\n"));
        assert!(preview.contains("Just one paragraph."));
        assert!(!preview.contains("BRIEF SUMMARY"));
    }

    #[test]
    fn no_preview_when_skipped() {
        let item = processed("Council", 14, Summary::Skipped);
        assert!(console_preview(&item.meeting, &item.summary, &SCHEMA_V1).is_none());
    }
}
