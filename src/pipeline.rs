use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{debug, info};

use crate::calendar::{self, Window};
use crate::download::download;
use crate::fallback;
use crate::meeting::{MeetingRecord, ProcessedMeeting};
use crate::pdf;
use crate::progress;
use crate::report;
use crate::settings::Settings;
use crate::summarize::Summarizer;
use crate::text;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    DownloadFailed,
    NoText,
}

/// Where a meeting ended up after one pass through the pipeline.
#[derive(Debug)]
pub enum Outcome {
    /// Agenda not published yet; nothing downloaded.
    Skipped,
    Dropped(DropReason),
    Collected(ProcessedMeeting),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunCounts {
    pub fetched: usize,
    pub skipped: usize,
    pub dropped: usize,
    pub collected: usize,
}

impl RunCounts {
    pub fn print(&self) {
        println!(
            "{} meetings: {} summarized, {} awaiting agendas, {} dropped.",
            self.fetched, self.collected, self.skipped, self.dropped,
        );
    }
}

/// Calendar meetings inside the window, or the fallback catalog if there are none.
pub async fn gather_meetings(client: &Client, settings: &Settings, window: &Window) -> Vec<MeetingRecord> {
    let scraped = calendar::fetch_meetings(
        client,
        &settings.calendar_url,
        &settings.site_base,
        window,
        settings.limit,
    )
    .await;
    let meetings = fallback::or_catalog(scraped, window, settings.limit);
    info!("Found {} meetings", meetings.len());
    meetings
}

pub struct Pipeline {
    client: Client,
    summarizer: Summarizer,
    scratch_dir: PathBuf,
    max_pages: usize,
}

impl Pipeline {
    pub fn new(client: Client, summarizer: Summarizer, scratch_dir: PathBuf, max_pages: usize) -> Self {
        Pipeline {
            client,
            summarizer,
            scratch_dir,
            max_pages,
        }
    }

    /// Process meetings one at a time, in order. Returned meetings keep that order.
    pub async fn run(&self, meetings: &[MeetingRecord]) -> (Vec<ProcessedMeeting>, RunCounts) {
        let pb = progress::attach(ProgressBar::new(meetings.len() as u64));
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} meetings")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        let mut counts = RunCounts {
            fetched: meetings.len(),
            ..RunCounts::default()
        };
        let mut processed = Vec::new();

        for meeting in meetings {
            match self.process(meeting, &pb).await {
                Outcome::Skipped => counts.skipped += 1,
                Outcome::Dropped(reason) => {
                    info!("Dropped {} ({:?})", meeting.title, reason);
                    counts.dropped += 1;
                }
                Outcome::Collected(item) => {
                    debug!(preview = %item.full_text_preview, "Collected {}", item.meeting.title);
                    counts.collected += 1;
                    processed.push(item);
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        progress::BARS.remove(&pb);
        (processed, counts)
    }

    pub async fn process(&self, meeting: &MeetingRecord, pb: &ProgressBar) -> Outcome {
        let rule = "=".repeat(RULE_WIDTH);
        pb.suspend(|| {
            println!("\n{rule}\nProcessing: {} ({})\n{rule}\n", meeting.title, meeting.date)
        });

        if !meeting.is_published() {
            pb.suspend(|| {
                println!("Agenda not yet published (future meeting)");
                println!("   Check back closer to {}", meeting.date);
            });
            return Outcome::Skipped;
        }

        let filename = meeting.document_filename();
        let Some(path) = download(&self.client, &meeting.agenda_url, &self.scratch_dir, &filename).await else {
            return Outcome::Dropped(DropReason::DownloadFailed);
        };

        let Some(raw) = pdf::extract_text(&path, self.max_pages) else {
            return Outcome::Dropped(DropReason::NoText);
        };
        let cleaned = text::normalize(&raw);

        let summary = self.summarizer.summarize(&cleaned, meeting).await;
        if let Some(preview) = report::console_preview(meeting, &summary, self.summarizer.schema()) {
            pb.suspend(|| println!("\n{}", preview));
        }

        Outcome::Collected(ProcessedMeeting {
            meeting: meeting.clone(),
            summary,
            full_text_preview: text::preview(&cleaned),
        })
    }
}

// ── Tests ──
