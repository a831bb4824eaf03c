mod calendar;
mod download;
mod error;
mod fallback;
mod meeting;
mod pdf;
mod pipeline;
mod progress;
mod report;
mod settings;
mod summarize;
mod text;

use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use reqwest::Client;

use calendar::Window;
use error::PipelineError;
use pipeline::Pipeline;
use settings::Settings;
use summarize::Summarizer;

#[derive(Parser)]
#[command(name = "agenda_digest", about = "Summarize city council meeting agendas into a Markdown report")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// Settings file (TOML)
    #[arg(long, default_value = settings::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Max meetings to consider
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    /// Days before and after today to search
    #[arg(long)]
    window_days: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, download, summarize and write the report
    Run {
        #[command(flatten)]
        common: Common,
        /// Report path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Max agenda pages to read per document
        #[arg(long)]
        max_pages: Option<usize>,
    },
    /// List meetings in the window without downloading anything
    List {
        #[command(flatten)]
        common: Common,
    },
}

impl Common {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut s = Settings::load(&self.config)?;
        if let Some(limit) = self.limit {
            s.limit = limit;
        }
        if let Some(days) = self.window_days {
            s.window_days = days;
        }
        Ok(s)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(|| progress::LogWriter)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let client = Client::new();

    let result = match cli.command {
        Commands::Run { common, output, max_pages } => {
            let mut s = common.settings()?;
            if let Some(output) = output {
                s.output = output;
            }
            if let Some(max_pages) = max_pages {
                s.max_pages = max_pages;
            }

            println!("{} Meeting Scraper", s.jurisdiction);
            println!("{}", "=".repeat(60));

            let credential = settings::load_credential(&s);
            let summarizer = Summarizer::new(client.clone(), credential, &s);
            let window = Window::rolling(s.window_days);
            let meetings = pipeline::gather_meetings(&client, &s, &window).await;

            let p = Pipeline::new(client, summarizer, std::env::temp_dir(), s.max_pages);
            let (processed, counts) = p.run(&meetings).await;
            counts.print();

            match report::write_report(&processed, &s.output, &s.jurisdiction, Local::now().naive_local()) {
                Ok(path) => println!("\nSUCCESS! Report generated at: {}", path.display()),
                Err(PipelineError::NothingToReport) => println!("\nNo meetings processed successfully"),
                Err(e) => println!("\nCould not write report {}: {}", s.output.display(), e),
            }
            Ok(())
        }
        Commands::List { common } => {
            let s = common.settings()?;
            let window = Window::rolling(s.window_days);
            let meetings = pipeline::gather_meetings(&client, &s, &window).await;

            println!(
                "{:>3} | {:<10} | {:<15} | {:<9} | {:<40}",
                "#", "Date", "Type", "Agenda", "Title"
            );
            println!("{}", "-".repeat(90));
            for (i, m) in meetings.iter().enumerate() {
                let agenda = if m.is_published() { "posted" } else { "pending" };
                println!(
                    "{:>3} | {:<10} | {:<15} | {:<9} | {:<40}",
                    i + 1,
                    m.date.format("%Y-%m-%d").to_string(),
                    m.kind.label(),
                    agenda,
                    text::truncate(&m.title, 40)
                );
            }
            println!("\n{} meetings | {}", meetings.len(), window);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
