use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{Local, NaiveDate, TimeDelta};
use regex::Regex;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::meeting::MeetingRecord;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const BROWSER_AGENT: &str = "Mozilla/5.0";
const DEFAULT_TITLE: &str = "City Council Meeting";
const MIN_TITLE_CHARS: usize = 5;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap());
static AGENDA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)agenda").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Inclusive date range around a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// Edges that would leave the calendar clamp to `NaiveDate::MIN`/`MAX`.
    pub fn around(today: NaiveDate, days: i64) -> Self {
        let span = TimeDelta::try_days(days.max(0));
        Window {
            start: span
                .and_then(|s| today.checked_sub_signed(s))
                .unwrap_or(NaiveDate::MIN),
            end: span
                .and_then(|s| today.checked_add_signed(s))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Window around the local date at the time of the call.
    pub fn rolling(days: i64) -> Self {
        Self::around(Local::now().date_naive(), days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%B %d, %Y"),
            self.end.format("%B %d, %Y")
        )
    }
}

/// Fetch the calendar page and return meetings inside `window`, newest first.
/// Any failure is logged and yields an empty list.
pub async fn fetch_meetings(
    client: &Client,
    calendar_url: &str,
    site_base: &str,
    window: &Window,
    limit: usize,
) -> Vec<MeetingRecord> {
    info!("Searching for meetings between {}", window);

    match try_fetch(client, calendar_url, site_base, window).await {
        Ok(meetings) => {
            info!("Scraped {} meetings from {}", meetings.len(), calendar_url);
            sort_and_limit(meetings, limit)
        }
        Err(e) => {
            warn!("Could not scrape calendar {}: {}", calendar_url, e);
            Vec::new()
        }
    }
}

async fn try_fetch(
    client: &Client,
    calendar_url: &str,
    site_base: &str,
    window: &Window,
) -> Result<Vec<MeetingRecord>> {
    let base = Url::parse(site_base)?;

    info!("Accessing calendar: {}", calendar_url);
    let html = client
        .get(calendar_url)
        .header(USER_AGENT, BROWSER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(parse_calendar(&html, &base, window))
}

/// Scan every table row for a date and an agenda link.
pub fn parse_calendar(html: &str, base: &Url, window: &Window) -> Vec<MeetingRecord> {
    let doc = Html::parse_document(html);
    doc.select(&ROW_SEL)
        .filter_map(|row| parse_row(row, base, window))
        .collect()
}

fn parse_row(row: ElementRef, base: &Url, window: &Window) -> Option<MeetingRecord> {
    let row_text = row.text().collect::<Vec<_>>().join(" ");

    let caps = DATE_RE.captures(&row_text)?;
    let date_str = caps.get(0)?.as_str();
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    if !window.contains(date) {
        return None;
    }

    let link = row
        .select(&LINK_SEL)
        .find(|a| AGENDA_RE.is_match(&a.text().collect::<String>()))?;
    let link_text = cell_text(link);
    let href = link.value().attr("href").map(str::trim).filter(|h| !h.is_empty())?;
    let agenda_url = match base.join(href) {
        Ok(u) => u.to_string(),
        Err(e) => {
            debug!("Skipping agenda href {:?}: {}", href, e);
            return None;
        }
    };

    let title = row
        .select(&CELL_SEL)
        .map(cell_text)
        .find(|t| t.chars().count() > MIN_TITLE_CHARS && t != date_str && *t != link_text)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Some(MeetingRecord::from_title(&title, date, &agenda_url))
}

fn cell_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Newest first (stable for equal dates), capped at `limit`.
pub fn sort_and_limit(mut meetings: Vec<MeetingRecord>, limit: usize) -> Vec<MeetingRecord> {
    meetings.sort_by(|a, b| b.date.cmp(&a.date));
    meetings.truncate(limit);
    meetings
}

// ── Tests ──
