use chrono::NaiveDate;
use tracing::warn;

use crate::calendar::{sort_and_limit, Window};
use crate::meeting::{MeetingRecord, MeetingType};

/// Site root the city links to until an agenda is posted.
pub const PLACEHOLDER_URL: &str = "https://www.lincolnca.gov/";

const SAMPLE_MEETINGS: &[(&str, (i32, u32, u32), &str, MeetingType)] = &[
    (
        "Regular City Council Meeting",
        (2026, 1, 14),
        "https://www.lincolnca.gov/media/bpqgyvdq/113-1142026-regular-city-council-and-edc-meeting-agendas.pdf",
        MeetingType::CityCouncil,
    ),
    (
        "Special Meeting - Airport Committee",
        (2026, 1, 21),
        "https://www.lincolnca.gov/media/f2vp233c/120-1212026-special-city-council-airport-committee-fioc-parks-recreation-committee-meeting-agendas.pdf",
        MeetingType::SpecialMeeting,
    ),
    ("Regular Council Meeting", (2026, 1, 27), PLACEHOLDER_URL, MeetingType::CityCouncil),
    ("Regular City Council Meeting", (2026, 2, 18), PLACEHOLDER_URL, MeetingType::CityCouncil),
    ("Special Meeting", (2026, 4, 15), PLACEHOLDER_URL, MeetingType::SpecialMeeting),
];

/// Built-in meetings used when the calendar yields nothing.
pub fn catalog() -> Vec<MeetingRecord> {
    SAMPLE_MEETINGS
        .iter()
        .filter_map(|(title, (y, m, d), url, kind)| {
            let date = NaiveDate::from_ymd_opt(*y, *m, *d)?;
            Some(MeetingRecord::new(title, date, url, *kind))
        })
        .collect()
}

/// Keep scraped meetings, or fall back to the catalog when there are none.
/// Catalog entries are kept even when they fall outside `window`.
pub fn or_catalog(scraped: Vec<MeetingRecord>, window: &Window, limit: usize) -> Vec<MeetingRecord> {
    if !scraped.is_empty() {
        return scraped;
    }

    warn!("Calendar yielded no meetings, using fallback sample meetings");
    let meetings = catalog();
    let stale = meetings.iter().filter(|m| !window.contains(m.date)).count();
    if stale > 0 {
        warn!(
            "{} of {} fallback meetings fall outside {}",
            stale,
            meetings.len(),
            window
        );
    }
    sort_and_limit(meetings, limit)
}

// ── Tests ──
