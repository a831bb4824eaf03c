use std::fmt;

use chrono::NaiveDate;
use url::Url;

use crate::summarize::Summary;

const MAX_TITLE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingType {
    CityCouncil,
    SpecialMeeting,
    Meeting,
}

impl MeetingType {
    pub fn classify(title: &str) -> Self {
        let lower = title.to_lowercase();
        if lower.contains("council") {
            MeetingType::CityCouncil
        } else if lower.contains("special") {
            MeetingType::SpecialMeeting
        } else {
            MeetingType::Meeting
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeetingType::CityCouncil => "City Council",
            MeetingType::SpecialMeeting => "Special Meeting",
            MeetingType::Meeting => "Meeting",
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the agenda link points at an actual document yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Published,
    /// Link is a bare site root; the publisher posts the agenda closer to the date.
    Pending,
}

impl Availability {
    pub fn of(agenda_url: &str) -> Self {
        match Url::parse(agenda_url) {
            Ok(url) if (url.path().is_empty() || url.path() == "/") && url.query().is_none() => {
                Availability::Pending
            }
            Ok(_) => Availability::Published,
            Err(_) => Availability::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRecord {
    pub title: String,
    pub date: NaiveDate,
    pub agenda_url: String,
    pub kind: MeetingType,
    pub availability: Availability,
}

impl MeetingRecord {
    pub fn new(title: &str, date: NaiveDate, agenda_url: &str, kind: MeetingType) -> Self {
        MeetingRecord {
            title: title.chars().take(MAX_TITLE_CHARS).collect(),
            date,
            agenda_url: agenda_url.to_string(),
            kind,
            availability: Availability::of(agenda_url),
        }
    }

    /// Build a record whose type comes from keywords in the title.
    pub fn from_title(title: &str, date: NaiveDate, agenda_url: &str) -> Self {
        Self::new(title, date, agenda_url, MeetingType::classify(title))
    }

    pub fn is_published(&self) -> bool {
        self.availability == Availability::Published
    }

    /// Scratch file name for the downloaded agenda.
    pub fn document_filename(&self) -> String {
        format!(
            "meeting_{}_{}.pdf",
            self.date.format("%Y-%m-%d"),
            self.kind.label().replace(' ', "_")
        )
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedMeeting {
    pub meeting: MeetingRecord,
    pub summary: Summary,
    pub full_text_preview: String,
}

// ── Tests ──
