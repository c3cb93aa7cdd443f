//! Named-field mapping for the worksheets the app reads.
//!
//! The spreadsheet has no schema beyond column order, so every column index
//! lives here and the rest of the crate works with typed records.

use serde::{Serialize, Serializer};

// Submissions worksheet columns.
const SUBMISSION_ID: usize = 0;
const SUBMISSION_DATE: usize = 1;
const SUBMISSION_CONTENT: usize = 2;
const SUBMISSION_TYPE: usize = 3;
const SUBMISSION_RECIPIENT: usize = 4;
const SUBMISSION_SUBJECT: usize = 5;
const SUBMISSION_REVIEW: usize = 9;
const SUBMISSION_SENT: usize = 10;

// Settings worksheet columns.
const SETTINGS_LETTER_TYPE: usize = 1;
const SETTINGS_PURPOSE: usize = 2;
const SETTINGS_STYLE: usize = 6;

pub const DEFAULT_LETTER_TYPE: &str = "جديد";

/// Review state of a submission. The labels are written to and read from the
/// sheet verbatim and double as the switch for which review actions apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    ReadyToSend,
    NeedsImprovement,
    Rejected,
    Sent,
    Other(String),
}

impl ReviewStatus {
    pub const PENDING: &'static str = "في الانتظار";
    pub const READY_TO_SEND: &'static str = "جاهز للإرسال";
    pub const NEEDS_IMPROVEMENT: &'static str = "يحتاج إلى تحسينات";
    pub const REJECTED: &'static str = "مرفوض";
    pub const SENT: &'static str = "تم الإرسال";

    pub fn from_label(label: &str) -> Self {
        match label {
            Self::PENDING => Self::Pending,
            Self::READY_TO_SEND => Self::ReadyToSend,
            Self::NEEDS_IMPROVEMENT => Self::NeedsImprovement,
            Self::REJECTED => Self::Rejected,
            Self::SENT => Self::Sent,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => Self::PENDING,
            Self::ReadyToSend => Self::READY_TO_SEND,
            Self::NeedsImprovement => Self::NEEDS_IMPROVEMENT,
            Self::Rejected => Self::REJECTED,
            Self::Sent => Self::SENT,
            Self::Other(label) => label,
        }
    }

    /// Badge class used by the log and review tables.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::ReadyToSend | Self::Sent => "ready",
            Self::NeedsImprovement => "needs-improvement",
            Self::Rejected => "rejected",
            _ => "waiting",
        }
    }

    /// States a reviewer can filter the log by.
    pub fn filter_choices() -> [&'static str; 4] {
        [
            Self::PENDING,
            Self::READY_TO_SEND,
            Self::NEEDS_IMPROVEMENT,
            Self::REJECTED,
        ]
    }
}

impl Serialize for ReviewStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: String,
    pub date: String,
    pub content: String,
    pub letter_type: String,
    pub recipient: String,
    pub subject: String,
    pub review: ReviewStatus,
    pub sent: String,
}

impl Submission {
    /// Maps one data row (header already skipped). `index` is the zero-based
    /// data row position, used for the fallback id.
    pub fn from_row(index: usize, row: &[String]) -> Self {
        Self {
            id: cell(row, SUBMISSION_ID)
                .map(str::to_string)
                .unwrap_or_else(|| format!("LETTER-{}", index + 1)),
            date: cell(row, SUBMISSION_DATE)
                .map(str::to_string)
                .unwrap_or_else(today),
            content: cell_or_empty(row, SUBMISSION_CONTENT),
            letter_type: cell(row, SUBMISSION_TYPE)
                .unwrap_or(DEFAULT_LETTER_TYPE)
                .to_string(),
            recipient: cell_or_empty(row, SUBMISSION_RECIPIENT),
            subject: cell_or_empty(row, SUBMISSION_SUBJECT),
            review: cell(row, SUBMISSION_REVIEW)
                .map(ReviewStatus::from_label)
                .unwrap_or(ReviewStatus::Pending),
            sent: cell(row, SUBMISSION_SENT)
                .unwrap_or(ReviewStatus::PENDING)
                .to_string(),
        }
    }

    /// Maps a whole Submissions sheet, skipping the header row.
    pub fn list_from_sheet(rows: &[Vec<String>]) -> Vec<Self> {
        rows.iter()
            .skip(1)
            .enumerate()
            .map(|(index, row)| Self::from_row(index, row))
            .collect()
    }
}

/// Choices offered by the create-letter form, sourced from the Settings sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DropdownOptions {
    pub letter_types: Vec<String>,
    pub purposes: Vec<String>,
    pub styles: Vec<String>,
}

impl DropdownOptions {
    pub fn from_settings_sheet(rows: &[Vec<String>]) -> Self {
        let column = |index: usize| {
            dedupe_first_seen(rows.iter().skip(1).filter_map(|row| cell(row, index)))
        };
        Self {
            letter_types: column(SETTINGS_LETTER_TYPE),
            purposes: column(SETTINGS_PURPOSE),
            styles: column(SETTINGS_STYLE),
        }
    }
}

/// Drops repeated values while keeping the order in which they first appear.
pub fn dedupe_first_seen<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(String::as_str).filter(|s| !s.is_empty())
}

fn cell_or_empty(row: &[String], index: usize) -> String {
    cell(row, index).unwrap_or_default().to_string()
}

fn today() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}
