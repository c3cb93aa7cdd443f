use serde::Deserialize;

use crate::sheets::Submission;

/// Letter types offered by the log's type filter.
pub const TYPE_FILTER_CHOICES: [&str; 4] = ["جديد", "رد", "متابعة", "تعاون"];

/// Display name for a stored letter type. Older rows carry English names.
pub fn translate_type(letter_type: &str) -> &str {
    match letter_type {
        "New" => "جديد",
        "Reply" => "رد",
        "Follow Up" => "متابعة",
        "Co-op" => "تعاون",
        other => other,
    }
}

/// Search text plus the two exact-match filters. Empty means "any".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogFilter {
    #[serde(rename = "q")]
    pub search: String,
    #[serde(rename = "type")]
    pub letter_type: String,
    pub review: String,
}

impl LogFilter {
    pub fn matches_search(&self, letter: &Submission) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        letter.recipient.to_lowercase().contains(&needle)
            || letter.id.to_lowercase().contains(&needle)
    }

    pub fn matches_type(&self, letter: &Submission) -> bool {
        self.letter_type.is_empty() || letter.letter_type == self.letter_type
    }

    pub fn matches_review(&self, letter: &Submission) -> bool {
        self.review.is_empty() || letter.review.label() == self.review
    }

    pub fn matches(&self, letter: &Submission) -> bool {
        self.matches_search(letter) && self.matches_type(letter) && self.matches_review(letter)
    }
}

/// The submissions shown on one log page. Removing a row only hides it from
/// this view; nothing is deleted from the sheet and the row comes back on
/// the next fresh load.
#[derive(Debug, Clone, Default)]
pub struct LogView {
    letters: Vec<Submission>,
    hidden: Vec<String>,
}

impl LogView {
    pub fn new(letters: Vec<Submission>) -> Self {
        Self {
            letters,
            hidden: Vec::new(),
        }
    }

    pub fn hide(&mut self, id: &str) {
        if !self.hidden.iter().any(|h| h == id) {
            self.hidden.push(id.to_string());
        }
    }

    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    pub fn visible(&self) -> impl Iterator<Item = &Submission> {
        self.letters
            .iter()
            .filter(|letter| !self.hidden.contains(&letter.id))
    }

    pub fn filtered<'a>(&'a self, filter: &'a LogFilter) -> Vec<&'a Submission> {
        self.visible().filter(|letter| filter.matches(letter)).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Submission> {
        self.letters.iter().find(|letter| letter.id == id)
    }
}

/// Plain-text export of a single letter.
pub fn export_text(letter: &Submission) -> String {
    format!(
        "الرقم المرجعي: {}\nالتاريخ: {}\nالمستلم: {}\nالموضوع: {}\n\n{}\n",
        letter.id, letter.date, letter.recipient, letter.subject, letter.content
    )
}

/// `letter-{id}.txt`, with only the characters that would break the header
/// or name a path swapped for `_`.
pub fn export_filename(letter: &Submission) -> String {
    let safe: String = letter
        .id
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("letter-{}.txt", safe)
}

/// Attachment header carrying an ASCII `filename` plus the exact UTF-8 name
/// in `filename*` (RFC 5987).
pub fn content_disposition(letter: &Submission) -> String {
    let filename = export_filename(letter);
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(&filename)
    )
}
