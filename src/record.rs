use serde::{Deserialize, Serialize};

/// Title given to records whose title extraction failed entirely.
///
/// Such records are kept (losing partial information is worse than keeping a
/// marked placeholder) but never count toward the validity gate.
pub const UNTITLED: &str = "Untitled Event";

/// One event in the output snapshot.
///
/// Field declaration order is the serialized key order and must not change:
/// the downstream publisher diffs the artifact byte-for-byte.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub title: String,
    pub date: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,

    /// False when the date text resisted canonicalization and is stored raw
    #[serde(skip)]
    pub date_normalized: bool,
}

impl EventRecord {
    /// Create a record with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: None,
            venue: None,
            description: None,
            url: None,
            date_normalized: false,
        }
    }

    /// Create the placeholder record for a failed title extraction
    pub fn untitled() -> Self {
        Self::new(UNTITLED)
    }

    /// True when the title is the parse-failure placeholder
    pub fn is_untitled(&self) -> bool {
        self.title == UNTITLED
    }

    /// Identity key for deduplication: case/whitespace-insensitive
    /// normalization of title + date
    pub fn identity(&self) -> String {
        format!(
            "{}\u{1f}{}",
            normalize_for_identity(&self.title),
            normalize_for_identity(self.date.as_deref().unwrap_or(""))
        )
    }

    /// Number of populated optional fields
    pub fn completeness(&self) -> usize {
        [&self.date, &self.venue, &self.description, &self.url]
            .iter()
            .filter(|f| f.is_some())
            .count()
    }

    /// Fill this record's missing optional fields from another record with
    /// the same identity
    pub fn absorb(&mut self, other: &EventRecord) {
        if self.date.is_none() {
            self.date = other.date.clone();
            self.date_normalized = other.date_normalized;
        }
        if self.venue.is_none() {
            self.venue = other.venue.clone();
        }
        if self.description.is_none() {
            self.description = other.description.clone();
        }
        if self.url.is_none() {
            self.url = other.url.clone();
        }
    }
}

/// Lowercase and collapse all whitespace runs to single spaces
fn normalize_for_identity(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
