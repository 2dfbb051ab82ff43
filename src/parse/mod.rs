//! Field extraction from one event fragment.
//!
//! Every field runs an ordered list of strategies, each returning an
//! `Option<String>`, short-circuiting on the first success. A strategy that
//! finds nothing is silent; a fragment where every title strategy fails still
//! yields a record, carrying the `"Untitled Event"` placeholder. Nothing in
//! here can abort the run.

pub mod date;

use crate::config::SiteProfile;
use crate::dom::ElementNode;
use crate::extract::RawFragment;
use crate::record::EventRecord;
use date::normalize_date;
use regex::Regex;
use std::sync::LazyLock;

static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{5}\b").unwrap());

/// Turns raw fragments into [`EventRecord`]s
pub struct FieldParser<'p> {
    profile: &'p SiteProfile,
}

impl<'p> FieldParser<'p> {
    pub fn new(profile: &'p SiteProfile) -> Self {
        Self { profile }
    }

    /// Parse one fragment. Infallible: missing fields degrade the record,
    /// they never produce an error.
    pub fn parse(&self, fragment: &RawFragment<'_>) -> EventRecord {
        let mut record = match self.title(fragment) {
            Some(title) => EventRecord::new(title),
            None => EventRecord::untitled(),
        };

        if let Some(raw_date) = self.date(fragment) {
            let normalized = normalize_date(&raw_date);
            record.date = Some(normalized.text);
            record.date_normalized = normalized.normalized;
        }

        record.venue = self.venue(fragment);
        record.description = self.description(fragment);
        record.url = self.url(fragment);

        if record.is_untitled() {
            log::debug!("Fragment without usable title kept as placeholder");
        }

        record
    }

    /// Title: heading tag, then title-class element, then entry-link text
    fn title(&self, fragment: &RawFragment<'_>) -> Option<String> {
        self.title_from_heading(fragment)
            .or_else(|| self.title_from_class_hint(fragment))
            .or_else(|| self.title_from_link_text(fragment))
    }

    fn title_from_heading(&self, fragment: &RawFragment<'_>) -> Option<String> {
        fragment
            .card
            .find_tag(&self.profile.title_tags)
            .map(|n| n.deep_text())
            .and_then(non_empty)
    }

    fn title_from_class_hint(&self, fragment: &RawFragment<'_>) -> Option<String> {
        self.find_by_class_hints(fragment.card, &self.profile.title_class_hints)
            .map(|n| n.deep_text())
            .and_then(non_empty)
    }

    fn title_from_link_text(&self, fragment: &RawFragment<'_>) -> Option<String> {
        non_empty(fragment.link.deep_text())
    }

    /// Date: date-class element first (may be unparseable text, kept raw by
    /// the caller), then any recognizable date shape in the card text
    fn date(&self, fragment: &RawFragment<'_>) -> Option<String> {
        self.date_from_class_hint(fragment)
            .or_else(|| self.date_from_card_text(fragment))
    }

    fn date_from_class_hint(&self, fragment: &RawFragment<'_>) -> Option<String> {
        self.find_by_class_hints(fragment.card, &self.profile.date_class_hints)
            .map(|n| n.deep_text())
            .and_then(non_empty)
    }

    fn date_from_card_text(&self, fragment: &RawFragment<'_>) -> Option<String> {
        date::find_date(&fragment.card.deep_text())
    }

    /// Venue: address-looking text (street keyword + postal code), then
    /// venue-class element
    fn venue(&self, fragment: &RawFragment<'_>) -> Option<String> {
        self.venue_from_address(fragment)
            .or_else(|| self.venue_from_class_hint(fragment))
    }

    fn venue_from_address(&self, fragment: &RawFragment<'_>) -> Option<String> {
        fragment
            .card
            .descendants()
            .filter_map(|n| n.text())
            .map(str::to_string)
            .find(|text| self.looks_like_address(text))
    }

    fn looks_like_address(&self, text: &str) -> bool {
        if text.len() <= 10 || !POSTAL_CODE.is_match(text) {
            return false;
        }
        let lower = text.to_lowercase();
        self.profile
            .venue_keywords
            .iter()
            .any(|kw| lower.contains(kw.as_str()))
    }

    fn venue_from_class_hint(&self, fragment: &RawFragment<'_>) -> Option<String> {
        self.find_by_class_hints(fragment.card, &self.profile.venue_class_hints)
            .map(|n| n.deep_text())
            .and_then(non_empty)
    }

    /// Description: description-class element, then the first long-enough
    /// paragraph; boilerplate sections (tariffs, schedules, contact) excluded
    fn description(&self, fragment: &RawFragment<'_>) -> Option<String> {
        self.description_from_class_hint(fragment)
            .or_else(|| self.description_from_paragraph(fragment))
    }

    fn description_from_class_hint(&self, fragment: &RawFragment<'_>) -> Option<String> {
        self.find_by_class_hints(fragment.card, &self.profile.description_class_hints)
            .map(|n| n.deep_text())
            .and_then(|text| self.usable_description(text))
    }

    fn description_from_paragraph(&self, fragment: &RawFragment<'_>) -> Option<String> {
        fragment
            .card
            .descendants()
            .filter(|n| n.is_tag("p"))
            .map(|n| n.deep_text())
            .find_map(|text| self.usable_description(text))
    }

    fn usable_description(&self, text: String) -> Option<String> {
        if text.len() < self.profile.min_description_len {
            return None;
        }
        let lower = text.to_lowercase();
        if lower.contains("tarif") || lower.contains("horaire") || lower.contains("contact") {
            return None;
        }
        Some(text)
    }

    /// Url: the entry link's href, resolved against the base URL
    fn url(&self, fragment: &RawFragment<'_>) -> Option<String> {
        fragment
            .link
            .href()
            .map(|href| self.profile.resolve_url(href))
    }

    fn find_by_class_hints<'a>(
        &self,
        card: &'a ElementNode,
        hints: &[String],
    ) -> Option<&'a ElementNode> {
        card.find(|n| hints.iter().any(|hint| n.class_contains(hint)))
    }
}

fn non_empty(text: String) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}
