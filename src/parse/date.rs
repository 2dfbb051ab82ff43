//! Canonicalization of French date text.
//!
//! The site mixes numeric dates (`12/06/2024`), textual ones
//! (`12 juin 2024`) and bare weekday words (`samedi`). Anything recognized is
//! rewritten into one canonical form; anything else is kept raw and marked,
//! never rejected.

use regex::Regex;
use std::sync::LazyLock;

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());

static TEXTUAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(1er|\d{1,2})\s+(janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre)(?:\s+(\d{4}))?",
    )
    .unwrap()
});

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(lundi|mardi|mercredi|jeudi|vendredi|samedi|dimanche)\b").unwrap()
});

/// Date text after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDate {
    /// Canonical text when recognized, raw (trimmed, collapsed) otherwise
    pub text: String,

    /// Whether the text matched a recognized date shape
    pub normalized: bool,
}

/// Collapse whitespace runs to single spaces
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize one piece of date text.
///
/// Recognized shapes are canonicalized: numeric dates get zero-padded day and
/// month, textual dates get a lowercase month name, weekdays are lowercased.
/// Unrecognized text comes back raw with `normalized = false`.
pub fn normalize_date(raw: &str) -> NormalizedDate {
    let cleaned = collapse(raw);

    if let Some(caps) = NUMERIC.captures(&cleaned) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        if (1..=31).contains(&day) && (1..=12).contains(&month) {
            return NormalizedDate {
                text: format!("{:02}/{:02}/{}", day, month, &caps[3]),
                normalized: true,
            };
        }
    }

    if let Some(caps) = TEXTUAL.captures(&cleaned) {
        let day = caps[1].to_lowercase();
        let month = caps[2].to_lowercase();
        let text = match caps.get(3) {
            Some(year) => format!("{} {} {}", day, month, year.as_str()),
            None => format!("{} {}", day, month),
        };
        return NormalizedDate {
            text,
            normalized: true,
        };
    }

    if let Some(caps) = WEEKDAY.captures(&cleaned) {
        return NormalizedDate {
            text: caps[1].to_lowercase(),
            normalized: true,
        };
    }

    NormalizedDate {
        text: cleaned,
        normalized: false,
    }
}

/// First recognizable date inside arbitrary text, if any
pub fn find_date(text: &str) -> Option<String> {
    let cleaned = collapse(text);
    NUMERIC
        .find(&cleaned)
        .or_else(|| TEXTUAL.find(&cleaned))
        .or_else(|| WEEKDAY.find(&cleaned))
        .map(|m| m.as_str().to_string())
}
