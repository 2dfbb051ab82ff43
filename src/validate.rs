//! Record validation and identity-based deduplication.
//!
//! Two records with the same normalized (title, date) are the same event.
//! Merging keeps the most complete record of each group, fills its gaps from
//! the rest, and preserves first-seen order so unchanged source content
//! produces an unchanged artifact.

use crate::error::{Result, ScrapeError};
use crate::record::EventRecord;
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Outcome of validating and deduplicating one candidate set
#[derive(Debug, Clone)]
pub struct Validated {
    /// Merged records, first-seen order
    pub records: Vec<EventRecord>,

    /// Candidate records before merging
    pub total: usize,

    /// Merged records passing the validity test
    pub valid: usize,
}

impl Validated {
    /// `valid / total` over the candidate set; 0.0 when nothing was parsed
    pub fn validity_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.valid as f64 / self.total as f64
        }
    }
}

/// A record counts toward the acceptance gate when it has a real title and at
/// least one of date or venue
pub fn is_valid(record: &EventRecord) -> bool {
    !record.is_untitled() && (record.date.is_some() || record.venue.is_some())
}

/// Merge duplicates and compute validity counts.
///
/// Within an identity group the most complete record wins; completeness ties
/// go to the first-seen record. The winner then absorbs the optional fields
/// it is missing from the rest of the group, so the merged record is never
/// less populated than any input. Group position is the position of the
/// group's first-seen member.
pub fn dedupe(candidates: Vec<EventRecord>) -> Validated {
    let total = candidates.len();
    let mut groups: IndexMap<String, EventRecord> = IndexMap::new();

    for record in candidates {
        match groups.entry(record.identity()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                if record.completeness() > existing.completeness() {
                    let mut winner = record;
                    winner.absorb(existing);
                    *existing = winner;
                } else {
                    existing.absorb(&record);
                }
                log::debug!("Merged duplicate event: {}", existing.title);
            }
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
        }
    }

    let records: Vec<EventRecord> = groups.into_values().collect();
    let valid = records.iter().filter(|r| is_valid(r)).count();

    log::info!(
        "Validated {} candidates into {} records ({} valid)",
        total,
        records.len(),
        valid
    );

    Validated {
        records,
        total,
        valid,
    }
}

/// The acceptance gate: a run with zero valid events must not publish
pub fn require_valid(validated: &Validated) -> Result<()> {
    if validated.valid == 0 {
        return Err(ScrapeError::InsufficientValidEvents {
            total: validated.total,
        });
    }
    Ok(())
}
