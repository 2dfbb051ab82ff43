//! Canonical JSON artifacts.
//!
//! The plain snapshot must be byte-identical across runs when the source
//! content is unchanged: fixed key order, 2-space indentation, stable array
//! order, trailing newline. Run-varying values (the scrape timestamp) live
//! only in the separate metadata artifact so they never disturb the diff the
//! publisher watches.

use crate::error::Result;
use crate::record::EventRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Metadata wrapper for the secondary artifact
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotWithMetadata<'a> {
    pub scraped_at: String,
    pub source_url: &'a str,
    pub count: usize,
    pub events: &'a [EventRecord],
}

/// Canonical JSON for the plain snapshot
pub fn to_canonical_json(records: &[EventRecord]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

/// Canonical JSON for the metadata variant
pub fn to_metadata_json(
    records: &[EventRecord],
    source_url: &str,
    scraped_at: DateTime<Utc>,
) -> Result<String> {
    let wrapped = SnapshotWithMetadata {
        scraped_at: scraped_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        source_url,
        count: records.len(),
        events: records,
    };
    let mut json = serde_json::to_string_pretty(&wrapped)?;
    json.push('\n');
    Ok(json)
}

/// Write an artifact atomically: the content lands in a sibling temp file
/// first and is renamed over the target, so a crash mid-write leaves the
/// previous artifact untouched and never a half-written one.
pub fn write_atomic(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");

    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;

    log::info!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_records() -> Vec<EventRecord> {
        let mut a = EventRecord::new("Concert au Théâtre");
        a.date = Some("12 juin 2024".to_string());
        let b = EventRecord::new("Marché");
        vec![a, b]
    }

    #[test]
    fn test_canonical_json_is_deterministic() {
        let records = sample_records();
        let first = to_canonical_json(&records).unwrap();
        let second = to_canonical_json(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_canonical_json_shape() {
        let json = to_canonical_json(&sample_records()).unwrap();

        assert!(json.starts_with('['));
        assert!(json.ends_with("]\n"));
        // Nulls are explicit so the key set never varies between records
        assert!(json.contains("\"venue\": null"));
        // Accented text is emitted verbatim, not escaped
        assert!(json.contains("Théâtre"));
    }

    #[test]
    fn test_empty_set_serializes_to_empty_array() {
        let json = to_canonical_json(&[]).unwrap();
        assert_eq!(json, "[]\n");
    }

    #[test]
    fn test_metadata_variant_wraps_same_records() {
        let records = sample_records();
        let scraped_at = Utc.with_ymd_and_hms(2024, 6, 1, 6, 30, 0).unwrap();
        let json = to_metadata_json(&records, "https://example.com/agenda/", scraped_at).unwrap();

        assert!(json.contains("\"scrapedAt\": \"2024-06-01T06:30:00Z\""));
        assert!(json.contains("\"sourceUrl\": \"https://example.com/agenda/\""));
        assert!(json.contains("\"count\": 2"));
        assert!(json.contains("Concert au Théâtre"));
    }

    #[test]
    fn test_write_atomic_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");

        write_atomic(&path, "[\"old\"]\n").unwrap();
        write_atomic(&path, "[\"new\"]\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[\"new\"]\n");
        // No temp file left behind
        assert!(!path.with_extension("json.tmp").exists());
    }
}
