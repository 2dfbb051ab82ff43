//! One scrape run, end to end.
//!
//! `Rendering → Extracting → Parsing → Validating → Serializing`, with the
//! browser session scoped strictly to the rendering stage. Parsing failures
//! are per-record and never abort the run; rendering and validation failures
//! do. The artifact is always written — even empty — before the acceptance
//! gate decides the run's fate, so the external validator always finds a
//! complete, well-formed file.

use crate::browser::{BrowserSession, SessionOptions};
use crate::config::SiteProfile;
use crate::error::Result;
use crate::extract::Extractor;
use crate::output;
use crate::parse::FieldParser;
use crate::record::EventRecord;
use crate::render::Renderer;
use crate::validate::{self, Validated};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Stages of a run; each fatal error aborts the stages after the one that
/// produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Rendering,
    Extracting,
    Parsing,
    Validating,
    Serializing,
    Done,
}

/// Non-fatal conditions surfaced for operator visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunWarning {
    /// No event entries matched: either the page structure changed or there
    /// are genuinely no events right now
    ZeroResults,
}

/// Where and how a run writes its artifacts
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The diffable snapshot the publisher watches
    pub output_path: PathBuf,

    /// Optional metadata artifact (scrape timestamp, source, count)
    pub metadata_path: Option<PathBuf>,

    /// Browser launch options
    pub session: SessionOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("lehavre_events_test.json"),
            metadata_path: None,
            session: SessionOptions::default(),
        }
    }
}

/// What one run produced
#[derive(Debug)]
pub struct RunReport {
    /// Fragments found on the page
    pub fragments: usize,

    /// Records after deduplication, in output order
    pub records: Vec<EventRecord>,

    /// Candidate records before deduplication
    pub total: usize,

    /// Records passing the validity test
    pub valid: usize,

    /// `valid / total` for the acceptance gate
    pub validity_ratio: f64,

    /// Non-fatal warnings raised during the run
    pub warnings: Vec<RunWarning>,

    /// When the page was scraped
    pub scraped_at: DateTime<Utc>,
}

fn advance(stage: &mut Stage, next: Stage) {
    log::debug!("Stage: {:?} -> {:?}", stage, next);
    *stage = next;
}

/// Execute one full scrape run.
///
/// Pure function of the current page content: the previous artifact is never
/// read, the set is rebuilt from scratch, and the browser session lives only
/// inside the rendering stage.
pub fn run(profile: &SiteProfile, options: &RunOptions) -> Result<RunReport> {
    profile.validate()?;

    let mut stage = Stage::Idle;
    let mut warnings = Vec::new();
    let scraped_at = Utc::now();

    advance(&mut stage, Stage::Rendering);
    let tree = {
        let session = BrowserSession::launch(options.session.clone())?;
        Renderer::new(&session, profile).render(&profile.events_url)?
        // Session dropped here: browser released whether or not the later
        // stages succeed
    };

    advance(&mut stage, Stage::Extracting);
    let extractor = Extractor::new(profile);
    let fragments = extractor.extract(&tree);
    if fragments.is_empty() {
        warnings.push(RunWarning::ZeroResults);
    }
    let fragment_count = fragments.len();

    advance(&mut stage, Stage::Parsing);
    let parser = FieldParser::new(profile);
    let candidates: Vec<EventRecord> = fragments.iter().map(|f| parser.parse(f)).collect();

    advance(&mut stage, Stage::Validating);
    let validated = validate::dedupe(candidates);

    advance(&mut stage, Stage::Serializing);
    write_artifacts(&validated, profile, options, scraped_at)?;

    // Gate after the write: the file must exist for the external validator
    // even when the run fails it
    validate::require_valid(&validated)?;

    advance(&mut stage, Stage::Done);

    let validity_ratio = validated.validity_ratio();
    let Validated {
        records,
        total,
        valid,
    } = validated;

    Ok(RunReport {
        fragments: fragment_count,
        records,
        total,
        valid,
        validity_ratio,
        warnings,
        scraped_at,
    })
}

fn write_artifacts(
    validated: &Validated,
    profile: &SiteProfile,
    options: &RunOptions,
    scraped_at: DateTime<Utc>,
) -> Result<()> {
    let json = output::to_canonical_json(&validated.records)?;
    output::write_atomic(&options.output_path, &json)?;

    if let Some(metadata_path) = &options.metadata_path {
        let json = output::to_metadata_json(&validated.records, &profile.events_url, scraped_at)?;
        output::write_atomic(metadata_path, &json)?;
    }

    Ok(())
}
