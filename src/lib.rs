//! # lehavre-events
//!
//! Scraper for the Le Havre cultural agenda. Renders the JavaScript-built
//! listing page in headless Chrome, locates event entries in the DOM,
//! extracts and normalizes their fields, deduplicates the result and writes
//! a deterministic JSON snapshot suitable for byte-level diffing by the
//! downstream publisher.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lehavre_events::{pipeline, RunOptions, SiteProfile};
//!
//! # fn main() -> lehavre_events::Result<()> {
//! let profile = SiteProfile::default();
//! let report = pipeline::run(&profile, &RunOptions::default())?;
//! println!("{} valid events", report.valid);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: scoped Chrome session management
//! - [`render`]: page loading with readiness polling and listing expansion
//! - [`dom`]: typed tree over the rendered page
//! - [`extract`]: locating event fragments
//! - [`parse`]: per-field fallback-strategy extraction
//! - [`validate`]: validity rules and identity-based deduplication
//! - [`output`]: canonical JSON artifacts, written atomically
//! - [`pipeline`]: one run, end to end
//! - [`config`]: site-specific selectors and patterns as data

pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod output;
pub mod parse;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod validate;

pub use browser::{BrowserSession, SessionOptions};
pub use config::SiteProfile;
pub use dom::{DomTree, ElementNode};
pub use error::{Result, ScrapeError};
pub use extract::{Extractor, RawFragment};
pub use parse::FieldParser;
pub use pipeline::{RunOptions, RunReport, RunWarning, Stage};
pub use record::{EventRecord, UNTITLED};
pub use render::Renderer;
pub use validate::Validated;
