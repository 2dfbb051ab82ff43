//! Command-line entry point for one scrape run.
//!
//! Exit status is the acceptance contract: zero only when the artifact was
//! written and at least one valid event survived the gate.

use anyhow::Context;
use clap::Parser;
use lehavre_events::{pipeline, RunOptions, SessionOptions, SiteProfile};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lehavre-events")]
#[command(about = "Scrape the Le Havre cultural agenda into a diffable JSON snapshot")]
#[command(version)]
struct Cli {
    /// Path of the JSON snapshot
    #[arg(long, default_value = "lehavre_events_test.json")]
    output: PathBuf,

    /// Also write the metadata artifact next to the snapshot
    #[arg(long)]
    with_metadata: bool,

    /// Site profile JSON file (defaults to the built-in Le Havre profile)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Override the listing URL from the profile
    #[arg(long)]
    url: Option<String>,

    /// Readiness wait budget in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Upper bound on events taken from the listing
    #[arg(long)]
    max_events: Option<usize>,

    /// Launch the browser with a visible window (for debugging selectors)
    #[arg(long)]
    headed: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut profile = match &cli.profile {
        Some(path) => SiteProfile::from_path(path)
            .with_context(|| format!("loading profile {}", path.display()))?,
        None => SiteProfile::default(),
    };
    if let Some(url) = cli.url {
        profile.events_url = url;
    }
    if let Some(timeout) = cli.timeout {
        profile.timeout_secs = timeout;
    }
    if let Some(max_events) = cli.max_events {
        profile.max_events = max_events;
    }

    let metadata_path = cli.with_metadata.then(|| {
        let stem = cli
            .output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("lehavre_events_test");
        cli.output.with_file_name(format!("{}_with_metadata.json", stem))
    });

    let options = RunOptions {
        output_path: cli.output.clone(),
        metadata_path,
        session: SessionOptions::new().headless(!cli.headed),
    };

    match pipeline::run(&profile, &options) {
        Ok(report) => {
            println!("=== SCRAPE COMPLETE ===");
            println!("Events: {} ({} valid)", report.records.len(), report.valid);
            println!("Scraped at: {}", report.scraped_at.format("%Y-%m-%d %H:%M:%S"));
            for warning in &report.warnings {
                println!("Warning: {:?}", warning);
            }
            for (i, event) in report.records.iter().take(5).enumerate() {
                println!("{}. {}", i + 1, event.title);
                println!("   Date: {}", event.date.as_deref().unwrap_or("N/A"));
                println!("   Venue: {}", event.venue.as_deref().unwrap_or("N/A"));
            }
            Ok(())
        }
        Err(e) => {
            let stage = e.stage();
            Err(anyhow::Error::new(e).context(format!("scrape failed during {}", stage)))
        }
    }
}
