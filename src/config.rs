use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Site-specific extraction patterns.
///
/// Everything in here is data discovered empirically against the live source,
/// not pipeline logic: when the site changes layout, this is what breaks and
/// what gets updated. A checked-in copy lives in `profiles/lehavre.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteProfile {
    /// Base URL used to resolve relative event links
    pub base_url: String,

    /// Listing page to render
    pub events_url: String,

    /// An entry is a link whose href contains one of these markers
    pub entry_href_markers: Vec<String>,

    /// CSS selectors polled for the page-ready signal
    pub ready_selectors: Vec<String>,

    /// Tags that may act as the card container around an entry link
    pub container_tags: Vec<String>,

    /// Class substring that identifies a card container
    pub container_class_hint: String,

    /// How many ancestor levels to climb when resolving the card container
    pub max_ancestor_hops: usize,

    /// Button/link labels that expand the listing with more results
    pub load_more_labels: Vec<String>,

    /// Attempts at clicking a load-more control before giving up
    pub load_more_attempts: usize,

    /// Heading tags tried first for the title
    pub title_tags: Vec<String>,

    /// Class substrings that mark a title element
    pub title_class_hints: Vec<String>,

    /// Class substrings that mark a date/schedule element
    pub date_class_hints: Vec<String>,

    /// Class substrings that mark a venue/location element
    pub venue_class_hints: Vec<String>,

    /// Street keywords used by the address heuristic
    pub venue_keywords: Vec<String>,

    /// Class substrings that mark a description element
    pub description_class_hints: Vec<String>,

    /// Minimum length for description candidates
    pub min_description_len: usize,

    /// Upper bound on fragments taken from one listing page
    pub max_events: usize,

    /// Readiness wait budget, in seconds
    pub timeout_secs: u64,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            base_url: "https://www.lehavre-etretat-tourisme.com".to_string(),
            events_url: "https://www.lehavre-etretat-tourisme.com/agenda/a-ne-pas-manquer/concerts/"
                .to_string(),
            entry_href_markers: vec!["/fiche/".to_string()],
            ready_selectors: vec![
                "a[href*='/fiche/']".to_string(),
                ".event-card".to_string(),
                "article".to_string(),
            ],
            container_tags: vec!["article".to_string(), "div".to_string()],
            container_class_hint: "card".to_string(),
            max_ancestor_hops: 3,
            load_more_labels: vec![
                "Plus de résultats".to_string(),
                "Voir plus".to_string(),
                "Afficher plus".to_string(),
                "View More".to_string(),
            ],
            load_more_attempts: 3,
            title_tags: vec![
                "h1".to_string(),
                "h2".to_string(),
                "h3".to_string(),
                "h4".to_string(),
            ],
            title_class_hints: vec!["title".to_string(), "titre".to_string(), "heading".to_string()],
            date_class_hints: vec!["date".to_string(), "horaire".to_string()],
            venue_class_hints: vec![
                "lieu".to_string(),
                "venue".to_string(),
                "location".to_string(),
                "adresse".to_string(),
            ],
            venue_keywords: vec![
                "rue".to_string(),
                "avenue".to_string(),
                "place".to_string(),
                "boulevard".to_string(),
                "chemin".to_string(),
                "quai".to_string(),
            ],
            description_class_hints: vec!["descriptif".to_string(), "description".to_string()],
            min_description_len: 30,
            max_events: 48,
            timeout_secs: 20,
        }
    }
}

impl SiteProfile {
    /// Load a profile from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let profile: SiteProfile = serde_json::from_str(&raw)
            .map_err(|e| ScrapeError::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reject profiles that cannot possibly match anything
    pub fn validate(&self) -> Result<()> {
        if self.events_url.is_empty() {
            return Err(ScrapeError::Config("events_url is empty".to_string()));
        }
        if self.entry_href_markers.is_empty() {
            return Err(ScrapeError::Config("entry_href_markers is empty".to_string()));
        }
        if self.ready_selectors.is_empty() {
            return Err(ScrapeError::Config("ready_selectors is empty".to_string()));
        }
        Ok(())
    }

    /// Readiness wait budget as a Duration
    pub fn wait_budget(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve a possibly relative href against the base URL
    pub fn resolve_url(&self, href: &str) -> String {
        let trimmed = href.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return trimmed.to_string();
        }
        if trimmed.starts_with('/') {
            return format!("{}{}", self.base_url.trim_end_matches('/'), trimmed);
        }
        format!("{}/{}", self.base_url.trim_end_matches('/'), trimmed)
    }
}
