//! Page rendering: navigation, readiness polling and listing expansion.
//!
//! The target page builds its listing client-side, so a plain navigation
//! settles long before any event entry exists. Instead of a fixed sleep, the
//! renderer polls for the configured readiness selectors up to a wait budget
//! and fails with `RenderTimeout` when none ever appears.

use crate::browser::BrowserSession;
use crate::config::SiteProfile;
use crate::dom::DomTree;
use crate::error::{Result, ScrapeError};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const POST_CLICK_SETTLE: Duration = Duration::from_millis(2000);

/// Renders the listing page into a [`DomTree`] using a scoped browser session
pub struct Renderer<'s> {
    session: &'s BrowserSession,
    profile: &'s SiteProfile,
}

impl<'s> Renderer<'s> {
    pub fn new(session: &'s BrowserSession, profile: &'s SiteProfile) -> Self {
        Self { session, profile }
    }

    /// Load the listing page and return its rendered DOM.
    ///
    /// Waits for a readiness signal up to the profile's budget, then makes a
    /// bounded number of attempts to expand "load more" content before
    /// capturing the tree. Expansion failures are logged and ignored.
    pub fn render(&self, url: &str) -> Result<DomTree> {
        log::info!("Loading listing page: {}", url);
        self.session.navigate(url)?;

        self.wait_until_ready(url, self.profile.wait_budget())?;
        self.expand_listing();

        DomTree::from_session(self.session)
    }

    /// Poll for any readiness selector until it appears or the budget runs out
    fn wait_until_ready(&self, url: &str, budget: Duration) -> Result<()> {
        let started = Instant::now();

        loop {
            for selector in &self.profile.ready_selectors {
                if self.selector_present(selector)? {
                    log::debug!(
                        "Page ready after {:?} (matched {:?})",
                        started.elapsed(),
                        selector
                    );
                    return Ok(());
                }
            }

            if started.elapsed() >= budget {
                return Err(ScrapeError::RenderTimeout {
                    url: url.to_string(),
                    budget,
                });
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn selector_present(&self, selector: &str) -> Result<bool> {
        let js = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        self.session.evaluate_bool(&js)
    }

    /// Click through "load more" controls so one listing page carries its
    /// full content. The site renders a handful of label variants; each
    /// successful click is followed by a settle delay for the AJAX response.
    fn expand_listing(&self) {
        for attempt in 1..=self.profile.load_more_attempts {
            match self.click_load_more() {
                Ok(true) => {
                    log::info!("Expanded listing (attempt {})", attempt);
                    std::thread::sleep(POST_CLICK_SETTLE);
                }
                Ok(false) => {
                    log::debug!("No load-more control found (attempt {})", attempt);
                    return;
                }
                Err(e) => {
                    log::warn!("Load-more click failed (attempt {}): {}", attempt, e);
                    return;
                }
            }
        }
    }

    fn click_load_more(&self) -> Result<bool> {
        let labels = serde_json::to_string(&self.profile.load_more_labels)?;
        let js = format!(
            r#"(function() {{
                var labels = {labels};
                var candidates = document.querySelectorAll(
                    "button, a, [class*='load-more'], [class*='btn-more']");
                for (var i = 0; i < candidates.length; i++) {{
                    var el = candidates[i];
                    var text = (el.textContent || "").trim();
                    for (var j = 0; j < labels.length; j++) {{
                        if (text.indexOf(labels[j]) !== -1 && el.offsetParent !== null) {{
                            el.scrollIntoView({{block: "center"}});
                            el.click();
                            return true;
                        }}
                    }}
                }}
                return false;
            }})()"#
        );
        self.session.evaluate_bool(&js)
    }
}
