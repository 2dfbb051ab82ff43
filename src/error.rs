use std::time::Duration;
use thiserror::Error;

/// Errors produced by the scrape pipeline
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Failed to launch the Chrome/Chromium process
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Navigation or in-page evaluation failed while rendering
    #[error("Render failed for {url}: {reason}")]
    RenderError { url: String, reason: String },

    /// The readiness signal never appeared within the wait budget
    #[error("Render timed out after {budget:?} waiting for {url} to become ready")]
    RenderTimeout { url: String, budget: Duration },

    /// The rendered DOM could not be extracted or parsed
    #[error("Failed to parse DOM: {0}")]
    DomParseFailed(String),

    /// The deduplicated set contains zero valid events; publication must not proceed
    #[error("Insufficient valid events: 0 of {total} records passed validation")]
    InsufficientValidEvents { total: usize },

    /// Invalid or unreadable site profile
    #[error("Invalid site profile: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Pipeline stage this error aborts, for operator-facing diagnostics
    pub fn stage(&self) -> &'static str {
        match self {
            Self::LaunchFailed(_) | Self::RenderError { .. } | Self::RenderTimeout { .. } => "rendering",
            Self::DomParseFailed(_) => "extracting",
            Self::InsufficientValidEvents { .. } => "validating",
            Self::Config(_) => "configuration",
            Self::Io(_) | Self::Json(_) => "serializing",
        }
    }
}

/// Result type alias for scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScrapeError::RenderTimeout {
            url: "https://example.com".to_string(),
            budget: Duration::from_secs(20),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn test_error_stage() {
        let err = ScrapeError::InsufficientValidEvents { total: 3 };
        assert_eq!(err.stage(), "validating");

        let err = ScrapeError::LaunchFailed("no chrome".to_string());
        assert_eq!(err.stage(), "rendering");
    }
}
