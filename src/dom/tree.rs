use crate::browser::BrowserSession;
use crate::dom::element::ElementNode;
use crate::error::{Result, ScrapeError};

/// Snapshot of a fully rendered page
#[derive(Debug, Clone, PartialEq)]
pub struct DomTree {
    /// The page's `<body>` element
    pub root: ElementNode,
}

impl DomTree {
    pub fn new(root: ElementNode) -> Self {
        Self { root }
    }

    /// Capture the rendered DOM of the session's tab.
    ///
    /// Runs an in-page script that serializes the body subtree to JSON;
    /// script/style subtrees are dropped at the source.
    pub fn from_session(session: &BrowserSession) -> Result<Self> {
        let js_code = include_str!("extract_dom.js");

        let value = session
            .evaluate(js_code)?
            .ok_or_else(|| ScrapeError::DomParseFailed("No value returned from DOM extraction".to_string()))?;

        // The script returns a JSON string, not an object
        let json_str: String = serde_json::from_value(value)
            .map_err(|e| ScrapeError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        let root: ElementNode = serde_json::from_str(&json_str)
            .map_err(|e| ScrapeError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))?;

        log::debug!("Captured DOM with {} elements", count(&root));

        Ok(Self::new(root))
    }

    /// Total number of elements in the snapshot
    pub fn count_elements(&self) -> usize {
        count(&self.root)
    }
}

fn count(node: &ElementNode) -> usize {
    1 + node.children.iter().map(count).sum::<usize>()
}
