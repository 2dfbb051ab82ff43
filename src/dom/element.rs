use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One element of the rendered page.
///
/// Every optional piece of data is exposed through an accessor returning an
/// `Option` rather than through presence checks on the raw attribute map, so
/// field-extraction code never has to assume anything about page structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name, lowercase (e.g. "div", "a", "h3")
    pub tag_name: String,

    /// Element attributes (id, class, href, ...)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text directly inside this element, whitespace-trimmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Child elements in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: HashMap::new(),
            text_content: None,
            children: Vec::new(),
        }
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    /// Attribute value by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The href attribute, if this element carries one
    pub fn href(&self) -> Option<&str> {
        self.attr("href")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Check whether any class name contains the given substring (case-insensitive)
    pub fn class_contains(&self, hint: &str) -> bool {
        let hint = hint.to_lowercase();
        self.attr("class")
            .map(|classes| classes.to_lowercase().contains(&hint))
            .unwrap_or(false)
    }

    /// Own text content, `None` when absent or blank
    pub fn text(&self) -> Option<&str> {
        self.text_content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// All text in this subtree, document order, joined with single spaces
    pub fn deep_text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(t) = self.text() {
            out.push(t);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first iterator over this node and all descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First descendant (or self) matching the predicate, document order
    pub fn find<'a>(&'a self, pred: impl Fn(&ElementNode) -> bool) -> Option<&'a ElementNode> {
        self.descendants().find(|&n| pred(n))
    }

    /// First descendant with one of the given tag names
    pub fn find_tag<'a>(&'a self, tags: &[impl AsRef<str>]) -> Option<&'a ElementNode> {
        self.find(|n| tags.iter().any(|t| n.is_tag(t.as_ref())))
    }

    /// Drop subtrees that never carry event content
    pub fn prune(&mut self) {
        self.children
            .retain(|child| !matches!(child.tag_name.as_str(), "script" | "style" | "noscript"));
        for child in &mut self.children {
            child.prune();
        }
    }
}

/// Depth-first pre-order traversal over a subtree
pub struct Descendants<'a> {
    stack: Vec<&'a ElementNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a ElementNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push in reverse so children come out in document order
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> ElementNode {
        ElementNode::new("article")
            .with_attribute("class", "event-card featured")
            .with_children(vec![
                ElementNode::new("h3").with_text("Concert au Volcan"),
                ElementNode::new("span")
                    .with_attribute("class", "date")
                    .with_text("12/06/2024"),
                ElementNode::new("a")
                    .with_attribute("href", "/fiche/concert_ABC/")
                    .with_text("Voir"),
            ])
    }

    #[test]
    fn test_optional_accessors() {
        let card = sample_card();
        assert_eq!(card.attr("class"), Some("event-card featured"));
        assert_eq!(card.attr("id"), None);
        assert!(card.class_contains("card"));
        assert!(!card.class_contains("hidden"));
        assert_eq!(card.text(), None);
    }

    #[test]
    fn test_blank_text_is_none() {
        let node = ElementNode::new("div").with_text("   ");
        assert_eq!(node.text(), None);
    }

    #[test]
    fn test_descendants_document_order() {
        let card = sample_card();
        let tags: Vec<&str> = card.descendants().map(|n| n.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["article", "h3", "span", "a"]);
    }

    #[test]
    fn test_find_tag() {
        let card = sample_card();
        let heading = card.find_tag(&["h1", "h2", "h3", "h4"]).unwrap();
        assert_eq!(heading.text(), Some("Concert au Volcan"));

        assert!(card.find_tag(&["h1"]).is_none());
    }

    #[test]
    fn test_deep_text() {
        let card = sample_card();
        assert_eq!(card.deep_text(), "Concert au Volcan 12/06/2024 Voir");
    }

    #[test]
    fn test_prune() {
        let mut node = ElementNode::new("div").with_children(vec![
            ElementNode::new("p").with_text("keep"),
            ElementNode::new("script").with_text("alert('x')"),
            ElementNode::new("style").with_text(".x {}"),
        ]);
        node.prune();

        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].is_tag("p"));
    }

    #[test]
    fn test_deserialization_defaults() {
        let json = r#"{"tag_name": "div"}"#;
        let node: ElementNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.tag_name, "div");
        assert!(node.children.is_empty());
        assert!(node.attributes.is_empty());
    }
}
