//! Rendered-page DOM representation
//!
//! The browser serializes its body subtree to JSON (see `extract_dom.js`);
//! this module turns that into a typed [`ElementNode`] tree with explicit
//! optional-field accessors so extraction code never probes raw attributes.

pub mod element;
pub mod tree;

pub use element::ElementNode;
pub use tree::DomTree;
