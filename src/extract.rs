//! Locating event entries in the rendered DOM.
//!
//! An entry is a link whose href carries one of the configured markers; its
//! fragment is the surrounding card container, resolved by climbing a bounded
//! number of ancestor levels. Two links inside the same card yield one
//! fragment.

use crate::config::SiteProfile;
use crate::dom::{DomTree, ElementNode};

/// One apparent event in the page: the card container plus the entry link
/// that anchored it. Lives only until the FieldParser has consumed it.
#[derive(Debug, Clone, Copy)]
pub struct RawFragment<'a> {
    /// Subtree holding the event's visible fields
    pub card: &'a ElementNode,

    /// The link that matched the entry pattern
    pub link: &'a ElementNode,
}

/// Walks a rendered tree and yields event fragments
pub struct Extractor<'p> {
    profile: &'p SiteProfile,
}

impl<'p> Extractor<'p> {
    pub fn new(profile: &'p SiteProfile) -> Self {
        Self { profile }
    }

    /// Lazy sequence of fragments in document order, capped at the profile's
    /// `max_events`. Restartable within a run by calling again.
    pub fn fragments<'a>(&'a self, tree: &'a DomTree) -> Fragments<'a> {
        Fragments {
            profile: self.profile,
            stack: vec![(&tree.root, Vec::new())],
            seen_cards: Vec::new(),
            remaining: self.profile.max_events,
        }
    }

    /// Collect all fragments; logs how many entries matched
    pub fn extract<'a>(&'a self, tree: &'a DomTree) -> Vec<RawFragment<'a>> {
        let fragments: Vec<_> = self.fragments(tree).collect();
        if fragments.is_empty() {
            log::warn!("No event entries matched the configured pattern");
        } else {
            log::info!("Found {} event entries", fragments.len());
        }
        fragments
    }
}

/// Iterator over event fragments (pre-order traversal with ancestor tracking)
pub struct Fragments<'a> {
    profile: &'a SiteProfile,
    stack: Vec<(&'a ElementNode, Vec<&'a ElementNode>)>,
    seen_cards: Vec<*const ElementNode>,
    remaining: usize,
}

impl<'a> Fragments<'a> {
    /// The card is the nearest ancestor within the hop budget carrying the
    /// container class hint; failing that, the furthest ancestor inside the
    /// budget; failing that, the link itself.
    fn resolve_card(
        &self,
        link: &'a ElementNode,
        ancestors: &[&'a ElementNode],
    ) -> &'a ElementNode {
        let hops = self.profile.max_ancestor_hops.min(ancestors.len());

        let mut furthest = link;
        for &ancestor in ancestors.iter().rev().take(hops) {
            let tag_ok = self
                .profile
                .container_tags
                .iter()
                .any(|t| ancestor.is_tag(t));
            if tag_ok && ancestor.class_contains(&self.profile.container_class_hint) {
                return ancestor;
            }
            furthest = ancestor;
        }
        furthest
    }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = RawFragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        while let Some((node, ancestors)) = self.stack.pop() {
            // Children in reverse so the traversal stays in document order
            for child in node.children.iter().rev() {
                let mut path = ancestors.clone();
                path.push(node);
                self.stack.push((child, path));
            }

            let is_entry = node.is_tag("a")
                && node.href().is_some_and(|href| {
                    self.profile
                        .entry_href_markers
                        .iter()
                        .any(|marker| href.contains(marker.as_str()))
                });
            if !is_entry {
                continue;
            }

            let card = self.resolve_card(node, &ancestors);
            let card_ptr = card as *const ElementNode;
            if self.seen_cards.contains(&card_ptr) {
                continue;
            }
            self.seen_cards.push(card_ptr);
            self.remaining -= 1;

            return Some(RawFragment { card, link: node });
        }

        None
    }
}
