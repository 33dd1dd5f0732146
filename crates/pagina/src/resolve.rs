//! Recursive selector resolution.
//!
//! Both entry points walk the parent chain and re-query the document at every
//! level on every call. Nothing is memoized: a resolution after a re-render
//! sees the new document, at the cost of O(depth) queries per call. Failure
//! anywhere in the chain propagates as `None` / an unmatchable target and
//! never panics.

use tracing::trace;

use crate::arena::NodeKey;
use crate::dom::{DomQuery, ElementId};
use crate::page::PageCore;

/// What the assertion layer receives for a node.
///
/// The three shapes are treated uniformly as "the set of elements matching
/// under this scope": a scoped pair preserves multiplicity (how many elements
/// match), a concrete element is a singleton set, and an unmatchable target
/// is the deterministically empty set, still carrying the original selector
/// for diagnostic display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionTarget {
    /// Selector plus the scope element to query it under
    Scoped {
        /// Selector relative to `scope`
        selector: String,
        /// Resolved parent element
        scope: ElementId,
    },
    /// A single concrete element (indexed lookup that succeeded)
    Element(ElementId),
    /// Guaranteed to match nothing; `exists` fails and `does_not_exist`
    /// passes, deterministically
    Unmatchable {
        /// The original selector, kept for diagnostics
        selector: String,
    },
}

impl AssertionTarget {
    /// The matching elements, in document order
    #[must_use]
    pub fn matches(&self, dom: &dyn DomQuery) -> Vec<ElementId> {
        match self {
            Self::Scoped { selector, scope } => dom.query_all(*scope, selector),
            Self::Element(element) => vec![*element],
            Self::Unmatchable { .. } => Vec::new(),
        }
    }

    /// The selector this target was derived from, if it carries one
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Scoped { selector, .. } | Self::Unmatchable { selector } => Some(selector),
            Self::Element(_) => None,
        }
    }

    /// Whether this target can never match
    #[must_use]
    pub fn is_unmatchable(&self) -> bool {
        matches!(self, Self::Unmatchable { .. })
    }
}

/// Key fields of a record, cloned out so no arena borrow is held across the
/// recursion or the query calls.
fn record_parts(core: &PageCore, key: NodeKey) -> (Option<NodeKey>, Option<String>, Option<usize>) {
    let arena = core.arena.borrow();
    let record = arena.get(key);
    (record.parent, record.selector.clone(), record.index)
}

/// Resolve a node to its concrete element, if any.
///
/// The root record short-circuits to the configured root scope regardless of
/// index. Otherwise the parent is resolved first and its failure propagates;
/// within a resolved parent the node is the first match of its selector, or
/// the index-th of all matches when an index is fixed.
pub(crate) fn resolve_element(core: &PageCore, key: NodeKey) -> Option<ElementId> {
    let (parent, selector, index) = record_parts(core, key);

    let Some(parent_key) = parent else {
        return Some(core.root);
    };

    let scope = resolve_element(core, parent_key)?;
    // non-root records always carry a selector
    let selector = selector?;

    let resolved = match index {
        None => core.dom.query_first(scope, &selector),
        Some(i) => core.dom.query_all(scope, &selector).into_iter().nth(i),
    };
    trace!(
        selector = %selector,
        index = ?index,
        matched = resolved.is_some(),
        "resolved selector node"
    );
    resolved
}

/// Compute the assertion target for a node.
///
/// Resolves the *parent's* element, not the node's own: with no index fixed,
/// the (selector, scope) pair is handed on so the assertion layer keeps the
/// full match set; with an index, the concrete element is handed on when it
/// exists. Any failure along the way degrades to an unmatchable target.
pub(crate) fn assertion_target(core: &PageCore, key: NodeKey) -> AssertionTarget {
    let (parent, selector, index) = record_parts(core, key);

    let Some(selector) = selector else {
        // the root node's own target is the root scope itself
        return AssertionTarget::Element(core.root);
    };

    let scope = parent.and_then(|parent_key| resolve_element(core, parent_key));
    let Some(scope) = scope else {
        trace!(selector = %selector, "ancestor chain failed to resolve");
        return AssertionTarget::Unmatchable { selector };
    };

    match index {
        None => AssertionTarget::Scoped { selector, scope },
        Some(i) => match core.dom.query_all(scope, &selector).into_iter().nth(i) {
            Some(element) => AssertionTarget::Element(element),
            None => AssertionTarget::Unmatchable { selector },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDom;

    struct NoMatches;

    impl DomQuery for NoMatches {
        fn query_first(&self, _: ElementId, _: &str) -> Option<ElementId> {
            None
        }

        fn query_all(&self, _: ElementId, _: &str) -> Vec<ElementId> {
            Vec::new()
        }

        fn attribute(&self, _: ElementId, _: &str) -> Option<String> {
            None
        }

        fn text_content(&self, _: ElementId) -> String {
            String::new()
        }
    }

    #[test]
    fn scoped_target_preserves_multiplicity() {
        let mut dom = MockDom::new();
        let root = dom.root();
        let a = dom.append(root, "div", &[("data-item", "")], "");
        let b = dom.append(root, "div", &[("data-item", "")], "");

        let target = AssertionTarget::Scoped {
            selector: "[data-item]".to_string(),
            scope: root,
        };
        assert_eq!(target.matches(&dom), vec![a, b]);
        assert_eq!(target.selector(), Some("[data-item]"));
        assert!(!target.is_unmatchable());
    }

    #[test]
    fn element_target_is_a_singleton_set() {
        let target = AssertionTarget::Element(ElementId::new(5));
        assert_eq!(target.matches(&NoMatches), vec![ElementId::new(5)]);
        assert_eq!(target.selector(), None);
    }

    #[test]
    fn unmatchable_target_matches_nothing_and_keeps_the_selector() {
        let target = AssertionTarget::Unmatchable {
            selector: "[data-gone]".to_string(),
        };
        assert!(target.matches(&NoMatches).is_empty());
        assert_eq!(target.selector(), Some("[data-gone]"));
        assert!(target.is_unmatchable());
    }
}
