//! The query capability consumed by the resolution engine.
//!
//! Pagina never talks to a document directly. The environment supplies an
//! implementation of [`DomQuery`] — a real browser bridge, a server-side
//! renderer, or the in-memory [`crate::mock::MockDom`] — and the engine only
//! ever asks it for first-match / all-matches lookups plus the element
//! inspection the assertion layer needs. Implementations must be
//! side-effect-free.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Opaque handle to an element owned by the query capability.
///
/// Pagina never dereferences a handle; it only passes handles back to the
/// capability that issued them. Handles from different capabilities must not
/// be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(u32);

impl ElementId {
    /// Create a handle from a raw id
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id this handle wraps
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Document query primitives, scoped to an element.
///
/// Selectors are passed through verbatim — Pagina does not validate selector
/// syntax; what counts as a valid selector is up to the capability.
pub trait DomQuery {
    /// First element matching `selector` among the descendants of `scope`,
    /// in document order
    fn query_first(&self, scope: ElementId, selector: &str) -> Option<ElementId>;

    /// All elements matching `selector` among the descendants of `scope`,
    /// in document order
    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId>;

    /// Value of the attribute `name` on `element`, if present
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Concatenated text content of `element` and its descendants,
    /// in document order
    fn text_content(&self, element: ElementId) -> String;
}

// Tests typically keep the document mutable between resolutions (re-render,
// then assert again). Sharing an `Rc<RefCell<_>>` with the page covers that:
// every resolution re-queries whatever the document currently contains.
impl<T: DomQuery> DomQuery for RefCell<T> {
    fn query_first(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        self.borrow().query_first(scope, selector)
    }

    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        self.borrow().query_all(scope, selector)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.borrow().attribute(element, name)
    }

    fn text_content(&self, element: ElementId) -> String {
        self.borrow().text_content(element)
    }
}
