//! Pagina: lazy page-object selector trees for DOM testing.
//!
//! Pagina (Spanish: "page") lets tests describe nested UI regions once, as a
//! declarative tree of relative selectors, and query or assert against any
//! position in that tree without re-deriving document paths by hand. Nodes
//! are resolved lazily: nothing touches the document until an element or
//! assertion is actually read, and every read re-queries the live document,
//! so page objects stay correct across re-renders with no cache to
//! invalidate.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PAGINA Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐     ┌──────────────┐     ┌────────────────┐   │
//! │  │ Definition │───►│ SelectorNode │───►│ DomQuery        │   │
//! │  │ (declared  │    │ tree (lazy,  │    │ capability      │   │
//! │  │  blueprint)│    │  re-queried) │    │ (browser/mock)  │   │
//! │  └───────────┘     └──────────────┘     └────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use pagina::{selector, selector_with, Definition, MockDom, Page};
//!
//! let dom = Rc::new(RefCell::new(MockDom::new()));
//! let root = dom.borrow().root();
//! let card = dom
//!     .borrow_mut()
//!     .append(root, "div", &[("data-card", "")], "");
//! dom.borrow_mut()
//!     .append(card, "h2", &[("data-title", "")], "Hello world");
//!
//! let page = Page::new(
//!     dom.clone(),
//!     root,
//!     Definition::new().child(
//!         "card",
//!         selector_with(
//!             "[data-card]",
//!             Definition::new().child("title", selector("[data-title]")),
//!         ),
//!     ),
//! );
//!
//! let title = page.child("card").child("title");
//! assert!(title.assert().has_text("Hello world").passed);
//! assert!(title.element().is_some());
//! ```
//!
//! "No match" anywhere along a chain is never an error: `element()` returns
//! `None` and assertions report zero matches, with the original selector
//! preserved in the failure message.

#![warn(missing_docs)]

mod arena;
mod assertions;
mod definition;
mod dom;
mod node;
mod page;
mod resolve;
mod result;

/// In-memory document for testing page objects without a browser
pub mod mock;

pub use assertions::{AssertionResult, DomAssertions};
pub use definition::{selector, selector_with, Definition, Getter, Method, SelectorDef};
pub use dom::{DomQuery, ElementId};
pub use mock::MockDom;
pub use node::SelectorNode;
pub use page::Page;
pub use resolve::AssertionTarget;
pub use result::{PaginaError, PaginaResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertions::{AssertionResult, DomAssertions};
    pub use super::definition::{selector, selector_with, Definition, SelectorDef};
    pub use super::dom::{DomQuery, ElementId};
    pub use super::mock::MockDom;
    pub use super::node::SelectorNode;
    pub use super::page::Page;
    pub use super::resolve::AssertionTarget;
    pub use super::result::{PaginaError, PaginaResult};
}
