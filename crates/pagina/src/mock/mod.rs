//! In-memory document for testing page objects without a browser.
//!
//! [`MockDom`] is an arena-allocated element tree with a small CSS-subset
//! matcher behind the [`crate::DomQuery`] capability: tag, `#id`, `.class`,
//! `[attr]`, `[attr=value]`, compounds of those, the descendant combinator,
//! and comma unions. Build a document programmatically, hand it to a
//! [`crate::Page`] (usually via `Rc<RefCell<MockDom>>` so the test can keep
//! mutating it between resolutions), and every resolution sees the current
//! tree.
//!
//! ## Example
//!
//! ```
//! use pagina::{DomQuery, MockDom};
//!
//! let mut dom = MockDom::new();
//! let root = dom.root();
//! let list = dom.element(root, "ul");
//! dom.append(list, "li", &[("class", "item")], "first");
//! dom.append(list, "li", &[("class", "item")], "second");
//!
//! assert_eq!(dom.query_all(root, "ul .item").len(), 2);
//! assert_eq!(dom.text_content(list), "first second");
//! ```

mod select;
mod tree;

pub use tree::MockDom;
