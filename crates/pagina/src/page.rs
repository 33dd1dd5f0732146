//! Page object root.
//!
//! A [`Page`] is the entry point into a selector tree: the degenerate node
//! with no parent and no selector, whose element is the environment's root
//! scope. It owns the shared page core (query capability, root scope, node
//! arena) that every node handle created from it points back into.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::arena::{NodeArena, NodeKey, NodeRecord};
use crate::definition::Definition;
use crate::dom::{DomQuery, ElementId};
use crate::node::SelectorNode;

/// Shared state behind every node handle of one page.
pub(crate) struct PageCore {
    /// The environment's query capability
    pub(crate) dom: Rc<dyn DomQuery>,
    /// Root scope all resolution chains bottom out at
    pub(crate) root: ElementId,
    /// Node state store
    pub(crate) arena: RefCell<NodeArena>,
}

impl fmt::Debug for PageCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageCore")
            .field("root", &self.root)
            .field("arena", &self.arena)
            .finish_non_exhaustive()
    }
}

/// A page object: the root of a lazy selector tree.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use pagina::{selector, Definition, MockDom, Page};
///
/// let dom = Rc::new(RefCell::new(MockDom::new()));
/// let root = dom.borrow().root();
/// dom.borrow_mut().append(root, "div", &[("data-target", "")], "Hello world");
///
/// let page = Page::new(
///     dom.clone(),
///     root,
///     Definition::new().child("target", selector("[data-target]")),
/// );
///
/// assert!(page.child("target").assert().exists_count(1).passed);
/// ```
#[derive(Debug)]
pub struct Page {
    core: Rc<PageCore>,
    root_key: NodeKey,
}

impl Page {
    /// Create a page rooted at `root`, with the declared fields of
    /// `definition` as its top-level selector positions.
    #[must_use]
    pub fn new(dom: Rc<dyn DomQuery>, root: ElementId, definition: Definition) -> Self {
        let definition = Rc::new(definition);
        let mut arena = NodeArena::default();
        let root_key = arena.alloc(NodeRecord {
            parent: None,
            selector: None,
            index: None,
            def: Rc::clone(&definition),
            values: definition.template_values(),
        });

        Self {
            core: Rc::new(PageCore {
                dom,
                root,
                arena: RefCell::new(arena),
            }),
            root_key,
        }
    }

    /// The root selector node; its element is always the root scope
    #[must_use]
    pub fn root(&self) -> SelectorNode {
        SelectorNode::from_parts(Rc::clone(&self.core), self.root_key)
    }

    /// Convenience for `root().child(name)`
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a declared child selector; see
    /// [`SelectorNode::child`].
    #[must_use]
    pub fn child(&self, name: &str) -> SelectorNode {
        self.root().child(name)
    }

    /// Convenience for `root().try_child(name)`
    #[must_use]
    pub fn try_child(&self, name: &str) -> Option<SelectorNode> {
        self.root().try_child(name)
    }

    /// The configured root scope element
    #[must_use]
    pub fn root_element(&self) -> ElementId {
        self.core.root
    }
}
