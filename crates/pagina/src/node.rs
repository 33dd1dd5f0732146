//! Selector nodes: lazy handles into the selector tree.
//!
//! A [`SelectorNode`] is a cheap cloneable handle (shared page core plus a
//! key into the node state store) presenting three views of one selector
//! position:
//!
//! - the **declared-field view**: [`SelectorNode::child`] instantiates a
//!   declared nested selector as a fresh child node — the blueprint itself is
//!   never handed out;
//! - the **indexed view**: [`SelectorNode::at`] yields a sibling node with
//!   the same selector and parent but a fixed index, composing freely with
//!   the declared-field view in either order;
//! - the **resolution view**: [`SelectorNode::element`] and
//!   [`SelectorNode::assert`], always available and never shadowed by
//!   extension members, which live in their own namespace behind
//!   [`SelectorNode::get`] / [`SelectorNode::set`] / [`SelectorNode::call`].
//!
//! No access on this type performs a document query until the resolution
//! view is read, and "no match" is always `None` / a zero-match assertion,
//! never a panic.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::arena::{NodeKey, NodeRecord};
use crate::assertions::DomAssertions;
use crate::definition::Member;
use crate::dom::ElementId;
use crate::page::PageCore;
use crate::resolve::{self, AssertionTarget};
use crate::result::{PaginaError, PaginaResult};

/// One (possibly indexed) selector position in a page's selector tree.
#[derive(Clone)]
pub struct SelectorNode {
    core: Rc<PageCore>,
    key: NodeKey,
}

impl fmt::Debug for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorNode")
            .field("selector", &self.selector())
            .field("index", &self.index())
            .finish_non_exhaustive()
    }
}

impl SelectorNode {
    pub(crate) fn from_parts(core: Rc<PageCore>, key: NodeKey) -> Self {
        Self { core, key }
    }

    fn record(&self) -> NodeRecord {
        self.core.arena.borrow().get(self.key).clone()
    }

    /// Instantiate the declared child selector `name` with this node as
    /// parent. Every call yields a fresh node; repeated accesses are
    /// structurally equivalent but not identical.
    ///
    /// # Panics
    ///
    /// Panics if `name` was not declared on this node's definition. Use
    /// [`SelectorNode::try_child`] for the non-panicking form.
    #[must_use]
    pub fn child(&self, name: &str) -> SelectorNode {
        self.try_child(name).unwrap_or_else(|| {
            panic!(
                "no declared child selector '{name}' (declared: {:?})",
                self.child_names()
            )
        })
    }

    /// Instantiate the declared child selector `name`, or `None` if no such
    /// child was declared.
    #[must_use]
    pub fn try_child(&self, name: &str) -> Option<SelectorNode> {
        let def = {
            let arena = self.core.arena.borrow();
            match arena.get(self.key).def.member(name) {
                Some(Member::Child(def)) => def.clone(),
                _ => return None,
            }
        };

        let key = def.instantiate(&mut self.core.arena.borrow_mut(), self.key);
        Some(Self::from_parts(Rc::clone(&self.core), key))
    }

    /// A sibling node addressing the `index`-th (0-based) match of this
    /// node's selector under the same parent.
    ///
    /// The sibling copies this node's extension values; its children and
    /// resolution are independent from this node's.
    #[must_use]
    pub fn at(&self, index: usize) -> SelectorNode {
        let sibling = NodeRecord {
            index: Some(index),
            ..self.record()
        };
        let key = self.core.arena.borrow_mut().alloc(sibling);
        Self::from_parts(Rc::clone(&self.core), key)
    }

    /// Resolve this node to its concrete element.
    ///
    /// Re-queries the live document through the whole ancestor chain on
    /// every call; `None` when this node or any ancestor has no match, or
    /// the fixed index is out of range.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        resolve::resolve_element(&self.core, self.key)
    }

    /// Assertions bound to this node's current assertion target.
    #[must_use]
    pub fn assert(&self) -> DomAssertions {
        DomAssertions::new(self.assertion_target(), Rc::clone(&self.core.dom))
    }

    /// The raw assertion target, for external assertion sinks.
    #[must_use]
    pub fn assertion_target(&self) -> AssertionTarget {
        resolve::assertion_target(&self.core, self.key)
    }

    /// Read an extension member: a node-local value, or a getter evaluated
    /// against this node. `None` if no such member exists.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let getter = {
            let arena = self.core.arena.borrow();
            let record = arena.get(self.key);
            if let Some(value) = record.values.get(name) {
                return Some(value.clone());
            }
            match record.def.member(name) {
                Some(Member::Getter(getter)) => Rc::clone(getter),
                _ => return None,
            }
        };
        // borrow released: the getter is free to resolve elements or touch
        // this node's value bag
        Some(getter(self))
    }

    /// Write a node-local extension value. Independent per node instance;
    /// sibling and child nodes never observe it.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.core
            .arena
            .borrow_mut()
            .get_mut(self.key)
            .values
            .insert(name.to_string(), value.into());
    }

    /// Invoke an extension method with this node as receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> PaginaResult<Value> {
        let method = {
            let arena = self.core.arena.borrow();
            match arena.get(self.key).def.member(name) {
                Some(Member::Method(method)) => Rc::clone(method),
                Some(_) => {
                    return Err(PaginaError::NotCallable {
                        name: name.to_string(),
                    })
                }
                None => {
                    return Err(PaginaError::UnknownMember {
                        name: name.to_string(),
                    })
                }
            }
        };
        Ok(method(self, args))
    }

    /// The parent node, or `None` for the page root
    #[must_use]
    pub fn parent(&self) -> Option<SelectorNode> {
        let parent = self.core.arena.borrow().get(self.key).parent;
        parent.map(|key| Self::from_parts(Rc::clone(&self.core), key))
    }

    /// This node's selector, relative to its parent; `None` for the root
    #[must_use]
    pub fn selector(&self) -> Option<String> {
        self.core.arena.borrow().get(self.key).selector.clone()
    }

    /// The fixed match index, if one was applied with [`SelectorNode::at`]
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.core.arena.borrow().get(self.key).index
    }

    /// Declared child selector names, in declaration order
    #[must_use]
    pub fn child_names(&self) -> Vec<String> {
        self.core.arena.borrow().get(self.key).def.child_names()
    }

    /// Attribute of the resolved element; `None` when unresolved or absent
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.element()
            .and_then(|element| self.core.dom.attribute(element, name))
    }

    /// Text content of the resolved element; `None` when unresolved
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.element()
            .map(|element| self.core.dom.text_content(element))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::definition::{selector, selector_with, Definition};
    use crate::mock::MockDom;
    use crate::page::Page;

    fn page_with(definition: Definition) -> (Rc<RefCell<MockDom>>, Page) {
        let dom = Rc::new(RefCell::new(MockDom::new()));
        let root = dom.borrow().root();
        let page = Page::new(dom.clone(), root, definition);
        (dom, page)
    }

    mod child_access_tests {
        use super::*;

        #[test]
        fn child_nodes_carry_the_declared_selector_and_parent() {
            let (_, page) = page_with(
                Definition::new().child("target", selector("[data-target]")),
            );

            let node = page.child("target");
            assert_eq!(node.selector().as_deref(), Some("[data-target]"));
            assert_eq!(node.index(), None);

            let parent = node.parent().unwrap();
            assert_eq!(parent.selector(), None);
            assert!(parent.parent().is_none());
        }

        #[test]
        fn repeated_access_is_structurally_equivalent() {
            let (_, page) = page_with(
                Definition::new().child("target", selector("[data-target]")),
            );

            let first = page.child("target");
            let second = page.child("target");
            assert_eq!(first.selector(), second.selector());
            assert_eq!(first.index(), second.index());
            assert_eq!(
                first.parent().unwrap().selector(),
                second.parent().unwrap().selector()
            );
        }

        #[test]
        fn try_child_returns_none_for_undeclared_names() {
            let (_, page) = page_with(
                Definition::new().child("target", selector("[data-target]")),
            );

            assert!(page.root().try_child("target").is_some());
            assert!(page.root().try_child("other").is_none());
            // non-child members are not children
            let (_, page) = page_with(Definition::new().value("label", "x"));
            assert!(page.root().try_child("label").is_none());
        }

        #[test]
        #[should_panic(expected = "no declared child selector 'typo'")]
        fn child_panics_on_undeclared_names() {
            let (_, page) = page_with(
                Definition::new().child("target", selector("[data-target]")),
            );
            let _ = page.child("typo");
        }

        #[test]
        fn child_names_follow_declaration_order() {
            let (_, page) = page_with(
                Definition::new()
                    .child("b", selector(".b"))
                    .value("not_a_child", 1)
                    .child("a", selector(".a")),
            );
            assert_eq!(page.root().child_names(), ["b", "a"]);
        }
    }

    mod index_tests {
        use super::*;

        #[test]
        fn at_creates_a_sibling_with_the_index_fixed() {
            let (_, page) = page_with(
                Definition::new().child("item", selector(".item")),
            );

            let node = page.child("item");
            let third = node.at(2);
            assert_eq!(third.selector(), node.selector());
            assert_eq!(third.index(), Some(2));
            // the original is untouched
            assert_eq!(node.index(), None);
            // indexing composes with itself; the last index wins
            assert_eq!(third.at(0).index(), Some(0));
        }

        #[test]
        fn indexing_composes_with_child_access_both_ways() {
            let (dom, page) = page_with(Definition::new().child(
                "outer",
                selector_with(
                    ".outer",
                    Definition::new().child("inner", selector(".inner")),
                ),
            ));

            {
                let mut dom = dom.borrow_mut();
                let root = dom.root();
                let first = dom.append(root, "div", &[("class", "outer")], "");
                dom.append(first, "span", &[("class", "inner")], "a");
                dom.append(first, "span", &[("class", "inner")], "b");
                let second = dom.append(root, "div", &[("class", "outer")], "");
                dom.append(second, "span", &[("class", "inner")], "c");
            }

            let outer = page.child("outer");
            assert_eq!(outer.at(1).child("inner").text().as_deref(), Some("c"));
            assert_eq!(outer.child("inner").at(1).text().as_deref(), Some("b"));
        }
    }

    mod extension_tests {
        use super::*;
        use serde_json::{json, Value};

        #[test]
        fn values_getters_and_methods_are_readable() {
            let (dom, page) = page_with(Definition::new().child(
                "card",
                selector_with(
                    "[data-card]",
                    Definition::new()
                        .value("label", "card")
                        .getter("title", |node| {
                            Value::from(node.attribute("title").unwrap_or_default())
                        })
                        .method("describe", |node, args| {
                            let prefix = args.first().and_then(Value::as_str).unwrap_or("");
                            json!(format!(
                                "{prefix}{}",
                                node.get("label").unwrap().as_str().unwrap()
                            ))
                        }),
                ),
            ));

            {
                let mut dom = dom.borrow_mut();
                let root = dom.root();
                dom.append(root, "div", &[("data-card", ""), ("title", "Hi")], "");
            }

            let card = page.child("card");
            assert_eq!(card.get("label"), Some(Value::from("card")));
            assert_eq!(card.get("title"), Some(Value::from("Hi")));
            assert_eq!(
                card.call("describe", &[Value::from("a ")]).unwrap(),
                Value::from("a card")
            );
            assert_eq!(card.get("missing"), None);
        }

        #[test]
        fn set_overrides_are_node_local() {
            let (_, page) = page_with(Definition::new().child(
                "card",
                selector_with("[data-card]", Definition::new().value("label", "default")),
            ));

            let first = page.child("card");
            let second = page.child("card");
            first.set("label", "changed");

            assert_eq!(first.get("label"), Some(Value::from("changed")));
            assert_eq!(second.get("label"), Some(Value::from("default")));
        }

        #[test]
        fn at_copies_the_current_value_bag() {
            let (_, page) = page_with(Definition::new().child(
                "card",
                selector_with("[data-card]", Definition::new().value("label", "default")),
            ));

            let node = page.child("card");
            node.set("label", "changed");
            let indexed = node.at(0);

            assert_eq!(indexed.get("label"), Some(Value::from("changed")));
            // still independent after the copy
            indexed.set("label", "indexed");
            assert_eq!(node.get("label"), Some(Value::from("changed")));
        }

        #[test]
        fn methods_can_reach_declared_children() {
            let (dom, page) = page_with(Definition::new().child(
                "form",
                selector_with(
                    "form",
                    Definition::new()
                        .child("button", selector("button"))
                        .method("button_label", |node, _| {
                            Value::from(node.child("button").text().unwrap_or_default())
                        }),
                ),
            ));

            {
                let mut dom = dom.borrow_mut();
                let root = dom.root();
                let form = dom.append(root, "form", &[], "");
                dom.append(form, "button", &[], "Submit");
            }

            assert_eq!(
                page.child("form").call("button_label", &[]).unwrap(),
                Value::from("Submit")
            );
        }

        #[test]
        fn call_errors_distinguish_unknown_from_not_callable() {
            let (_, page) = page_with(Definition::new().child(
                "card",
                selector_with("[data-card]", Definition::new().value("label", "x")),
            ));

            let card = page.child("card");
            assert!(matches!(
                card.call("nope", &[]),
                Err(crate::PaginaError::UnknownMember { .. })
            ));
            assert!(matches!(
                card.call("label", &[]),
                Err(crate::PaginaError::NotCallable { .. })
            ));
        }

        #[test]
        fn member_named_element_never_shadows_resolution() {
            let (_, page) = page_with(Definition::new().child(
                "card",
                selector_with("[data-card]", Definition::new().value("element", "decoy")),
            ));

            let card = page.child("card");
            assert_eq!(card.get("element"), Some(Value::from("decoy")));
            // the resolution accessor is unaffected: no [data-card] in the dom
            assert_eq!(card.element(), None);
        }
    }
}
