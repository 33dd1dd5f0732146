//! Declaration surface: selector blueprints and extension capability sets.
//!
//! A page object is declared once as a tree of [`SelectorDef`] blueprints and
//! instantiated lazily, node by node, as tests access it. A [`Definition`] is
//! the ordered capability set attached to one selector position: nested child
//! selectors, plain values, computed getters, and methods. Capability sets
//! compose by overlay (see [`Definition::extend`]) instead of inheritance.
//!
//! Extension members live in their own namespace, read through
//! [`crate::SelectorNode::get`] / [`crate::SelectorNode::call`]; they can
//! never shadow the resolution accessors `element()` and `assert()`, so a
//! member named `"element"` is allowed and simply unrelated to resolution.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::arena::{NodeArena, NodeKey, NodeRecord};
use crate::node::SelectorNode;

/// Computed accessor, evaluated against the node it is read from
pub type Getter = Rc<dyn Fn(&SelectorNode) -> Value>;

/// Callable member, invoked with the node as receiver
pub type Method = Rc<dyn Fn(&SelectorNode, &[Value]) -> Value>;

/// One named capability of a selector position.
#[derive(Clone)]
pub(crate) enum Member {
    /// Nested selector declaration; access instantiates a child node
    Child(SelectorDef),
    /// Plain value, freshly instantiated per node
    Value(Value),
    /// Computed accessor
    Getter(Getter),
    /// Callable member
    Method(Method),
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Child(def) => f.debug_tuple("Child").field(def).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Getter(_) => f.write_str("Getter(..)"),
            Self::Method(_) => f.write_str("Method(..)"),
        }
    }
}

/// Ordered capability set for one selector position.
///
/// Built with a consuming builder. Adding a member under an existing name
/// replaces it in place, which is what makes [`Definition::extend`] behave
/// like base-then-overlay composition.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    members: Vec<(String, Member)>,
}

impl Definition {
    /// Create an empty capability set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn upsert(&mut self, name: String, member: Member) {
        if let Some(slot) = self.members.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = member;
        } else {
            self.members.push((name, member));
        }
    }

    /// Declare a nested child selector under `name`
    #[must_use]
    pub fn child(mut self, name: &str, def: SelectorDef) -> Self {
        self.upsert(name.to_string(), Member::Child(def));
        self
    }

    /// Declare a plain value member, instantiated fresh for every node
    #[must_use]
    pub fn value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.upsert(name.to_string(), Member::Value(value.into()));
        self
    }

    /// Declare a computed accessor evaluated against the reading node
    #[must_use]
    pub fn getter(mut self, name: &str, f: impl Fn(&SelectorNode) -> Value + 'static) -> Self {
        self.upsert(name.to_string(), Member::Getter(Rc::new(f)));
        self
    }

    /// Declare a callable member invoked with the node as receiver
    #[must_use]
    pub fn method(
        mut self,
        name: &str,
        f: impl Fn(&SelectorNode, &[Value]) -> Value + 'static,
    ) -> Self {
        self.upsert(name.to_string(), Member::Method(Rc::new(f)));
        self
    }

    /// Compose with a base capability set.
    ///
    /// The result carries the base's members in their declared order, with
    /// this set's members overlaid on top: same-named members replace the
    /// base's (keeping the base's position), new members append. Works the
    /// same whether called before or after the overriding declarations.
    #[must_use]
    pub fn extend(self, base: &Definition) -> Self {
        let mut merged = base.clone();
        for (name, member) in self.members {
            merged.upsert(name, member);
        }
        merged
    }

    pub(crate) fn member(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find_map(|(n, m)| (n == name).then_some(m))
    }

    /// Declared child selector names, in declaration order
    pub(crate) fn child_names(&self) -> Vec<String> {
        self.members
            .iter()
            .filter(|(_, m)| matches!(m, Member::Child(_)))
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Fresh per-node value bag from the plain-value members
    pub(crate) fn template_values(&self) -> std::collections::HashMap<String, Value> {
        self.members
            .iter()
            .filter_map(|(n, m)| match m {
                Member::Value(v) => Some((n.clone(), v.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Immutable blueprint for one declared selector position.
///
/// A blueprint is stateless across instantiations: every access through a
/// parent node yields a fresh, independent child node.
#[derive(Debug, Clone)]
pub struct SelectorDef {
    selector: String,
    definition: Rc<Definition>,
}

impl SelectorDef {
    /// The selector string, relative to the parent's resolved element
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub(crate) fn definition(&self) -> &Rc<Definition> {
        &self.definition
    }

    /// Allocate a node for this blueprint under `parent`.
    pub(crate) fn instantiate(&self, arena: &mut NodeArena, parent: NodeKey) -> NodeKey {
        arena.alloc(NodeRecord {
            parent: Some(parent),
            selector: Some(self.selector.clone()),
            index: None,
            def: Rc::clone(&self.definition),
            values: self.definition.template_values(),
        })
    }
}

/// Declare a selector position with no extensions
#[must_use]
pub fn selector(selector: impl Into<String>) -> SelectorDef {
    SelectorDef {
        selector: selector.into(),
        definition: Rc::new(Definition::new()),
    }
}

/// Declare a selector position carrying nested children and extension members
#[must_use]
pub fn selector_with(selector: impl Into<String>, definition: Definition) -> SelectorDef {
    SelectorDef {
        selector: selector.into(),
        definition: Rc::new(definition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_keep_declaration_order() {
        let def = Definition::new()
            .value("first", 1)
            .child("second", selector(".s"))
            .value("third", 3);

        let names: Vec<&str> = def.members.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(def.child_names(), ["second"]);
    }

    #[test]
    fn redeclaring_a_name_replaces_in_place() {
        let def = Definition::new()
            .value("label", "old")
            .value("other", true)
            .value("label", "new");

        let names: Vec<&str> = def.members.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["label", "other"]);
        assert_eq!(
            def.template_values().get("label"),
            Some(&Value::from("new"))
        );
    }

    #[test]
    fn extend_overlays_base_members() {
        let base = Definition::new()
            .value("concatString", "world")
            .child("button", selector("button"));
        let derived = Definition::new()
            .extend(&base)
            .value("concatString", "space");

        // base order kept, override applied, child declaration inherited
        let names: Vec<&str> = derived.members.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["concatString", "button"]);
        assert_eq!(
            derived.template_values().get("concatString"),
            Some(&Value::from("space"))
        );
        assert!(matches!(
            derived.member("button"),
            Some(Member::Child(def)) if def.selector() == "button"
        ));
    }

    #[test]
    fn extend_after_declarations_still_overlays() {
        let base = Definition::new().value("a", 1).value("b", 2);
        let derived = Definition::new().value("b", 20).extend(&base);

        assert_eq!(derived.template_values().get("a"), Some(&Value::from(1)));
        assert_eq!(derived.template_values().get("b"), Some(&Value::from(20)));
    }

    #[test]
    fn template_values_are_independent_copies() {
        let def = Definition::new().value("count", 0);
        let mut bag = def.template_values();
        bag.insert("count".to_string(), Value::from(9));

        assert_eq!(def.template_values().get("count"), Some(&Value::from(0)));
    }
}
