//! Node state store.
//!
//! Every selector node is a record in an append-only arena, addressed by a
//! stable [`NodeKey`]. The record carries the node's internal bookkeeping
//! (parent back-reference, relative selector, fixed index, definition handle,
//! per-node extension values) out of band, so nothing here ever collides with
//! user-declared member names. Records are immutable in
//! `(parent, selector, index)` once allocated; only the value bag mutates.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::definition::Definition;

/// Stable handle to a node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey(u32);

/// Internal state of one selector node.
#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    /// Owning node, absent for the page root
    pub(crate) parent: Option<NodeKey>,
    /// Selector relative to the parent's resolved element, absent for the root
    pub(crate) selector: Option<String>,
    /// Fixed position among the selector's matches; `None` means first-match
    pub(crate) index: Option<usize>,
    /// Declared children and extension accessors for this node
    pub(crate) def: Rc<Definition>,
    /// Node-local extension values, instantiated from the definition template
    pub(crate) values: HashMap<String, Value>,
}

/// Append-only arena of node records.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    records: Vec<NodeRecord>,
}

impl NodeArena {
    pub(crate) fn alloc(&mut self, record: NodeRecord) -> NodeKey {
        let key = NodeKey(u32::try_from(self.records.len()).expect("node arena overflow"));
        self.records.push(record);
        key
    }

    pub(crate) fn get(&self, key: NodeKey) -> &NodeRecord {
        &self.records[key.0 as usize]
    }

    pub(crate) fn get_mut(&mut self, key: NodeKey) -> &mut NodeRecord {
        &mut self.records[key.0 as usize]
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NodeRecord {
        NodeRecord {
            parent: None,
            selector: None,
            index: None,
            def: Rc::new(Definition::new()),
            values: HashMap::new(),
        }
    }

    #[test]
    fn alloc_hands_out_sequential_stable_keys() {
        let mut arena = NodeArena::default();
        let a = arena.alloc(record());
        let b = arena.alloc(NodeRecord {
            parent: Some(a),
            selector: Some(".item".to_string()),
            index: Some(2),
            ..record()
        });

        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(b).parent, Some(a));
        assert_eq!(arena.get(b).selector.as_deref(), Some(".item"));
        assert_eq!(arena.get(b).index, Some(2));
        // the earlier record is untouched by later allocations
        assert_eq!(arena.get(a).parent, None);
    }

    #[test]
    fn get_mut_only_touches_the_value_bag() {
        let mut arena = NodeArena::default();
        let key = arena.alloc(record());

        arena
            .get_mut(key)
            .values
            .insert("count".to_string(), Value::from(3));
        assert_eq!(arena.get(key).values.get("count"), Some(&Value::from(3)));
    }
}
