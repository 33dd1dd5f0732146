//! Arena-allocated element tree.

use crate::dom::{DomQuery, ElementId};
use crate::mock::select;

/// One element in the mock document.
#[derive(Debug, Clone)]
pub(crate) struct MockElement {
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) tag: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) text: String,
}

/// An in-memory document.
///
/// Elements live in an arena indexed by [`ElementId`]; ids stay stable for
/// the lifetime of the document, including across [`MockDom::remove`].
#[derive(Debug, Clone)]
pub struct MockDom {
    nodes: Vec<MockElement>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Create a document holding only the root `body` element
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![MockElement {
                parent: None,
                children: Vec::new(),
                tag: "body".to_string(),
                attributes: Vec::new(),
                text: String::new(),
            }],
        }
    }

    /// The root element
    #[must_use]
    pub fn root(&self) -> ElementId {
        ElementId::new(0)
    }

    /// Append a new empty `tag` element as the last child of `parent`
    pub fn element(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId::new(u32::try_from(self.nodes.len()).expect("mock arena overflow"));
        self.nodes.push(MockElement {
            parent: Some(parent),
            children: Vec::new(),
            tag: tag.to_string(),
            attributes: Vec::new(),
            text: String::new(),
        });
        self.node_mut(parent).children.push(id);
        id
    }

    /// Append a new `tag` element with attributes and text in one call
    pub fn append(
        &mut self,
        parent: ElementId,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> ElementId {
        let id = self.element(parent, tag);
        for (name, value) in attrs {
            self.set_attr(id, name, value);
        }
        self.set_text(id, text);
        id
    }

    /// Set (or replace) an attribute
    pub fn set_attr(&mut self, element: ElementId, name: &str, value: &str) {
        let node = self.node_mut(element);
        if let Some(slot) = node.attributes.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_string();
        } else {
            node.attributes.push((name.to_string(), value.to_string()));
        }
    }

    /// Set the element's own text
    pub fn set_text(&mut self, element: ElementId, text: &str) {
        self.node_mut(element).text = text.to_string();
    }

    /// Detach `element` (and its subtree) from the document.
    ///
    /// The id remains valid but the element no longer appears in any query
    /// or text aggregation under its former ancestors.
    pub fn remove(&mut self, element: ElementId) {
        let Some(parent) = self.node(element).parent else {
            return;
        };
        self.node_mut(parent).children.retain(|&c| c != element);
        self.node_mut(element).parent = None;
    }

    /// The element's tag name
    #[must_use]
    pub fn tag(&self, element: ElementId) -> &str {
        &self.node(element).tag
    }

    pub(crate) fn node(&self, id: ElementId) -> &MockElement {
        &self.nodes[id.raw() as usize]
    }

    fn node_mut(&mut self, id: ElementId) -> &mut MockElement {
        &mut self.nodes[id.raw() as usize]
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    pub(crate) fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .node(scope)
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    /// Ancestors of `element`, nearest first.
    pub(crate) fn ancestors(&self, element: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut current = self.node(element).parent;
        while let Some(id) = current {
            out.push(id);
            current = self.node(id).parent;
        }
        out
    }

    fn collect_text(&self, element: ElementId, out: &mut Vec<String>) {
        let node = self.node(element);
        if !node.text.is_empty() {
            out.push(node.text.clone());
        }
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }
}

impl DomQuery for MockDom {
    fn query_first(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        let chains = select::parse(selector);
        self.descendants(scope)
            .into_iter()
            .find(|&id| select::matches_any(self, id, &chains))
    }

    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let chains = select::parse(selector);
        self.descendants(scope)
            .into_iter()
            .filter(|&id| select::matches_any(self, id, &chains))
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)
            .attributes
            .iter()
            .find_map(|(n, v)| (n == name).then(|| v.clone()))
    }

    /// Text chunks of the element and its descendants in document order,
    /// joined with single spaces.
    fn text_content(&self, element: ElementId) -> String {
        let mut chunks = Vec::new();
        self.collect_text(element, &mut chunks);
        chunks.join(" ")
    }
}
