//! Assertions over resolved selector positions.
//!
//! [`DomAssertions`] binds an [`AssertionTarget`] to the page's query
//! capability and answers existence, count, text, and attribute checks. All
//! three target shapes go through the same "which elements match under this
//! scope" view, so an unmatchable target deterministically reports zero
//! matches — `exists` fails with the original selector in the message and
//! `does_not_exist` passes, with no panic anywhere on the path.

use std::fmt;
use std::rc::Rc;

use crate::dom::{DomQuery, ElementId};
use crate::resolve::AssertionTarget;

/// Result of an assertion
#[derive(Debug, Clone)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message; empty on pass
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Assertions bound to one node's assertion target.
pub struct DomAssertions {
    target: AssertionTarget,
    dom: Rc<dyn DomQuery>,
}

impl fmt::Debug for DomAssertions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomAssertions")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl DomAssertions {
    pub(crate) fn new(target: AssertionTarget, dom: Rc<dyn DomQuery>) -> Self {
        Self { target, dom }
    }

    fn describe(&self) -> String {
        match self.target.selector() {
            Some(selector) => format!("elements matching '{selector}'"),
            None => "the target element".to_string(),
        }
    }

    /// The matching elements, in document order
    #[must_use]
    pub fn matches(&self) -> Vec<ElementId> {
        self.target.matches(self.dom.as_ref())
    }

    /// How many elements currently match
    #[must_use]
    pub fn count(&self) -> usize {
        self.matches().len()
    }

    /// Assert at least one element matches
    #[must_use]
    pub fn exists(&self) -> AssertionResult {
        if self.count() > 0 {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {}, found none", self.describe()))
        }
    }

    /// Assert exactly `expected` elements match
    #[must_use]
    pub fn exists_count(&self, expected: usize) -> AssertionResult {
        let actual = self.count();
        if actual == expected {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "expected {expected} {}, found {actual}",
                self.describe()
            ))
        }
    }

    /// Assert no element matches
    #[must_use]
    pub fn does_not_exist(&self) -> AssertionResult {
        let actual = self.count();
        if actual == 0 {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected no {}, found {actual}", self.describe()))
        }
    }

    /// Assert the first matching element's text content equals `expected`,
    /// with whitespace collapsed on both sides.
    #[must_use]
    pub fn has_text(&self, expected: &str) -> AssertionResult {
        let Some(element) = self.matches().into_iter().next() else {
            return AssertionResult::fail(format!(
                "expected {} with text '{expected}', found none",
                self.describe()
            ));
        };

        let actual = collapse_whitespace(&self.dom.text_content(element));
        let expected = collapse_whitespace(expected);
        if actual == expected {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "expected {} to have text '{expected}', got '{actual}'",
                self.describe()
            ))
        }
    }

    /// Assert the first matching element has attribute `name` with value
    /// `expected`.
    #[must_use]
    pub fn has_attribute(&self, name: &str, expected: &str) -> AssertionResult {
        let Some(element) = self.matches().into_iter().next() else {
            return AssertionResult::fail(format!(
                "expected {} with attribute '{name}', found none",
                self.describe()
            ));
        };

        match self.dom.attribute(element, name) {
            Some(actual) if actual == expected => AssertionResult::pass(),
            Some(actual) => AssertionResult::fail(format!(
                "expected attribute '{name}' to be '{expected}', got '{actual}'"
            )),
            None => AssertionResult::fail(format!(
                "expected {} to have attribute '{name}'",
                self.describe()
            )),
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDom;
    use std::cell::RefCell;

    fn assertions(target: AssertionTarget, dom: MockDom) -> DomAssertions {
        DomAssertions::new(target, Rc::new(RefCell::new(dom)))
    }

    #[test]
    fn exists_and_count_against_a_scoped_target() {
        let mut dom = MockDom::new();
        let root = dom.root();
        dom.append(root, "li", &[], "one");
        dom.append(root, "li", &[], "two");

        let a = assertions(
            AssertionTarget::Scoped {
                selector: "li".to_string(),
                scope: root,
            },
            dom,
        );
        assert!(a.exists().passed);
        assert!(a.exists_count(2).passed);
        assert!(!a.exists_count(3).passed);
        assert!(!a.does_not_exist().passed);
        assert_eq!(a.count(), 2);
    }

    #[test]
    fn unmatchable_target_reports_zero_matches_with_the_selector() {
        let a = assertions(
            AssertionTarget::Unmatchable {
                selector: "[data-missing]".to_string(),
            },
            MockDom::new(),
        );

        let result = a.exists();
        assert!(!result.passed);
        assert!(result.message.contains("[data-missing]"));
        assert!(a.does_not_exist().passed);
        assert!(a.exists_count(0).passed);
        assert!(!a.has_text("anything").passed);
    }

    #[test]
    fn has_text_collapses_whitespace() {
        let mut dom = MockDom::new();
        let root = dom.root();
        dom.append(root, "p", &[], "  Hello \n  world  ");

        let a = assertions(
            AssertionTarget::Scoped {
                selector: "p".to_string(),
                scope: root,
            },
            dom,
        );
        assert!(a.has_text("Hello world").passed);
        assert!(!a.has_text("Hello").passed);
    }

    #[test]
    fn has_attribute_checks_the_first_match() {
        let mut dom = MockDom::new();
        let root = dom.root();
        let first = dom.append(root, "div", &[("id", "a")], "");
        dom.append(root, "div", &[("id", "b")], "");

        let a = assertions(AssertionTarget::Element(first), dom);
        assert!(a.has_attribute("id", "a").passed);

        let wrong = a.has_attribute("id", "b");
        assert!(!wrong.passed);
        assert!(wrong.message.contains("got 'a'"));

        let missing = a.has_attribute("role", "button");
        assert!(!missing.passed);
    }
}
