//! CSS-subset selector matching over the mock tree.
//!
//! Supported syntax:
//!   `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]` (value optionally
//!   quoted), compounds of those (`div.card[data-open]`), the descendant
//!   combinator (whitespace), and comma unions. Unparsable input simply
//!   matches nothing; the engine above never validates selectors.

use crate::dom::ElementId;
use crate::mock::tree::MockDom;

#[derive(Debug, Default)]
pub(crate) struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug)]
pub(crate) enum AttrSelector {
    Present(String),
    Exact(String, String),
}

/// A descendant chain: the last part must match the candidate, earlier parts
/// must match ancestors in order.
pub(crate) type Chain = Vec<SimpleSelector>;

/// Parse a comma union of descendant chains.
pub(crate) fn parse(selector: &str) -> Vec<Chain> {
    split_top_level(selector, ',')
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            split_whitespace_top_level(&part)
                .into_iter()
                .map(|compound| parse_compound(&compound))
                .collect()
        })
        .collect()
}

/// Whether `element` matches any chain of the union.
pub(crate) fn matches_any(dom: &MockDom, element: ElementId, chains: &[Chain]) -> bool {
    chains
        .iter()
        .any(|chain| matches_chain(dom, element, chain))
}

fn matches_chain(dom: &MockDom, element: ElementId, chain: &[SimpleSelector]) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return false;
    };
    if !matches_simple(dom, element, last) {
        return false;
    }

    // earlier parts must match successively higher ancestors
    let ancestors = dom.ancestors(element);
    let mut from = 0;
    for part in rest.iter().rev() {
        match ancestors[from..]
            .iter()
            .position(|&a| matches_simple(dom, a, part))
        {
            Some(offset) => from += offset + 1,
            None => return false,
        }
    }
    true
}

fn matches_simple(dom: &MockDom, element: ElementId, selector: &SimpleSelector) -> bool {
    let node = dom.node(element);

    if let Some(tag) = &selector.tag {
        if node.tag != *tag {
            return false;
        }
    }

    let attr = |name: &str| {
        node.attributes
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v.as_str()))
    };

    if let Some(id) = &selector.id {
        if attr("id") != Some(id.as_str()) {
            return false;
        }
    }

    if !selector.classes.is_empty() {
        let class_attr = attr("class").unwrap_or_default();
        let classes: Vec<&str> = class_attr.split_whitespace().collect();
        if !selector
            .classes
            .iter()
            .all(|c| classes.contains(&c.as_str()))
        {
            return false;
        }
    }

    selector.attrs.iter().all(|a| match a {
        AttrSelector::Present(name) => attr(name).is_some(),
        AttrSelector::Exact(name, value) => attr(name) == Some(value.as_str()),
    })
}

fn parse_compound(input: &str) -> SimpleSelector {
    let mut selector = SimpleSelector::default();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (name, next) = read_name(&chars, i + 1);
                selector.id = Some(name);
                i = next;
            }
            '.' => {
                let (name, next) = read_name(&chars, i + 1);
                selector.classes.push(name);
                i = next;
            }
            '[' => {
                let end = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .map_or(chars.len(), |p| i + p);
                let inner: String = chars[i + 1..end].iter().collect();
                selector.attrs.push(parse_attr(&inner));
                i = end + 1;
            }
            '*' => i += 1,
            _ => {
                // anything unrecognized becomes a tag name; a tag that no
                // element carries simply never matches
                let (name, next) = read_name(&chars, i);
                selector.tag = Some(name);
                i = next;
            }
        }
    }
    selector
}

fn read_name(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && !matches!(chars[end], '#' | '.' | '[' | '*') {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn parse_attr(inner: &str) -> AttrSelector {
    match inner.split_once('=') {
        None => AttrSelector::Present(inner.trim().to_string()),
        Some((name, value)) => {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            AttrSelector::Exact(name.trim().to_string(), value.to_string())
        }
    }
}

/// Split on `delimiter` occurrences outside brackets and quotes.
fn split_top_level(input: &str, delimiter: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match (c, quote) {
            (q @ ('"' | '\''), None) => {
                quote = Some(q);
                current.push(c);
            }
            (q, Some(open)) if q == open => {
                quote = None;
                current.push(c);
            }
            ('[', None) => {
                depth += 1;
                current.push(c);
            }
            (']', None) => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            (c, None) if c == delimiter && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Split on whitespace runs outside brackets and quotes.
fn split_whitespace_top_level(input: &str) -> Vec<String> {
    split_top_level(input, ' ')
        .into_iter()
        .flat_map(|p| split_top_level(&p, '\t'))
        .flat_map(|p| split_top_level(&p, '\n'))
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
