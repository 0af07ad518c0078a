//! Document abstraction
//!
//! The controller never talks to a concrete document. It goes through the
//! [`Dom`] trait, which exposes the handful of element operations the report
//! markup needs: tree traversal, attributes, class tokens, show/hide and
//! form-control values.
//!
//! - [`MemoryDom`]: arena-backed document used by tests and the CLI
//! - the WASM frontend wraps the live browser document behind the same trait

mod memory;
mod style;

pub use memory::{ElementBuilder, MemoryDom};
pub use style::{default_display, is_display_none, with_display};

use serde::{Deserialize, Serialize};

/// Handle to one element of a [`Dom`].
///
/// Handles are assigned once when the document is indexed and stay valid for
/// the lifetime of that document; elements are never created or destroyed by
/// the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Element-level access to a rendered document.
pub trait Dom {
    /// The element every query starts from (`<body>` in a browser)
    fn root(&self) -> NodeId;

    /// Child elements in document order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Lower-case tag name
    fn tag(&self, node: NodeId) -> &str;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attr(&mut self, node: NodeId, name: &str);

    /// Whitespace-separated tokens of the `class` attribute
    fn classes(&self, node: NodeId) -> Vec<String> {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    fn is_visible(&self, node: NodeId) -> bool;

    /// Show or hide an element. Hiding sets an inline `display: none`,
    /// showing clears it again.
    fn set_visible(&mut self, node: NodeId, visible: bool);

    /// Current value of a form control: an input's value, or the value of the
    /// selected option of a `<select>`
    fn value(&self, node: NodeId) -> Option<String>;
}

/// All elements below `node` in document order, not including `node`.
///
/// Subtrees rooted at an element for which `stop` returns true are skipped
/// entirely (the element itself is not yielded either).
pub fn descendants_until<D, F>(dom: &D, node: NodeId, stop: F) -> Vec<NodeId>
where
    D: Dom + ?Sized,
    F: Fn(NodeId) -> bool,
{
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = dom.children(node).into_iter().rev().collect();
    while let Some(next) = stack.pop() {
        if stop(next) {
            continue;
        }
        out.push(next);
        stack.extend(dom.children(next).into_iter().rev());
    }
    out
}

/// All elements below `node` in document order, not including `node`.
pub fn descendants<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Vec<NodeId> {
    descendants_until(dom, node, |_| false)
}

/// Elements with tag `tag` carrying class token `class`, below `node`.
pub fn find_tagged<D: Dom + ?Sized>(dom: &D, node: NodeId, tag: &str, class: &str) -> Vec<NodeId> {
    descendants(dom, node)
        .into_iter()
        .filter(|&n| dom.tag(n) == tag && dom.has_class(n, class))
        .collect()
}

/// Value of the first `<option>` below a select, used when no option is
/// explicitly selected.
pub fn first_option_value<D: Dom + ?Sized>(dom: &D, select: NodeId) -> Option<String> {
    descendants(dom, select)
        .into_iter()
        .find(|&n| dom.tag(n) == "option")
        .and_then(|n| dom.attr(n, "value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MemoryDom, NodeId, NodeId) {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let outer = dom.element(root, "div").class("dataset").build();
        let inner = dom.element(outer, "div").class("dataset").build();
        dom.element(inner, "span").class("x").build();
        dom.element(outer, "span").class("x").build();
        (dom, outer, inner)
    }

    #[test]
    fn test_descendants_document_order() {
        let (dom, outer, inner) = sample();
        let all = descendants(&dom, outer);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], inner);
        assert_eq!(dom.tag(all[1]), "span");
    }

    #[test]
    fn test_descendants_until_skips_nested_subtree() {
        let (dom, outer, inner) = sample();
        let shallow = descendants_until(&dom, outer, |n| n == inner);
        assert_eq!(shallow.len(), 1);
        assert_eq!(dom.tag(shallow[0]), "span");
    }

    #[test]
    fn test_find_tagged() {
        let (dom, outer, _) = sample();
        assert_eq!(find_tagged(&dom, outer, "span", "x").len(), 2);
        assert_eq!(find_tagged(&dom, outer, "div", "dataset").len(), 1);
        assert!(find_tagged(&dom, outer, "span", "y").is_empty());
    }
}
