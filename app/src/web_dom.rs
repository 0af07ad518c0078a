//! Browser document adapter
//!
//! Indexes the live element tree once at load time. The report is static
//! after rendering, so the arena built here stays valid for the page
//! lifetime.

use report_view_core::dom::default_display;
use report_view_core::{Dom, NodeId};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlSelectElement, Window};

struct Entry {
    element: Element,
    tag: String,
    children: Vec<NodeId>,
}

/// [`Dom`] over the browser document
pub struct WebDom {
    nodes: Vec<Entry>,
    window: Option<Window>,
}

impl WebDom {
    /// Index `root` and every element below it
    pub fn index(root: Element) -> Self {
        let mut nodes = vec![Entry {
            tag: root.tag_name().to_ascii_lowercase(),
            element: root,
            children: Vec::new(),
        }];

        let mut pending = vec![NodeId(0)];
        while let Some(parent) = pending.pop() {
            let collection = nodes[parent.0].element.children();
            for i in 0..collection.length() {
                let Some(child) = collection.item(i) else {
                    continue;
                };
                let id = NodeId(nodes.len());
                nodes.push(Entry {
                    tag: child.tag_name().to_ascii_lowercase(),
                    element: child,
                    children: Vec::new(),
                });
                nodes[parent.0].children.push(id);
                pending.push(id);
            }
        }

        tracing::debug!(elements = nodes.len(), "indexed document");
        Self {
            nodes,
            window: web_sys::window(),
        }
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).map(|e| &e.element)
    }

    fn html(&self, node: NodeId) -> Option<&HtmlElement> {
        self.element(node).and_then(|e| e.dyn_ref::<HtmlElement>())
    }

    /// `display` after stylesheets are applied
    fn computed_display(&self, el: &Element) -> Option<String> {
        let style = self.window.as_ref()?.get_computed_style(el).ok()??;
        style.get_property_value("display").ok()
    }
}

impl Dom for WebDom {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    fn tag(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map(|e| e.tag.as_str()).unwrap_or("")
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            if let Err(err) = el.set_attribute(name, value) {
                tracing::warn!(?node, name, ?err, "set_attribute failed");
            }
        }
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element(node) {
            if let Err(err) = el.remove_attribute(name) {
                tracing::warn!(?node, name, ?err, "remove_attribute failed");
            }
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn is_visible(&self, node: NodeId) -> bool {
        let Some(el) = self.element(node) else {
            return false;
        };
        if let Some(display) = self.computed_display(el) {
            return display.trim() != "none";
        }
        self.html(node).is_none_or(|el| {
            el.style()
                .get_property_value("display")
                .map(|d| d.trim() != "none")
                .unwrap_or(true)
        })
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        let Some(el) = self.html(node) else {
            return;
        };
        let style = el.style();
        let result = if visible {
            style.remove_property("display").and_then(|_| {
                // Still hidden by a stylesheet rule
                match self.computed_display(el) {
                    Some(d) if d.trim() == "none" => {
                        style.set_property("display", default_display(self.tag(node)))
                    }
                    _ => Ok(()),
                }
            })
        } else {
            style.set_property("display", "none")
        };
        if let Err(err) = result {
            tracing::warn!(?node, visible, ?err, "failed to update display");
        }
    }

    fn value(&self, node: NodeId) -> Option<String> {
        let el = self.element(node)?;
        if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            // No option to read a value from
            if select.selected_index() < 0 {
                return None;
            }
            return Some(select.value());
        }
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        el.get_attribute("value")
    }
}
