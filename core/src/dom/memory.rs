//! In-memory document
//!
//! Arena-backed element tree. Node handles are indices into the arena, so
//! they are stable for the lifetime of the document.

use std::fmt::Write;

use super::style::{is_display_none, with_display};
use super::{Dom, NodeId, first_option_value};

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }
}

/// Arena-backed [`Dom`] implementation.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    elements: Vec<Element>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document consisting of a single `<body>` root
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
        }
    }

    /// Start building a new element appended to `parent`
    pub fn element(&mut self, parent: NodeId, tag: &str) -> ElementBuilder<'_> {
        let id = NodeId(self.elements.len());
        self.elements.push(Element::new(tag));
        self.elements[parent.0].children.push(id);
        ElementBuilder { dom: self, id }
    }

    /// First element (document order) whose attribute `name` equals `value`
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        super::descendants(self, self.root())
            .into_iter()
            .find(|&n| self.elements[n.0].get(name) == Some(value))
    }

    /// Mark the option of `select` whose value is `value` as selected, the
    /// way a user picking it in the dropdown would.
    ///
    /// Returns false (and leaves the select untouched) if no option carries
    /// that value.
    pub fn select_option(&mut self, select: NodeId, value: &str) -> bool {
        let options: Vec<NodeId> = super::descendants(self, select)
            .into_iter()
            .filter(|&n| self.elements[n.0].tag == "option")
            .collect();

        if !options
            .iter()
            .any(|&o| self.elements[o.0].get("value") == Some(value))
        {
            return false;
        }

        for o in options {
            let el = &mut self.elements[o.0];
            if el.get("value") == Some(value) {
                el.set("selected", "selected");
            } else {
                el.remove("selected");
            }
        }
        true
    }

    /// Serialize the document below the root as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.elements[0].children {
            self.write_html(*child, 0, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, depth: usize, out: &mut String) {
        let el = &self.elements[node.0];
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}<{}", el.tag);
        for (k, v) in &el.attrs {
            let _ = write!(out, " {k}=\"{}\"", escape(v));
        }
        out.push('>');

        if is_void(&el.tag) {
            out.push('\n');
            return;
        }

        if el.children.is_empty() {
            if let Some(text) = &el.text {
                out.push_str(&escape(text));
            }
            let _ = writeln!(out, "</{}>", el.tag);
            return;
        }

        out.push('\n');
        if let Some(text) = &el.text {
            let _ = writeln!(out, "{indent}  {}", escape(text));
        }
        for child in &el.children {
            self.write_html(*child, depth + 1, out);
        }
        let _ = writeln!(out, "{indent}</{}>", el.tag);
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "img" | "br" | "hr" | "meta" | "link")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Dom for MemoryDom {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.elements
            .get(node.0)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    fn tag(&self, node: NodeId) -> &str {
        self.elements.get(node.0).map(|e| e.tag.as_str()).unwrap_or("")
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.elements
            .get(node.0)
            .and_then(|e| e.get(name))
            .map(str::to_string)
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.elements.get_mut(node.0) {
            el.set(name, value);
        }
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.elements.get_mut(node.0) {
            el.remove(name);
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let mut classes = self.classes(node);
        if classes.iter().any(|c| c == class) {
            return;
        }
        classes.push(class.to_string());
        self.set_attr(node, "class", &classes.join(" "));
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let classes = self.classes(node);
        if !classes.iter().any(|c| c == class) {
            return;
        }
        let kept: Vec<String> = classes.into_iter().filter(|c| c != class).collect();
        if kept.is_empty() {
            self.remove_attr(node, "class");
        } else {
            self.set_attr(node, "class", &kept.join(" "));
        }
    }

    fn is_visible(&self, node: NodeId) -> bool {
        match self.elements.get(node.0) {
            Some(el) => !el.get("style").is_some_and(is_display_none),
            None => false,
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        let Some(el) = self.elements.get_mut(node.0) else {
            return;
        };
        match with_display(el.get("style"), visible) {
            Some(style) => el.set("style", &style),
            None => el.remove("style"),
        }
    }

    fn value(&self, node: NodeId) -> Option<String> {
        let el = self.elements.get(node.0)?;
        if el.tag != "select" {
            return el.get("value").map(str::to_string);
        }
        super::descendants(self, node)
            .into_iter()
            .find(|&n| {
                let opt = &self.elements[n.0];
                opt.tag == "option" && opt.get("selected").is_some()
            })
            .and_then(|n| self.attr(n, "value"))
            .or_else(|| first_option_value(self, node))
    }
}

/// Fluent builder returned by [`MemoryDom::element`].
pub struct ElementBuilder<'a> {
    dom: &'a mut MemoryDom,
    id: NodeId,
}

impl ElementBuilder<'_> {
    pub fn class(self, class: &str) -> Self {
        self.dom.add_class(self.id, class);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.dom.set_attr(self.id, name, value);
        self
    }

    /// Render the element with an inline `display: none`
    pub fn hidden(self) -> Self {
        self.dom.set_visible(self.id, false);
        self
    }

    pub fn hidden_if(self, hidden: bool) -> Self {
        if hidden { self.hidden() } else { self }
    }

    pub fn text(self, text: &str) -> Self {
        self.dom.elements[self.id.0].text = Some(text.to_string());
        self
    }

    pub fn build(self) -> NodeId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_tokens() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let td = dom.element(root, "td").class("label").build();

        dom.add_class(td, "selected");
        dom.add_class(td, "selected");
        assert_eq!(dom.attr(td, "class").as_deref(), Some("label selected"));

        dom.remove_class(td, "label");
        assert_eq!(dom.classes(td), vec!["selected".to_string()]);
        dom.remove_class(td, "selected");
        assert_eq!(dom.attr(td, "class"), None);
    }

    #[test]
    fn test_visibility_round_trip() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let tr = dom.element(root, "tr").attr("style", "color: red").hidden().build();
        assert!(!dom.is_visible(tr));

        dom.set_visible(tr, true);
        assert!(dom.is_visible(tr));
        assert_eq!(dom.attr(tr, "style").as_deref(), Some("color: red;"));
    }

    #[test]
    fn test_select_value_defaults_to_first_option() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let select = dom.element(root, "select").build();
        dom.element(select, "option").attr("value", "v3").build();
        dom.element(select, "option").attr("value", "v4.1").build();

        assert_eq!(dom.value(select).as_deref(), Some("v3"));
        assert!(dom.select_option(select, "v4.1"));
        assert_eq!(dom.value(select).as_deref(), Some("v4.1"));
        assert!(!dom.select_option(select, "v9"));
        assert_eq!(dom.value(select).as_deref(), Some("v4.1"));
    }

    #[test]
    fn test_to_html() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let div = dom.element(root, "div").class("dataset").build();
        dom.element(div, "img").class("data_graph").attr("src", "a&b.png").build();

        let html = dom.to_html();
        assert!(html.contains("<div class=\"dataset\">"));
        assert!(html.contains("<img class=\"data_graph\" src=\"a&amp;b.png\">"));
        assert!(html.trim_end().ends_with("</div>"));
    }
}
