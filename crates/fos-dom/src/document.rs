//! Document - High-level document API

use crate::{DomResult, DomTree, ElementWalker, NodeId, SelectorList};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with `<html><head/><body/></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        
        // freshly created nodes cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);
        
        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }
    
    /// Create a document without `<html>`/`<body>`
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }
    
    pub fn url(&self) -> &str {
        &self.url
    }
    
    /// `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }
    
    pub fn head(&self) -> NodeId {
        self.head_element
    }
    
    /// `<body>` element, `None` for an empty document
    pub fn body(&self) -> Option<NodeId> {
        Some(self.body_element).filter(|b| b.is_valid())
    }
    
    /// `lang` attribute of the root element
    pub fn lang(&self) -> Option<&str> {
        self.tree.element(self.html_element)
            .and_then(|e| e.attr("lang"))
            .filter(|l| !l.is_empty())
    }
    
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }
    
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
    
    // === Construction ===
    
    /// Create an element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> DomResult<NodeId> {
        let id = self.tree.create_element(tag);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }
    
    /// Create a text node and append it to `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> DomResult<NodeId> {
        let id = self.tree.create_text(text);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }
    
    // === Classes ===
    
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.tree.element(id).is_some_and(|e| e.classes.contains(class))
    }
    
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(e) = self.tree.element_mut(id) {
            e.classes.add(class);
        }
    }
    
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(e) = self.tree.element_mut(id) {
            e.classes.remove(class);
        }
    }
    
    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        self.tree.element_mut(id).is_some_and(|e| e.classes.toggle(class, None))
    }
    
    /// Add or remove depending on `on`
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) {
        if let Some(e) = self.tree.element_mut(id) {
            e.classes.toggle(class, Some(on));
        }
    }
    
    /// Serialized class attribute
    pub fn class_name(&self, id: NodeId) -> String {
        self.tree.element(id).map(|e| e.classes.value()).unwrap_or_default()
    }
    
    // === Attributes ===
    
    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.tree.element(id).and_then(|e| e.get_attr(name))
    }
    
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(e) = self.tree.element_mut(id) {
            e.set_attr(name, value);
        }
    }
    
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.tree.element_mut(id) {
            e.remove_attr(name);
        }
    }
    
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.tree.element(id).is_some_and(|e| e.has_attr(name))
    }
    
    // === Style ===
    
    /// Inline style value
    pub fn inline_style(&self, id: NodeId, prop: &str) -> Option<&str> {
        self.tree.element(id).and_then(|e| e.style.get(prop))
    }
    
    /// Set (or, with an empty value, clear) an inline declaration
    pub fn set_style(&mut self, id: NodeId, prop: &str, value: &str) {
        if let Some(e) = self.tree.element_mut(id) {
            e.style.set(prop, value);
        }
    }
    
    /// Record a value resolved by the host's style engine
    pub fn set_computed(&mut self, id: NodeId, prop: &str, value: &str) {
        if let Some(e) = self.tree.element_mut(id) {
            e.computed.insert(prop.to_ascii_lowercase(), value.to_string());
        }
    }
    
    /// Effective style value: inline first, then the host-resolved value,
    /// then the property's initial value.
    pub fn style_value(&self, id: NodeId, prop: &str) -> String {
        let Some(e) = self.tree.element(id) else {
            return String::new();
        };
        if let Some(v) = e.style.get(prop) {
            return v.to_string();
        }
        if let Some(v) = e.computed.get(&prop.to_ascii_lowercase()) {
            return v.clone();
        }
        initial_value(prop).to_string()
    }
    
    // === Queries ===
    
    /// Elements under `root` matching a comma-separated selector list
    pub fn query_selector_all(&self, root: NodeId, selectors: &str) -> Vec<NodeId> {
        let list = SelectorList::parse(selectors);
        ElementWalker::new(&self.tree, root)
            .filter(|&id| self.tree.element(id).is_some_and(|e| list.matches(e)))
            .collect()
    }
    
    /// Elements under `root` carrying `class`
    pub fn elements_with_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        ElementWalker::new(&self.tree, root)
            .filter(|&id| self.has_class(id, class))
            .collect()
    }
    
    /// Rendered text of an element
    pub fn inner_text(&self, id: NodeId) -> String {
        self.tree.text_content(id).trim().to_string()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

fn initial_value(prop: &str) -> &'static str {
    match prop {
        "background" | "background-image" => "none",
        "background-color" => "transparent",
        "font-size" => "16px",
        "line-height" | "letter-spacing" => "normal",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_document_structure() {
        let doc = Document::new("https://example.com/");
        let html = doc.document_element();
        let body = doc.body().unwrap();
        assert_eq!(doc.tree().tag(html), Some("html"));
        assert_eq!(doc.tree().parent(body), Some(html));
        assert!(Document::empty("about:blank").body().is_none());
    }
    
    #[test]
    fn test_style_resolution_order() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let p = doc.append_element(body, "p").unwrap();
        assert_eq!(doc.style_value(p, "background"), "none");
        doc.set_computed(p, "background", "red");
        assert_eq!(doc.style_value(p, "background"), "red");
        doc.set_style(p, "background", "blue");
        assert_eq!(doc.style_value(p, "background"), "blue");
    }
    
    #[test]
    fn test_lang() {
        let mut doc = Document::default();
        assert_eq!(doc.lang(), None);
        let html = doc.document_element();
        doc.set_attr(html, "lang", "vi-VN");
        assert_eq!(doc.lang(), Some("vi-VN"));
    }
}
