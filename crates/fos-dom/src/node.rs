//! DOM Node
//!
//! Nodes link to each other by [`NodeId`] instead of pointers; the
//! arena in [`crate::DomTree`] owns them all.

use std::collections::HashMap;

use crate::{ClassList, InlineStyle, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }
    
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }
    
    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }
    
    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }
    
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }
    
    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }
    
    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }
    
    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-case tag name
    pub tag: String,
    /// Attributes other than `class` and `style`, in insertion order
    pub attrs: Vec<Attribute>,
    /// Class list
    pub classes: ClassList,
    /// Inline `style` declarations
    pub style: InlineStyle,
    /// Resolved style values supplied by the host's style engine
    pub computed: HashMap<String, String>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            classes: ClassList::new(),
            style: InlineStyle::new(),
            computed: HashMap::new(),
        }
    }
    
    /// Get an attribute value. `class` and `style` are served from
    /// their structured forms.
    pub fn get_attr(&self, name: &str) -> Option<String> {
        match name {
            "class" => Some(self.classes.value()),
            "style" => Some(self.style.css_text()),
            _ => self.attrs.iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone()),
        }
    }
    
    /// Borrow a plain attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
    
    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "class" => self.classes = ClassList::from_string(value),
            "style" => self.style = InlineStyle::parse(value),
            _ => {
                if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
                    attr.value = value.to_string();
                    return;
                }
                self.attrs.push(Attribute { name: name.to_string(), value: value.to_string() });
            }
        }
    }
    
    /// Remove an attribute; returns true if it existed
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|a| a.name != name);
        before != self.attrs.len()
    }
    
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }
    
    /// `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
