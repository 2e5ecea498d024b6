//! Panel Rendering
//!
//! Builds the toolbar's own element tree from the option schema and keeps
//! a registry of every classed panel element. Dispatch looks controls up
//! in the registry by identifier (the class name minus the configured
//! prefix) instead of re-reading class attributes.

use std::collections::HashMap;

use fos_dom::{Document, DomResult, NodeId};
use indexmap::IndexMap;

use crate::config::ToolbarConfig;
use crate::effects::{format_number, percent_label};
use crate::schema::{PaletteDescriptor, RangeDescriptor, SchemaNode, TITLE_KEY};

/// A classed element inside the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub node: NodeId,
    /// Class suffix after `<className>-`, e.g. `align-left-button`
    pub ident: String,
    marker: String,
}

impl Control {
    fn new(node: NodeId, ident: &str) -> Self {
        Self {
            node,
            ident: ident.to_string(),
            marker: format!("-{ident}"),
        }
    }
    
    /// Whether `fragment` occurs in the control's class name, matched
    /// against the identifier with its leading separator
    pub fn has(&self, fragment: &str) -> bool {
        self.marker.contains(fragment)
    }
}

/// The rendered toolbar
#[derive(Debug, Clone)]
pub struct Panel {
    wrapper: NodeId,
    cursor: NodeId,
    tip: NodeId,
    read_wrap: NodeId,
    controls: Vec<Control>,
    by_node: HashMap<NodeId, usize>,
}

struct Builder<'d> {
    doc: &'d mut Document,
    config: &'d ToolbarConfig,
    controls: Vec<Control>,
}

impl Builder<'_> {
    fn element(&mut self, parent: NodeId, tag: &str, ident: Option<&str>) -> DomResult<NodeId> {
        let id = self.doc.append_element(parent, tag)?;
        if let Some(ident) = ident {
            self.doc.add_class(id, &self.config.class(ident));
            self.controls.push(Control::new(id, ident));
        }
        Ok(id)
    }
    
    fn icon(&mut self, parent: NodeId, name: &str, label: Option<&str>) -> DomResult<()> {
        match self.config.logo_url.as_deref() {
            Some(src) if name == "logo" => {
                let img = self.element(parent, "img", None)?;
                self.doc.set_attr(img, "src", src);
                self.doc.set_attr(img, "alt", "");
            }
            _ => {
                let svg = self.element(parent, "svg", None)?;
                self.doc.set_attr(svg, "height", "100%");
                let link = self.element(svg, "use", None)?;
                self.doc.set_attr(link, "href", &format!("#baa-{name}"));
            }
        }
        if let Some(label) = label {
            let i = self.element(parent, "i", None)?;
            self.doc.append_text(i, label)?;
        }
        Ok(())
    }
    
    fn layout(&mut self, parent: NodeId, items: &IndexMap<String, SchemaNode>) -> DomResult<()> {
        for (key, item) in items {
            let is_title = key.contains(TITLE_KEY);
            let ident = match item {
                SchemaNode::Text(_) if !is_title && !key.contains("slider") => format!("{key}-button"),
                _ => key.clone(),
            };
            let div = self.element(parent, "div", Some(&ident))?;
            match item {
                SchemaNode::Group(children) => self.layout(div, children)?,
                SchemaNode::Text(text) if is_title => {
                    self.doc.append_text(div, text)?;
                }
                SchemaNode::Text(label) => self.icon(div, key, Some(label))?,
                SchemaNode::Range(range) => self.slider(div, key, range)?,
                SchemaNode::Palette(palette) => self.palette(div, key, palette)?,
            }
        }
        Ok(())
    }
    
    fn slider(&mut self, parent: NodeId, key: &str, range: &RangeDescriptor) -> DomResult<()> {
        let label = self.element(parent, "label", None)?;
        self.doc.append_text(label, &range.label)?;
        
        let value = format_number(range.value);
        let body = self.element(parent, "div", Some("slider-body"))?;
        self.doc.set_attr(body, "data-range", &key.replace("-slider", ""));
        self.doc.set_attr(body, "data-value", &value);
        
        let minus = self.element(body, "i", Some("range-minus-button"))?;
        self.icon(minus, "minus", None)?;
        
        let holder = self.element(body, "div", None)?;
        let input = self.element(holder, "input", Some("range-input"))?;
        self.doc.set_attr(input, "type", "range");
        self.doc.set_attr(input, "min", &format_number(range.min));
        self.doc.set_attr(input, "max", &format_number(range.max));
        self.doc.set_attr(input, "step", &format_number(range.step));
        self.doc.set_attr(input, "value", &value);
        self.doc.set_attr(input, "title", &value);
        let percent = self.element(holder, "i", None)?;
        self.doc.append_text(percent, &percent_label(range.value))?;
        
        let plus = self.element(body, "i", Some("range-plus-button"))?;
        self.icon(plus, "plus", None)
    }
    
    fn palette(&mut self, parent: NodeId, key: &str, palette: &PaletteDescriptor) -> DomResult<()> {
        let label = self.element(parent, "label", None)?;
        self.doc.append_text(label, &palette.label)?;
        
        let body = self.element(parent, "div", Some("colour-body"))?;
        self.doc.set_attr(body, "data-rel", key);
        for color in palette.colors() {
            let swatch = self.element(body, "i", Some("color-button"))?;
            self.doc.set_attr(swatch, "data-color", color);
            self.doc.set_style(swatch, "background", color);
        }
        Ok(())
    }
}

impl Panel {
    /// Render the panel as a detached subtree; the caller attaches
    /// [`Panel::wrapper`] where it belongs.
    pub fn build(doc: &mut Document, config: &ToolbarConfig) -> DomResult<Panel> {
        let tree = doc.tree_mut();
        let wrapper = tree.create_element("section");
        let read_wrap = tree.create_element("section");
        doc.add_class(wrapper, &config.class_name);
        doc.add_class(read_wrap, &config.class("readability"));
        
        let mut b = Builder { doc, config, controls: Vec::new() };
        
        if let Some(css) = &config.css {
            let style = b.element(wrapper, "style", None)?;
            b.doc.append_text(style, css)?;
        }
        let action = b.element(wrapper, "div", Some("action-button"))?;
        b.icon(action, "logo", None)?;
        
        let container = b.element(wrapper, "div", Some("container"))?;
        b.layout(container, config.items_list.items())?;
        
        if let Some(icons) = &config.icons {
            let sprites = b.element(wrapper, "template", Some("icons"))?;
            b.doc.append_text(sprites, icons)?;
        }
        
        let cursor = b.element(wrapper, "i", Some("cursor"))?;
        let tip = b.element(wrapper, "i", Some("tip"))?;
        
        let controls = b.controls;
        let by_node = controls.iter().enumerate().map(|(i, c)| (c.node, i)).collect();
        tracing::debug!("Rendered toolbar panel with {} controls", controls.len());
        
        Ok(Panel { wrapper, cursor, tip, read_wrap, controls, by_node })
    }
    
    /// Outermost panel element
    pub fn wrapper(&self) -> NodeId {
        self.wrapper
    }
    
    /// Reading guide / mask / big cursor element
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }
    
    /// Magnifier tooltip element
    pub fn tip(&self) -> NodeId {
        self.tip
    }
    
    /// Container read mode relocates content into
    pub fn read_wrap(&self) -> NodeId {
        self.read_wrap
    }
    
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }
    
    /// Registry entry for a panel element
    pub fn control(&self, node: NodeId) -> Option<&Control> {
        self.by_node.get(&node).map(|&i| &self.controls[i])
    }
    
    /// Nearest button at or above a clicked element
    pub fn resolve_click(&self, doc: &Document, target: NodeId) -> Option<&Control> {
        doc.tree()
            .ancestors_inclusive(target)
            .take_while(|&n| n != self.wrapper)
            .filter_map(|n| self.control(n))
            .find(|c| c.has("-button"))
    }
    
    /// First control, in panel order, whose class contains `key`
    pub fn resolve_key(&self, key: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.has(key))
    }
    
    /// First button whose class contains `fragment`
    pub fn button(&self, fragment: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.has("-button") && c.has(fragment))
    }
    
    /// First control inside `root` (exclusive) with the given identifier
    pub fn find_within(&self, doc: &Document, root: NodeId, ident: &str) -> Option<NodeId> {
        self.controls.iter()
            .find(|c| c.ident == ident && c.node != root && doc.tree().contains(root, c.node))
            .map(|c| c.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    fn render() -> (Document, Panel, ToolbarConfig) {
        let mut doc = Document::new("https://example.test/");
        let config = ToolbarConfig::default();
        let panel = Panel::build(&mut doc, &config).unwrap();
        (doc, panel, config)
    }
    
    #[test]
    fn test_button_idents() {
        let (doc, panel, config) = render();
        let left = panel.resolve_key("align-left").unwrap();
        assert_eq!(left.ident, "align-left-button");
        assert!(doc.has_class(left.node, &config.class("align-left-button")));
        assert_eq!(panel.resolve_key("darkmode").unwrap().ident, "darkmode-button");
        assert_eq!(panel.resolve_key("font-size-slider").unwrap().ident, "font-size-slider");
    }
    
    #[test]
    fn test_slider_markup() {
        let (doc, panel, _) = render();
        let wrap = panel.resolve_key("audio-volume-slider").unwrap().node;
        let body = panel.find_within(&doc, wrap, "slider-body").unwrap();
        assert_eq!(doc.attr(body, "data-range").as_deref(), Some("audio-volume"));
        assert_eq!(doc.attr(body, "data-value").as_deref(), Some("0.8"));
        
        let input = panel.find_within(&doc, wrap, "range-input").unwrap();
        assert_eq!(doc.attr(input, "step").as_deref(), Some("0.1"));
        assert_eq!(doc.attr(input, "title").as_deref(), Some("0.8"));
        let label = doc.tree().next_element_sibling(input).unwrap();
        assert_eq!(doc.inner_text(label), "80%");
    }
    
    #[test]
    fn test_palette_markup() {
        let (doc, panel, _) = render();
        let wrap = panel.resolve_key("text-color").unwrap().node;
        let body = panel.find_within(&doc, wrap, "colour-body").unwrap();
        assert_eq!(doc.attr(body, "data-rel").as_deref(), Some("text-color"));
        let swatches: Vec<NodeId> = doc.tree().element_children(body).collect();
        assert_eq!(swatches.len(), 8);
        assert_eq!(doc.attr(swatches[0], "data-color").as_deref(), Some("#0076B4"));
        assert_eq!(doc.inline_style(swatches[0], "background"), Some("#0076B4"));
    }
    
    #[test]
    fn test_resolve_click_walks_to_button() {
        let (doc, panel, _) = render();
        let button = panel.resolve_key("hide-image").unwrap().node;
        let label = doc.tree().last_element_child(button).unwrap();
        assert_eq!(panel.resolve_click(&doc, label).map(|c| c.node), Some(button));
        
        let container = panel.resolve_key("container").unwrap().node;
        assert_eq!(panel.resolve_click(&doc, container), None);
    }
    
    #[test]
    fn test_wrapper_is_detached() {
        let (doc, panel, config) = render();
        assert_eq!(doc.tree().parent(panel.wrapper()), None);
        assert!(doc.has_class(panel.wrapper(), &config.class_name));
        assert!(doc.has_class(panel.read_wrap(), &config.class("readability")));
        assert!(doc.tree().contains(panel.wrapper(), panel.cursor()));
    }
}
