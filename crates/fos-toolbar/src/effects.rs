//! Presentation Effects
//!
//! DOM mutations behind each toolbar setting: class toggles on target
//! groups, scaled text metrics, page zoom, colour overrides, read-mode
//! relocation and pointer-following elements.

use fos_dom::{Document, NodeId};

use crate::host::HostPage;

/// Units recognised on a baseline value; when several match, the last wins
pub const UNITS: [&str; 13] = [
    "px", "cm", "em", "ex", "in", "mm", "pc", "pt", "vh", "vw", "vmin", "rem", "%",
];

/// Properties scaled by the text range sliders
pub const TEXT_RANGE_PROPERTIES: [&str; 3] = ["font-size", "line-height", "letter-spacing"];

/// Viewport width at or below which the panel hides on phones
pub const PHONE_MAX_WIDTH: f64 = 575.0;

// ============================================================================
// Numbers
// ============================================================================

/// Leading decimal number of `s`, ignoring leading whitespace and any
/// trailing garbage (`"16px"` is 16)
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_run = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();
    
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_run(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_run(end + 1);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_run(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    s[..end].parse().ok()
}

/// Shortest decimal form (`1`, `0.8`, `17.6`)
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".into();
    }
    format!("{n}")
}

/// `trunc(value * 100)%`
pub fn percent_label(value: f64) -> String {
    format!("{}%", (value * 100.0).trunc() as i64)
}

/// Trailing unit of a CSS length
pub fn detect_unit(value: &str) -> Option<&'static str> {
    let lower = value.trim().to_ascii_lowercase();
    UNITS.iter().rev().copied().find(|unit| lower.ends_with(unit))
}

/// Bounds and granularity of a range input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl RangeSpec {
    /// Read `min`/`max`/`step` from an input element
    pub fn from_input(doc: &Document, input: NodeId) -> Self {
        let read = |name: &str, default: f64| {
            doc.attr(input, name).as_deref().and_then(parse_float).unwrap_or(default)
        };
        let min = read("min", 0.0);
        let max = read("max", 100.0).max(min);
        let step = read("step", 1.0);
        Self { min, max, step: if step > 0.0 { step } else { 1.0 } }
    }
    
    /// Clamp into range and snap onto the step grid from `min`
    pub fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        let mut snapped = self.min + steps * self.step;
        if snapped > self.max {
            snapped -= self.step;
        }
        snapped.clamp(self.min, self.max)
    }
    
    /// Decimal places needed to show a step-aligned value
    fn precision(&self) -> usize {
        [self.step, self.min]
            .iter()
            .map(|v| format_number(*v).split_once('.').map_or(0, |(_, frac)| frac.len()))
            .max()
            .unwrap_or(0)
    }
    
    /// Snap and format the way the input's `value` reads back
    pub fn normalize(&self, value: f64) -> String {
        let snapped = self.snap(value);
        let fixed = format!("{:.*}", self.precision(), snapped);
        parse_float(&fixed).map(format_number).unwrap_or(fixed)
    }
}

// ============================================================================
// Classes
// ============================================================================

pub fn toggle_class_on(doc: &mut Document, nodes: &[NodeId], class: &str) {
    for &node in nodes {
        doc.toggle_class(node, class);
    }
}

pub fn set_class_on(doc: &mut Document, nodes: &[NodeId], class: &str, on: bool) {
    for &node in nodes {
        doc.set_class(node, class, on);
    }
}

// ============================================================================
// Text metrics
// ============================================================================

/// `data-<className>-<property>-original`
pub fn baseline_attr(class_name: &str, property: &str) -> String {
    format!("data-{class_name}-{property}-original")
}

/// Record each node's current value of `property` once
pub fn capture_baselines(doc: &mut Document, nodes: &[NodeId], class_name: &str, property: &str) {
    let attr = baseline_attr(class_name, property);
    for &node in nodes {
        if doc.attr(node, &attr).is_none_or(|v| v.is_empty()) {
            let value = doc.style_value(node, property);
            doc.set_attr(node, &attr, &value);
        }
    }
}

/// Scale `property` on every node by `value` relative to its baseline.
/// At the default value the inline declaration is cleared instead.
pub fn apply_text_range(
    doc: &mut Document,
    nodes: &[NodeId],
    class_name: &str,
    property: &str,
    value: &str,
    default: &str,
) {
    capture_baselines(doc, nodes, class_name, property);
    let attr = baseline_attr(class_name, property);
    let factor = parse_float(value).unwrap_or(1.0);
    
    for &node in nodes {
        let css = if value == default {
            String::new()
        } else {
            let original = doc.attr(node, &attr).unwrap_or_default();
            let unit = detect_unit(&original).unwrap_or("px");
            let base = parse_float(&original).filter(|b| *b != 0.0).unwrap_or(1.0);
            format!("{}{unit}", format_number(base * factor))
        };
        doc.set_style(node, property, &css);
    }
}

/// Zoom the root element, or scale it when zoom is unsupported
pub fn apply_page_zoom(doc: &mut Document, host: &mut dyn HostPage, value: &str) {
    let page = doc.document_element();
    if host.supports_zoom() {
        doc.set_style(page, "zoom", value);
    } else {
        doc.set_style(page, "transform", &format!("scale({value})"));
        doc.set_style(page, "transform-origin", "center top");
        let (scroll_width, client_width) = host.body_scroll_extent();
        host.set_body_scroll_left((scroll_width - client_width) / 2.0);
    }
}

/// Replace the text of the percent label following a range input
pub fn set_percent_label(doc: &mut Document, input: NodeId, value: f64) {
    if let Some(label) = doc.tree().next_element_sibling(input) {
        doc.tree_mut().set_text_content(label, &percent_label(value));
    }
}

// ============================================================================
// Colours
// ============================================================================

/// Set `property` and its `--property` custom property to `color`
pub fn apply_color(doc: &mut Document, nodes: &[NodeId], property: &str, color: &str) {
    let custom = format!("--{property}");
    for &node in nodes {
        doc.set_style(node, property, color);
        doc.set_style(node, &custom, color);
    }
}

// ============================================================================
// Read mode
// ============================================================================

/// Move the elements matching `selector` into `read_wrap`, drop every other
/// body child except the one holding `keep`, and put `read_wrap` first.
pub fn relocate_for_reading(doc: &mut Document, keep: NodeId, read_wrap: NodeId, selector: &str) {
    let Some(body) = doc.body() else {
        return;
    };
    
    let mut picked: Vec<NodeId> = Vec::new();
    for node in doc.query_selector_all(doc.document_element(), selector) {
        let tree = doc.tree();
        if tree.contains(keep, node) || tree.contains(read_wrap, node) {
            continue;
        }
        if picked.iter().any(|&p| tree.contains(p, node)) {
            continue;
        }
        picked.push(node);
    }
    
    for &node in &picked {
        if let Err(e) = doc.tree_mut().append_child(read_wrap, node) {
            tracing::warn!("Could not relocate node into read mode: {}", e);
        }
    }
    
    let children: Vec<NodeId> = doc.tree().children(body).collect();
    for child in children {
        if !doc.tree().contains(child, keep) {
            doc.tree_mut().detach(child);
        }
    }
    
    if let Err(e) = doc.tree_mut().prepend_child(body, read_wrap) {
        tracing::warn!("Could not mount read mode container: {}", e);
    }
    tracing::info!("Read mode enabled, {} nodes relocated", picked.len());
}

// ============================================================================
// Pointer
// ============================================================================

/// Move pointer-following elements to viewport coordinates
pub fn position_pointer(doc: &mut Document, nodes: &[NodeId], x: f64, y: f64) {
    let left = format!("{}px", format_number(x));
    let top = format!("{}px", format_number(y));
    for &node in nodes {
        doc.set_style(node, "left", &left);
        doc.set_style(node, "top", &top);
    }
}

/// Hide the panel on narrow viewports
pub fn apply_phone_visibility(doc: &mut Document, wrapper: NodeId, hide_class: &str, viewport_width: f64) {
    doc.set_class(wrapper, hide_class, viewport_width <= PHONE_MAX_WIDTH);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    
    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("16px"), Some(16.0));
        assert_eq!(parse_float("  1.5em"), Some(1.5));
        assert_eq!(parse_float("-.25rem"), Some(-0.25));
        assert_eq!(parse_float("2e1x"), Some(20.0));
        assert_eq!(parse_float("3e"), Some(3.0));
        assert_eq!(parse_float("normal"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float(""), None);
    }
    
    #[test]
    fn test_detect_unit() {
        assert_eq!(detect_unit("16px"), Some("px"));
        assert_eq!(detect_unit("1.2REM"), Some("rem"));
        assert_eq!(detect_unit("10vmin"), Some("vmin"));
        assert_eq!(detect_unit("150%"), Some("%"));
        assert_eq!(detect_unit("normal"), None);
    }
    
    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(1.0), "100%");
        assert_eq!(percent_label(0.8), "80%");
        assert_eq!(percent_label(1.25), "125%");
    }
    
    #[test]
    fn test_range_spec_snap() {
        let spec = RangeSpec { min: 0.0, max: 2.0, step: 0.1 };
        assert_eq!(spec.normalize(1.0 + 0.1), "1.1");
        assert_eq!(spec.normalize(0.0 - 0.1), "0");
        assert_eq!(spec.normalize(2.0 + 0.1), "2");
        assert_eq!(spec.normalize(0.7000000000000001), "0.7");
        
        let coarse = RangeSpec { min: 0.0, max: 10.0, step: 2.0 };
        assert_eq!(coarse.normalize(5.2), "6");
    }
    
    #[test]
    fn test_text_range_scales_and_clears() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let p = doc.append_element(body, "p").unwrap();
        let q = doc.append_element(body, "p").unwrap();
        doc.set_computed(p, "font-size", "16px");
        doc.set_computed(q, "font-size", "1.5em");
        let nodes = [p, q];
        
        apply_text_range(&mut doc, &nodes, "acc", "font-size", "1.5", "1");
        assert_eq!(doc.attr(p, "data-acc-font-size-original").as_deref(), Some("16px"));
        assert_eq!(doc.inline_style(p, "font-size"), Some("24px"));
        assert_eq!(doc.inline_style(q, "font-size"), Some("2.25em"));
        
        // baseline survives the inline override
        apply_text_range(&mut doc, &nodes, "acc", "font-size", "2", "1");
        assert_eq!(doc.inline_style(p, "font-size"), Some("32px"));
        
        apply_text_range(&mut doc, &nodes, "acc", "font-size", "1", "1");
        assert_eq!(doc.inline_style(p, "font-size"), None);
        assert_eq!(doc.inline_style(q, "font-size"), None);
    }
    
    #[test]
    fn test_unitless_baseline_defaults() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let p = doc.append_element(body, "p").unwrap();
        apply_text_range(&mut doc, &[p], "acc", "letter-spacing", "2", "1");
        assert_eq!(doc.inline_style(p, "letter-spacing"), Some("2px"));
    }
    
    #[test]
    fn test_page_zoom_fallback() {
        let mut doc = Document::default();
        let mut host = HeadlessHost::new(1024.0);
        apply_page_zoom(&mut doc, &mut host, "1.2");
        assert_eq!(doc.inline_style(doc.document_element(), "zoom"), Some("1.2"));
        
        let mut host = HeadlessHost::new(1024.0);
        host.zoom = false;
        host.scroll_extent = (1400.0, 1000.0);
        let mut doc = Document::default();
        apply_page_zoom(&mut doc, &mut host, "1.4");
        let root = doc.document_element();
        assert_eq!(doc.inline_style(root, "transform"), Some("scale(1.4)"));
        assert_eq!(doc.inline_style(root, "transform-origin"), Some("center top"));
        assert_eq!(host.scroll_left(), 200.0);
    }
    
    #[test]
    fn test_relocate_for_reading() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let nav = doc.append_element(body, "nav").unwrap();
        let main = doc.append_element(body, "main").unwrap();
        let holder = doc.append_element(body, "div").unwrap();
        let panel = doc.append_element(holder, "section").unwrap();
        let read_wrap = doc.tree_mut().create_element("section");
        
        relocate_for_reading(&mut doc, panel, read_wrap, "main,#main");
        
        let children: Vec<NodeId> = doc.tree().children(body).collect();
        assert_eq!(children, vec![read_wrap, holder]);
        assert_eq!(doc.tree().parent(main), Some(read_wrap));
        assert_eq!(doc.tree().parent(nav), None);
    }
    
    #[test]
    fn test_phone_visibility() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        apply_phone_visibility(&mut doc, body, "acc-hide", 575.0);
        assert!(doc.has_class(body, "acc-hide"));
        apply_phone_visibility(&mut doc, body, "acc-hide", 576.0);
        assert!(!doc.has_class(body, "acc-hide"));
    }
}
