//! Integration tests for fos-dom
//!
//! Tree mutation, relocation and lookups as the toolbar uses them.

use fos_dom::{Document, ElementWalker, NodeId};

fn sample() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new("https://example.com/");
    let body = doc.body().unwrap();
    let header = doc.append_element(body, "header").unwrap();
    doc.append_text(header, "Site").unwrap();
    let main = doc.append_element(body, "main").unwrap();
    let p = doc.append_element(main, "p").unwrap();
    doc.append_text(p, "Body text").unwrap();
    (doc, header, main, p)
}

// ============================================================================
// RELOCATION
// ============================================================================

#[test]
fn test_move_subtree_into_wrapper() {
    let (mut doc, header, main, p) = sample();
    let body = doc.body().unwrap();
    let wrap = doc.tree_mut().create_element("section");
    
    doc.tree_mut().append_child(wrap, main).unwrap();
    doc.tree_mut().detach(header);
    doc.tree_mut().prepend_child(body, wrap).unwrap();
    
    let order: Vec<_> = ElementWalker::new(doc.tree(), body).collect();
    assert_eq!(order, vec![wrap, main, p]);
    assert!(doc.tree().contains(body, p));
    assert!(!doc.tree().contains(body, header));
}

#[test]
fn test_query_selector_all_list() {
    let (mut doc, _, main, _) = sample();
    let body = doc.body().unwrap();
    let aside = doc.append_element(body, "div").unwrap();
    doc.set_attr(aside, "id", "main");
    
    assert_eq!(doc.query_selector_all(body, "main,#main"), vec![main, aside]);
    assert!(doc.query_selector_all(body, "nav").is_empty());
}

// ============================================================================
// TEXT
// ============================================================================

#[test]
fn test_inner_text_trims() {
    let (mut doc, _, _, p) = sample();
    doc.append_text(p, "  ").unwrap();
    assert_eq!(doc.inner_text(p), "Body text");
}

#[test]
fn test_set_text_content_replaces_children() {
    let (mut doc, header, _, _) = sample();
    doc.tree_mut().set_text_content(header, "Renamed");
    assert_eq!(doc.tree().text_content(header), "Renamed");
    assert_eq!(doc.tree().children(header).count(), 1);
    
    doc.tree_mut().set_text_content(header, "");
    assert_eq!(doc.tree().children(header).count(), 0);
}

// ============================================================================
// CLASSES & STYLE
// ============================================================================

#[test]
fn test_class_helpers_on_text_node_are_noops() {
    let (mut doc, header, _, _) = sample();
    let text = doc.tree().children(header).next().unwrap();
    doc.add_class(text, "x");
    assert!(!doc.has_class(text, "x"));
    assert!(!doc.toggle_class(text, "x"));
}

#[test]
fn test_elements_with_class() {
    let (mut doc, header, main, p) = sample();
    let body = doc.body().unwrap();
    for id in [header, p] {
        doc.add_class(id, "hl");
    }
    assert_eq!(doc.elements_with_class(body, "hl"), vec![header, p]);
    doc.set_class(main, "hl", true);
    doc.set_class(header, "hl", false);
    assert_eq!(doc.elements_with_class(body, "hl"), vec![main, p]);
}

#[test]
fn test_custom_property_and_style() {
    let (mut doc, _, _, p) = sample();
    doc.set_style(p, "color", "#000000");
    doc.set_style(p, "--color", "#000000");
    assert_eq!(doc.attr(p, "style").as_deref(), Some("color: #000000; --color: #000000;"));
}
