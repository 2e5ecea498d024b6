//! Node Classification
//!
//! Partitions the page's elements into the target groups effects apply to.
//! Runs once at mount; later document changes are not reflected.

use fos_dom::{Document, ElementWalker, NodeId};

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Which target group an effect addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeGroup {
    Heading,
    Link,
    Text,
    TextNoHeading,
    BgExist,
}

/// Element sets, each in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeGroups {
    pub all: Vec<NodeId>,
    /// `h1`..`h6`
    pub heading: Vec<NodeId>,
    /// `a`
    pub link: Vec<NodeId>,
    /// Elements with a non-whitespace direct text child
    pub text: Vec<NodeId>,
    pub text_no_heading: Vec<NodeId>,
    /// Elements whose effective `background` is not `none`
    pub bg_exist: Vec<NodeId>,
}

impl NodeGroups {
    pub fn get(&self, group: NodeGroup) -> &[NodeId] {
        match group {
            NodeGroup::Heading => &self.heading,
            NodeGroup::Link => &self.link,
            NodeGroup::Text => &self.text,
            NodeGroup::TextNoHeading => &self.text_no_heading,
            NodeGroup::BgExist => &self.bg_exist,
        }
    }
}

/// Classify every element below `<body>`, skipping the subtree rooted at
/// `exclude_root` and elements whose tag is in `excluded_tags`.
pub fn classify(doc: &Document, exclude_root: Option<NodeId>, excluded_tags: &[String]) -> NodeGroups {
    let mut groups = NodeGroups::default();
    let Some(body) = doc.body() else {
        return groups;
    };
    let tree = doc.tree();
    
    let walker = ElementWalker::new(tree, body)
        .prune(move |id| exclude_root.is_some_and(|root| root == id));
    
    for node in walker {
        let Some(tag) = tree.tag(node) else { continue };
        if excluded_tags.iter().any(|t| t == tag) {
            continue;
        }
        
        groups.all.push(node);
        let heading = HEADINGS.contains(&tag);
        let text = tree.has_direct_text(node);
        
        if heading {
            groups.heading.push(node);
        }
        if tag == "a" {
            groups.link.push(node);
        }
        if text {
            groups.text.push(node);
            if !heading {
                groups.text_no_heading.push(node);
            }
        }
        if doc.style_value(node, "background") != "none" {
            groups.bg_exist.push(node);
        }
    }
    
    tracing::debug!(
        "Classified {} nodes ({} text, {} headings, {} with background)",
        groups.all.len(),
        groups.text.len(),
        groups.heading.len(),
        groups.bg_exist.len()
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    
    fn page() -> (Document, Vec<NodeId>) {
        let mut doc = Document::new("https://example.test/");
        let body = doc.body().unwrap();
        let h1 = doc.append_element(body, "h1").unwrap();
        doc.append_text(h1, "Title").unwrap();
        let p = doc.append_element(body, "p").unwrap();
        doc.append_text(p, "Body ").unwrap();
        let a = doc.append_element(p, "a").unwrap();
        doc.append_text(a, "link").unwrap();
        let script = doc.append_element(body, "script").unwrap();
        doc.append_text(script, "run()").unwrap();
        let div = doc.append_element(body, "div").unwrap();
        doc.append_text(div, "   ").unwrap();
        doc.set_computed(div, "background", "rgb(0, 0, 0)");
        (doc, vec![h1, p, a, script, div])
    }
    
    #[test]
    fn test_partition() {
        let (doc, nodes) = page();
        let [h1, p, a, script, div] = nodes[..] else { unreachable!() };
        let groups = classify(&doc, None, &["script".to_string()]);
        
        assert_eq!(groups.all, vec![h1, p, a, div]);
        assert!(!groups.all.contains(&script));
        assert_eq!(groups.heading, vec![h1]);
        assert_eq!(groups.link, vec![a]);
        assert_eq!(groups.text, vec![h1, p, a]);
        assert_eq!(groups.text_no_heading, vec![p, a]);
        assert_eq!(groups.bg_exist, vec![div]);
    }
    
    #[test]
    fn test_text_no_heading_is_text_minus_heading() {
        let (doc, _) = page();
        let groups = classify(&doc, None, &[]);
        let expected: Vec<NodeId> = groups.text.iter()
            .copied()
            .filter(|n| !groups.heading.contains(n))
            .collect();
        assert_eq!(groups.text_no_heading, expected);
    }
    
    #[test]
    fn test_excluded_subtree() {
        let (mut doc, nodes) = page();
        let body = doc.body().unwrap();
        let panel = doc.append_element(body, "section").unwrap();
        let inner = doc.append_element(panel, "span").unwrap();
        doc.append_text(inner, "panel text").unwrap();
        
        let groups = classify(&doc, Some(panel), &[]);
        assert!(!groups.all.contains(&panel));
        assert!(!groups.text.contains(&inner));
        assert!(groups.all.contains(&nodes[0]));
    }
    
    #[test]
    fn test_empty_document() {
        let doc = Document::empty("about:blank");
        assert_eq!(classify(&doc, None, &[]), NodeGroups::default());
    }
}
