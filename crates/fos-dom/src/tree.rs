//! DOM Tree (arena-based allocation)

use crate::{DomError, DomResult, ElementData, Node, NodeId};

/// Arena-based DOM tree. Node 0 is always the document node.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }
    
    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }
    
    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }
    
    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }
    
    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }
    
    /// Mutable element data of a node, if it is an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }
    
    /// Tag name of an element
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }
    
    /// Number of nodes in the arena (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
    
    /// Allocate a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }
    
    /// Allocate a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }
    
    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
    
    fn check(&self, id: NodeId) -> DomResult<()> {
        if self.get(id).is_some() { Ok(()) } else { Err(DomError::NotFound(id)) }
    }
    
    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insert(parent, child)?;
        self.detach(child);
        
        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }
    
    /// Insert `child` as the first child of `parent`, moving it if attached
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insert(parent, child)?;
        self.detach(child);
        
        let first = self.nodes[parent.index()].first_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.next_sibling = first;
        }
        if first.is_valid() {
            self.nodes[first.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
        self.nodes[parent.index()].first_child = child;
        Ok(())
    }
    
    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check(parent)?;
        self.check(child)?;
        if self.contains(child, parent) {
            tracing::debug!("Rejected inserting {:?} into its descendant {:?}", child, parent);
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }
    
    /// Unlink a node from its parent. The subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }
        
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        
        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }
    
    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }
    
    /// Iterate direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next }
    }
    
    /// Iterate direct element children
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(|&c| self.element(c).is_some())
    }
    
    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).last()
    }
    
    /// Next sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.next_sibling;
        while cur.is_valid() {
            if self.element(cur).is_some() {
                return Some(cur);
            }
            cur = self.nodes[cur.index()].next_sibling;
        }
        None
    }
    
    /// Walk from `id` up to the root, `id` first
    pub fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = if self.get(id).is_some() { id } else { NodeId::NONE };
        std::iter::successors(Some(start).filter(|n| n.is_valid()), move |&n| self.parent(n))
    }
    
    /// Whether `node` is `ancestor` or lies in its subtree
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors_inclusive(node).any(|n| n == ancestor)
    }
    
    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }
    
    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id) {
            Some(node) if node.is_text() => out.push_str(node.as_text().unwrap_or_default()),
            Some(_) => {
                for child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }
    
    /// Has at least one direct text child with non-whitespace content
    pub fn has_direct_text(&self, id: NodeId) -> bool {
        self.children(id).any(|c| {
            self.get(c)
                .and_then(Node::as_text)
                .is_some_and(|t| !t.trim().is_empty())
        })
    }
    
    /// Replace all children of `id` with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.detach(child);
        }
        if !text.is_empty() {
            let t = self.create_text(text);
            // both IDs were just validated or created
            let _ = self.append_child(id, t);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;
    
    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let cur = self.next;
        self.next = self.tree.get(cur).map(|n| n.next_sibling).unwrap_or(NodeId::NONE);
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_append_and_siblings() {
        let mut tree = DomTree::new();
        let div = tree.create_element("DIV");
        let a = tree.create_element("p");
        let b = tree.create_element("p");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();
        
        assert_eq!(tree.tag(div), Some("div"));
        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(tree.next_element_sibling(a), Some(b));
        assert_eq!(tree.last_element_child(div), Some(b));
    }
    
    #[test]
    fn test_prepend_moves_node() {
        let mut tree = DomTree::new();
        let x = tree.create_element("x");
        let y = tree.create_element("y");
        let z = tree.create_element("z");
        tree.append_child(tree.root(), x).unwrap();
        tree.append_child(x, y).unwrap();
        tree.append_child(x, z).unwrap();
        tree.prepend_child(x, z).unwrap();
        assert_eq!(tree.children(x).collect::<Vec<_>>(), vec![z, y]);
    }
    
    #[test]
    fn test_hierarchy_error() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();
        assert!(matches!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
    }
    
    #[test]
    fn test_detach_middle_child() {
        let mut tree = DomTree::new();
        let p = tree.create_element("ul");
        let items: Vec<_> = (0..3).map(|_| tree.create_element("li")).collect();
        for &i in &items {
            tree.append_child(p, i).unwrap();
        }
        tree.detach(items[1]);
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![items[0], items[2]]);
        assert_eq!(tree.parent(items[1]), None);
    }
    
    #[test]
    fn test_direct_text() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let ws = tree.create_text("  \n ");
        tree.append_child(p, ws).unwrap();
        assert!(!tree.has_direct_text(p));
        let word = tree.create_text("hi");
        tree.append_child(p, word).unwrap();
        assert!(tree.has_direct_text(p));
        assert_eq!(tree.text_content(p), "  \n hi");
    }
}
