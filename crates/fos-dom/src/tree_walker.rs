//! Element Walker
//!
//! Depth-first, element-only traversal (the `SHOW_ELEMENT` tree walker)
//! with the ability to prune whole subtrees.

use crate::{DomTree, NodeId};

/// Element-only pre-order walker under a root (root excluded)
pub struct ElementWalker<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
    prune: Option<Box<dyn Fn(NodeId) -> bool + 'a>>,
}

impl<'a> ElementWalker<'a> {
    pub fn new(tree: &'a DomTree, root: NodeId) -> Self {
        let mut stack: Vec<NodeId> = tree.element_children(root).collect();
        stack.reverse();
        Self { tree, stack, prune: None }
    }
    
    /// Skip every node for which `pred` holds, along with its subtree
    pub fn prune(mut self, pred: impl Fn(NodeId) -> bool + 'a) -> Self {
        self.prune = Some(Box::new(pred));
        self
    }
}

impl Iterator for ElementWalker<'_> {
    type Item = NodeId;
    
    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            if self.prune.as_ref().is_some_and(|p| p(id)) {
                continue;
            }
            let start = self.stack.len();
            self.stack.extend(self.tree.element_children(id));
            self.stack[start..].reverse();
            return Some(id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_walk_with_prune() {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let keep = tree.create_element("p");
        let skip = tree.create_element("section");
        let hidden = tree.create_element("span");
        let after = tree.create_element("p");
        tree.append_child(tree.root(), body).unwrap();
        tree.append_child(body, keep).unwrap();
        tree.append_child(body, skip).unwrap();
        tree.append_child(skip, hidden).unwrap();
        tree.append_child(body, after).unwrap();
        
        let all: Vec<_> = ElementWalker::new(&tree, body).collect();
        assert_eq!(all, vec![keep, skip, hidden, after]);
        
        let pruned: Vec<_> = ElementWalker::new(&tree, body)
            .prune(|n| n == skip)
            .collect();
        assert_eq!(pruned, vec![keep, after]);
    }
}
