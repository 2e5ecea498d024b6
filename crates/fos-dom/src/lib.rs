//! fOS DOM - Document Object Model
//!
//! Arena-backed document tree used by the accessibility toolbar.
//! Nodes are addressed by [`NodeId`]; elements carry a class list,
//! ordered attributes, an inline style declaration and the host's
//! resolved (computed) style values.

mod classlist;
mod document;
mod node;
mod selector;
mod style;
mod tree;
mod tree_walker;

pub use classlist::ClassList;
pub use document::Document;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use selector::{SelectorList, SimpleSelector};
pub use style::InlineStyle;
pub use tree::{Children, DomTree};
pub use tree_walker::ElementWalker;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this ID refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    /// Inserting a node into its own subtree
    #[error("hierarchy request error: {child:?} contains {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// Operation requires an element
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;
