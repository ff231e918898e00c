//! Raw level descriptors.
//!
//! A level loader produces one [`RawNode`] per placed node, each declaring
//! its own neighbors. Declarations are per node, so a two-way corridor is
//! listed on both ends.

use std::fmt;

use crate::geom::Pos;

/// Stable node identifier, unique within one level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub i32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i32> for NodeId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Category of a level node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum NodeKind {
    /// Ordinary walkable junction or corner.
    #[default]
    Regular,
    /// Inside or at the door of the ghost house.
    GhostHouse,
    /// One end of a wrap-around tunnel.
    Portal,
    /// Staging marker for a ghost's home corner. Never walkable.
    Home,
}

impl NodeKind {
    /// Whether nodes of this kind can ever be part of a walkable graph.
    #[inline]
    pub fn is_walkable(self) -> bool {
        self != Self::Home
    }
}

/// One node as declared by the level.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNode {
    pub id: NodeId,
    pub pos: Pos,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: NodeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub neighbors: Vec<NodeId>,
}

impl RawNode {
    /// Create a node with no neighbors.
    pub fn new(id: impl Into<NodeId>, pos: Pos, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            pos,
            kind,
            neighbors: Vec::new(),
        }
    }
}

/// The full node list of one level, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelNodes {
    pub nodes: Vec<RawNode>,
}

impl LevelNodes {
    /// Create an empty level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id.
    pub fn add(&mut self, id: impl Into<NodeId>, pos: Pos, kind: NodeKind) -> NodeId {
        let node = RawNode::new(id, pos, kind);
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Declare `to` as a neighbor of `from` only.
    ///
    /// Does nothing if `from` is not declared.
    pub fn link_one_way(&mut self, from: NodeId, to: NodeId) {
        if let Some(n) = self.nodes.iter_mut().find(|n| n.id == from) {
            n.neighbors.push(to);
        }
    }

    /// Declare `a` and `b` as neighbors of each other.
    pub fn link(&mut self, a: NodeId, b: NodeId) {
        self.link_one_way(a, b);
        self.link_one_way(b, a);
    }

    /// Look up a declared node.
    pub fn get(&self, id: NodeId) -> Option<&RawNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Number of declared nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no nodes are declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
