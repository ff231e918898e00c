use std::fmt;

use pacgraph_core::NodeId;

use crate::graph::Endpoint;

/// Errors that can occur while building a [`BoardGraph`](crate::BoardGraph).
///
/// All of them are fatal to level load: a level with an inconsistent node
/// list cannot be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Two raw nodes share the same id.
    DuplicateNode(NodeId),
    /// A node declares a neighbor id that no raw node has.
    UnknownNeighbor { node: NodeId, neighbor: NodeId },
    /// A node declares itself as its own neighbor.
    SelfLoop(NodeId),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode(id) => write!(f, "board graph: node {id} declared twice"),
            Self::UnknownNeighbor { node, neighbor } => {
                write!(f, "board graph: node {node} lists unknown neighbor {neighbor}")
            }
            Self::SelfLoop(id) => write!(f, "board graph: node {id} lists itself as a neighbor"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Per-query errors. These are recoverable: the caller simply gets no new
/// path this tick.
///
/// "No path exists" is not an error; searches report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The endpoint does not resolve to a node of the graph (unknown node
    /// id, or a splice that has already been released).
    UnresolvedEndpoint(Endpoint),
    /// A splice was requested between two nodes that are not adjacent.
    InvalidSplice { front: Endpoint, back: Endpoint },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedEndpoint(e) => write!(f, "query: endpoint {e} is not in the graph"),
            Self::InvalidSplice { front, back } => {
                write!(f, "query: cannot splice {back} -> {front}, nodes are not adjacent")
            }
        }
    }
}

impl std::error::Error for QueryError {}
