//! Board-graph pathfinding for maze-chase games.
//!
//! A level's node list is turned once into a [`BoardGraph`]; path queries
//! then run A* over it with Euclidean edge costs and heuristic.
//!
//! Actors rarely stand exactly on a node. An actor between two nodes is
//! spliced into the edge it travels as a temporary middle node, searched
//! from or to like any other node, and removed again when the query ends:
//!
//! | Step | API |
//! |---|---|
//! | Build once per level | [`BoardGraph::build`] / [`BoardGraph::build_with`] |
//! | Map actors to endpoints | [`Query::resolve`] (splices actors in transit) |
//! | Search | [`PathFinder::find_path`] |
//! | Restore the graph | dropping the [`Query`] releases its splices |
//!
//! [`PathFinder::route`] runs the whole cycle in one call.
//!
//! Searches on one graph must be serialized: splices are visible to every
//! search while they are live.

mod error;
mod graph;
mod query;
mod route;
mod search;
mod splice;

pub use error::{BuildError, QueryError};
pub use graph::{BoardGraph, BoardNode, BuildOptions, Endpoint, NodeIx};
pub use query::{ActorState, Mover, Query, SNAP_DISTANCE};
pub use route::{Route, Waypoint};
pub use search::{PathFinder, SearchNode};
pub use splice::SpliceId;
