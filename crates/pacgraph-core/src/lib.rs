//! **pacgraph-core**: board geometry and level descriptors.
//!
//! This crate provides the foundational types shared across the *pacgraph*
//! crates: a continuous 2D position type and the raw node descriptors a
//! level loader hands over once per level.

pub mod geom;
pub mod level;

pub use geom::Pos;
pub use level::{LevelNodes, NodeId, NodeKind, RawNode};
