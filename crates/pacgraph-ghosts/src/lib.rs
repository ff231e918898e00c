//! Ghost decision helpers built on `pacgraph-paths`: chase targets, the
//! scatter/chase mode schedule, and next-node planning.

pub mod mode;
pub mod pursuit;
pub mod target;

pub use mode::{GhostMode, ModeSchedule, ModeTiming};
pub use pursuit::{Pursuer, Situation};
pub use target::{ChaseContext, GhostKind};
