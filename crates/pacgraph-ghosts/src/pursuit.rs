//! Turning a ghost's mode and target into the next node to walk to.

use pacgraph_core::{NodeId, NodeKind, Pos};
use pacgraph_paths::{ActorState, BoardGraph, BoardNode, PathFinder, QueryError, Waypoint};
use rand::Rng;

use crate::mode::GhostMode;
use crate::target::{ChaseContext, GhostKind};

/// Per-ghost constants.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pursuer {
    pub kind: GhostKind,
    /// Scatter corner.
    pub scatter: Pos,
    /// Node a consumed ghost returns to.
    pub house: NodeId,
    /// Route straight to pacman's exact position (splicing it in when
    /// mid-edge) whenever the chase target is pacman himself.
    pub direct_chase: bool,
}

/// The board as one ghost sees it this frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Situation {
    pub ghost: ActorState,
    pub ghost_pos: Pos,
    /// The node the ghost came from, used to avoid reversing while
    /// frightened.
    pub previous: Option<NodeId>,
    pub pacman: ActorState,
    pub pacman_pos: Pos,
    /// Pacman's heading as a unit vector.
    pub heading: Pos,
    pub blinky: Option<Pos>,
}

fn roams(n: &BoardNode) -> bool {
    matches!(n.kind(), NodeKind::Regular | NodeKind::Portal)
}

impl Pursuer {
    pub fn new(kind: GhostKind, scatter: Pos, house: impl Into<NodeId>) -> Self {
        Self {
            kind,
            scatter,
            house: house.into(),
            direct_chase: true,
        }
    }

    /// Where the ghost is headed in `mode`, or `None` when the mode does not
    /// route (waiting in the house, wandering while frightened).
    pub fn goal(&self, mode: GhostMode, graph: &BoardGraph, s: &Situation) -> Option<ActorState> {
        match mode {
            GhostMode::InHouse | GhostMode::Frightened => None,
            GhostMode::Consumed => Some(ActorState::at(self.house)),
            GhostMode::Scatter => graph.nearest(self.scatter, roams).map(ActorState::at),
            GhostMode::Chase => {
                let target = self.kind.chase_target(&ChaseContext {
                    pacman: s.pacman_pos,
                    heading: s.heading,
                    ghost: s.ghost_pos,
                    blinky: s.blinky,
                    scatter: self.scatter,
                });
                if self.direct_chase && target.approx_eq(s.pacman_pos, f32::EPSILON) {
                    Some(s.pacman)
                } else {
                    graph.nearest(target, roams).map(ActorState::at)
                }
            }
        }
    }

    /// Pick the next waypoint for the ghost.
    ///
    /// `Ok(None)` means hold course: there is nothing to route to, the ghost
    /// already stands on its goal, or the goal is unreachable.
    pub fn plan(
        &self,
        mode: GhostMode,
        graph: &mut BoardGraph,
        finder: &mut PathFinder,
        s: &Situation,
        rng: &mut impl Rng,
    ) -> Result<Option<Waypoint>, QueryError> {
        if mode == GhostMode::Frightened {
            return Ok(wander(graph, s, rng));
        }
        let Some(goal) = self.goal(mode, graph, s) else {
            return Ok(None);
        };
        let route = finder.route(graph, &s.ghost, &goal)?;
        if route.is_none() {
            log::debug!("{:?}: no path to {:?}, holding", self.kind, goal);
        }
        Ok(route.and_then(|r| r.next_waypoint().copied()))
    }
}

/// A random neighbor other than the one just left, unless it is the only
/// way out. A ghost in transit keeps going.
fn wander(graph: &BoardGraph, s: &Situation, rng: &mut impl Rng) -> Option<Waypoint> {
    let here = match s.ghost {
        ActorState::InTransit { toward, .. } => {
            let node = graph.node(toward)?;
            return Some(Waypoint {
                pos: node.pos(),
                node: Some(toward),
            });
        }
        ActorState::Stationary { node } => node,
    };
    let exits: Vec<&BoardNode> = graph
        .neighbor_ids(here)?
        .into_iter()
        .filter_map(|id| graph.node(id))
        .filter(|n| roams(n))
        .collect();
    let forward: Vec<&BoardNode> = exits
        .iter()
        .copied()
        .filter(|n| Some(n.id()) != s.previous)
        .collect();
    let choices = if forward.is_empty() { exits } else { forward };
    if choices.is_empty() {
        return None;
    }
    let pick = choices[rng.random_range(0..choices.len())];
    Some(Waypoint {
        pos: pick.pos(),
        node: Some(pick.id()),
    })
}
