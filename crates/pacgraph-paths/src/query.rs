use pacgraph_core::{NodeId, Pos};

use crate::error::QueryError;
use crate::graph::{BoardGraph, Endpoint, NodeIx};
use crate::splice::SpliceId;

/// Positions closer than this to a node are treated as being on it.
pub const SNAP_DISTANCE: f32 = 1e-4;

/// What the movement system reports about an actor at query time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorState {
    /// Standing on a node.
    Stationary { node: NodeId },
    /// Moving along the edge `from -> toward`, currently at `pos`.
    InTransit {
        from: NodeId,
        toward: NodeId,
        pos: Pos,
    },
}

impl ActorState {
    #[inline]
    pub fn at(node: impl Into<NodeId>) -> Self {
        Self::Stationary { node: node.into() }
    }

    #[inline]
    pub fn transit(from: impl Into<NodeId>, toward: impl Into<NodeId>, pos: Pos) -> Self {
        Self::InTransit {
            from: from.into(),
            toward: toward.into(),
            pos,
        }
    }

    /// Read the state of any [`Mover`]. `stationary` is the caller's own
    /// rule for "standing on its current node" (an idle pacman, a ghost in
    /// the house, ...).
    pub fn observe<M: Mover + ?Sized>(actor: &M, stationary: impl FnOnce(&M) -> bool) -> Self {
        let current = actor.current_node();
        let parked = stationary(actor);
        match actor.target_node() {
            Some(target) if target != current && !parked => {
                Self::transit(current, target, actor.position())
            }
            _ => Self::at(current),
        }
    }

    /// The node the actor stands on or last left.
    pub fn node(&self) -> NodeId {
        match *self {
            Self::Stationary { node } => node,
            Self::InTransit { from, .. } => from,
        }
    }
}

/// Movement state an actor exposes to path queries.
pub trait Mover {
    /// The node the actor stands on, or the one it last left.
    fn current_node(&self) -> NodeId;
    /// The node the actor is heading to, if any.
    fn target_node(&self) -> Option<NodeId>;
    /// Current interpolated position.
    fn position(&self) -> Pos;
}

/// One query's exclusive hold on the graph.
///
/// Resolving an actor in transit splices it into the graph; every splice
/// made through the query is released when the query is dropped, so no
/// exit path can leave the graph modified.
pub struct Query<'g> {
    graph: &'g mut BoardGraph,
    splices: Vec<SpliceId>,
}

impl<'g> Query<'g> {
    pub fn new(graph: &'g mut BoardGraph) -> Self {
        Self {
            graph,
            splices: Vec::new(),
        }
    }

    /// The graph, with this query's splices in place.
    #[inline]
    pub fn graph(&self) -> &BoardGraph {
        &*self.graph
    }

    /// Splices created so far, in creation order.
    #[inline]
    pub fn splices(&self) -> &[SpliceId] {
        &self.splices
    }

    /// Map an actor to a search endpoint.
    ///
    /// A stationary actor resolves to its node. An actor in transit gets a
    /// middle node at its position on the edge it travels. If an earlier
    /// actor of this query already split that edge, the new middle goes on
    /// the piece that contains the position.
    pub fn resolve(&mut self, actor: &ActorState) -> Result<Endpoint, QueryError> {
        let (from, toward, pos) = match *actor {
            ActorState::Stationary { node } => return self.node(node),
            ActorState::InTransit { from, toward, pos } => (from, toward, pos),
        };

        let back = self.lookup(from)?;
        let front = self.lookup(toward)?;
        let back_pos = self.graph.pos_of(back).unwrap_or(pos);
        let front_pos = self.graph.pos_of(front).unwrap_or(pos);
        if pos.approx_eq(back_pos, SNAP_DISTANCE) {
            return Ok(Endpoint::Node(from));
        }
        if pos.approx_eq(front_pos, SNAP_DISTANCE) {
            return Ok(Endpoint::Node(toward));
        }

        let (seg_front, seg_back) = self.segment(front, back, pos);
        let (Some(f), Some(b)) = (self.graph.endpoint(seg_front), self.graph.endpoint(seg_back))
        else {
            return Err(QueryError::UnresolvedEndpoint(Endpoint::Node(from)));
        };
        let id = self.graph.splice(f, b, pos)?;
        self.splices.push(id);
        Ok(Endpoint::Middle(id))
    }

    /// Release every splice made by this query. Returns how many were live.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for id in self.splices.drain(..) {
            if self.graph.release(id) {
                released += 1;
            }
        }
        released
    }

    fn node(&self, id: NodeId) -> Result<Endpoint, QueryError> {
        self.lookup(id).map(|_| Endpoint::Node(id))
    }

    fn lookup(&self, id: NodeId) -> Result<NodeIx, QueryError> {
        self.graph.ix(id).ok_or_else(|| {
            log::warn!("query endpoint {id} is not a walkable node");
            QueryError::UnresolvedEndpoint(Endpoint::Node(id))
        })
    }

    /// The (front, back) pair to splice for a position on `back -> front`.
    fn segment(&self, front: NodeIx, back: NodeIx, pos: Pos) -> (NodeIx, NodeIx) {
        let g = &*self.graph;
        if g.links(back, front) || g.links(front, back) {
            return (front, back);
        }
        let Some(chain) = g.middle_chain(back, front) else {
            // Not adjacent at all; let the splice report it.
            return (front, back);
        };

        // Edges are straight segments, so distance from `back` orders the chain.
        let Some(origin) = g.pos_of(back) else {
            return (front, back);
        };
        let along = origin.distance(pos);
        for pair in chain.windows(2) {
            let end = g.pos_of(pair[1]).map_or(f32::INFINITY, |p| origin.distance(p));
            if along <= end {
                return (pair[1], pair[0]);
            }
        }
        let n = chain.len();
        (chain[n - 1], chain[n - 2])
    }
}

impl Drop for Query<'_> {
    fn drop(&mut self) {
        let released = self.release_all();
        if released > 0 {
            log::debug!("query released {released} splices");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::PathFinder;
    use pacgraph_core::{LevelNodes, NodeKind};

    /// A(0,0) -2- B(2,0) -1- C(3,0), and an isolated island E(9,9).
    fn level() -> LevelNodes {
        let mut level = LevelNodes::new();
        let a = level.add(0, Pos::new(0.0, 0.0), NodeKind::Regular);
        let b = level.add(1, Pos::new(2.0, 0.0), NodeKind::Regular);
        let c = level.add(2, Pos::new(3.0, 0.0), NodeKind::Regular);
        level.add(4, Pos::new(9.0, 9.0), NodeKind::Regular);
        level.add(5, Pos::new(9.0, 10.0), NodeKind::Home);
        level.link(a, b);
        level.link(b, c);
        level
    }

    struct Walker {
        at: NodeId,
        to: Option<NodeId>,
        pos: Pos,
        idle: bool,
    }

    impl Mover for Walker {
        fn current_node(&self) -> NodeId {
            self.at
        }
        fn target_node(&self) -> Option<NodeId> {
            self.to
        }
        fn position(&self) -> Pos {
            self.pos
        }
    }

    #[test]
    fn observe_uses_caller_predicate() {
        let w = Walker {
            at: NodeId(0),
            to: Some(NodeId(1)),
            pos: Pos::new(0.5, 0.0),
            idle: false,
        };
        assert_eq!(
            ActorState::observe(&w, |w| w.idle),
            ActorState::transit(0, 1, Pos::new(0.5, 0.0))
        );
        assert_eq!(ActorState::observe(&w, |_| true), ActorState::at(0));

        let parked = Walker { to: None, ..w };
        assert_eq!(ActorState::observe(&parked, |w| w.idle), ActorState::at(0));
    }

    #[test]
    fn mid_edge_start() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let before = g.nodes().to_vec();
        let mut pf = PathFinder::new();

        let from = ActorState::transit(0, 1, Pos::new(0.5, 0.0));
        let route = pf.route(&mut g, &from, &ActorState::at(2)).unwrap().unwrap();

        assert_eq!(route.node_ids(), vec![None, Some(NodeId(1)), Some(NodeId(2))]);
        assert_eq!(route.start().unwrap().pos, Pos::new(0.5, 0.0));
        assert!((route.cost - 2.5).abs() < 1e-6);

        // Released: A-B restored, nothing reaches the middle.
        assert_eq!(g.nodes(), &before[..]);
        assert_eq!(g.live_splices(), 0);
        let a = g.ix(NodeId(0)).unwrap();
        let b = g.ix(NodeId(1)).unwrap();
        assert!(g.links(a, b) && g.links(b, a));
        let base = g.len();
        for n in g.nodes() {
            assert!(n.neighbors().iter().all(|ix| ix.index() < base));
        }
    }

    #[test]
    fn release_on_not_found() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let before = g.nodes().to_vec();
        let mut pf = PathFinder::new();
        let from = ActorState::transit(1, 2, Pos::new(2.5, 0.0));
        assert_eq!(pf.route(&mut g, &from, &ActorState::at(4)), Ok(None));
        assert_eq!(g.nodes(), &before[..]);
        assert_eq!(g.live_splices(), 0);
    }

    #[test]
    fn release_on_unresolved_goal() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let before = g.nodes().to_vec();
        let mut pf = PathFinder::new();
        let from = ActorState::transit(0, 1, Pos::new(1.0, 0.0));
        let err = pf.route(&mut g, &from, &ActorState::at(5)).unwrap_err();
        assert_eq!(err, QueryError::UnresolvedEndpoint(Endpoint::Node(NodeId(5))));
        assert_eq!(g.nodes(), &before[..]);
        assert_eq!(g.live_splices(), 0);
    }

    #[test]
    fn transit_between_non_adjacent_nodes() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let mut pf = PathFinder::new();
        let from = ActorState::transit(0, 2, Pos::new(1.0, 0.0));
        let err = pf.route(&mut g, &from, &ActorState::at(1)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSplice { .. }));
        assert_eq!(g.live_splices(), 0);
    }

    #[test]
    fn both_actors_mid_edge() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let before = g.nodes().to_vec();
        let mut pf = PathFinder::new();
        let ghost = ActorState::transit(0, 1, Pos::new(1.0, 0.0));
        let pacman = ActorState::transit(2, 1, Pos::new(2.5, 0.0));
        let route = pf.route(&mut g, &ghost, &pacman).unwrap().unwrap();
        assert_eq!(route.node_ids(), vec![None, Some(NodeId(1)), None]);
        assert!((route.cost - 1.5).abs() < 1e-6);
        assert_eq!(g.nodes(), &before[..]);
    }

    #[test]
    fn both_actors_on_same_edge() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let before = g.nodes().to_vec();
        let mut pf = PathFinder::new();

        // Ghost chasing pacman along A -> B, pacman ahead of it.
        let ghost = ActorState::transit(0, 1, Pos::new(0.5, 0.0));
        let pacman = ActorState::transit(0, 1, Pos::new(1.5, 0.0));
        let route = pf.route(&mut g, &ghost, &pacman).unwrap().unwrap();
        assert_eq!(route.len(), 2);
        assert!((route.cost - 1.0).abs() < 1e-6);
        assert_eq!(g.nodes(), &before[..]);

        // Pacman behind the ghost, coming the other way.
        let ghost = ActorState::transit(0, 1, Pos::new(1.5, 0.0));
        let pacman = ActorState::transit(1, 0, Pos::new(0.5, 0.0));
        let route = pf.route(&mut g, &ghost, &pacman).unwrap().unwrap();
        assert_eq!(route.len(), 2);
        assert!((route.cost - 1.0).abs() < 1e-6);
        assert_eq!(g.nodes(), &before[..]);
        assert_eq!(g.live_splices(), 0);
    }

    #[test]
    fn positions_on_a_node_snap_to_it() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let mut query = Query::new(&mut g);
        let just_left = ActorState::transit(0, 1, Pos::new(0.0, 0.0));
        let arriving = ActorState::transit(0, 1, Pos::new(2.0, 0.0));
        assert_eq!(query.resolve(&just_left), Ok(Endpoint::Node(NodeId(0))));
        assert_eq!(query.resolve(&arriving), Ok(Endpoint::Node(NodeId(1))));
        assert!(query.splices().is_empty());
    }

    #[test]
    fn query_drop_releases() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let before = g.nodes().to_vec();
        {
            let mut query = Query::new(&mut g);
            query
                .resolve(&ActorState::transit(1, 2, Pos::new(2.2, 0.0)))
                .unwrap();
            query
                .resolve(&ActorState::transit(0, 1, Pos::new(0.7, 0.0)))
                .unwrap();
            assert_eq!(query.graph().live_splices(), 2);
        }
        assert_eq!(g.live_splices(), 0);
        assert_eq!(g.nodes(), &before[..]);
    }

    #[test]
    fn explicit_release_all() {
        let mut g = BoardGraph::build(&level()).unwrap();
        let mut query = Query::new(&mut g);
        query
            .resolve(&ActorState::transit(1, 0, Pos::new(1.0, 0.0)))
            .unwrap();
        assert_eq!(query.release_all(), 1);
        assert_eq!(query.release_all(), 0);
        assert_eq!(query.graph().live_splices(), 0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn actor_state_round_trips() {
        let actor = ActorState::transit(3, 4, Pos::new(2.5, 4.0));
        let json = serde_json::to_string(&actor).unwrap();
        let back: ActorState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, actor);

        let parked: ActorState = serde_json::from_str(r#"{"Stationary":{"node":7}}"#).unwrap();
        assert_eq!(parked, ActorState::at(7));
    }
}
