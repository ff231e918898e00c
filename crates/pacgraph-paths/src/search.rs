use crate::error::QueryError;
use crate::graph::{BoardGraph, Endpoint, NodeIx};
use crate::query::{ActorState, Query};
use crate::route::{Route, Waypoint};

/// Per-search decoration of one graph slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchNode {
    /// Best known cost from the search start.
    pub g: f32,
    /// Straight-line distance to the goal, set when the node is discovered
    /// or improved.
    pub h: f32,
    /// Predecessor on the best known path.
    pub parent: Option<NodeIx>,
    pub(crate) open: bool,
}

impl SearchNode {
    /// State of a node no search has touched yet.
    pub const RESET: Self = Self {
        g: f32::INFINITY,
        h: 0.0,
        parent: None,
        open: false,
    };

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::RESET;
    }

    #[inline]
    pub fn f(&self) -> f32 {
        self.g + self.h
    }

    /// Whether the node is in the open set.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self::RESET
    }
}

/// A* search over a [`BoardGraph`].
///
/// `PathFinder` owns the decoration table and open list so that repeated
/// queries reuse their allocations. It never stores anything in the graph,
/// and every slot of the table is reset before each search.
///
/// Edge cost and heuristic are both the straight-line distance between node
/// positions. The open set is a plain list scanned for the lowest `f`; on
/// ties the entry discovered first wins, which keeps routes through
/// symmetric layouts stable.
#[derive(Debug, Default)]
pub struct PathFinder {
    table: Vec<SearchNode>,
    open: Vec<NodeIx>,
    expanded: usize,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the decoration table to `graph` and reset every entry.
    pub fn reset(&mut self, graph: &BoardGraph) {
        self.table.resize(graph.slot_count(), SearchNode::RESET);
        for n in self.table.iter_mut() {
            n.reset();
        }
        self.open.clear();
    }

    /// Decoration left by the last search for `ix`.
    pub fn decoration(&self, ix: NodeIx) -> Option<&SearchNode> {
        self.table.get(ix.index())
    }

    /// Number of nodes expanded by the last search.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Shortest route between two endpoints of the graph as it is now
    /// (live splices included).
    ///
    /// Returns `Ok(None)` when no path exists. An endpoint that does not
    /// resolve is reported before any search work is done.
    pub fn find_path(
        &mut self,
        graph: &BoardGraph,
        start: Endpoint,
        end: Endpoint,
    ) -> Result<Option<Route>, QueryError> {
        let s = graph
            .resolve(start)
            .ok_or(QueryError::UnresolvedEndpoint(start))?;
        let e = graph
            .resolve(end)
            .ok_or(QueryError::UnresolvedEndpoint(end))?;
        let route = self.search(graph, s, e);
        match &route {
            Some(r) => log::debug!(
                "route {start} -> {end}: {} waypoints, cost {}",
                r.len(),
                r.cost
            ),
            None => log::debug!("route {start} -> {end}: no path"),
        }
        Ok(route)
    }

    /// Route from one actor to another (or to a node, via
    /// [`ActorState::Stationary`]).
    ///
    /// Actors in transit are spliced into the graph for the duration of the
    /// call; the splices are released before returning, whatever the
    /// outcome.
    pub fn route(
        &mut self,
        graph: &mut BoardGraph,
        from: &ActorState,
        to: &ActorState,
    ) -> Result<Option<Route>, QueryError> {
        let mut query = Query::new(graph);
        let start = query.resolve(from)?;
        let end = query.resolve(to)?;
        self.find_path(query.graph(), start, end)
    }

    fn search(&mut self, graph: &BoardGraph, start: NodeIx, goal: NodeIx) -> Option<Route> {
        self.reset(graph);
        self.expanded = 0;

        let goal_pos = graph.pos_of(goal)?;
        let start_pos = graph.pos_of(start)?;
        {
            let node = &mut self.table[start.index()];
            node.g = 0.0;
            node.h = start_pos.distance(goal_pos);
            node.open = true;
        }
        self.open.push(start);

        let found = 'search: loop {
            if self.open.is_empty() {
                break 'search false;
            }

            let mut best = 0;
            let mut best_f = f32::INFINITY;
            for (i, &ix) in self.open.iter().enumerate() {
                let f = self.table[ix.index()].f();
                if f < best_f {
                    best = i;
                    best_f = f;
                }
            }

            let current = self.open[best];
            if current == goal {
                break 'search true;
            }

            // Order-preserving removal keeps the tie-break stable.
            self.open.remove(best);
            self.table[current.index()].open = false;
            self.expanded += 1;

            let current_g = self.table[current.index()].g;
            let Some(current_pos) = graph.pos_of(current) else {
                continue;
            };

            for &n in graph.neighbors_of(current) {
                let Some(npos) = graph.pos_of(n) else {
                    continue;
                };
                let tentative_g = current_g + current_pos.distance(npos);

                let node = &mut self.table[n.index()];
                if tentative_g < node.g {
                    node.parent = Some(current);
                    node.g = tentative_g;
                    node.h = npos.distance(goal_pos);
                    if !node.open {
                        node.open = true;
                        self.open.push(n);
                    }
                }
            }
        };

        log::trace!("a* expanded {} nodes", self.expanded);

        if !found {
            return None;
        }

        let mut waypoints = Vec::new();
        let mut cur = Some(goal);
        while let Some(ix) = cur {
            let Some(pos) = graph.pos_of(ix) else { break };
            waypoints.push(Waypoint {
                pos,
                node: graph.id_of(ix),
            });
            cur = self.table[ix.index()].parent;
        }
        waypoints.reverse();

        Some(Route {
            waypoints,
            cost: self.table[goal.index()].g,
        })
    }
}
