use std::collections::HashMap;
use std::fmt;

use pacgraph_core::{LevelNodes, NodeId, NodeKind, Pos};

use crate::error::BuildError;
use crate::splice::{MiddleSlot, SpliceId};

/// Dense handle of a node inside one [`BoardGraph`].
///
/// Permanent nodes occupy `0..graph.len()` in build order; splice middle
/// nodes occupy the slots after them. Handles are only meaningful for the
/// graph that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIx(pub(crate) u32);

impl NodeIx {
    /// Position of this node in the graph's slot table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A query endpoint: either a permanent board node or the middle node of a
/// live splice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Node(NodeId),
    Middle(SpliceId),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "{id}"),
            Self::Middle(s) => write!(f, "{s}"),
        }
    }
}

impl From<NodeId> for Endpoint {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

/// A walkable node of the board graph.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardNode {
    id: NodeId,
    pos: Pos,
    kind: NodeKind,
    pub(crate) neighbors: Vec<NodeIx>,
}

impl BoardNode {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Outgoing adjacency, in declaration order.
    #[inline]
    pub fn neighbors(&self) -> &[NodeIx] {
        &self.neighbors
    }
}

/// Which node categories become part of the walkable graph.
///
/// Home nodes are always left out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildOptions {
    pub include_ghost_house: bool,
    pub include_portals: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include_ghost_house: true,
            include_portals: true,
        }
    }
}

impl BuildOptions {
    /// Whether a node of `kind` is admitted into the graph.
    pub fn admits(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Regular => true,
            NodeKind::GhostHouse => self.include_ghost_house,
            NodeKind::Portal => self.include_portals,
            NodeKind::Home => false,
        }
    }
}

/// The walkable graph of one level.
///
/// Topology is fixed after [`build`](Self::build); the only mutation is the
/// temporary insertion of splice middle nodes (see [`splice`](Self::splice)),
/// each of which is undone by its release.
#[derive(Clone, Debug)]
pub struct BoardGraph {
    pub(crate) nodes: Vec<BoardNode>,
    lookup: HashMap<NodeId, NodeIx>,
    pub(crate) middles: Vec<MiddleSlot>,
}

impl BoardGraph {
    /// Build the graph with the default [`BuildOptions`].
    pub fn build(level: &LevelNodes) -> Result<Self, BuildError> {
        Self::build_with(level, BuildOptions::default())
    }

    /// Build the graph from a level's raw node list.
    ///
    /// The first pass creates one node per admitted raw node, the second
    /// resolves neighbor declarations. A neighbor id that no raw node has
    /// fails the build; a neighbor whose category is not admitted is left
    /// out of the adjacency.
    pub fn build_with(level: &LevelNodes, opts: BuildOptions) -> Result<Self, BuildError> {
        let mut declared: HashMap<NodeId, NodeKind> = HashMap::with_capacity(level.len());
        for raw in &level.nodes {
            if declared.insert(raw.id, raw.kind).is_some() {
                return Err(BuildError::DuplicateNode(raw.id));
            }
        }

        let mut nodes = Vec::with_capacity(level.len());
        let mut lookup = HashMap::with_capacity(level.len());
        for raw in level.nodes.iter().filter(|r| opts.admits(r.kind)) {
            lookup.insert(raw.id, NodeIx(nodes.len() as u32));
            nodes.push(BoardNode {
                id: raw.id,
                pos: raw.pos,
                kind: raw.kind,
                neighbors: Vec::with_capacity(raw.neighbors.len()),
            });
        }

        let mut filtered = 0usize;
        for raw in level.nodes.iter().filter(|r| opts.admits(r.kind)) {
            let ix = lookup[&raw.id];
            for &nid in &raw.neighbors {
                if nid == raw.id {
                    return Err(BuildError::SelfLoop(raw.id));
                }
                match lookup.get(&nid) {
                    Some(&n) => {
                        let list = &mut nodes[ix.index()].neighbors;
                        if !list.contains(&n) {
                            list.push(n);
                        }
                    }
                    None if declared.contains_key(&nid) => filtered += 1,
                    None => {
                        return Err(BuildError::UnknownNeighbor {
                            node: raw.id,
                            neighbor: nid,
                        });
                    }
                }
            }
        }

        log::debug!(
            "board graph built: {} of {} nodes walkable, {} neighbor references filtered",
            nodes.len(),
            level.len(),
            filtered
        );

        Ok(Self {
            nodes,
            lookup,
            middles: Vec::new(),
        })
    }

    /// All permanent nodes, in build order.
    #[inline]
    pub fn nodes(&self) -> &[BoardNode] {
        &self.nodes
    }

    /// Number of permanent nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a permanent node by id.
    pub fn node(&self, id: NodeId) -> Option<&BoardNode> {
        self.lookup.get(&id).map(|ix| &self.nodes[ix.index()])
    }

    /// Handle of a permanent node.
    #[inline]
    pub fn ix(&self, id: NodeId) -> Option<NodeIx> {
        self.lookup.get(&id).copied()
    }

    /// Size of the slot table: permanent nodes plus every middle slot ever
    /// allocated (live or not).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.nodes.len() + self.middles.len()
    }

    /// Resolve an endpoint to a live node handle.
    pub fn resolve(&self, endpoint: Endpoint) -> Option<NodeIx> {
        match endpoint {
            Endpoint::Node(id) => self.ix(id),
            Endpoint::Middle(s) => self.middle_ix(s),
        }
    }

    /// The endpoint a live handle stands for.
    pub fn endpoint(&self, ix: NodeIx) -> Option<Endpoint> {
        if let Some(n) = self.nodes.get(ix.index()) {
            return Some(Endpoint::Node(n.id));
        }
        self.splice_id(ix).map(Endpoint::Middle)
    }

    /// Board id of a handle; `None` for middle nodes.
    #[inline]
    pub fn id_of(&self, ix: NodeIx) -> Option<NodeId> {
        self.nodes.get(ix.index()).map(|n| n.id)
    }

    /// Position of a live node.
    pub fn pos_of(&self, ix: NodeIx) -> Option<Pos> {
        match self.nodes.get(ix.index()) {
            Some(n) => Some(n.pos),
            None => self.middle(ix).map(|m| m.pos),
        }
    }

    /// Outgoing adjacency of a live node. Empty for dead handles.
    pub fn neighbors_of(&self, ix: NodeIx) -> &[NodeIx] {
        match self.nodes.get(ix.index()) {
            Some(n) => &n.neighbors,
            None => match self.middle(ix) {
                Some(m) => &m.neighbors,
                None => &[],
            },
        }
    }

    pub(crate) fn neighbors_mut(&mut self, ix: NodeIx) -> Option<&mut Vec<NodeIx>> {
        let base = self.nodes.len();
        if ix.index() < base {
            return Some(&mut self.nodes[ix.index()].neighbors);
        }
        self.middles
            .get_mut(ix.index() - base)
            .and_then(|s| s.node.as_mut())
            .map(|m| &mut m.neighbors)
    }

    /// Whether `from` lists `to` as a neighbor.
    #[inline]
    pub fn links(&self, from: NodeIx, to: NodeIx) -> bool {
        self.neighbors_of(from).contains(&to)
    }

    /// Ids of a permanent node's permanent neighbors, in adjacency order.
    pub fn neighbor_ids(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let node = self.node(id)?;
        Some(node.neighbors.iter().filter_map(|&n| self.id_of(n)).collect())
    }

    /// The permanent node closest to `pos` among those accepted by `keep`.
    ///
    /// Ties go to the node built first.
    pub fn nearest(&self, pos: Pos, keep: impl Fn(&BoardNode) -> bool) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for n in self.nodes.iter().filter(|n| keep(n)) {
            let d = n.pos.distance(pos);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((n.id, d));
            }
        }
        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> LevelNodes {
        let mut level = LevelNodes::new();
        let a = level.add(10, Pos::new(0.0, 0.0), NodeKind::Regular);
        let b = level.add(11, Pos::new(1.0, 0.0), NodeKind::Regular);
        let c = level.add(12, Pos::new(2.0, 0.0), NodeKind::GhostHouse);
        let home = level.add(13, Pos::new(2.0, 1.0), NodeKind::Home);
        level.link(a, b);
        level.link(b, c);
        level.link(c, home);
        level
    }

    #[test]
    fn build_keeps_ids_and_order() {
        let g = BoardGraph::build(&corridor()).unwrap();
        let ids: Vec<_> = g.nodes().iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![NodeId(10), NodeId(11), NodeId(12)]);
        assert_eq!(g.node(NodeId(11)).unwrap().pos(), Pos::new(1.0, 0.0));
        assert_eq!(
            g.neighbor_ids(NodeId(11)).unwrap(),
            vec![NodeId(10), NodeId(12)]
        );
    }

    #[test]
    fn home_nodes_never_in_graph() {
        let g = BoardGraph::build(&corridor()).unwrap();
        assert!(g.node(NodeId(13)).is_none());
        assert!(g.ix(NodeId(13)).is_none());
        assert!(g.nodes().iter().all(|n| n.kind() != NodeKind::Home));
        // The ghost-house node's reference to home is filtered out.
        assert_eq!(g.neighbor_ids(NodeId(12)).unwrap(), vec![NodeId(11)]);
    }

    #[test]
    fn options_exclude_ghost_house() {
        let opts = BuildOptions {
            include_ghost_house: false,
            ..BuildOptions::default()
        };
        let g = BoardGraph::build_with(&corridor(), opts).unwrap();
        assert_eq!(g.len(), 2);
        assert!(g.node(NodeId(12)).is_none());
        assert_eq!(g.neighbor_ids(NodeId(11)).unwrap(), vec![NodeId(10)]);
    }

    #[test]
    fn unknown_neighbor_fails() {
        let mut level = corridor();
        level.link_one_way(NodeId(10), NodeId(99));
        let err = BoardGraph::build(&level).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownNeighbor {
                node: NodeId(10),
                neighbor: NodeId(99)
            }
        );
    }

    #[test]
    fn duplicate_and_self_loop_fail() {
        let mut level = corridor();
        level.add(10, Pos::new(9.0, 9.0), NodeKind::Regular);
        assert_eq!(
            BoardGraph::build(&level).unwrap_err(),
            BuildError::DuplicateNode(NodeId(10))
        );

        let mut level = corridor();
        level.link_one_way(NodeId(11), NodeId(11));
        assert_eq!(
            BoardGraph::build(&level).unwrap_err(),
            BuildError::SelfLoop(NodeId(11))
        );
    }

    #[test]
    fn repeated_declarations_collapse() {
        let mut level = corridor();
        level.link_one_way(NodeId(10), NodeId(11));
        let g = BoardGraph::build(&level).unwrap();
        assert_eq!(g.neighbor_ids(NodeId(10)).unwrap(), vec![NodeId(11)]);
    }

    #[test]
    fn nearest_node() {
        let g = BoardGraph::build(&corridor()).unwrap();
        assert_eq!(g.nearest(Pos::new(1.2, 3.0), |_| true), Some(NodeId(11)));
        assert_eq!(
            g.nearest(Pos::new(2.0, 0.0), |n| n.kind() == NodeKind::Regular),
            Some(NodeId(11))
        );
        // Exactly between 10 and 11: the earlier node wins.
        assert_eq!(g.nearest(Pos::new(0.5, 0.0), |_| true), Some(NodeId(10)));
        assert_eq!(g.nearest(Pos::ZERO, |_| false), None);
    }

    #[test]
    fn resolve_endpoints() {
        let g = BoardGraph::build(&corridor()).unwrap();
        let ix = g.resolve(Endpoint::Node(NodeId(12))).unwrap();
        assert_eq!(g.id_of(ix), Some(NodeId(12)));
        assert_eq!(g.endpoint(ix), Some(Endpoint::Node(NodeId(12))));
        assert!(g.resolve(Endpoint::Node(NodeId(13))).is_none());
        assert_eq!(g.slot_count(), 3);
    }
}
