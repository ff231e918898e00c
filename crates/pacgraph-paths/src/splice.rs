//! Reversible edge subdivision.
//!
//! An actor caught between two nodes is represented by a temporary middle
//! node spliced into the edge it is travelling on. The edge entries of both
//! sides are overwritten in place, so releasing the splice puts every
//! adjacency list back exactly as it was, order included.

use std::fmt;

use pacgraph_core::Pos;

use crate::error::QueryError;
use crate::graph::{BoardGraph, Endpoint, NodeIx};

/// Handle of one splice. Stays valid until the splice is released; a stale
/// handle never matches a later splice that reuses the same slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpliceId {
    slot: u32,
    generation: u32,
}

impl fmt::Display for SpliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "middle[{}.{}]", self.slot, self.generation)
    }
}

/// A live middle node.
///
/// `front` and `back` are the nodes currently on either side of it. They
/// change when another splice lands on one of its two half-edges or when a
/// neighboring middle is released first.
#[derive(Clone, Debug)]
pub(crate) struct MiddleNode {
    pub(crate) pos: Pos,
    pub(crate) front: NodeIx,
    pub(crate) back: NodeIx,
    pub(crate) neighbors: Vec<NodeIx>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct MiddleSlot {
    pub(crate) generation: u32,
    pub(crate) node: Option<MiddleNode>,
}

impl BoardGraph {
    /// Subdivide the edge `back -> front` with a middle node at `pos`.
    ///
    /// The actor is travelling from `back` toward `front`. At least one
    /// direction of the edge must currently exist; each existing direction
    /// is rerouted through the middle node. The middle node links to
    /// `front` if `back -> front` existed and to `back` if `front -> back`
    /// existed. On error the graph is left untouched.
    pub fn splice(
        &mut self,
        front: Endpoint,
        back: Endpoint,
        pos: Pos,
    ) -> Result<SpliceId, QueryError> {
        let f = self
            .resolve(front)
            .ok_or(QueryError::UnresolvedEndpoint(front))?;
        let b = self
            .resolve(back)
            .ok_or(QueryError::UnresolvedEndpoint(back))?;

        let fb = self.neighbors_of(f).iter().position(|&n| n == b);
        let bf = self.neighbors_of(b).iter().position(|&n| n == f);
        if f == b || (fb.is_none() && bf.is_none()) {
            log::warn!("rejected splice {back} -> {front}: nodes are not adjacent");
            return Err(QueryError::InvalidSplice { front, back });
        }
        let (front, back) = (f, b);

        let slot = match self.middles.iter().position(|s| s.node.is_none()) {
            Some(slot) => slot,
            None => {
                self.middles.push(MiddleSlot::default());
                self.middles.len() - 1
            }
        };
        let mid = NodeIx((self.nodes.len() + slot) as u32);

        let mut neighbors = Vec::with_capacity(2);
        if bf.is_some() {
            neighbors.push(front);
        }
        if fb.is_some() {
            neighbors.push(back);
        }

        if let (Some(i), Some(list)) = (fb, self.neighbors_mut(front)) {
            list[i] = mid;
        }
        if let (Some(j), Some(list)) = (bf, self.neighbors_mut(back)) {
            list[j] = mid;
        }
        self.retarget_side(front, back, mid);
        self.retarget_side(back, front, mid);

        let entry = &mut self.middles[slot];
        entry.node = Some(MiddleNode {
            pos,
            front,
            back,
            neighbors,
        });
        let id = SpliceId {
            slot: slot as u32,
            generation: entry.generation,
        };
        log::debug!("spliced {id} at {pos}");
        Ok(id)
    }

    /// Undo a splice, reconnecting the nodes on either side of its middle.
    ///
    /// Returns `false` if the handle was already released, so releasing
    /// twice is harmless. Releases may happen in any order.
    pub fn release(&mut self, id: SpliceId) -> bool {
        let Some(slot) = self.middles.get_mut(id.slot as usize) else {
            return false;
        };
        if slot.generation != id.generation {
            return false;
        }
        let Some(mid) = slot.node.take() else {
            return false;
        };
        slot.generation = slot.generation.wrapping_add(1);

        let ix = NodeIx((self.nodes.len() + id.slot as usize) as u32);
        self.replace_link(mid.front, ix, mid.back);
        self.replace_link(mid.back, ix, mid.front);
        self.retarget_side(mid.front, ix, mid.back);
        self.retarget_side(mid.back, ix, mid.front);
        log::debug!("released {id}");
        true
    }

    /// Number of splices currently in the graph.
    pub fn live_splices(&self) -> usize {
        self.middles.iter().filter(|s| s.node.is_some()).count()
    }

    /// Handle of a live splice's middle node.
    pub fn middle_ix(&self, id: SpliceId) -> Option<NodeIx> {
        let slot = self.middles.get(id.slot as usize)?;
        if slot.generation != id.generation || slot.node.is_none() {
            return None;
        }
        Some(NodeIx((self.nodes.len() + id.slot as usize) as u32))
    }

    /// Position of a live splice's middle node.
    pub fn middle_pos(&self, id: SpliceId) -> Option<Pos> {
        self.middle_ix(id).and_then(|ix| self.pos_of(ix))
    }

    pub(crate) fn middle(&self, ix: NodeIx) -> Option<&MiddleNode> {
        let slot = ix.index().checked_sub(self.nodes.len())?;
        self.middles.get(slot)?.node.as_ref()
    }

    pub(crate) fn splice_id(&self, ix: NodeIx) -> Option<SpliceId> {
        let slot = ix.index().checked_sub(self.nodes.len())?;
        let entry = self.middles.get(slot)?;
        entry.node.as_ref()?;
        Some(SpliceId {
            slot: slot as u32,
            generation: entry.generation,
        })
    }

    /// The chain of nodes joining `from` to `to` through live middles, both
    /// ends included, if the original edge between them is currently split.
    pub(crate) fn middle_chain(&self, from: NodeIx, to: NodeIx) -> Option<Vec<NodeIx>> {
        let base = self.nodes.len();
        for (slot, entry) in self.middles.iter().enumerate() {
            let Some(m) = &entry.node else { continue };
            if m.front != from && m.back != from {
                continue;
            }
            let mut chain = vec![from];
            let mut prev = from;
            let mut cur = NodeIx((base + slot) as u32);
            while let Some(cm) = self.middle(cur) {
                chain.push(cur);
                let next = if cm.back == prev { cm.front } else { cm.back };
                if next == to {
                    chain.push(to);
                    return Some(chain);
                }
                prev = cur;
                cur = next;
            }
        }
        None
    }

    fn replace_link(&mut self, on: NodeIx, old: NodeIx, new: NodeIx) {
        if let Some(list) = self.neighbors_mut(on) {
            if let Some(i) = list.iter().position(|&n| n == old) {
                list[i] = new;
            }
        }
    }

    /// If `on` is a middle node whose side was `old`, make that side `new`.
    fn retarget_side(&mut self, on: NodeIx, old: NodeIx, new: NodeIx) {
        let Some(slot) = on.index().checked_sub(self.nodes.len()) else {
            return;
        };
        if let Some(m) = self.middles.get_mut(slot).and_then(|s| s.node.as_mut()) {
            if m.front == old {
                m.front = new;
            } else if m.back == old {
                m.back = new;
            }
        }
    }
}
