//! Consistent hash ring: maps keys to an ordered sequence of node ids.
//!
//! Grounded in the teacher's `ring`/`token` split, narrowed to the one token
//! type this design uses (`Md5Token`) and backed by a `BTreeMap` instead of
//! a sorted `Vec` rebuilt on every mutation — `BTreeMap::range` gives the
//! same "smallest position strictly greater than the hash" lookup as the
//! Python reference's `bisect.bisect_right` over `sorted_keys`, without a
//! full re-sort on every `add_node`/`remove_node`.

use std::collections::BTreeMap;

use crate::node::NodeId;
use crate::token::Md5Token;

/// Default virtual nodes per physical node, matching the reference
/// `ConsistentHash(virtual_nodes=150)`.
pub const DEFAULT_VIRTUAL_NODES: usize = 150;

/// The consistent hash ring.
///
/// Pure function of `(nodes, virtual_nodes, key)`: two rings built by
/// replaying the same `add_node` calls in the same order, with the same
/// `virtual_nodes`, produce identical `get_node`/`get_nodes` results on any
/// process — the ring never consults wall-clock time or randomness.
#[derive(Debug, Clone)]
pub struct HashRing {
    virtual_nodes: usize,
    /// Ring position -> owning physical node. A `BTreeMap` keeps this
    /// sorted for free, which is the "sorted-positions index" spec.md §3
    /// requires to be kept consistent with the mapping after every
    /// add/remove.
    positions: BTreeMap<Md5Token, NodeId>,
    /// Physical nodes currently on the ring, for `node_count`/`get_nodes`'s
    /// `min(count, |nodes|)` bound.
    nodes: std::collections::HashSet<NodeId>,
}

impl HashRing {
    pub fn new(virtual_nodes: usize) -> Self {
        Self {
            virtual_nodes,
            positions: BTreeMap::new(),
            nodes: std::collections::HashSet::new(),
        }
    }

    pub fn virtual_nodes(&self) -> usize {
        self.virtual_nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn token_count(&self) -> usize {
        self.positions.len()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Inserts `virtual_nodes` virtual positions for `id`. Collisions
    /// between identical positions (astronomically unlikely for distinct
    /// ids) are resolved last-write-wins, since `BTreeMap::insert`
    /// overwrites.
    pub fn add_node(&mut self, id: NodeId) {
        for i in 0..self.virtual_nodes {
            let token = Md5Token::from_key(&format!("{id}:{i}"));
            self.positions.insert(token, id.clone());
        }
        self.nodes.insert(id);
    }

    /// Removes every position mapping to `id`. No-op if `id` is absent.
    pub fn remove_node(&mut self, id: &NodeId) {
        if !self.nodes.remove(id) {
            return;
        }
        self.positions.retain(|_, owner| owner != id);
    }

    /// Returns the primary owner of `key`, or `None` if the ring is empty.
    ///
    /// Finds the smallest position strictly greater than `hash(key)`,
    /// wrapping to the first position if none is greater — the "upper
    /// bound" tie-break spec.md §4.1 mandates (a position exactly equal to
    /// the key's hash belongs to the *next* position, not the one at that
    /// hash).
    pub fn get_node(&self, key: &str) -> Option<NodeId> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = Md5Token::from_key(key);
        self.successor(hash).map(|(_, id)| id.clone())
    }

    /// Returns up to `count` distinct physical node ids, walking the ring
    /// clockwise from the same starting position `get_node` would use.
    /// Exactly `min(count, node_count())` entries are returned.
    pub fn get_nodes(&self, key: &str, count: usize) -> Vec<NodeId> {
        if self.positions.is_empty() || count == 0 {
            return Vec::new();
        }
        let target = count.min(self.nodes.len());
        let hash = Md5Token::from_key(key);

        let mut result = Vec::with_capacity(target);
        let mut seen = std::collections::HashSet::with_capacity(target);

        // Walk from the successor of `hash` (same tie-break as `get_node`),
        // wrapping once, until `target` distinct physical nodes are
        // collected.
        let start = self
            .positions
            .range((std::ops::Bound::Excluded(hash), std::ops::Bound::Unbounded))
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(t, _)| *t);

        let Some(start) = start else {
            return Vec::new();
        };

        for (_, id) in self.positions.range(start..).chain(self.positions.range(..start)) {
            if seen.insert(id.clone()) {
                result.push(id.clone());
                if result.len() == target {
                    break;
                }
            }
        }
        result
    }

    /// All `(position, node_id)` pairs currently on the ring, in ring order.
    /// Inspection-only; used by `crate::topology` for ownership reporting.
    pub fn positions(&self) -> impl Iterator<Item = (Md5Token, &NodeId)> {
        self.positions.iter().map(|(t, id)| (*t, id))
    }

    fn successor(&self, hash: Md5Token) -> Option<(Md5Token, &NodeId)> {
        self.positions
            .range((std::ops::Bound::Excluded(hash), std::ops::Bound::Unbounded))
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(t, id)| (*t, id))
    }
}
