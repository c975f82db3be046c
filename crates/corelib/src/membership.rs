//! Membership registry: node descriptors, liveness, and the one hash ring
//! they share.
//!
//! Grounded in `membership_manager.py::MembershipManager` (original_source):
//! `load_config`'s field defaults and error handling, `get_owner_node`/
//! `get_replica_nodes`/`get_all_replicas`, `mark_node_alive`/`mark_node_dead`,
//! and dynamic `add_node`/`remove_node` all have a direct counterpart here.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::ring::{HashRing, DEFAULT_VIRTUAL_NODES};

/// Cluster configuration document, spec.md §6.
#[derive(Debug, Deserialize)]
pub struct ClusterConfig {
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub replication: ReplicationConfig,
    #[serde(default)]
    pub consistent_hashing: ConsistentHashingConfig,
}

#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    pub host: String,
    pub port: u16,
    pub redis_host: Option<String>,
    pub redis_port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct ReplicationConfig {
    #[serde(default = "default_replication_factor")]
    pub replication_factor: usize,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            replication_factor: default_replication_factor(),
        }
    }
}

fn default_replication_factor() -> usize {
    2
}

#[derive(Debug, Deserialize)]
pub struct ConsistentHashingConfig {
    #[serde(default = "default_virtual_nodes")]
    pub virtual_nodes: usize,
}

impl Default for ConsistentHashingConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: default_virtual_nodes(),
        }
    }
}

fn default_virtual_nodes() -> usize {
    DEFAULT_VIRTUAL_NODES
}

impl ClusterConfig {
    /// Parses a cluster configuration document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Loads a cluster configuration document from a file path.
    ///
    /// Mirrors `load_config`'s `FileNotFoundError`/`JSONDecodeError`
    /// handling: both surface as `Error::Config`, fatal at startup.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_json(&text)
    }
}

/// Per-node liveness flag, mutated by `mark_alive`/`mark_dead`.
///
/// Kept out of `Node` itself (see `crate::node`) so `Node` stays a cheap,
/// immutable value; the registry owns one liveness cell per descriptor.
#[derive(Debug)]
struct Liveness(AtomicBool);

impl Liveness {
    fn alive() -> Self {
        Self(AtomicBool::new(true))
    }

    fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, alive: bool) {
        self.0.store(alive, Ordering::Relaxed);
    }
}

struct Inner {
    descriptors: HashMap<NodeId, Node>,
    liveness: HashMap<NodeId, Liveness>,
    ring: HashRing,
}

/// Owns node descriptors and the one `HashRing` they populate.
///
/// Mutations (`add_node`/`remove_node`/`mark_alive`/`mark_dead`) are
/// serialized with respect to each other and to queries by a single
/// `parking_lot::RwLock` — spec.md §5's "reader-writer lock is sufficient"
/// shared-resource policy. The invariant "ids in ring == ids in registry"
/// holds because `add_node`/`remove_node` update both under one write guard.
pub struct MembershipRegistry {
    inner: RwLock<Inner>,
    replication_factor: usize,
}

impl MembershipRegistry {
    /// Loads a registry from a parsed cluster configuration document.
    /// Fails with `Error::Config` on malformed node entries.
    pub fn load(config: ClusterConfig) -> Result<Self> {
        if config.nodes.is_empty() {
            return Err(Error::Config("cluster config has no nodes".into()));
        }
        let virtual_nodes = config.consistent_hashing.virtual_nodes;
        let mut ring = HashRing::new(virtual_nodes);
        let mut descriptors = HashMap::with_capacity(config.nodes.len());
        let mut liveness = HashMap::with_capacity(config.nodes.len());

        for nc in config.nodes {
            let id = NodeId::new(nc.id);
            let redis_host = nc.redis_host.unwrap_or_else(|| nc.host.clone());
            let redis_port = nc.redis_port.unwrap_or(6379);
            let node = Node::new(id.clone(), nc.host, nc.port).with_redis(redis_host, redis_port);
            ring.add_node(id.clone());
            descriptors.insert(id.clone(), node);
            liveness.insert(id, Liveness::alive());
        }

        Ok(Self {
            inner: RwLock::new(Inner {
                descriptors,
                liveness,
                ring,
            }),
            replication_factor: config.replication.replication_factor,
        })
    }

    /// Loads a registry from a cluster configuration file.
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::load(ClusterConfig::from_path(path)?)
    }

    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    pub fn get_node_by_id(&self, id: &NodeId) -> Option<Node> {
        self.inner.read().descriptors.get(id).cloned()
    }

    pub fn get_all_nodes(&self) -> Vec<Node> {
        self.inner.read().descriptors.values().cloned().collect()
    }

    pub fn get_alive_nodes(&self) -> Vec<Node> {
        let inner = self.inner.read();
        inner
            .descriptors
            .values()
            .filter(|n| inner.liveness.get(&n.id).map(Liveness::get).unwrap_or(false))
            .cloned()
            .collect()
    }

    pub fn is_alive(&self, id: &NodeId) -> bool {
        self.inner
            .read()
            .liveness
            .get(id)
            .map(Liveness::get)
            .unwrap_or(false)
    }

    /// Primary owner of `key`. The ring is the naming authority and ignores
    /// liveness (spec.md §4.2) — callers consult `is_alive` separately
    /// before attempting I/O against the returned node.
    pub fn get_owner(&self, key: &str) -> Option<Node> {
        let inner = self.inner.read();
        let id = inner.ring.get_node(key)?;
        inner.descriptors.get(&id).cloned()
    }

    /// Ordered replica set for `key`: `[primary, r1, .., r_{R-1}]`, length
    /// `min(R, node_count)`.
    pub fn get_replica_set(&self, key: &str) -> Vec<Node> {
        let inner = self.inner.read();
        inner
            .ring
            .get_nodes(key, self.replication_factor)
            .into_iter()
            .filter_map(|id| inner.descriptors.get(&id).cloned())
            .collect()
    }

    /// Replica set minus the primary (length `R-1`, or empty if fewer than
    /// two nodes hold the key).
    pub fn get_replicas(&self, key: &str) -> Vec<Node> {
        let mut set = self.get_replica_set(key);
        if set.is_empty() {
            set
        } else {
            set.remove(0);
            set
        }
    }

    /// Adds a node dynamically: registers the descriptor and inserts its
    /// virtual positions into the ring atomically under one write lock.
    pub fn add_node(&self, node: Node) {
        let mut inner = self.inner.write();
        inner.ring.add_node(node.id.clone());
        inner.liveness.insert(node.id.clone(), Liveness::alive());
        inner.descriptors.insert(node.id.clone(), node);
    }

    /// Removes a node dynamically. No-op if the id is unknown. Per spec.md
    /// §9, existing keys already stored on `id` are not migrated.
    pub fn remove_node(&self, id: &NodeId) {
        let mut inner = self.inner.write();
        inner.ring.remove_node(id);
        inner.descriptors.remove(id);
        inner.liveness.remove(id);
    }

    pub fn mark_alive(&self, id: &NodeId) {
        if let Some(l) = self.inner.read().liveness.get(id) {
            l.set(true);
        }
    }

    pub fn mark_dead(&self, id: &NodeId) {
        if let Some(l) = self.inner.read().liveness.get(id) {
            l.set(false);
        }
    }

    /// `(node_count, token_count, virtual_nodes)` snapshot of the ring,
    /// for `crate::topology`'s ring description.
    pub fn ring_stats(&self) -> (usize, usize, usize) {
        let inner = self.inner.read();
        (
            inner.ring.node_count(),
            inner.ring.token_count(),
            inner.ring.virtual_nodes(),
        )
    }
}

/// Shared handle to a registry, the way `node`/`replication` crates consume
/// it. A strategy based on explicit dependency passing (an `Arc` handed to
/// constructors) is preferred over hidden global state, per spec.md §9.
pub type SharedMembership = Arc<MembershipRegistry>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ClusterConfig {
        ClusterConfig::from_json(
            r#"{
                "nodes": [
                    {"id": "node1", "host": "127.0.0.1", "port": 8001},
                    {"id": "node2", "host": "127.0.0.1", "port": 8002},
                    {"id": "node3", "host": "127.0.0.1", "port": 8003}
                ],
                "replication": {"replication_factor": 2},
                "consistent_hashing": {"virtual_nodes": 150}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn load_applies_defaults_when_sections_absent() {
        let config = ClusterConfig::from_json(
            r#"{"nodes": [{"id": "node1", "host": "h", "port": 1}]}"#,
        )
        .unwrap();
        let registry = MembershipRegistry::load(config).unwrap();
        assert_eq!(registry.replication_factor(), 2);
    }

    #[test]
    fn load_rejects_empty_node_list() {
        let config = ClusterConfig::from_json(r#"{"nodes": []}"#).unwrap();
        assert!(matches!(
            MembershipRegistry::load(config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn load_rejects_malformed_json() {
        assert!(matches!(
            ClusterConfig::from_json("not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn replica_set_has_primary_first() {
        let registry = MembershipRegistry::load(sample_config()).unwrap();
        let set = registry.get_replica_set("user:alice");
        assert_eq!(set.len(), 2);
        let owner = registry.get_owner("user:alice").unwrap();
        assert_eq!(set[0].id, owner.id);

        let replicas = registry.get_replicas("user:alice");
        assert_eq!(replicas.len(), 1);
        assert_eq!(replicas[0].id, set[1].id);
    }

    #[test]
    fn add_node_keeps_ring_and_registry_in_sync() {
        let registry = MembershipRegistry::load(sample_config()).unwrap();
        registry.add_node(Node::new("node4", "127.0.0.1", 8004));
        assert_eq!(registry.get_all_nodes().len(), 4);
        assert!(registry.get_node_by_id(&NodeId::new("node4")).is_some());
    }

    #[test]
    fn remove_node_excludes_it_from_future_ownership() {
        let registry = MembershipRegistry::load(sample_config()).unwrap();
        registry.remove_node(&NodeId::new("node2"));
        assert_eq!(registry.get_all_nodes().len(), 2);
        for i in 0..200 {
            let key = format!("key_{i}");
            if let Some(owner) = registry.get_owner(&key) {
                assert_ne!(owner.id, NodeId::new("node2"));
            }
        }
    }

    #[test]
    fn mark_dead_excludes_from_alive_nodes_but_not_ring() {
        let registry = MembershipRegistry::load(sample_config()).unwrap();
        registry.mark_dead(&NodeId::new("node2"));
        assert_eq!(registry.get_alive_nodes().len(), 2);
        assert!(!registry.is_alive(&NodeId::new("node2")));
        // Ring ownership is unaffected by liveness (spec.md §4.2, §9).
        assert_eq!(registry.get_all_nodes().len(), 3);
    }
}
