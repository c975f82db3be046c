//! Integration tests for the hash ring + membership registry, mirroring
//! spec.md §8's testable properties and end-to-end scenarios.

use corelib::membership::{ClusterConfig, MembershipRegistry};
use corelib::node::{Node, NodeId};
use corelib::ring::HashRing;

fn three_node_config() -> ClusterConfig {
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
fn empty_ring_lookup_is_none() {
    let ring = HashRing::new(150);
    assert_eq!(ring.get_node("key1"), None);
    assert!(ring.get_nodes("key1", 3).is_empty());
    assert_eq!(ring.node_count(), 0);
    assert_eq!(ring.token_count(), 0);
}

#[test]
fn add_remove_node_updates_counts() {
    let mut ring = HashRing::new(4);
    ring.add_node(NodeId::new("node1"));
    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.token_count(), 4);

    ring.add_node(NodeId::new("node2"));
    assert_eq!(ring.token_count(), 8);

    ring.remove_node(&NodeId::new("node1"));
    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.token_count(), 4);

    // Removing an unknown id is a no-op, not an error.
    ring.remove_node(&NodeId::new("does-not-exist"));
    assert_eq!(ring.node_count(), 1);
}

#[test]
fn single_node_owns_every_key() {
    let mut ring = HashRing::new(4);
    ring.add_node(NodeId::new("node1"));
    for key in ["key1", "key2", "key3", "very-long-key-name"] {
        assert_eq!(ring.get_node(key), Some(NodeId::new("node1")));
    }
}

// spec.md §8 S3: insert key_0..key_99 via node1, sums to 100, per-node
// counts each in [25, 40] at 3 nodes / V=150.
#[test]
fn s3_distribution_across_three_nodes() {
    let registry = MembershipRegistry::load(three_node_config()).unwrap();
    let mut per_node: std::collections::HashMap<NodeId, usize> = std::collections::HashMap::new();
    for i in 0..100 {
        let key = format!("key_{i}");
        let owner = registry.get_owner(&key).unwrap();
        *per_node.entry(owner.id).or_insert(0) += 1;
    }
    let total: usize = per_node.values().sum();
    assert_eq!(total, 100);
    for count in per_node.values() {
        assert!((25..=40).contains(count), "count {count} out of range");
    }
}

// spec.md §8 S6: add_node/remove_node dynamics.
#[test]
fn s6_add_and_remove_node() {
    let registry = MembershipRegistry::load(
        ClusterConfig::from_json(
            r#"{"nodes": [
                {"id": "node1", "host": "h", "port": 8001},
                {"id": "node2", "host": "h", "port": 8002}
            ]}"#,
        )
        .unwrap(),
    )
    .unwrap();
    let (_, token_count, v) = registry.ring_stats();
    assert_eq!(token_count, 2 * v);

    registry.add_node(Node::new("node3", "h", 8003));
    let (node_count, token_count, v) = registry.ring_stats();
    assert_eq!(node_count, 3);
    assert_eq!(token_count, 3 * v);

    registry.remove_node(&NodeId::new("node2"));
    for i in 0..500 {
        let key = format!("probe_{i}");
        if let Some(owner) = registry.get_owner(&key) {
            assert_ne!(owner.id, NodeId::new("node2"));
        }
    }
}

#[test]
fn get_nodes_count_never_exceeds_node_count() {
    let mut ring = HashRing::new(20);
    ring.add_node(NodeId::new("a"));
    ring.add_node(NodeId::new("b"));
    let picked = ring.get_nodes("some-key", 10);
    assert_eq!(picked.len(), 2);
}
