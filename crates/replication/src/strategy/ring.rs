//! The one replica-selection strategy this design ships: delegate entirely
//! to the membership registry's hash ring (spec.md §3's replica-set
//! definition, `ring.get_nodes(k, R)`).

use corelib::membership::MembershipRegistry;
use corelib::node::Node;

use super::ReplicationStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct RingStrategy;

impl ReplicationStrategy for RingStrategy {
    fn replicas_for_key(&self, membership: &MembershipRegistry, key: &str) -> Vec<Node> {
        membership.get_replica_set(key)
    }

    fn name(&self) -> &'static str {
        "RingStrategy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::membership::ClusterConfig;

    #[test]
    fn replicas_for_key_matches_membership_replica_set() {
        let registry = MembershipRegistry::load(
            ClusterConfig::from_json(
                r#"{"nodes": [
                    {"id": "node1", "host": "h", "port": 1},
                    {"id": "node2", "host": "h", "port": 2}
                ]}"#,
            )
            .unwrap(),
        )
        .unwrap();
        let strategy = RingStrategy;
        let via_strategy = strategy.replicas_for_key(&registry, "k");
        let via_membership = registry.get_replica_set("k");
        assert_eq!(
            via_strategy.iter().map(|n| &n.id).collect::<Vec<_>>(),
            via_membership.iter().map(|n| &n.id).collect::<Vec<_>>()
        );
    }
}
