//! Replica-selection strategy: pluggable seam over "which nodes hold this
//! key", kept as a trait because the teacher crate already frames replica
//! placement as swappable (`replication::strategy::ReplicationStrategy`)
//! even though this design ships exactly one implementation.

pub mod ring;

pub use ring::RingStrategy;

use corelib::membership::MembershipRegistry;
use corelib::node::Node;

/// Determines the ordered replica set for a key. `replicas_for_key` returns
/// `[primary, r1, .., r_{R-1}]`, primary first, as spec.md §3 defines a
/// replica set.
pub trait ReplicationStrategy: Send + Sync + 'static {
    fn replicas_for_key(&self, membership: &MembershipRegistry, key: &str) -> Vec<Node>;

    fn name(&self) -> &'static str;
}
