//! Node abstractions for the consistent hash ring.
//!
//! Nodes represent logical participants in the cluster. They are identified
//! by a stable string `node_id`, matching the cluster configuration document
//! and the wire contracts (both key nodes by string id, not a synthetic
//! numeric handle).

use std::fmt;
use std::sync::Arc;

/// Stable identifier for a node in the cluster.
///
/// Newtype over `Arc<str>` so clones are cheap (one refcount bump) while the
/// id still compares and hashes like a string.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(Arc<str>);

impl NodeId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Logical node descriptor: identity, network address, and reserved fields.
///
/// Equality and hashing are by `id` only; `Node` itself does not carry a
/// mutable liveness flag — that lives in the membership registry's liveness
/// table so `Node` stays a cheap, immutable value (see
/// `crate::membership::MembershipRegistry`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub host: String,
    pub port: u16,
    /// Reserved for the external storage implementation; the core never
    /// reads these.
    pub redis_host: String,
    pub redis_port: u16,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            id: id.into(),
            redis_host: host.clone(),
            redis_port: 6379,
            host,
            port,
        }
    }

    pub fn with_redis(mut self, redis_host: impl Into<String>, redis_port: u16) -> Self {
        self.redis_host = redis_host.into();
        self.redis_port = redis_port;
        self
    }

    /// `host:port` address used for RPC connections.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({}, {})", self.id, self.address())
    }
}
