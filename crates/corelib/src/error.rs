//! Error types for the core library.
//!
//! The replication coordinator's partial-failure case is deliberately not a
//! variant here: a replica that fails to ack lowers an ack count, it never
//! turns a client PUT/DELETE into an `Err`.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The ring has no nodes, or owner lookup otherwise came up empty.
    #[error("no available nodes")]
    NoAvailableNodes,

    /// Cluster configuration document is missing or malformed.
    #[error("invalid cluster config: {0}")]
    Config(String),

    /// Node id referenced an entry that does not exist in the registry.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Transport error while forwarding a request to the owner of a key.
    #[error("route failure: {0}")]
    RouteFailure(String),

    /// Catch-all for conditions that should not happen in correct code.
    #[error("internal error: {0}")]
    Internal(String),
}
