//! Node-crate error type, covering spec.md §7's client-surfaced kinds.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("no available nodes")]
    NoAvailableNodes,

    #[error("route failure: {0}")]
    RouteFailure(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<corelib::Error> for NodeError {
    fn from(e: corelib::Error) -> Self {
        match e {
            corelib::Error::NoAvailableNodes => NodeError::NoAvailableNodes,
            corelib::Error::RouteFailure(m) => NodeError::RouteFailure(m),
            other => NodeError::Internal(other.to_string()),
        }
    }
}

impl From<rpc::RpcError> for NodeError {
    fn from(e: rpc::RpcError) -> Self {
        NodeError::RouteFailure(e.to_string())
    }
}
