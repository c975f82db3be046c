//! Node server bootstrap: binds the RPC listener over a `NodeServiceImpl`.
//!
//! Grounded in `server.py::serve` (original_source) for the bind-and-run
//! shape (`grpc.server(...).add_insecure_port(...); server.start()` becomes
//! `rpc::serve`), generalized from a single `KeyValueStoreServicer` to the
//! full client + inter-node surface spec.md §4.5 names.

use std::sync::Arc;

use corelib::membership::SharedMembership;
use corelib::node::NodeId;

use crate::context::NodeContext;
use crate::error::NodeError;
use crate::service::NodeServiceImpl;

pub struct NodeServer {
    ctx: Arc<NodeContext>,
}

impl NodeServer {
    pub fn new(id: NodeId, membership: SharedMembership) -> Self {
        Self {
            ctx: NodeContext::new(id, membership),
        }
    }

    pub fn context(&self) -> Arc<NodeContext> {
        self.ctx.clone()
    }

    /// Binds `addr` and serves until the process is stopped. Never returns
    /// on success; propagates bind failures as `NodeError::Internal`.
    pub async fn run(&self, addr: &str) -> Result<(), NodeError> {
        let service = Arc::new(NodeServiceImpl::new(self.ctx.clone()));
        rpc::serve(addr, service)
            .await
            .map_err(|e| NodeError::Internal(e.to_string()))
    }
}
