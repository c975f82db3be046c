//! Binds `rpc::NodeService` to this node's `Router` + context: the
//! concrete dispatch target the RPC server calls into.
//!
//! `Forward*` handlers are implemented directly here rather than through
//! `Router`, because they have a different contract from the client-facing
//! path they resemble: apply unconditionally to local storage, never
//! re-forward, never trigger replication (spec.md §4.4, §8 property 8).
//! There is exactly one `Replicate` handler, dispatching on `operation` —
//! spec.md §9 calls out a teacher-source bug where a second, shadowing
//! `Replicate` definition drops the dispatch; this design does not
//! reproduce it.

use std::sync::Arc;

use async_trait::async_trait;
use corelib::node::{Node, NodeId};
use rpc::message::{
    DeleteRequest, DeleteResponse, GetRequest, GetResponse, HeartbeatRequest, HeartbeatResponse,
    JoinClusterRequest, JoinClusterResponse, ListKeysRequest, ListKeysResponse, PutRequest,
    PutResponse, ReplicateRequest, ReplicateResponse, SnapshotEntry, SnapshotRequest,
    SnapshotResponse,
};
use rpc::NodeService;

use crate::context::NodeContext;
use crate::router::Router;

pub struct NodeServiceImpl {
    ctx: Arc<NodeContext>,
    router: Router,
}

impl NodeServiceImpl {
    pub fn new(ctx: Arc<NodeContext>) -> Self {
        let router = Router::new(ctx.clone());
        Self { ctx, router }
    }
}

#[async_trait]
impl NodeService for NodeServiceImpl {
    async fn put(&self, req: PutRequest) -> PutResponse {
        match self.router.put(req.key, req.value).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "put failed");
                PutResponse {
                    success: false,
                    node_id: self.ctx.id.to_string(),
                    replicas_count: 0,
                    message: Some(e.to_string()),
                }
            }
        }
    }

    async fn get(&self, req: GetRequest) -> GetResponse {
        match self.router.get(req.key).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "get failed");
                GetResponse {
                    found: false,
                    value: None,
                    node_id: self.ctx.id.to_string(),
                    timestamp: replication::now_timestamp(),
                }
            }
        }
    }

    async fn delete(&self, req: DeleteRequest) -> DeleteResponse {
        match self.router.delete(req.key).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "delete failed");
                DeleteResponse {
                    success: false,
                    replicas_count: 0,
                    message: Some(e.to_string()),
                }
            }
        }
    }

    async fn list_keys(&self, _req: ListKeysRequest) -> ListKeysResponse {
        self.router.list_keys()
    }

    async fn forward_put(&self, req: PutRequest) -> PutResponse {
        self.ctx.storage.put(req.key, req.value);
        PutResponse {
            success: true,
            node_id: self.ctx.id.to_string(),
            replicas_count: 0,
            message: None,
        }
    }

    async fn forward_get(&self, req: GetRequest) -> GetResponse {
        let (value, found) = self.ctx.storage.get(&req.key);
        GetResponse {
            found,
            value,
            node_id: self.ctx.id.to_string(),
            timestamp: replication::now_timestamp(),
        }
    }

    async fn forward_delete(&self, req: DeleteRequest) -> DeleteResponse {
        let deleted = self.ctx.storage.delete(&req.key);
        DeleteResponse {
            success: deleted,
            replicas_count: 0,
            message: None,
        }
    }

    async fn replicate(&self, req: ReplicateRequest) -> ReplicateResponse {
        let success = self.ctx.replication.apply(&req);
        ReplicateResponse {
            success,
            replica_node_id: self.ctx.id.to_string(),
            message: None,
        }
    }

    /// Answers with current liveness; runs no failure-detection loop
    /// itself (spec.md §1: detection *policy* is a named non-goal, the
    /// RPC shape is not).
    async fn heartbeat(&self, req: HeartbeatRequest) -> HeartbeatResponse {
        let is_alive = self.ctx.membership.is_alive(&NodeId::new(req.node_id.clone()));
        HeartbeatResponse {
            node_id: self.ctx.id.to_string(),
            timestamp: replication::now_timestamp(),
            is_alive,
        }
    }

    /// Enumerates local storage verbatim; performs no reconciliation
    /// (spec.md §1: recovery *policy* is a named non-goal).
    async fn get_snapshot(&self, _req: SnapshotRequest) -> SnapshotResponse {
        let data: Vec<SnapshotEntry> = self
            .ctx
            .storage
            .snapshot()
            .into_iter()
            .map(|(key, value)| SnapshotEntry { key, value })
            .collect();
        SnapshotResponse {
            success: true,
            provider_node_id: self.ctx.id.to_string(),
            total_keys: data.len(),
            snapshot_timestamp: replication::now_timestamp(),
            data,
        }
    }

    /// Adds the joining node to the registry and returns the current node
    /// list. Performs no key migration (spec.md §1 non-goal).
    async fn join_cluster(&self, req: JoinClusterRequest) -> JoinClusterResponse {
        self.ctx.membership.add_node(Node::new(
            NodeId::new(req.node_id),
            req.host,
            req.port,
        ));
        JoinClusterResponse {
            success: true,
            cluster_nodes: self
                .ctx
                .membership
                .get_all_nodes()
                .into_iter()
                .map(|n| n.id.to_string())
                .collect(),
        }
    }
}
