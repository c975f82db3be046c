//! RPC server: accepts connections, decodes one request, dispatches to a
//! `NodeService` implementation, encodes the response.
//!
//! Grounded in `harborgrid-justin-rusty-db/src/network/server.rs`'s
//! `Server::run`/`ConnectionHandler::handle` shape: a `TcpListener` accept
//! loop that spawns one task per connection onto the runtime's bounded
//! worker pool (spec.md §5's "bounded worker pool serving RPCs").

use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::{TcpListener, TcpStream};

use crate::codec::{read_frame, write_frame};
use crate::error::RpcError;
use crate::message::{
    DeleteRequest, DeleteResponse, GetRequest, GetResponse, HeartbeatRequest, HeartbeatResponse,
    JoinClusterRequest, JoinClusterResponse, ListKeysRequest, ListKeysResponse, PutRequest,
    PutResponse, ReplicateRequest, ReplicateResponse, Request, Response, SnapshotRequest,
    SnapshotResponse,
};

/// The node-wide RPC surface: client-facing operations plus the inter-node
/// operations spec.md §4.5 names. One implementation backs both logical
/// services since they are reachable on the same endpoint.
///
/// `Forward*` methods are distinct from their client-facing counterparts
/// because they must never trigger replication and never re-forward
/// (spec.md §4.4) — giving them their own trait methods makes that
/// distinction a compile-time fact instead of a runtime flag.
#[async_trait]
pub trait NodeService: Send + Sync + 'static {
    async fn put(&self, req: PutRequest) -> PutResponse;
    async fn get(&self, req: GetRequest) -> GetResponse;
    async fn delete(&self, req: DeleteRequest) -> DeleteResponse;
    async fn list_keys(&self, req: ListKeysRequest) -> ListKeysResponse;

    async fn forward_put(&self, req: PutRequest) -> PutResponse;
    async fn forward_get(&self, req: GetRequest) -> GetResponse;
    async fn forward_delete(&self, req: DeleteRequest) -> DeleteResponse;

    async fn replicate(&self, req: ReplicateRequest) -> ReplicateResponse;
    async fn heartbeat(&self, req: HeartbeatRequest) -> HeartbeatResponse;
    async fn get_snapshot(&self, req: SnapshotRequest) -> SnapshotResponse;
    async fn join_cluster(&self, req: JoinClusterRequest) -> JoinClusterResponse;
}

/// Binds `addr` and serves `service` until the process is stopped. Each
/// accepted connection is handled on its own spawned task; a connection
/// that errors mid-request is logged and dropped without affecting others.
pub async fn serve<S: NodeService>(addr: &str, service: Arc<S>) -> Result<(), RpcError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "rpc server listening");
    loop {
        let (socket, peer) = listener.accept().await?;
        let service = service.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, service).await {
                tracing::warn!(%peer, error = %e, "rpc connection ended with error");
            }
        });
    }
}

async fn handle_connection<S: NodeService>(
    mut socket: TcpStream,
    service: Arc<S>,
) -> Result<(), RpcError> {
    let request: Request = read_frame(&mut socket).await?;
    let response = dispatch(&*service, request).await;
    write_frame(&mut socket, &response).await
}

async fn dispatch<S: NodeService>(service: &S, request: Request) -> Response {
    match request {
        Request::Put(r) => Response::Put(service.put(r).await),
        Request::Get(r) => Response::Get(service.get(r).await),
        Request::Delete(r) => Response::Delete(service.delete(r).await),
        Request::ListKeys(r) => Response::ListKeys(service.list_keys(r).await),
        Request::ForwardPut(r) => Response::Put(service.forward_put(r).await),
        Request::ForwardGet(r) => Response::Get(service.forward_get(r).await),
        Request::ForwardDelete(r) => Response::Delete(service.forward_delete(r).await),
        Request::Replicate(r) => Response::Replicate(service.replicate(r).await),
        Request::Heartbeat(r) => Response::Heartbeat(service.heartbeat(r).await),
        Request::GetSnapshot(r) => Response::Snapshot(service.get_snapshot(r).await),
        Request::JoinCluster(r) => Response::JoinCluster(service.join_cluster(r).await),
    }
}
