//! Wire message types: field-exact with spec.md §6.
//!
//! Grounded in `generate_grpc.py`/the proto shapes it generates
//! (original_source) for field names, and in
//! `harborgrid-justin-rusty-db/src/network/protocol.rs` for the
//! Rust-native `Request`/`Response` enum-over-bincode pattern this crate
//! uses instead of a `.proto` + codegen pipeline.

use serde::{Deserialize, Serialize};

/// Replication operation kind. `PUT=0`, `DELETE=1` per spec.md §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplicateOp {
    Put = 0,
    Delete = 1,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub key: String,
    pub value: String,
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutResponse {
    pub success: bool,
    pub node_id: String,
    pub replicas_count: usize,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub found: bool,
    pub value: Option<String>,
    pub node_id: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub replicas_count: usize,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListKeysRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListKeysResponse {
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicateRequest {
    pub key: String,
    pub value: String,
    pub timestamp: u64,
    pub primary_node: String,
    pub operation: ReplicateOp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicateResponse {
    pub success: bool,
    pub replica_node_id: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    pub node_id: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub node_id: String,
    pub timestamp: u64,
    pub is_alive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub success: bool,
    pub provider_node_id: String,
    pub total_keys: usize,
    pub snapshot_timestamp: u64,
    pub data: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinClusterRequest {
    pub node_id: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinClusterResponse {
    pub success: bool,
    pub cluster_nodes: Vec<String>,
}

/// Envelope for every request sent over the wire: one connection carries
/// exactly one request, then its matching response (spec.md §5's "no
/// implicit suspension" request/response model — no multiplexing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Request {
    Put(PutRequest),
    Get(GetRequest),
    Delete(DeleteRequest),
    ListKeys(ListKeysRequest),
    ForwardPut(PutRequest),
    ForwardGet(GetRequest),
    ForwardDelete(DeleteRequest),
    Replicate(ReplicateRequest),
    Heartbeat(HeartbeatRequest),
    GetSnapshot(SnapshotRequest),
    JoinCluster(JoinClusterRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    Put(PutResponse),
    Get(GetResponse),
    Delete(DeleteResponse),
    ListKeys(ListKeysResponse),
    Replicate(ReplicateResponse),
    Heartbeat(HeartbeatResponse),
    Snapshot(SnapshotResponse),
    JoinCluster(JoinClusterResponse),
    /// Transport/dispatch-level failure that never reached a handler body.
    Error(String),
}
