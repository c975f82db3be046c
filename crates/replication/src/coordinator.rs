//! Replication coordinator: outbound fan-out from the primary, inbound
//! apply on a replica.
//!
//! Grounded in `replication_manager.py::ReplicationManager`
//! (original_source): `get_replica_nodes`/`replicate_put`/`replicate_delete`
//! /`_send_replicate_request`/`handle_replicate_request` all have a direct
//! counterpart here. The Python `ThreadPoolExecutor(max_workers=10)` becomes
//! a `tokio::sync::Semaphore` bounding concurrent fan-out tasks — spec.md
//! §5's "independent bounded pool (default 10) for fan-out tasks", §9's
//! "task parallelism... so long as the per-attempt deadline and retry
//! budget are honored" redesign note.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use corelib::membership::SharedMembership;
use corelib::node::{Node, NodeId};
use rpc::error::RpcError;
use rpc::message::{ReplicateOp, ReplicateRequest};
use storage::StorageMap;
use tokio::sync::Semaphore;

use crate::strategy::{ReplicationStrategy, RingStrategy};

/// Bounded worker pool size for fan-out tasks (spec.md §4.3 default).
pub const DEFAULT_WORKERS: usize = 10;
/// Per-attempt RPC deadline (spec.md §4.3).
pub const ATTEMPT_DEADLINE: Duration = Duration::from_secs(5);
/// Max attempts per replica per mutation (spec.md §4.3).
pub const MAX_RETRIES: u32 = 3;
/// Fixed backoff between retry attempts (spec.md §4.3).
pub const RETRY_BACKOFF: Duration = Duration::from_millis(100);

pub struct ReplicationCoordinator<S: ReplicationStrategy = RingStrategy> {
    membership: SharedMembership,
    storage: Arc<StorageMap>,
    strategy: S,
    self_id: NodeId,
    semaphore: Arc<Semaphore>,
    max_retries: u32,
    attempt_deadline: Duration,
    retry_backoff: Duration,
}

impl ReplicationCoordinator<RingStrategy> {
    pub fn new(membership: SharedMembership, storage: Arc<StorageMap>, self_id: NodeId) -> Self {
        Self::with_strategy(membership, storage, self_id, RingStrategy)
    }
}

impl<S: ReplicationStrategy> ReplicationCoordinator<S> {
    pub fn with_strategy(
        membership: SharedMembership,
        storage: Arc<StorageMap>,
        self_id: NodeId,
        strategy: S,
    ) -> Self {
        Self {
            membership,
            storage,
            strategy,
            self_id,
            semaphore: Arc::new(Semaphore::new(DEFAULT_WORKERS)),
            max_retries: MAX_RETRIES,
            attempt_deadline: ATTEMPT_DEADLINE,
            retry_backoff: RETRY_BACKOFF,
        }
    }

    /// Fans a PUT out to every replica of `key` (the replica set minus the
    /// primary). Returns the number of replicas that acknowledged before
    /// the fan-out join returned — never fails the caller (spec.md §4.3).
    pub async fn replicate_put(&self, key: &str, value: &str, timestamp: u64) -> usize {
        self.replicate(key, value.to_string(), timestamp, ReplicateOp::Put)
            .await
    }

    /// Fans a DELETE out to every replica of `key`.
    pub async fn replicate_delete(&self, key: &str, timestamp: u64) -> usize {
        self.replicate(key, String::new(), timestamp, ReplicateOp::Delete)
            .await
    }

    async fn replicate(&self, key: &str, value: String, timestamp: u64, op: ReplicateOp) -> usize {
        let replicas: Vec<Node> = self
            .strategy
            .replicas_for_key(&self.membership, key)
            .into_iter()
            .filter(|n| n.id != self.self_id)
            .collect();

        if replicas.is_empty() {
            tracing::debug!(key, "no replicas for key");
            return 0;
        }

        let mut handles = Vec::with_capacity(replicas.len());
        for replica in replicas {
            let semaphore = self.semaphore.clone();
            let primary = self.self_id.clone();
            let key = key.to_string();
            let value = value.clone();
            let deadline = self.attempt_deadline;
            let max_retries = self.max_retries;
            let backoff = self.retry_backoff;

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("replication semaphore is never closed");
                send_with_retries(
                    &replica, key, value, timestamp, primary, op, deadline, max_retries, backoff,
                )
                .await
            }));
        }

        let mut acked = 0;
        for handle in handles {
            match handle.await {
                Ok(true) => acked += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "replication task panicked"),
            }
        }
        acked
    }

    /// Applies an inbound `Replicate` RPC to local storage. `PUT` stores
    /// unconditionally; `DELETE` replies success even if the key was
    /// already absent (spec.md §4.3: "a missing key is not an error on the
    /// replica").
    pub fn apply(&self, req: &ReplicateRequest) -> bool {
        match req.operation {
            ReplicateOp::Put => {
                self.storage.put(req.key.clone(), req.value.clone());
                true
            }
            ReplicateOp::Delete => {
                self.storage.delete(&req.key);
                true
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn send_with_retries(
    replica: &Node,
    key: String,
    value: String,
    timestamp: u64,
    primary: NodeId,
    op: ReplicateOp,
    deadline: Duration,
    max_retries: u32,
    backoff: Duration,
) -> bool {
    let address = replica.address();
    for attempt in 1..=max_retries {
        let req = ReplicateRequest {
            key: key.clone(),
            value: value.clone(),
            timestamp,
            primary_node: primary.to_string(),
            operation: op,
        };
        match rpc::client::replicate(&address, req, deadline).await {
            Ok(resp) => {
                if !resp.success {
                    tracing::warn!(node = %replica.id, key, "replicate rejected by replica");
                }
                return resp.success;
            }
            Err(RpcError::Timeout) | Err(RpcError::Io(_)) => {
                tracing::warn!(node = %replica.id, key, attempt, max_retries, "replicate transport failure");
                if attempt < max_retries {
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                tracing::error!(node = %replica.id, key, "replicate failed after all retries");
                return false;
            }
            Err(e) => {
                tracing::error!(node = %replica.id, key, error = %e, "replicate protocol error");
                return false;
            }
        }
    }
    false
}

/// Current wall-clock time in seconds, for the informational mutation
/// timestamp (spec.md §3: "no ordering guarantees are derived from it").
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
