//! Replication fan-out against real loopback RPC servers: confirms ack
//! counting and retry-on-transport-failure behavior end to end, without
//! pulling in the `node` crate's router.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use corelib::membership::{ClusterConfig, MembershipRegistry};
use corelib::node::NodeId;
use replication::ReplicationCoordinator;
use rpc::message::{
    DeleteRequest, DeleteResponse, GetRequest, GetResponse, HeartbeatRequest, HeartbeatResponse,
    JoinClusterRequest, JoinClusterResponse, ListKeysRequest, ListKeysResponse, PutRequest,
    PutResponse, ReplicateRequest, ReplicateResponse, SnapshotRequest, SnapshotResponse,
};
use rpc::NodeService;
use storage::StorageMap;

/// A bare replica: only `replicate` does anything, matching what a real
/// `node::service::NodeServiceImpl` replica-side handler does. The other
/// methods exist only because `NodeService` is one trait for the whole
/// surface.
struct ReplicaOnly {
    storage: Arc<StorageMap>,
}

#[async_trait]
impl NodeService for ReplicaOnly {
    async fn put(&self, _req: PutRequest) -> PutResponse {
        unimplemented!("not exercised by this test")
    }
    async fn get(&self, _req: GetRequest) -> GetResponse {
        unimplemented!("not exercised by this test")
    }
    async fn delete(&self, _req: DeleteRequest) -> DeleteResponse {
        unimplemented!("not exercised by this test")
    }
    async fn list_keys(&self, _req: ListKeysRequest) -> ListKeysResponse {
        ListKeysResponse {
            keys: self.storage.list_keys(),
        }
    }
    async fn forward_put(&self, _req: PutRequest) -> PutResponse {
        unimplemented!("not exercised by this test")
    }
    async fn forward_get(&self, _req: GetRequest) -> GetResponse {
        unimplemented!("not exercised by this test")
    }
    async fn forward_delete(&self, _req: DeleteRequest) -> DeleteResponse {
        unimplemented!("not exercised by this test")
    }
    async fn replicate(&self, req: ReplicateRequest) -> ReplicateResponse {
        use rpc::message::ReplicateOp;
        match req.operation {
            ReplicateOp::Put => self.storage.put(req.key, req.value),
            ReplicateOp::Delete => {
                self.storage.delete(&req.key);
            }
        }
        ReplicateResponse {
            success: true,
            replica_node_id: "replica".into(),
            message: None,
        }
    }
    async fn heartbeat(&self, req: HeartbeatRequest) -> HeartbeatResponse {
        HeartbeatResponse {
            node_id: req.node_id,
            timestamp: req.timestamp,
            is_alive: true,
        }
    }
    async fn get_snapshot(&self, _req: SnapshotRequest) -> SnapshotResponse {
        unimplemented!("not exercised by this test")
    }
    async fn join_cluster(&self, _req: JoinClusterRequest) -> JoinClusterResponse {
        unimplemented!("not exercised by this test")
    }
}

async fn wait_until_listening(port: u16) {
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port))
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("replica on port {port} never started listening");
}

fn cluster_config(ports: [u16; 3]) -> String {
    format!(
        r#"{{
            "nodes": [
                {{"id": "primary", "host": "127.0.0.1", "port": {}}},
                {{"id": "replica1", "host": "127.0.0.1", "port": {}}},
                {{"id": "replica2", "host": "127.0.0.1", "port": {}}}
            ],
            "replication": {{"replication_factor": 3}}
        }}"#,
        ports[0], ports[1], ports[2]
    )
}

#[tokio::test]
async fn replicate_put_acks_from_every_live_replica() {
    let ports = [19500u16, 19501, 19502];

    // "primary" never gets a server started on purpose: the coordinator
    // filters its own id out of the replica set before fanning out, so a
    // listener there is never dialed.
    let mut replica_storage = Vec::new();
    for &port in &ports[1..] {
        let storage = Arc::new(StorageMap::new());
        replica_storage.push(storage.clone());
        let service = Arc::new(ReplicaOnly { storage });
        let addr = format!("127.0.0.1:{port}");
        tokio::spawn(async move {
            let _ = rpc::serve(&addr, service).await;
        });
    }
    for &port in &ports[1..] {
        wait_until_listening(port).await;
    }

    let registry = Arc::new(
        MembershipRegistry::load(ClusterConfig::from_json(&cluster_config(ports)).unwrap())
            .unwrap(),
    );
    let coordinator = ReplicationCoordinator::new(
        registry.clone(),
        Arc::new(StorageMap::new()),
        NodeId::new("primary"),
    );

    let acked = coordinator
        .replicate_put("fanout:key", "fanout:value", 1_700_000_000)
        .await;
    assert_eq!(acked, 2);

    for storage in &replica_storage {
        let (value, found) = storage.get("fanout:key");
        assert!(found);
        assert_eq!(value.as_deref(), Some("fanout:value"));
    }
}

#[tokio::test]
async fn replicate_put_counts_only_reachable_replicas() {
    // Only replica1 gets a live server; replica2's port is left unbound so
    // the coordinator's connect attempt fails and is retried, then given up
    // on, without the whole fan-out failing.
    let ports = [19510u16, 19511, 19512];

    let storage = Arc::new(StorageMap::new());
    let service = Arc::new(ReplicaOnly {
        storage: storage.clone(),
    });
    let addr = format!("127.0.0.1:{}", ports[1]);
    tokio::spawn(async move {
        let _ = rpc::serve(&addr, service).await;
    });
    wait_until_listening(ports[1]).await;

    let registry = Arc::new(
        MembershipRegistry::load(ClusterConfig::from_json(&cluster_config(ports)).unwrap())
            .unwrap(),
    );
    let coordinator = ReplicationCoordinator::new(
        registry.clone(),
        Arc::new(StorageMap::new()),
        NodeId::new("primary"),
    );

    let acked = coordinator
        .replicate_put("partial:key", "partial:value", 1_700_000_001)
        .await;
    assert_eq!(acked, 1);
    let (value, found) = storage.get("partial:key");
    assert!(found);
    assert_eq!(value.as_deref(), Some("partial:value"));
}
