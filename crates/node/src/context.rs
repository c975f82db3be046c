//! Shared, constructor-injected state every handler and the router read:
//! this node's own id, the membership registry, local storage, and the
//! replication coordinator. Passed around as one `Arc<NodeContext>` instead
//! of living behind hidden globals (spec.md §9's explicit-dependency
//! preference).

use std::sync::Arc;

use corelib::membership::SharedMembership;
use corelib::node::NodeId;
use replication::ReplicationCoordinator;
use storage::StorageMap;

pub struct NodeContext {
    pub id: NodeId,
    pub membership: SharedMembership,
    pub storage: Arc<StorageMap>,
    pub replication: Arc<ReplicationCoordinator>,
}

impl NodeContext {
    pub fn new(id: NodeId, membership: SharedMembership) -> Arc<Self> {
        let storage = Arc::new(StorageMap::new());
        let replication = Arc::new(ReplicationCoordinator::new(
            membership.clone(),
            storage.clone(),
            id.clone(),
        ));
        Arc::new(Self {
            id,
            membership,
            storage,
            replication,
        })
    }
}
