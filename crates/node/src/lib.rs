//! Node composition root: binds membership, storage, replication, and the
//! RPC surface into one running cluster peer (spec.md §4.4/§4.5).

pub mod context;
pub mod error;
pub mod router;
pub mod server;
pub mod service;

pub use context::NodeContext;
pub use error::NodeError;
pub use router::Router;
pub use server::NodeServer;
pub use service::NodeServiceImpl;
