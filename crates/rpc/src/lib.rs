//! Node RPC surface: wire message types, a length-prefixed bincode codec,
//! an async client with per-call deadlines, and an async dispatch server.
//!
//! Replaces the teacher's QUIC-based `streaming` crate (ring-state
//! sync/rebalancing transport) — this design has no rebalancing transport
//! to build (spec.md §1 non-goal: "no dynamic rebalancing... no key
//! migration"), and the RPC surface it does need (spec.md §4.5) is a plain
//! request/response protocol, not a streaming one. `quinn`/QUIC is dropped;
//! see DESIGN.md.

pub mod client;
pub mod codec;
pub mod error;
pub mod message;
pub mod server;

pub use error::RpcError;
pub use message::{Request, Response};
pub use server::{serve, NodeService};
