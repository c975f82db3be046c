//! Core library: the distribution + replication naming layer.
//!
//! Owns the hard, non-trivial part of the design (spec.md §1): the
//! consistent-hash ring, the membership registry built on top of it, and
//! the node/error types both depend on. Storage, transport, and process
//! bootstrap are collaborators that live in sibling crates.

pub mod error;
pub mod membership;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod topology;

pub use error::{Error, Result};
pub use membership::{ClusterConfig, MembershipRegistry, SharedMembership};
pub use node::{Node, NodeId};
pub use partitioner::{Md5Partitioner, Partitioner};
pub use ring::HashRing;
pub use token::{Md5Token, Token};
