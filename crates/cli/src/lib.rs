//! Node process bootstrap: the CLI/demo harness spec.md §1 names as a
//! collaborator of the core, not part of it.
//!
//! `server <port> [node_id]` loads a cluster configuration document,
//! derives a node id from the port when none is given, and runs a node
//! until the process is stopped (spec.md §6).

pub mod commands;
pub mod config;

pub use commands::{run, CommandResult};
pub use config::{Command, CliConfig};
