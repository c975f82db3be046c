//! CLI command execution: process bootstrap (spec.md §1's "process
//! bootstrap" collaborator) for the `server` subcommand.
//!
//! Grounded in `src/server.py::serve`/`if __name__ == '__main__'`
//! (original_source) for the bind-and-run shape, and in
//! `harborgrid-justin-rusty-db/src/main.rs` for the `tracing_subscriber`
//! init this design uses instead of the original's `print`/`logging` mix.

use std::process::ExitCode;

use corelib::membership::{ClusterConfig, MembershipRegistry};
use corelib::node::NodeId;
use node::NodeServer;

use crate::config::{derive_node_id, parse_port, Command};

/// Outcome of running a CLI command, translated to a process exit code by
/// `main`. Exit code 1 on bad port or config load failure (spec.md §6).
pub enum CommandResult {
    Ran,
    Failed(String),
}

impl CommandResult {
    pub fn into_exit_code(self) -> ExitCode {
        match self {
            CommandResult::Ran => ExitCode::SUCCESS,
            CommandResult::Failed(message) => {
                tracing::error!("{message}");
                ExitCode::FAILURE
            }
        }
    }
}

pub async fn run(command: Command) -> CommandResult {
    match command {
        Command::Server {
            port,
            node_id,
            config,
            host,
        } => run_server(port, node_id, config, host).await,
    }
}

async fn run_server(
    raw_port: String,
    node_id: Option<String>,
    config_path: std::path::PathBuf,
    host: String,
) -> CommandResult {
    let port = match parse_port(&raw_port) {
        Ok(p) => p,
        Err(e) => return CommandResult::Failed(e),
    };

    let id = NodeId::new(node_id.unwrap_or_else(|| derive_node_id(port)));

    let config = match ClusterConfig::from_path(&config_path) {
        Ok(c) => c,
        Err(e) => {
            return CommandResult::Failed(format!(
                "failed to load cluster config {}: {e}",
                config_path.display()
            ))
        }
    };

    let membership = match MembershipRegistry::load(config) {
        Ok(m) => std::sync::Arc::new(m),
        Err(e) => return CommandResult::Failed(format!("invalid cluster config: {e}")),
    };

    if membership.get_node_by_id(&id).is_none() {
        tracing::warn!(
            node_id = %id,
            "this node id is not present in the loaded cluster config; it will serve \
             requests but owns no keys until added via join_cluster"
        );
    }

    let addr = format!("{host}:{port}");
    tracing::info!(node_id = %id, %addr, "starting node server");

    let server = NodeServer::new(id, membership);
    match server.run(&addr).await {
        Ok(()) => CommandResult::Ran,
        Err(e) => CommandResult::Failed(format!("server error: {e}")),
    }
}
