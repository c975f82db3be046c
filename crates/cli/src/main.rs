//! Node process entry point.

use std::process::ExitCode;

use clap::Parser;
use cli::CliConfig;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    let cli = CliConfig::parse();
    cli::run(cli.command).await.into_exit_code()
}
