//! plansim command-line client.
//!
//! `plansim [global options] <group> <command>` drives a planning service
//! deployment: plan upload and download, simulation, mission models,
//! activity metadata and sequence compilation.

pub mod cli;
pub mod commands;
pub mod context;
pub mod logging;

use std::io::Write;
use std::time::Instant;

use cli::{Cli, Commands};

/// Run a parsed command line, writing user-facing output to `out`.
///
/// # Errors
/// Returns the first error from configuration, the service or file I/O.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let command = cli.command.name();
    let started = Instant::now();

    let result = dispatch(cli, out).await;

    logging::log_command_execution(command, started.elapsed(), result.is_ok());
    if let Err(err) = &result {
        tracing::debug!(command, error_type = logging::error_label(err), "command failed");
    }
    result
}

async fn dispatch<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let ctx = context::CommandContext::from_args(&cli.global)?;

    match cli.command {
        Commands::Plans { command } => commands::plans::execute(&ctx, command, out).await,
        Commands::Models { command } => commands::models::execute(&ctx, command, out).await,
        Commands::Metadata { command } => commands::metadata::execute(&ctx, command, out).await,
        Commands::Sequences { command } => commands::sequences::execute(&ctx, command, out).await,
    }
}
