//! bizdesk CLI
//!
//! Commands:
//! - `bizdesk init`: seed sample records
//! - `bizdesk fields <list|add|edit|remove|move> <entity>`: manage custom field layouts
//! - `bizdesk records <list|show|add|set|unset|note|attach|delete> <entity>`: work with records
//! - `bizdesk calendar`: activities by day
//! - `bizdesk pipeline`: opportunities by stage
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bizdesk::config::BizdeskConfig;
use bizdesk::context::Workspace;
use bizdesk::{boards, fields, init, records};
use bizdesk::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(
            "bizdesk=debug,bizdesk_store=debug,bizdesk_fields=debug,bizdesk_records=debug,bizdesk_query=debug",
        )
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = result_to_exit(run(cli).await);
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = BizdeskConfig::load()?.with_data_dir(cli.data_dir);
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");
    let ws = Workspace::open(config);

    match cli.command {
        Commands::Init => init::run(&ws).await,
        Commands::Fields(cmd) => fields::run(&ws, cmd).await,
        Commands::Records(cmd) => records::run(&ws, cmd).await,
        Commands::Calendar { date } => boards::run_calendar(&ws, date.as_deref()).await,
        Commands::Pipeline { json } => boards::run_pipeline(&ws, json).await,
    }
}

/// Convert a command result to an exit code.
fn result_to_exit(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}
