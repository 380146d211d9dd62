// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tsc` — thin operator CLI over the daemon's on-disk state. No wire
//! protocol is defined between `tsc` and `tscd`; this tool reads the same
//! object-store database and SSH config the daemon does rather than
//! proxying through a running process.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::connections::{connections, ConnectionsArgs};
use commands::daemon::{daemon, DaemonArgs};
use commands::store::{store, StoreArgs};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "tsc", about = "Terminal-workspace server operator CLI")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect the object store.
    Store(StoreArgs),
    /// Inspect connection discovery.
    Connections(ConnectionsArgs),
    /// Daemon lifecycle queries.
    Daemon(DaemonArgs),
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Store(args) => store(args, cli.format),
        Command::Connections(args) => connections(args, cli.format),
        Command::Daemon(args) => daemon(args, cli.format),
    }
}
