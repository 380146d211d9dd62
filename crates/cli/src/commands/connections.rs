// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tsc connections` — offline discovery of connection names from SSH
//! config. This does not talk to a running daemon (no wire protocol is
//! defined for that); it surfaces the same `~/.ssh/config`/`/etc/ssh/config`
//! discovery the daemon itself runs when asked for a connections list.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tsc_connmgr::discovery::discover_from_ssh_config_files;
use tsc_daemon::Config;

use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct ConnectionsArgs {
    #[command(subcommand)]
    pub command: ConnectionsCommand,
}

#[derive(Subcommand)]
pub enum ConnectionsCommand {
    /// List connection names discoverable from SSH config files.
    List,
}

pub fn connections(args: ConnectionsArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load().context("resolving state directory")?;
    match args.command {
        ConnectionsCommand::List => {
            let paths: Vec<&std::path::Path> = config.ssh_config_paths.iter().map(|p| p.as_path()).collect();
            let names = discover_from_ssh_config_files(&paths);
            format_or_json(format, &names, || {
                if names.is_empty() {
                    println!("no connections discovered");
                }
                for name in &names {
                    println!("{name}");
                }
            })
        }
    }
}
