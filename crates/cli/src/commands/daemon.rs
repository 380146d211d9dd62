// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tsc daemon status` — whether `tscd` currently holds the state
//! directory's lock file, determined the same way `tscd` itself checks on
//! startup: attempt a non-blocking exclusive lock.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use fs2::FileExt;
use tsc_daemon::Config;

use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Report whether a daemon currently holds the state directory lock.
    Status,
}

pub fn daemon(args: DaemonArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Status => status(format),
    }
}

fn status(format: OutputFormat) -> Result<()> {
    let config = Config::load().context("resolving state directory")?;
    let running = match std::fs::OpenOptions::new().write(true).create(true).open(&config.lock_path) {
        Ok(file) => match file.try_lock_exclusive() {
            Ok(()) => {
                fs2::FileExt::unlock(&file).ok();
                false
            }
            Err(_) => true,
        },
        Err(_) => false,
    };
    let pid = if running { std::fs::read_to_string(&config.lock_path).ok().and_then(|s| s.trim().parse::<u32>().ok()) } else { None };

    format_or_json(format, &serde_json::json!({"running": running, "pid": pid}), || {
        if running {
            match pid {
                Some(pid) => println!("daemon running (pid {pid})"),
                None => println!("daemon running"),
            }
        } else {
            println!("daemon not running");
        }
    })
}
