// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tsc store` — read-only inspection of the object store database. Opens
//! the same SQLite file the running daemon writes to; safe to run
//! alongside a live daemon since reads never block on the daemon's
//! connection.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::str::FromStr;
use tsc_core::ORef;
use tsc_daemon::Config;
use tsc_objstore::ObjectStore;

use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommand,
}

#[derive(Subcommand)]
pub enum StoreCommand {
    /// Print per-otype row counts.
    Stats,
    /// Fetch a single object by its `otype:oid` reference.
    Get {
        /// e.g. `tab:9f3a2b1c...`
        oref: String,
    },
}

pub fn store(args: StoreArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load().context("resolving state directory")?;
    let store = ObjectStore::open(&config.db_path)
        .with_context(|| format!("opening object store at {}", config.db_path.display()))?;

    match args.command {
        StoreCommand::Stats => {
            let counts = store.table_counts().context("reading table counts")?;
            format_or_json(format, &counts, || {
                let mut rows: Vec<_> = counts.iter().collect();
                rows.sort_by_key(|(otype, _)| otype.table_name().to_string());
                for (otype, count) in rows {
                    println!("{:<12} {}", otype.table_name(), count);
                }
            })
        }
        StoreCommand::Get { oref } => {
            let oref = ORef::from_str(&oref).with_context(|| format!("parsing object reference {oref:?}"))?;
            let obj = store.must_get(oref).with_context(|| format!("fetching {oref}"))?;
            format_or_json(format, &obj, || println!("{}", serde_json::to_string_pretty(&obj).unwrap_or_default()))
        }
    }
}
