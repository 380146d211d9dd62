// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wiring layer: resolves on-disk state locations and bridges the
//! otherwise-independent `objstore`/`broker`/`connmgr` crates together.
//! The `tscd` binary (`src/main.rs`) is a thin entrypoint over this crate;
//! `tsc-cli` links it directly to share `Config` rather than talking to a
//! running daemon over a wire protocol, which this system does not define.

pub mod bridge;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::DaemonError;
