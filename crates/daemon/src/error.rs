// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors that can occur while resolving configuration or starting up the
//! daemon process itself. Once running, the daemon surfaces each
//! subsystem's own error type (`StoreError`, `BrokerError`, `ConnError`)
//! unchanged — this enum only covers the process-wiring layer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("cannot resolve a state directory: $HOME is not set and no override was given")]
    NoStateDir,

    #[error("another daemon instance already holds the lock at {0}")]
    AlreadyRunning(PathBuf),

    #[error("store error: {0}")]
    Store(#[from] tsc_objstore::StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
