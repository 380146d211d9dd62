// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::state::ConnStatus;

#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    #[error("connection {0} is in state {1:?}, which does not permit this operation")]
    BadState(String, ConnStatus),
    #[error("connection {0} timed out waiting for {1}")]
    Timeout(String, &'static str),
    #[error("user declined to install the remote helper on {0}")]
    WshInstallSkip(String),
    #[error("failed to install remote helper on {0}: {1}")]
    WshInstallError(String, String),
    #[error("underlying ssh client error: {0}")]
    Ssh(String),
    #[error("no such connection: {0}")]
    UnknownConnection(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
