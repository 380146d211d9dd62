// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for path parsing and document mutation.

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IJsonError {
    #[error("malformed path {0:?}")]
    Path(String),
    #[error("type conflict at path {0}")]
    SetType(String),
    #[error("allocation budget exhausted at path {0}")]
    Budget(String),
    #[error("unknown command type {0:?}")]
    UnknownCommand(String),
}
