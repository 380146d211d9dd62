// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tsc_core::{ORef, Otype};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(ORef),
    #[error("no object found matching prefix {0:?}")]
    NotFoundPrefix(String),
    #[error("object already exists: {0}")]
    AlreadyExists(ORef),
    #[error("version mismatch on {oref}: expected {expected}, found {found}")]
    VersionMismatch { oref: ORef, expected: i64, found: i64 },
    #[error("object locked: {0}")]
    ObjectLocked(ORef),
    #[error("expected otype {expected}, found {found} at {oref}")]
    UnexpectedOtype { oref: ORef, expected: Otype, found: Otype },
    #[error("parent chain for {0} exceeded the hop limit without reaching a tab")]
    ParentChainTooDeep(ORef),
    #[error("easy-oid prefix {0:?} is ambiguous")]
    AmbiguousPrefix(String),
    #[error("row has a malformed oid: {0:?}")]
    CorruptRow(String),
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    WaveObj(#[from] tsc_core::objects::WaveObjError),
}
