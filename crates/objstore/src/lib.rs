// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable, versioned storage for [`tsc_core::WaveObj`]s, backed by a
//! single-writer SQLite connection, with an explicit update-collection
//! context so callers can batch a transaction's changes into one coherent
//! set of broker events on commit.

pub mod db;
pub mod error;
pub mod store;
pub mod txctx;
pub mod waveobjupdate;

pub use error::StoreError;
pub use store::ObjectStore;
pub use txctx::UpdateCtx;
pub use waveobjupdate::{UpdateType, WaveObjUpdate};
