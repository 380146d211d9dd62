// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::id::Oid;
use crate::meta::Meta;
use crate::otype::Otype;
use serde::{Deserialize, Serialize};

/// The singleton client object — one per running daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub oid: Oid,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub window_ids: Vec<Oid>,
    #[serde(default)]
    pub temp_oid: Option<Oid>,
    #[serde(default)]
    pub tos_agreed_ts: Option<u64>,
}

impl Client {
    /// The fixed oid singletons are addressed under (all-zero id).
    pub fn singleton_oid() -> Oid {
        Oid::from_u128(0)
    }

    pub fn new() -> Self {
        Self {
            oid: Self::singleton_oid(),
            version: 0,
            meta: Meta::default(),
            window_ids: Vec::new(),
            temp_oid: None,
            tos_agreed_ts: None,
        }
    }
}

super::impl_header!(Client, Otype::Client);
