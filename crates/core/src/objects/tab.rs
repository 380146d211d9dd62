// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::id::Oid;
use crate::meta::Meta;
use crate::otype::Otype;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub oid: Oid,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub block_ids: Vec<Oid>,
    pub layout_state_id: Oid,
}

impl Tab {
    pub fn new() -> Self {
        Self {
            oid: Oid::new(),
            version: 0,
            meta: Meta::default(),
            block_ids: Vec::new(),
            layout_state_id: Oid::new(),
        }
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::new()
    }
}

super::impl_header!(Tab, Otype::Tab);
