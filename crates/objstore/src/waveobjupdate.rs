// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use tsc_core::{Oid, Otype, WaveObj};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveObjUpdate {
    pub update_type: UpdateType,
    pub otype: Otype,
    pub oid: Oid,
    #[serde(default)]
    pub obj: Option<WaveObj>,
}

impl WaveObjUpdate {
    pub fn updated(obj: WaveObj) -> Self {
        Self { update_type: UpdateType::Update, otype: obj.otype(), oid: obj.oid(), obj: Some(obj) }
    }

    pub fn deleted(otype: Otype, oid: Oid) -> Self {
        Self { update_type: UpdateType::Delete, otype, oid, obj: None }
    }
}
