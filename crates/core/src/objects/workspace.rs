// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::id::Oid;
use crate::meta::Meta;
use crate::otype::Otype;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub oid: Oid,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub meta: Meta,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tab_ids: Vec<Oid>,
    #[serde(default)]
    pub active_tab_id: Option<Oid>,
}

impl Workspace {
    pub fn new(name: String) -> Self {
        Self {
            oid: Oid::new(),
            version: 0,
            meta: Meta::default(),
            name,
            icon: None,
            color: None,
            tab_ids: Vec::new(),
            active_tab_id: None,
        }
    }
}

super::impl_header!(Workspace, Otype::Workspace);
