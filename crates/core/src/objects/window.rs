// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::id::Oid;
use crate::meta::Meta;
use crate::otype::Otype;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WindowPos {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    pub oid: Oid,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub meta: Meta,
    pub workspace_id: Oid,
    #[serde(default)]
    pub pos: WindowPos,
    #[serde(default)]
    pub size: WindowSize,
    #[serde(default)]
    pub last_focus_ts: u64,
}

impl Window {
    pub fn new(workspace_id: Oid) -> Self {
        Self {
            oid: Oid::new(),
            version: 0,
            meta: Meta::default(),
            workspace_id,
            pos: WindowPos::default(),
            size: WindowSize::default(),
            last_focus_ts: 0,
        }
    }
}

super::impl_header!(Window, Otype::Window);
