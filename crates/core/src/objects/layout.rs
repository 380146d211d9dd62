// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::id::Oid;
use crate::meta::Meta;
use crate::otype::Otype;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Layout trees are opaque to the core — their shape is a frontend concern.
/// Stored as a plain JSON value rather than a typed tree.
pub type LayoutNode = Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutState {
    pub oid: Oid,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub root_node: Option<LayoutNode>,
    #[serde(default)]
    pub focused_node_id: Option<String>,
    #[serde(default)]
    pub magnified_node_id: Option<String>,
    #[serde(default)]
    pub leaf_order: Vec<String>,
    #[serde(default)]
    pub pending_actions: Vec<Value>,
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            oid: Oid::new(),
            version: 0,
            meta: Meta::default(),
            root_node: None,
            focused_node_id: None,
            magnified_node_id: None,
            leaf_order: Vec::new(),
            pending_actions: Vec::new(),
        }
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

super::impl_header!(LayoutState, Otype::Layout);
