// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::id::Oid;
use crate::meta::Meta;
use crate::oref::ORef;
use crate::otype::Otype;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockRuntimeOpts {
    #[serde(default)]
    pub term_size: Option<(u32, u32)>,
    #[serde(default)]
    pub window_size: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub oid: Oid,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub meta: Meta,
    /// Parent reference, stored as an `ORef` string (not a pointer) so the
    /// object graph stays acyclic and addressable by id alone.
    pub parent_oref: ORef,
    #[serde(default)]
    pub runtime_opts: Option<BlockRuntimeOpts>,
    #[serde(default)]
    pub sub_block_ids: Vec<Oid>,
}

impl Block {
    pub fn new(parent_oref: ORef) -> Self {
        Self {
            oid: Oid::new(),
            version: 0,
            meta: Meta::default(),
            parent_oref,
            runtime_opts: None,
            sub_block_ids: Vec::new(),
        }
    }
}

super::impl_header!(Block, Otype::Block);
