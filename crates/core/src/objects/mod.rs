// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed sum type of objects the object store persists.
//!
//! The donor codebase registers object types into a global map keyed by
//! `otype`, with runtime assertions that each has `OID`/`Version`/`Meta`
//! fields (a dynamically-typed registry pattern). Here that's a closed enum
//! `WaveObj` over one struct per kind, each implementing the common
//! [`WaveObjHeader`] trait, with `WaveObj::from_json` doing the `otype`-field
//! dispatch that the donor's reflection-based constructor lookup did.

mod block;
mod client;
mod job;
mod layout;
mod main_server;
mod tab;
mod window;
mod workspace;

pub use block::{Block, BlockRuntimeOpts};
pub use client::Client;
pub use job::{Job, JobExitInfo, JobStatus};
pub use layout::{LayoutNode, LayoutState};
pub use main_server::MainServer;
pub use tab::Tab;
pub use window::{Window, WindowPos, WindowSize};
pub use workspace::Workspace;

use crate::id::Oid;
use crate::meta::Meta;
use crate::otype::Otype;

/// Common header every stored object exposes.
pub trait WaveObjHeader {
    fn otype(&self) -> Otype;
    fn oid(&self) -> Oid;
    fn set_oid(&mut self, oid: Oid);
    fn version(&self) -> i64;
    fn set_version(&mut self, version: i64);
    fn meta(&self) -> &Meta;
    fn meta_mut(&mut self) -> &mut Meta;
}

/// Implements [`WaveObjHeader`] for a struct with `oid`, `version`, and
/// `meta` fields and a fixed `Otype`.
macro_rules! impl_header {
    ($ty:ty, $otype:expr) => {
        impl $crate::objects::WaveObjHeader for $ty {
            fn otype(&self) -> $crate::otype::Otype {
                $otype
            }
            fn oid(&self) -> $crate::id::Oid {
                self.oid
            }
            fn set_oid(&mut self, oid: $crate::id::Oid) {
                self.oid = oid;
            }
            fn version(&self) -> i64 {
                self.version
            }
            fn set_version(&mut self, version: i64) {
                self.version = version;
            }
            fn meta(&self) -> &$crate::meta::Meta {
                &self.meta
            }
            fn meta_mut(&mut self) -> &mut $crate::meta::Meta {
                &mut self.meta
            }
        }
    };
}
pub(crate) use impl_header;

/// The closed sum type of every persisted object kind.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "otype", rename_all = "lowercase")]
pub enum WaveObj {
    Client(Client),
    Window(Window),
    Workspace(Workspace),
    Tab(Tab),
    Block(Block),
    Layout(LayoutState),
    #[serde(rename = "mainserver")]
    MainServer(MainServer),
    Job(Job),
}

#[derive(Debug, thiserror::Error)]
pub enum WaveObjError {
    #[error("malformed object json: {0}")]
    Json(#[from] serde_json::Error),
}

impl WaveObj {
    /// Dispatch on the `otype` field to decode into the matching variant.
    pub fn from_json(bytes: &[u8]) -> Result<Self, WaveObjError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, WaveObjError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn header(&self) -> &dyn WaveObjHeader {
        match self {
            WaveObj::Client(o) => o,
            WaveObj::Window(o) => o,
            WaveObj::Workspace(o) => o,
            WaveObj::Tab(o) => o,
            WaveObj::Block(o) => o,
            WaveObj::Layout(o) => o,
            WaveObj::MainServer(o) => o,
            WaveObj::Job(o) => o,
        }
    }

    pub fn header_mut(&mut self) -> &mut dyn WaveObjHeader {
        match self {
            WaveObj::Client(o) => o,
            WaveObj::Window(o) => o,
            WaveObj::Workspace(o) => o,
            WaveObj::Tab(o) => o,
            WaveObj::Block(o) => o,
            WaveObj::Layout(o) => o,
            WaveObj::MainServer(o) => o,
            WaveObj::Job(o) => o,
        }
    }

    pub fn otype(&self) -> Otype {
        self.header().otype()
    }

    pub fn oid(&self) -> Oid {
        self.header().oid()
    }

    pub fn oref(&self) -> crate::oref::ORef {
        crate::oref::ORef::new(self.otype(), self.oid())
    }

    pub fn version(&self) -> i64 {
        self.header().version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json_for_every_kind() {
        let objs = vec![
            WaveObj::Client(Client::new()),
            WaveObj::Window(Window::new(Oid::new())),
            WaveObj::Workspace(Workspace::new("ws".into())),
            WaveObj::Tab(Tab::new()),
            WaveObj::Block(Block::new(crate::oref::ORef::new(Otype::Tab, Oid::new()))),
            WaveObj::Layout(LayoutState::new()),
            WaveObj::MainServer(MainServer::new(vec![0u8; 32], vec![0u8; 32])),
            WaveObj::Job(Job::new("mybox".into(), "ls".into())),
        ];
        for obj in objs {
            let bytes = obj.to_json().unwrap();
            let back = WaveObj::from_json(&bytes).unwrap();
            assert_eq!(obj.otype(), back.otype());
            assert_eq!(obj.oid(), back.oid());
        }
    }
}
