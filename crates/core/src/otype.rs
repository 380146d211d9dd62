// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Otype` — the closed set of object kinds stored by the object store.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Otype {
    Client,
    Window,
    Workspace,
    Tab,
    Block,
    Layout,
    MainServer,
    Job,
}

impl Otype {
    pub const ALL: [Otype; 8] = [
        Otype::Client,
        Otype::Window,
        Otype::Workspace,
        Otype::Tab,
        Otype::Block,
        Otype::Layout,
        Otype::MainServer,
        Otype::Job,
    ];

    /// Singleton otypes have at most one row and are addressed without an oid.
    pub fn is_singleton(self) -> bool {
        matches!(self, Otype::Client | Otype::MainServer)
    }

    /// Table name this otype is persisted under (`db_<otype>`).
    pub fn table_name(self) -> String {
        format!("db_{self}")
    }
}

crate::simple_display! {
    Otype {
        Client => "client",
        Window => "window",
        Workspace => "workspace",
        Tab => "tab",
        Block => "block",
        Layout => "layout",
        MainServer => "mainserver",
        Job => "job",
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown otype {0:?}")]
pub struct UnknownOtype(pub String);

impl FromStr for Otype {
    type Err = UnknownOtype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Otype::ALL.into_iter().find(|o| o.to_string() == s).ok_or_else(|| UnknownOtype(s.to_string()))
    }
}
