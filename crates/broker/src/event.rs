// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A published event. The broker treats `data` opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerEvent {
    pub event: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub persist: bool,
    pub data: Value,
}

impl BrokerEvent {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self { event: event.into(), scopes: Vec::new(), sender: None, persist: false, data }
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }
}

/// Well-known event names the core itself publishes or expects.
pub mod names {
    pub const BLOCK_CLOSE: &str = "blockclose";
    pub const CONN_CHANGE: &str = "connchange";
    pub const CONTROLLER_STATUS: &str = "controllerstatus";
    pub const WAVEOBJ_UPDATE: &str = "waveobj:update";
    pub const BLOCK_FILE: &str = "blockfile";
    pub const CONFIG: &str = "config";
    pub const USER_INPUT: &str = "userinput";
    pub const ROUTE_DOWN: &str = "route:down";
    pub const ROUTE_UP: &str = "route:up";
    pub const WORKSPACE_UPDATE: &str = "workspace:update";
}
