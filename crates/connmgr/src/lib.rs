// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide pool of SSH connections: a concurrent-safe registry keyed
//! by [`SshOpts`], each entry driven through an explicit state machine,
//! monitored for liveness, and backed by a remote helper process reachable
//! over a reverse Unix-domain socket.

pub mod client;
pub mod discovery;
pub mod domainsocket;
pub mod entry;
pub mod error;
pub mod jwt;
pub mod manager;
pub mod monitor;
pub mod sshopts;
pub mod state;
pub mod telemetry;
pub mod wsh;

pub use client::{RemoteOutput, RusshConnector, SshClient, SshConnector};
pub use entry::{ConnEntry, ConnectOpts};
pub use error::ConnError;
pub use manager::ConnectionManager;
pub use sshopts::SshOpts;
pub use state::{ConnStatus, ConnStatusSnapshot, HealthStatus};
pub use telemetry::{NullTelemetrySink, TelemetryEvent, TelemetrySink};
pub use wsh::{AutoConfirmPrompter, UserPrompter};

#[cfg(feature = "test-support")]
pub use client::fake::{FakeSshClient, FakeSshConnector};
#[cfg(feature = "test-support")]
pub use telemetry::fake::RecordingTelemetrySink;
