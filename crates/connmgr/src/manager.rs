// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ConnectionManager`: the process-wide, concurrency-safe pool of SSH
//! connections. Owns the `SshOpts -> ConnEntry` registry, drives each
//! entry's `Connect`/`Close`/`Reconnect`, and starts/stops the liveness
//! monitor alongside each successful connect.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::SigningKey;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tsc_core::{Clock, SystemClock};

use crate::client::SshConnector;
use crate::discovery::{discover_from_ssh_config_files, merge_connection_sources};
use crate::entry::{ConnEntry, ConnectOpts};
use crate::error::ConnError;
use crate::monitor::LivenessMonitor;
use crate::sshopts::SshOpts;
use crate::state::{ConnStatus, ConnStatusSnapshot};
use crate::telemetry::{NullTelemetrySink, TelemetrySink};
use crate::wsh::{AutoConfirmPrompter, UserPrompter};

/// How long `EnsureConnection` waits for an in-progress connect (its own
/// or a racing caller's) before giving up.
pub const DEFAULT_ENSURE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ConnectionManager<C: Clock = SystemClock> {
    registry: Mutex<HashMap<SshOpts, Arc<ConnEntry>>>,
    monitor_cancels: Mutex<HashMap<SshOpts, CancellationToken>>,
    active_conn_counter: AtomicU64,
    clock: C,
    connector: Arc<dyn SshConnector>,
    prompter: Arc<dyn UserPrompter>,
    telemetry: Arc<dyn TelemetrySink>,
    signing_key: SigningKey,
}

impl<C: Clock> ConnectionManager<C> {
    pub fn new(connector: Arc<dyn SshConnector>, signing_key: SigningKey, clock: C) -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            monitor_cancels: Mutex::new(HashMap::new()),
            active_conn_counter: AtomicU64::new(0),
            clock,
            connector,
            prompter: Arc::new(AutoConfirmPrompter),
            telemetry: Arc::new(NullTelemetrySink),
            signing_key,
        }
    }

    pub fn with_prompter(mut self, prompter: Arc<dyn UserPrompter>) -> Self {
        self.prompter = prompter;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    fn get_or_create(&self, opts: SshOpts) -> Arc<ConnEntry> {
        self.registry.lock().entry(opts.clone()).or_insert_with(|| Arc::new(ConnEntry::new(opts))).clone()
    }

    pub fn entry(&self, opts: &SshOpts) -> Option<Arc<ConnEntry>> {
        self.registry.lock().get(opts).cloned()
    }

    /// `Connect`'s public surface: resolve or create the registry entry and
    /// drive it through the state machine once.
    pub async fn connect(&self, opts: SshOpts, connect_opts: ConnectOpts) -> Result<(), ConnError> {
        let entry = self.get_or_create(opts.clone());
        entry
            .connect(
                self.connector.as_ref(),
                self.prompter.as_ref(),
                self.telemetry.as_ref(),
                &self.signing_key,
                &self.active_conn_counter,
                self.clock.epoch_ms(),
                connect_opts,
            )
            .await?;
        self.spawn_monitor(opts, &entry);
        Ok(())
    }

    /// The idempotent "make it connected, waiting if necessary" entrypoint.
    /// Concurrent callers for the same entry converge: only the caller that
    /// observes a connectable status actually calls `Connect` (the CAS
    /// inside `ConnEntry::connect` is what prevents a duplicate attempt);
    /// every caller then `WaitForConnect`s.
    pub async fn ensure_connection(&self, opts: SshOpts, wait: Duration) -> Result<(), ConnError> {
        let entry = self.get_or_create(opts.clone());
        if !matches!(entry.status(), ConnStatus::Connected | ConnStatus::Connecting) {
            match self.connect(opts, ConnectOpts::default()).await {
                Ok(()) => return Ok(()),
                Err(ConnError::BadState(..)) => {}
                Err(e) => return Err(e),
            }
        }
        entry.wait_for_connect(wait).await
    }

    pub async fn close(&self, opts: &SshOpts) -> Result<(), ConnError> {
        let entry = self.entry(opts).ok_or_else(|| ConnError::UnknownConnection(opts.name()))?;
        if let Some(cancel) = self.monitor_cancels.lock().remove(opts) {
            cancel.cancel();
        }
        entry.close().await
    }

    pub async fn reconnect(&self, opts: SshOpts, connect_opts: ConnectOpts) -> Result<(), ConnError> {
        self.close(&opts).await.ok();
        self.connect(opts, connect_opts).await
    }

    pub fn notify_input(&self, opts: &SshOpts) {
        if let Some(entry) = self.entry(opts) {
            entry.notify_input(self.clock.epoch_ms());
        }
    }

    pub fn snapshot(&self, opts: &SshOpts) -> Option<ConnStatusSnapshot> {
        self.entry(opts).map(|e| e.snapshot())
    }

    pub fn snapshot_all(&self) -> Vec<ConnStatusSnapshot> {
        self.registry.lock().values().map(|e| e.snapshot()).collect()
    }

    /// De-duplicated ordered union of currently-connected names, names
    /// ever registered, and names discovered from ssh config files.
    pub fn get_connections_list(&self, ssh_config_paths: &[PathBuf]) -> Vec<String> {
        let registry = self.registry.lock();
        let connected: Vec<String> =
            registry.values().filter(|e| e.status() == ConnStatus::Connected).map(|e| e.opts.name()).collect();
        let known: Vec<String> = registry.keys().map(|o| o.name()).collect();
        drop(registry);
        let path_refs: Vec<&std::path::Path> = ssh_config_paths.iter().map(|p| p.as_path()).collect();
        let from_config = discover_from_ssh_config_files(&path_refs);
        merge_connection_sources(&[&connected, &known, &from_config])
    }

    /// Close every registered connection, ignoring a `ConnTimeout` on any
    /// individual entry so one stuck connection does not block the others.
    /// Intended to run once, at process exit.
    pub async fn shutdown_all(&self) {
        let entries: Vec<(SshOpts, Arc<ConnEntry>)> =
            self.registry.lock().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        for (opts, _) in &entries {
            if let Some(cancel) = self.monitor_cancels.lock().remove(opts) {
                cancel.cancel();
            }
        }
        for (opts, entry) in entries {
            if let Err(e) = entry.close().await {
                warn!(connection = %opts.name(), error = %e, "ignoring error during shutdown_all close");
            }
        }
    }

    fn spawn_monitor(&self, opts: SshOpts, entry: &Arc<ConnEntry>) {
        let Some(client) = entry.current_client() else { return };
        let cancel = CancellationToken::new();
        self.monitor_cancels.lock().insert(opts, cancel.clone());
        let monitor = LivenessMonitor::new(entry.clone(), client, self.clock.clone(), cancel);
        tokio::spawn(monitor.run());
    }
}
