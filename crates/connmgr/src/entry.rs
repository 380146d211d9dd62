// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single registry entry: the per-connection mutex-guarded state plus
//! the monitor-visible atomics, and the `Connect`/`Close`/`Reconnect`
//! state-machine operations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::SigningKey;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::client::{SshClient, SshConnector};
use crate::domainsocket::{open_domain_socket_listener, random_sock_path, start_conn_server};
use crate::error::ConnError;
use crate::sshopts::SshOpts;
use crate::state::{ConnStatus, ConnStatusSnapshot, HealthStatus};
use crate::telemetry::{TelemetryEvent, TelemetrySink};
use crate::wsh::{check_and_install_wsh, UserPrompter};

/// Options threaded through a `Connect` call.
pub struct ConnectOpts {
    pub wsh_enabled: bool,
    pub wsh_force: bool,
    pub wsh_path: String,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self { wsh_enabled: true, wsh_force: false, wsh_path: "wsh".to_string() }
    }
}

struct Inner {
    status: ConnStatus,
    client: Option<Arc<dyn SshClient>>,
    wsh_enabled: bool,
    domain_sock_path: Option<String>,
    error: Option<String>,
    wsh_error: Option<String>,
    has_waiter: bool,
    last_connect_time_ms: u64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            status: ConnStatus::Init,
            client: None,
            wsh_enabled: false,
            domain_sock_path: None,
            error: None,
            wsh_error: None,
            has_waiter: false,
            last_connect_time_ms: 0,
        }
    }
}

/// A single registry entry. Cheap to clone (an `Arc` internally); the
/// registry hands out clones so callers can hold a reference past a
/// registry lookup without re-locking the registry.
pub struct ConnEntry {
    pub opts: SshOpts,
    inner: Mutex<Inner>,

    // Monitor-visible fields, deliberately outside `inner` so the liveness
    // monitor never needs `conn.lock` on its hot path (see the lock
    // ordering rule: conn.lock is acquired before monitor.lock, never the
    // reverse -- these atomics are how the monitor avoids needing either).
    pub(crate) last_activity_ms: AtomicU64,
    pub(crate) last_input_ms: AtomicU64,
    pub(crate) keep_alive_in_flight: AtomicBool,
    pub(crate) keep_alive_sent_ms: AtomicU64,
    pub(crate) health: Mutex<HealthStatus>,

    active_conn_num: Mutex<Option<u64>>,

    // The length-1 `inputNotifyCh` the currently-running monitor receives
    // on. Set by `LivenessMonitor::new` when a monitor starts, cleared when
    // it exits; `None` between connects, when `notify_input` has nowhere
    // to deliver and is a no-op.
    input_notify_tx: Mutex<Option<mpsc::Sender<u64>>>,
}

impl ConnEntry {
    pub fn new(opts: SshOpts) -> Self {
        Self {
            opts,
            inner: Mutex::new(Inner::default()),
            last_activity_ms: AtomicU64::new(0),
            last_input_ms: AtomicU64::new(0),
            keep_alive_in_flight: AtomicBool::new(false),
            keep_alive_sent_ms: AtomicU64::new(0),
            health: Mutex::new(HealthStatus::Good),
            active_conn_num: Mutex::new(None),
            input_notify_tx: Mutex::new(None),
        }
    }

    pub fn status(&self) -> ConnStatus {
        self.inner.lock().status
    }

    pub fn active_conn_num(&self) -> Option<u64> {
        *self.active_conn_num.lock()
    }

    pub fn snapshot(&self) -> ConnStatusSnapshot {
        let inner = self.inner.lock();
        ConnStatusSnapshot {
            connection: self.opts.name(),
            status: inner.status,
            connected: inner.status == ConnStatus::Connected,
            wsh_enabled: inner.wsh_enabled,
            has_connected: inner.last_connect_time_ms > 0,
            active_conn_num: self.active_conn_num(),
            error: inner.error.clone(),
            wsh_error: inner.wsh_error.clone(),
        }
    }

    /// Record that the UI forwarded user input; wakes the "urgency" window
    /// the liveness monitor uses to tighten its keep-alive cadence, and (if
    /// a monitor is currently running) signals `inputNotifyCh` so it can
    /// check for a stuck connection 1s from now without waiting for its
    /// next regular tick.
    pub fn notify_input(&self, now_ms: u64) {
        self.last_input_ms.store(now_ms, Ordering::Relaxed);
        if let Some(tx) = self.input_notify_tx.lock().as_ref() {
            let _ = tx.try_send(now_ms);
        }
    }

    /// Install (or clear) the channel the running monitor receives input
    /// notifications on. Called by `LivenessMonitor::new`/`run`.
    pub(crate) fn set_input_notify_tx(&self, tx: Option<mpsc::Sender<u64>>) {
        *self.input_notify_tx.lock() = tx;
    }

    pub(crate) fn record_activity(&self, now_ms: u64) {
        self.last_activity_ms.store(now_ms, Ordering::Relaxed);
    }

    /// Whether `client` is still the handle this entry is currently
    /// connected with. The monitor checks this each tick so a monitor
    /// bound to a stale client (closed and replaced by a later connect)
    /// exits instead of acting on a dead connection.
    pub(crate) fn client_ptr_eq(&self, client: &Arc<dyn SshClient>) -> bool {
        self.inner.lock().client.as_ref().is_some_and(|c| Arc::ptr_eq(c, client))
    }

    /// The client handle this entry is currently connected with, if any.
    pub fn current_client(&self) -> Option<Arc<dyn SshClient>> {
        self.inner.lock().client.clone()
    }

    pub fn health(&self) -> HealthStatus {
        *self.health.lock()
    }

    pub(crate) fn set_health(&self, health: HealthStatus) {
        *self.health.lock() = health;
    }

    /// `Connect` is the only way to leave `init|disconnected|error`. Returns
    /// `ConnBadState` without side effects if already `connecting|connected`.
    #[allow(clippy::too_many_arguments)]
    pub async fn connect(
        self: &Arc<Self>,
        connector: &dyn SshConnector,
        prompter: &dyn UserPrompter,
        telemetry: &dyn TelemetrySink,
        signing_key: &SigningKey,
        active_conn_counter: &AtomicU64,
        now_ms: u64,
        opts: ConnectOpts,
    ) -> Result<(), ConnError> {
        {
            let mut inner = self.inner.lock();
            if !inner.status.may_connect() {
                return Err(ConnError::BadState(self.opts.name(), inner.status));
            }
            inner.status = ConnStatus::Connecting;
        }

        match self.connect_inner(connector, prompter, telemetry, signing_key, active_conn_counter, now_ms, &opts).await {
            Ok(client) => {
                let mut inner = self.inner.lock();
                inner.status = ConnStatus::Connected;
                inner.client = Some(client);
                inner.error = None;
                inner.last_connect_time_ms = now_ms;
                drop(inner);
                self.record_activity(now_ms);
                telemetry.record(TelemetryEvent { name: "ssh:connect", connection: self.opts.name(), detail: None });
                info!(connection = %self.opts.name(), "connected");
                Ok(())
            }
            Err(e) => {
                let mut inner = self.inner.lock();
                inner.status = ConnStatus::Error;
                inner.error = Some(e.to_string());
                inner.client = None;
                drop(inner);
                telemetry.record(TelemetryEvent {
                    name: "ssh:connecterror",
                    connection: self.opts.name(),
                    detail: Some(e.to_string()),
                });
                warn!(connection = %self.opts.name(), error = %e, "connect failed");
                Err(e)
            }
        }
    }

    async fn connect_inner(
        self: &Arc<Self>,
        connector: &dyn SshConnector,
        prompter: &dyn UserPrompter,
        telemetry: &dyn TelemetrySink,
        signing_key: &SigningKey,
        active_conn_counter: &AtomicU64,
        now_ms: u64,
        opts: &ConnectOpts,
    ) -> Result<Arc<dyn SshClient>, ConnError> {
        let client = connector.connect(&self.opts).await?;

        let mut wsh_enabled = false;
        if opts.wsh_enabled {
            match check_and_install_wsh(client.as_ref(), prompter, &self.opts.name(), opts.wsh_force).await {
                Ok(true) => wsh_enabled = true,
                Ok(false) => {
                    self.inner.lock().wsh_enabled = false;
                }
                Err(e) => {
                    self.inner.lock().wsh_error = Some(e.to_string());
                }
            }
        }
        self.inner.lock().wsh_enabled = wsh_enabled;

        if wsh_enabled {
            let sock_path = random_sock_path();
            open_domain_socket_listener(client.as_ref(), &sock_path).await?;
            self.inner.lock().domain_sock_path = Some(sock_path);
            let registered = timeout(
                crate::domainsocket::CONNSERVER_REGISTER_TIMEOUT,
                start_conn_server(client.as_ref(), signing_key, &self.opts.name(), &opts.wsh_path),
            )
            .await;
            match registered {
                Ok(Ok(_shell)) => {}
                Ok(Err(e)) => return Err(e),
                Err(_) => return Err(ConnError::Timeout(self.opts.name(), "connserver registration")),
            }
        }

        if self.active_conn_num().is_none() {
            let num = active_conn_counter.fetch_add(1, Ordering::Relaxed) + 1;
            *self.active_conn_num.lock() = Some(num);
        }

        let _ = telemetry;
        let _ = now_ms;
        self.spawn_disconnect_watcher(client.clone());
        Ok(client)
    }

    fn spawn_disconnect_watcher(self: &Arc<Self>, client: Arc<dyn SshClient>) {
        self.inner.lock().has_waiter = true;
        let entry = Arc::clone(self);
        tokio::spawn(async move {
            let close_reason = client.wait_closed().await;
            let mut inner = entry.inner.lock();
            inner.has_waiter = false;
            if inner.status != ConnStatus::Error {
                inner.status = ConnStatus::Disconnected;
            }
            if let Some(reason) = close_reason {
                inner.error = Some(reason);
            }
            inner.client = None;
            debug!(connection = %entry.opts.name(), "disconnect watcher observed close");
        });
    }

    /// Flip to `disconnected` (from `connected|connecting`), close the
    /// client/listener, then busy-wait up to 2s for the watcher to exit.
    pub async fn close(&self) -> Result<(), ConnError> {
        let client = {
            let mut inner = self.inner.lock();
            if matches!(inner.status, ConnStatus::Connected | ConnStatus::Connecting) {
                inner.status = ConnStatus::Disconnected;
            }
            inner.domain_sock_path = None;
            inner.client.take()
        };
        if let Some(client) = client {
            client.close().await;
        }

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            if !self.inner.lock().has_waiter {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ConnError::Timeout(self.opts.name(), "watcher exit"));
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Poll status at 100ms intervals until `connected`, honoring `deadline`.
    pub async fn wait_for_connect(&self, deadline: Duration) -> Result<(), ConnError> {
        let start = tokio::time::Instant::now();
        loop {
            match self.status() {
                ConnStatus::Connected => return Ok(()),
                ConnStatus::Error | ConnStatus::Disconnected => {
                    let err = self.inner.lock().error.clone().unwrap_or_else(|| "connection failed".to_string());
                    return Err(ConnError::Ssh(err));
                }
                _ => {}
            }
            if start.elapsed() >= deadline {
                return Err(ConnError::Timeout(self.opts.name(), "WaitForConnect"));
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}
