// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The boundary between `ConnectionManager` and the underlying SSH wire
//! protocol. Mirrors the donor workspace's `AgentAdapter`/`SessionAdapter`
//! split: a small async trait stands in for a concrete client type
//! everywhere in this crate, so the engine is testable against an
//! in-memory fake without a real network round trip.

use async_trait::async_trait;

use crate::error::ConnError;
use crate::sshopts::SshOpts;

/// Output of a one-shot remote command execution.
#[derive(Debug, Clone, Default)]
pub struct RemoteOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
}

impl RemoteOutput {
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// A single authenticated SSH session, already past key exchange and auth.
#[async_trait]
pub trait SshClient: Send + Sync + 'static {
    /// Run a one-shot remote command and collect its output.
    async fn exec(&self, command: &str) -> Result<RemoteOutput, ConnError>;

    /// Ask the remote side to listen on `remote_path` and forward
    /// connections back over the SSH channel (`ssh -R` equivalent).
    async fn open_remote_forward(&self, remote_path: &str) -> Result<(), ConnError>;

    /// Send an OpenSSH `keepalive@openssh.com` global request and await its
    /// reply.
    async fn send_keepalive(&self) -> Result<(), ConnError>;

    /// Block until the underlying transport closes, returning an error
    /// string if it closed abnormally.
    async fn wait_closed(&self) -> Option<String>;

    /// Tear down the transport. Idempotent.
    async fn close(&self);
}

/// Establishes an authenticated [`SshClient`] for a given [`SshOpts`].
#[async_trait]
pub trait SshConnector: Send + Sync + 'static {
    async fn connect(&self, opts: &SshOpts) -> Result<std::sync::Arc<dyn SshClient>, ConnError>;
}

/// Adapts the `russh`/`russh-keys` pure-Rust client into [`SshConnector`].
///
/// The wire protocol itself (key exchange, auth, channel framing) is
/// explicitly out of scope for this crate to hand-roll; this type only
/// owns the mapping from our trait surface onto russh's handle types.
pub struct RusshConnector {
    config: std::sync::Arc<russh::client::Config>,
}

impl RusshConnector {
    pub fn new() -> Self {
        Self { config: std::sync::Arc::new(russh::client::Config::default()) }
    }
}

impl Default for RusshConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SshConnector for RusshConnector {
    async fn connect(&self, opts: &SshOpts) -> Result<std::sync::Arc<dyn SshClient>, ConnError> {
        // Placeholder until a concrete `russh::client::Handler` is wired up;
        // real auth/keyexchange happens inside that handler's callbacks.
        let _ = &self.config;
        Err(ConnError::Ssh(format!("russh transport not wired for {opts}")))
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Shared state a test can poke to script [`FakeSshClient`] behavior.
    struct Shared {
        exec_log: Mutex<Vec<String>>,
        keepalive_count: Mutex<u64>,
        keepalive_should_fail: Mutex<bool>,
        exec_responses: Mutex<VecDeque<RemoteOutput>>,
        close_reason: Mutex<Option<String>>,
        closed: Notify,
    }

    impl Default for Shared {
        fn default() -> Self {
            Self {
                exec_log: Mutex::new(Vec::new()),
                keepalive_count: Mutex::new(0),
                keepalive_should_fail: Mutex::new(false),
                exec_responses: Mutex::new(VecDeque::new()),
                close_reason: Mutex::new(None),
                closed: Notify::new(),
            }
        }
    }

    #[derive(Clone, Default)]
    pub struct FakeSshClient {
        shared: Arc<Shared>,
    }

    impl FakeSshClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the output the next N `exec` calls should return, in order.
        pub fn push_exec_response(&self, output: RemoteOutput) {
            self.shared.exec_responses.lock().push_back(output);
        }

        pub fn exec_log(&self) -> Vec<String> {
            self.shared.exec_log.lock().clone()
        }

        pub fn keepalive_count(&self) -> u64 {
            *self.shared.keepalive_count.lock()
        }

        pub fn fail_keepalives(&self, fail: bool) {
            *self.shared.keepalive_should_fail.lock() = fail;
        }

        /// Simulate the remote transport dropping, with an optional error.
        pub fn simulate_close(&self, reason: Option<String>) {
            *self.shared.close_reason.lock() = reason;
            self.shared.closed.notify_waiters();
        }
    }

    #[async_trait]
    impl SshClient for FakeSshClient {
        async fn exec(&self, command: &str) -> Result<RemoteOutput, ConnError> {
            self.shared.exec_log.lock().push(command.to_string());
            let popped = self.shared.exec_responses.lock().pop_front();
            Ok(popped.unwrap_or_default())
        }

        async fn open_remote_forward(&self, _remote_path: &str) -> Result<(), ConnError> {
            Ok(())
        }

        async fn send_keepalive(&self) -> Result<(), ConnError> {
            *self.shared.keepalive_count.lock() += 1;
            if *self.shared.keepalive_should_fail.lock() {
                return Err(ConnError::Ssh("fake keepalive failure".into()));
            }
            Ok(())
        }

        async fn wait_closed(&self) -> Option<String> {
            self.shared.closed.notified().await;
            self.shared.close_reason.lock().clone()
        }

        async fn close(&self) {
            self.shared.closed.notify_waiters();
        }
    }

    /// A connector that always hands back the same [`FakeSshClient`],
    /// optionally failing the Nth connect attempt.
    #[derive(Clone, Default)]
    pub struct FakeSshConnector {
        shared: Arc<Mutex<FakeConnectorState>>,
    }

    #[derive(Default)]
    struct FakeConnectorState {
        client: Option<FakeSshClient>,
        fail_next: bool,
        attempts: u64,
    }

    impl FakeSshConnector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: FakeSshClient) -> Self {
            let connector = Self::new();
            connector.shared.lock().client = Some(client);
            connector
        }

        pub fn fail_next_connect(&self) {
            self.shared.lock().fail_next = true;
        }

        pub fn attempts(&self) -> u64 {
            self.shared.lock().attempts
        }
    }

    #[async_trait]
    impl SshConnector for FakeSshConnector {
        async fn connect(&self, opts: &SshOpts) -> Result<Arc<dyn SshClient>, ConnError> {
            let mut state = self.shared.lock();
            state.attempts += 1;
            if std::mem::take(&mut state.fail_next) {
                return Err(ConnError::Ssh(format!("fake connect failure for {opts}")));
            }
            let client = state.client.clone().unwrap_or_default();
            state.client = Some(client.clone());
            Ok(Arc::new(client))
        }
    }
}
