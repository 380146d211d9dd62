// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration: where the daemon keeps its state on disk, and
//! the handful of env-var overrides operators use. Config file parsing is
//! explicitly out of scope for the core crates; this is the one place in
//! the workspace that reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::DaemonError;

/// Resolve the state directory: `TSC_STATE_DIR` > `XDG_STATE_HOME/tsc` >
/// `~/.local/state/tsc`.
pub fn state_dir() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var("TSC_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("tsc"));
    }
    let home = std::env::var("HOME").map_err(|_| DaemonError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/tsc"))
}

/// How often the connection-change forwarder polls `ConnectionManager`
/// snapshots for status transitions to publish. Overridable for tests.
pub fn connchange_poll_interval() -> Duration {
    std::env::var("TSC_CONNCHANGE_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(500))
}

/// Path to the `wsh` remote-helper binary to install on connect, unless
/// overridden per-connection.
pub fn wsh_path() -> String {
    std::env::var("TSC_WSH_PATH").unwrap_or_else(|_| "wsh".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory, e.g. `~/.local/state/tsc`.
    pub state_dir: PathBuf,
    /// SQLite database file holding the object store.
    pub db_path: PathBuf,
    /// Lock/PID file preventing two daemons from sharing a state dir.
    pub lock_path: PathBuf,
    /// `~/.ssh/config`, `/etc/ssh/config` in discovery order.
    pub ssh_config_paths: Vec<PathBuf>,
    pub wsh_path: String,
    pub connchange_poll_interval: Duration,
}

impl Config {
    pub fn load() -> Result<Self, DaemonError> {
        let state_dir = state_dir()?;
        let home_ssh_config = std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".ssh/config"));
        let mut ssh_config_paths = Vec::new();
        if let Some(p) = home_ssh_config {
            ssh_config_paths.push(p);
        }
        ssh_config_paths.push(PathBuf::from("/etc/ssh/config"));

        Ok(Self {
            db_path: state_dir.join("store.db"),
            lock_path: state_dir.join("daemon.pid"),
            ssh_config_paths,
            wsh_path: wsh_path(),
            connchange_poll_interval: connchange_poll_interval(),
            state_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn state_dir_override_takes_precedence() {
        std::env::set_var("TSC_STATE_DIR", "/tmp/tsc-config-test");
        assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/tsc-config-test"));
        std::env::remove_var("TSC_STATE_DIR");
    }

    #[test]
    #[serial]
    fn connchange_poll_interval_defaults_to_500ms() {
        std::env::remove_var("TSC_CONNCHANGE_POLL_MS");
        assert_eq!(connchange_poll_interval(), Duration::from_millis(500));
    }
}
