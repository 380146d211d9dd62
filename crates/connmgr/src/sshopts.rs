// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Immutable identity of a remote connection: the registry key and the
/// value a `GetConnectionsList` entry is rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SshOpts {
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    #[serde(default)]
    pub extra_ssh_opts: Vec<String>,
}

impl SshOpts {
    pub fn new(host: impl Into<String>) -> Self {
        Self { user: None, host: host.into(), port: None, extra_ssh_opts: Vec::new() }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Parse a `user@host[:port]` connection name, the canonical form used
    /// as the registry's display name and the `connection:<name>` event
    /// scope.
    pub fn parse(name: &str) -> Self {
        let (user, rest) = match name.split_once('@') {
            Some((u, r)) => (Some(u.to_string()), r),
            None => (None, name),
        };
        let (host, port) = match rest.rsplit_once(':') {
            Some((h, p)) => match p.parse::<u16>() {
                Ok(port) => (h.to_string(), Some(port)),
                Err(_) => (rest.to_string(), None),
            },
            None => (rest.to_string(), None),
        };
        Self { user, host, port, extra_ssh_opts: Vec::new() }
    }

    /// The canonical display name, e.g. `alice@example.com:2222`.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SshOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(user) = &self.user {
            write!(f, "{user}@")?;
        }
        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_user_host_port() {
        let opts = SshOpts::parse("alice@example.com:2222");
        assert_eq!(opts.user.as_deref(), Some("alice"));
        assert_eq!(opts.host, "example.com");
        assert_eq!(opts.port, Some(2222));
        assert_eq!(opts.name(), "alice@example.com:2222");
    }

    #[test]
    fn parse_bare_host() {
        let opts = SshOpts::parse("myserver");
        assert_eq!(opts.user, None);
        assert_eq!(opts.host, "myserver");
        assert_eq!(opts.port, None);
    }

    #[test]
    fn non_numeric_suffix_is_not_treated_as_a_port() {
        let opts = SshOpts::parse("host:not-a-port");
        assert_eq!(opts.host, "host:not-a-port");
        assert_eq!(opts.port, None);
    }
}
