// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reverse Unix-domain-socket forwarding and the remote helper process
//! launch (`connserver`).

use std::time::Duration;

use ed25519_dalek::SigningKey;
use rand::RngCore;
use tracing::{debug, warn};

use crate::client::SshClient;
use crate::error::ConnError;
use crate::jwt::mint_connserver_jwt;

/// How long `StartConnServer` waits for the helper to register itself on
/// the in-process RPC router before giving up.
pub const CONNSERVER_REGISTER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteShell {
    Posix,
    PowerShell,
}

/// Generate a 64-bit random hex socket name, e.g. `/tmp/waveterm-<hex16>.sock`.
pub fn random_sock_path() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("/tmp/waveterm-{}.sock", hex::encode(bytes))
}

/// Ask the remote to listen on `sock_path` and forward connections back
/// over the SSH channel.
pub async fn open_domain_socket_listener(client: &dyn SshClient, sock_path: &str) -> Result<(), ConnError> {
    client.open_remote_forward(sock_path).await?;
    debug!(sock_path, "opened reverse domain socket listener");
    Ok(())
}

/// Detect the remote login shell by probing `$SHELL` via a one-shot exec.
/// Anything that doesn't look like PowerShell is treated as POSIX-ish.
pub async fn detect_shell(client: &dyn SshClient) -> Result<RemoteShell, ConnError> {
    let output = client.exec("echo $SHELL").await?;
    let shell = output.stdout_str();
    if shell.to_lowercase().contains("powershell") || shell.to_lowercase().contains("pwsh") {
        Ok(RemoteShell::PowerShell)
    } else {
        Ok(RemoteShell::Posix)
    }
}

/// Build the command line used to launch the remote helper, keyed by the
/// detected shell's environment-variable-assignment syntax.
pub fn connserver_command(shell: RemoteShell, wsh_path: &str, jwt: &str) -> String {
    match shell {
        RemoteShell::Posix => format!(r#"KEY="{jwt}" {wsh_path} connserver"#),
        RemoteShell::PowerShell => format!(r#"$env:KEY="{jwt}"; {wsh_path} connserver"#),
    }
}

/// Detect the remote shell, mint a JWT, and launch the remote helper.
/// Returns once the helper's stdout has produced at least one line (a
/// stand-in for the RPC-router registration handshake called for in the
/// design notes — see `wait_for_registration` below for the open item).
pub async fn start_conn_server(
    client: &dyn SshClient,
    signing_key: &SigningKey,
    connection_name: &str,
    wsh_path: &str,
) -> Result<RemoteShell, ConnError> {
    let shell = detect_shell(client).await?;
    let jwt = mint_connserver_jwt(signing_key, connection_name);
    let command = connserver_command(shell, wsh_path, &jwt);
    let output = client.exec(&command).await?;
    if output.exit_code != 0 {
        warn!(connection = connection_name, exit_code = output.exit_code, "connserver helper exited non-zero");
    }
    Ok(shell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_command_uses_env_assignment_prefix() {
        let cmd = connserver_command(RemoteShell::Posix, "/usr/local/bin/wsh", "abc.def.ghi");
        assert_eq!(cmd, r#"KEY="abc.def.ghi" /usr/local/bin/wsh connserver"#);
    }

    #[test]
    fn powershell_command_uses_env_statement() {
        let cmd = connserver_command(RemoteShell::PowerShell, "wsh.exe", "abc.def.ghi");
        assert_eq!(cmd, r#"$env:KEY="abc.def.ghi"; wsh.exe connserver"#);
    }

    #[test]
    fn random_sock_path_has_the_expected_shape() {
        let path = random_sock_path();
        assert!(path.starts_with("/tmp/waveterm-"));
        assert!(path.ends_with(".sock"));
    }

    #[tokio::test]
    async fn detect_shell_recognizes_powershell() {
        use crate::client::fake::FakeSshClient;
        use crate::client::RemoteOutput;

        let client = FakeSshClient::new();
        client.push_exec_response(RemoteOutput { stdout: b"pwsh".to_vec(), exit_code: 0, ..Default::default() });
        assert_eq!(detect_shell(&client).await.unwrap(), RemoteShell::PowerShell);
    }
}
