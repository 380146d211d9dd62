// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tscd` — the terminal-workspace server daemon. Wires together the
//! object store, the event broker, and the connection manager, then runs
//! until a shutdown signal arrives.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use ed25519_dalek::SigningKey;
use fs2::FileExt;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tsc_broker::EventBroker;
use tsc_connmgr::{ConnectionManager, RusshConnector};
use tsc_core::{Otype, WaveObj};
use tsc_daemon::{bridge, Config};
use tsc_objstore::{ObjectStore, UpdateCtx};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Acquire the daemon's exclusive lock file, writing our pid into it. Held
/// for the lifetime of the process; released on drop or process exit.
fn acquire_lock(config: &Config) -> Result<std::fs::File> {
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)
        .with_context(|| format!("opening lock file {}", config.lock_path.display()))?;
    lock_file
        .try_lock_exclusive()
        .map_err(|_| anyhow::anyhow!(tsc_daemon::DaemonError::AlreadyRunning(config.lock_path.clone())))?;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    Ok(lock_file)
}

/// Load the `MainServer` singleton's signing key, creating one on first
/// run. This is the one piece of mutable object-store state the daemon
/// itself owns and writes, everything else being written by callers this
/// workspace does not define.
fn load_or_create_main_server(store: &ObjectStore, ctx: &mut UpdateCtx) -> Result<SigningKey> {
    match store.get_singleton(Otype::MainServer, tsc_core::MainServer::singleton_oid()) {
        Ok(WaveObj::MainServer(ms)) => {
            use base64::Engine;
            let b64 = base64::engine::general_purpose::STANDARD;
            let bytes = b64.decode(&ms.private_key_b64).context("decoding stored signing key")?;
            let key_bytes: [u8; 32] = bytes.try_into().map_err(|_| anyhow::anyhow!("stored signing key is not 32 bytes"))?;
            Ok(SigningKey::from_bytes(&key_bytes))
        }
        Ok(_) => unreachable!("get_singleton(MainServer) always returns a MainServer"),
        Err(tsc_objstore::StoreError::NotFound(_)) => {
            info!("no main-server record found, minting a new signing key");
            let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
            let ms = tsc_core::MainServer::new(
                signing_key.verifying_key().to_bytes().to_vec(),
                signing_key.to_bytes().to_vec(),
            );
            store.insert(ctx, WaveObj::MainServer(ms)).context("persisting main-server record")?;
            Ok(signing_key)
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = Config::load().context("resolving daemon configuration")?;
    std::fs::create_dir_all(&config.state_dir)
        .with_context(|| format!("creating state directory {}", config.state_dir.display()))?;
    let _lock = acquire_lock(&config)?;

    info!(state_dir = %config.state_dir.display(), "tscd starting");

    let broker = EventBroker::new();

    let store = ObjectStore::open(&config.db_path)
        .with_context(|| format!("opening object store at {}", config.db_path.display()))?;
    let mut ctx = UpdateCtx::new();
    let signing_key = load_or_create_main_server(&store, &mut ctx)?;
    bridge::publish_store_updates(&ctx, &broker);

    let manager = Arc::new(ConnectionManager::new(
        Arc::new(RusshConnector::new()),
        signing_key,
        tsc_core::SystemClock,
    ));

    let forwarder_cancel = CancellationToken::new();
    let forwarder = tokio::spawn(bridge::run_connchange_forwarder(
        manager.clone(),
        broker.clone(),
        config.connchange_poll_interval,
        forwarder_cancel.clone(),
    ));

    info!("tscd ready");
    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    info!("tscd shutting down");

    forwarder_cancel.cancel();
    manager.shutdown_all().await;
    forwarder.await.context("joining connchange forwarder")?;

    Ok(())
}
