// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Glue between the standalone subsystem crates. None of `objstore`,
//! `broker`, or `connmgr` know about each other; wiring them together —
//! publishing `connchange` on connection status transitions, publishing
//! `waveobj:update` when a store transaction commits — is the daemon's
//! job, the same way the donor's `spawn_runtime_event_forwarder` bridges
//! its runtime's internal channel onto its `EventBus`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use tsc_broker::{names, BrokerEvent, EventBroker};
use tsc_connmgr::ConnectionManager;
use tsc_core::Clock;
use tsc_objstore::UpdateCtx;

/// A cheap fingerprint of the fields a `connchange` subscriber cares
/// about, used to detect whether a connection actually changed since the
/// last poll.
#[derive(PartialEq, Eq, Clone)]
struct Fingerprint {
    status: tsc_connmgr::ConnStatus,
    connected: bool,
    wsh_enabled: bool,
    active_conn_num: Option<u64>,
    error: Option<String>,
    wsh_error: Option<String>,
}

impl From<&tsc_connmgr::ConnStatusSnapshot> for Fingerprint {
    fn from(s: &tsc_connmgr::ConnStatusSnapshot) -> Self {
        Self {
            status: s.status,
            connected: s.connected,
            wsh_enabled: s.wsh_enabled,
            active_conn_num: s.active_conn_num,
            error: s.error.clone(),
            wsh_error: s.wsh_error.clone(),
        }
    }
}

/// Poll `manager`'s connection snapshots on an interval and publish a
/// `connchange` event, scoped to `connection:<name>`, for any connection
/// whose observable status changed since the previous poll. Runs until
/// `cancel` fires.
pub async fn run_connchange_forwarder<C: Clock>(
    manager: Arc<ConnectionManager<C>>,
    broker: EventBroker,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut last: HashMap<String, Fingerprint> = HashMap::new();
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        for snap in manager.snapshot_all() {
            let fp = Fingerprint::from(&snap);
            let changed = last.get(&snap.connection).map(|prev| *prev != fp).unwrap_or(true);
            if changed {
                debug!(connection = %snap.connection, status = ?snap.status, "forwarding connchange");
                let scope = format!("connection:{}", snap.connection);
                let data = serde_json::to_value(&snap).unwrap_or(serde_json::Value::Null);
                broker.publish(BrokerEvent::new(names::CONN_CHANGE, data).with_scopes(vec![scope]));
                last.insert(snap.connection.clone(), fp);
            }
        }
    }
}

/// Flatten a committed transaction's collected updates and publish one
/// `waveobj:update` event per `(otype, oid)`, scoped to the object's own
/// `ORef` string so per-object subscribers don't see unrelated traffic.
pub fn publish_store_updates(ctx: &UpdateCtx, broker: &EventBroker) {
    for update in ctx.flatten() {
        let oref = tsc_core::ORef::new(update.otype, update.oid);
        let data = serde_json::json!({
            "updatetype": update.update_type,
            "otype": update.otype,
            "oid": update.oid,
            "obj": update.obj,
        });
        broker.publish(BrokerEvent::new(names::WAVEOBJ_UPDATE, data).with_scopes(vec![oref.to_string()]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tsc_connmgr::{ConnectOpts, SshOpts};
    use tsc_core::FakeClock;

    fn manager() -> Arc<ConnectionManager<FakeClock>> {
        Arc::new(ConnectionManager::new(
            Arc::new(tsc_connmgr::FakeSshConnector::new()),
            ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng),
            FakeClock::new(),
        ))
    }

    #[tokio::test]
    async fn a_status_transition_is_forwarded_as_connchange() {
        let mgr = manager();
        let broker = EventBroker::new();
        let (sink, mut rx) = tsc_broker::ChannelSink::channel(8);
        let _sub = broker.subscribe(
            tsc_broker::SubscribeRequest { event: names::CONN_CHANGE.into(), scopes: vec![], all_scopes: true },
            Arc::new(sink),
        );
        let cancel = CancellationToken::new();
        let forwarder = tokio::spawn(run_connchange_forwarder(mgr.clone(), broker, Duration::from_millis(5), cancel.clone()));

        mgr.connect(SshOpts::parse("host1"), ConnectOpts::default()).await.unwrap();

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(event.event, names::CONN_CHANGE);
        assert_eq!(event.scopes, vec!["connection:host1".to_string()]);

        cancel.cancel();
        forwarder.await.unwrap();
    }

    #[test]
    fn publish_store_updates_emits_one_event_per_update() {
        let mut ctx = UpdateCtx::new();
        ctx.record(tsc_objstore::WaveObjUpdate::deleted(tsc_core::Otype::Tab, tsc_core::Oid::new()));
        let broker = EventBroker::new();
        let (sink, mut rx) = tsc_broker::ChannelSink::channel(4);
        let _sub = broker.subscribe(
            tsc_broker::SubscribeRequest { event: names::WAVEOBJ_UPDATE.into(), scopes: vec![], all_scopes: true },
            Arc::new(sink),
        );
        publish_store_updates(&ctx, &broker);
        assert!(rx.try_recv().is_ok());
    }
}
