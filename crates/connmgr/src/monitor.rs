// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness monitor: one per connected connection, bound to a specific
//! client handle captured at creation and never swapped. Lock ordering
//! invariant: `conn.lock` is always acquired before `monitor.lock` -- this
//! monitor holds no lock of its own across an await point and only ever
//! touches connection state through `ConnEntry`'s own setters.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tsc_core::Clock;

use crate::client::SshClient;
use crate::entry::ConnEntry;
use crate::state::HealthStatus;

const TICK_INTERVAL: Duration = Duration::from_secs(5);
const URGENT_WINDOW: Duration = Duration::from_secs(10);

fn keep_alive_threshold(urgent: bool) -> Duration {
    if urgent {
        Duration::from_secs(1)
    } else {
        Duration::from_secs(10)
    }
}

fn stalled_threshold(urgent: bool) -> Duration {
    if urgent {
        Duration::from_secs(5)
    } else {
        Duration::from_secs(10)
    }
}

pub struct LivenessMonitor<C: Clock> {
    entry: Arc<ConnEntry>,
    client: Arc<dyn SshClient>,
    clock: C,
    cancel: CancellationToken,
    input_rx: mpsc::Receiver<u64>,
}

impl<C: Clock> LivenessMonitor<C> {
    /// Installs the length-1 `inputNotifyCh` on `entry` so `notify_input`
    /// can reach this monitor while it runs; cleared again when `run`
    /// returns.
    pub fn new(entry: Arc<ConnEntry>, client: Arc<dyn SshClient>, clock: C, cancel: CancellationToken) -> Self {
        let (tx, rx) = mpsc::channel(1);
        entry.set_input_notify_tx(Some(tx));
        Self { entry, client, clock, cancel, input_rx: rx }
    }

    /// Run the 5s keep-alive ticker until cancelled or the bound client is
    /// replaced by a later connect.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(connection = %self.entry.opts.name(), "monitor cancelled");
                    self.entry.set_input_notify_tx(None);
                    return;
                }
                _ = ticker.tick() => {
                    if !self.entry.client_ptr_eq(&self.client) {
                        debug!(connection = %self.entry.opts.name(), "monitor's client handle is stale, exiting");
                        self.entry.set_input_notify_tx(None);
                        return;
                    }
                    self.check_connection().await;
                }
                Some(input_time_ms) = self.input_rx.recv() => {
                    self.on_input_notify(input_time_ms).await;
                }
            }
        }
    }

    /// One iteration of `checkConnection`.
    pub async fn check_connection(&self) {
        let now_ms = self.clock.epoch_ms();
        let last_activity = self.entry.last_activity_ms.load(Ordering::Relaxed);
        if last_activity == 0 {
            return;
        }
        let last_input = self.entry.last_input_ms.load(Ordering::Relaxed);
        let urgent = now_ms.saturating_sub(last_input) < URGENT_WINDOW.as_millis() as u64;
        let keep_alive_threshold_ms = keep_alive_threshold(urgent).as_millis() as u64;
        let stalled_threshold_ms = stalled_threshold(urgent).as_millis() as u64;

        if now_ms.saturating_sub(last_activity) > keep_alive_threshold_ms {
            self.maybe_send_keepalive(now_ms).await;
        }

        if self.entry.keep_alive_in_flight.load(Ordering::Relaxed) {
            let sent = self.entry.keep_alive_sent_ms.load(Ordering::Relaxed);
            if now_ms.saturating_sub(sent) > stalled_threshold_ms {
                self.entry.set_health(HealthStatus::Stalled);
            }
        }
    }

    /// Issue the keep-alive on its own task rather than awaiting it here:
    /// a hung `send_keepalive` must not wedge `run`'s select loop, and
    /// `keep_alive_in_flight` must stay observably `true` (cleared only
    /// when the spawned task finishes) so a later tick's stalled check
    /// can see a request that never came back.
    async fn maybe_send_keepalive(&self, now_ms: u64) {
        if self
            .entry
            .keep_alive_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        self.entry.keep_alive_sent_ms.store(now_ms, Ordering::Relaxed);

        let entry = Arc::clone(&self.entry);
        let client = Arc::clone(&self.client);
        let clock = self.clock.clone();
        tokio::spawn(async move {
            match client.send_keepalive().await {
                Ok(()) => {
                    entry.record_activity(clock.epoch_ms());
                    entry.set_health(HealthStatus::Good);
                }
                Err(e) => {
                    warn!(connection = %entry.opts.name(), error = %e, "keep-alive request failed");
                }
            }
            entry.keep_alive_in_flight.store(false, Ordering::Relaxed);
        });
    }

    /// React to `NotifyInput`: wait 1s, then if activity hasn't caught up
    /// to the input timestamp, mark degraded and re-run `checkConnection`
    /// immediately.
    pub async fn on_input_notify(&self, input_time_ms: u64) {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        if self.entry.last_activity_ms.load(Ordering::Relaxed) < input_time_ms {
            self.entry.set_health(HealthStatus::Degraded);
            self.check_connection().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeSshClient;
    use crate::sshopts::SshOpts;
    use tsc_core::FakeClock;

    fn monitor(entry: Arc<ConnEntry>, client: FakeSshClient, clock: FakeClock) -> LivenessMonitor<FakeClock> {
        LivenessMonitor::new(entry, Arc::new(client), clock, CancellationToken::new())
    }

    #[tokio::test]
    async fn no_activity_yet_is_a_no_op() {
        let entry = Arc::new(ConnEntry::new(SshOpts::parse("host1")));
        let client = FakeSshClient::new();
        let clock = FakeClock::new();
        let mon = monitor(entry.clone(), client.clone(), clock);
        mon.check_connection().await;
        assert_eq!(client.keepalive_count(), 0);
    }

    #[tokio::test]
    async fn stale_activity_triggers_a_keepalive() {
        let entry = Arc::new(ConnEntry::new(SshOpts::parse("host1")));
        let client = FakeSshClient::new();
        let clock = FakeClock::new();
        entry.record_activity(clock.epoch_ms());
        clock.advance(Duration::from_secs(11));
        let mon = monitor(entry.clone(), client.clone(), clock);
        mon.check_connection().await;
        // The send happens on its own task; immediately after
        // `check_connection` returns the request must still be observably
        // in flight, not already cleared.
        assert!(entry.keep_alive_in_flight.load(Ordering::Relaxed));
        tokio::task::yield_now().await;
        assert_eq!(client.keepalive_count(), 1);
        assert_eq!(entry.health(), HealthStatus::Good);
        assert!(!entry.keep_alive_in_flight.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn urgent_window_uses_the_tighter_one_second_threshold() {
        let entry = Arc::new(ConnEntry::new(SshOpts::parse("host1")));
        let client = FakeSshClient::new();
        let clock = FakeClock::new();
        entry.record_activity(clock.epoch_ms());
        entry.notify_input(clock.epoch_ms());
        clock.advance(Duration::from_millis(1100));
        let mon = monitor(entry.clone(), client.clone(), clock);
        mon.check_connection().await;
        tokio::task::yield_now().await;
        assert_eq!(client.keepalive_count(), 1);
    }

    #[tokio::test]
    async fn a_second_check_while_one_keepalive_is_in_flight_does_not_double_send() {
        let entry = Arc::new(ConnEntry::new(SshOpts::parse("host1")));
        entry.keep_alive_in_flight.store(true, Ordering::Relaxed);
        let client = FakeSshClient::new();
        let clock = FakeClock::new();
        entry.record_activity(clock.epoch_ms());
        clock.advance(Duration::from_secs(11));
        let mon = monitor(entry.clone(), client.clone(), clock);
        mon.check_connection().await;
        assert_eq!(client.keepalive_count(), 0);
    }

    #[tokio::test]
    async fn an_in_flight_request_that_never_returns_eventually_reads_as_stalled() {
        let entry = Arc::new(ConnEntry::new(SshOpts::parse("host1")));
        entry.keep_alive_in_flight.store(true, Ordering::Relaxed);
        let client = FakeSshClient::new();
        let clock = FakeClock::new();
        entry.record_activity(clock.epoch_ms());
        entry.keep_alive_sent_ms.store(clock.epoch_ms(), Ordering::Relaxed);
        clock.advance(Duration::from_secs(11));
        let mon = monitor(entry.clone(), client.clone(), clock);
        mon.check_connection().await;
        assert_eq!(entry.health(), HealthStatus::Stalled);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn notify_input_without_activity_catchup_marks_degraded() {
        let entry = Arc::new(ConnEntry::new(SshOpts::parse("host1")));
        let client = FakeSshClient::new();
        let clock = FakeClock::new();
        entry.record_activity(clock.epoch_ms());
        let cancel = CancellationToken::new();
        let mon = LivenessMonitor::new(entry.clone(), Arc::new(client), clock.clone(), cancel.clone());
        let handle = tokio::spawn(mon.run());

        clock.advance(Duration::from_millis(50));
        entry.notify_input(clock.epoch_ms());

        tokio::time::advance(Duration::from_millis(1100)).await;
        assert_eq!(entry.health(), HealthStatus::Degraded);

        cancel.cancel();
        handle.await.unwrap();
    }
}
