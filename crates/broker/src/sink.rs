// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The capability a subscriber hands the broker: a non-blocking send.

use crate::error::BrokerError;
use crate::event::BrokerEvent;
use tokio::sync::mpsc;

pub trait EventSink: Send + Sync {
    /// Deliver `event`. Must not block; `Err` means the subscriber is gone
    /// and should be swept from the subscription tables.
    fn send(&self, event: BrokerEvent) -> Result<(), BrokerError>;
}

/// The default sink: a bounded mpsc channel. A full or closed channel is
/// treated as "gone" rather than blocking the publisher.
pub struct ChannelSink {
    tx: mpsc::Sender<BrokerEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<BrokerEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink/receiver pair with the given channel capacity.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<BrokerEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn send(&self, event: BrokerEvent) -> Result<(), BrokerError> {
        self.tx.try_send(event).map_err(|_| BrokerError::SubscriberGone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn delivers_to_the_paired_receiver() {
        let (sink, mut rx) = ChannelSink::channel(4);
        sink.send(BrokerEvent::new("workspace:update", json!({"a": 1}))).unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, "workspace:update");
    }

    #[test]
    fn send_after_receiver_dropped_is_an_error() {
        let (sink, rx) = ChannelSink::channel(4);
        drop(rx);
        assert!(sink.send(BrokerEvent::new("x", json!(null))).is_err());
    }
}
