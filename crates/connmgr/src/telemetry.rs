// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget telemetry on connection state transitions, modeled as
//! an injected sink so the core is usable with a null sink in tests and
//! in deployments with telemetry disabled.

/// A single telemetry event, e.g. `ssh:connect` or `ssh:connecterror`.
#[derive(Debug, Clone)]
pub struct TelemetryEvent {
    pub name: &'static str,
    pub connection: String,
    pub detail: Option<String>,
}

pub trait TelemetrySink: Send + Sync + 'static {
    fn record(&self, event: TelemetryEvent);
}

/// Discards every event. The default for tests and for deployments that
/// opt out of telemetry.
#[derive(Default)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct RecordingTelemetrySink {
        events: Arc<Mutex<Vec<TelemetryEvent>>>,
    }

    impl RecordingTelemetrySink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<TelemetryEvent> {
            self.events.lock().clone()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            self.events.lock().push(event);
        }
    }
}
