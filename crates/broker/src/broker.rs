// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process topic+scope publish/subscribe.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::event::BrokerEvent;
use crate::scope::{is_star_pattern, scope_matches};
use crate::sink::EventSink;
use crate::subscription::Subscription;

pub type SubscriptionId = u64;

#[derive(Default)]
struct PerEvent {
    all: HashSet<SubscriptionId>,
    exact: HashMap<String, HashSet<SubscriptionId>>,
    star: HashMap<String, HashSet<SubscriptionId>>,
}

struct Inner {
    events: Mutex<HashMap<String, PerEvent>>,
    sinks: Mutex<HashMap<SubscriptionId, Arc<dyn EventSink>>>,
    next_id: AtomicU64,
}

/// Request shape for [`EventBroker::subscribe`].
pub struct SubscribeRequest {
    pub event: String,
    pub scopes: Vec<String>,
    pub all_scopes: bool,
}

#[derive(Clone)]
pub struct EventBroker {
    inner: Arc<Inner>,
}

impl Default for EventBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBroker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                events: Mutex::new(HashMap::new()),
                sinks: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a subscriber, returning a raw id. Prefer [`EventBroker::subscribe`]
    /// for an RAII handle that cleans up on drop.
    pub fn subscribe_raw(&self, req: SubscribeRequest, sink: Arc<dyn EventSink>) -> SubscriptionId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.sinks.lock().insert(id, sink);
        let mut events = self.inner.events.lock();
        let per_event = events.entry(req.event.clone()).or_default();
        if req.all_scopes {
            per_event.all.insert(id);
        }
        for scope in req.scopes {
            if is_star_pattern(&scope) {
                per_event.star.entry(scope).or_default().insert(id);
            } else {
                per_event.exact.entry(scope).or_default().insert(id);
            }
        }
        debug!(event = %req.event, id, "broker subscribe");
        id
    }

    /// Register a subscriber and get back an RAII handle that unsubscribes
    /// on drop.
    pub fn subscribe(&self, req: SubscribeRequest, sink: Arc<dyn EventSink>) -> Subscription {
        let id = self.subscribe_raw(req, sink);
        Subscription::new(self.clone(), id)
    }

    /// Remove every trace of `id` from every event's subscription tables.
    pub fn unsubscribe_all(&self, id: SubscriptionId) {
        self.inner.sinks.lock().remove(&id);
        let mut events = self.inner.events.lock();
        for per_event in events.values_mut() {
            per_event.all.remove(&id);
            for ids in per_event.exact.values_mut() {
                ids.remove(&id);
            }
            for ids in per_event.star.values_mut() {
                ids.remove(&id);
            }
        }
        debug!(id, "broker unsubscribe");
    }

    /// Compute recipients and call `send` on each. Failures (subscriber
    /// gone) are swept after the publish lock is released.
    pub fn publish(&self, event: BrokerEvent) {
        let recipients = {
            let events = self.inner.events.lock();
            let Some(per_event) = events.get(&event.event) else {
                return;
            };
            let mut ids: HashSet<SubscriptionId> = per_event.all.iter().copied().collect();
            for scope in &event.scopes {
                if let Some(exact_ids) = per_event.exact.get(scope) {
                    ids.extend(exact_ids.iter().copied());
                }
                for (pattern, star_ids) in &per_event.star {
                    if scope_matches(pattern, scope) {
                        ids.extend(star_ids.iter().copied());
                    }
                }
            }
            ids
        };
        trace!(event = %event.event, recipients = recipients.len(), "broker publish");
        let sinks = self.inner.sinks.lock();
        let mut gone = Vec::new();
        for id in &recipients {
            if let Some(sink) = sinks.get(id) {
                if sink.send(event.clone()).is_err() {
                    gone.push(*id);
                }
            }
        }
        drop(sinks);
        for id in gone {
            self.unsubscribe_all(id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.sinks.lock().len()
    }
}
