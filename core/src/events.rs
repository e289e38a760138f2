//! Lifecycle hooks for every request passing through the client.
//!
//! # Design
//! Three fixed topics, each with an ordered listener list. `subscribe`
//! hands back a [`Subscription`] handle and `unsubscribe` removes by that
//! handle, so closures never need to be compared.
//!
//! `publish` snapshots the topic's listeners and invokes them after the
//! registry lock is released: a listener may subscribe or unsubscribe
//! without deadlocking, and the change applies from the next publish on.
//! A panicking listener is not isolated; it unwinds into the request that
//! published the event.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::http::{HttpMethod, HttpResponse, QueryParams};

/// Event topics published by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiEvent {
    /// Published before a request is dispatched.
    BeforeRequest,
    /// Published once the transport returned a response, whatever its status.
    AfterRequest,
    /// Published when the API could not be reached at all.
    ServerClash,
}

impl ApiEvent {
    pub const ALL: [ApiEvent; 3] = [
        ApiEvent::BeforeRequest,
        ApiEvent::AfterRequest,
        ApiEvent::ServerClash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApiEvent::BeforeRequest => "beforeRequest",
            ApiEvent::AfterRequest => "afterRequest",
            ApiEvent::ServerClash => "serverClash",
        }
    }

    fn slot(self) -> usize {
        match self {
            ApiEvent::BeforeRequest => 0,
            ApiEvent::AfterRequest => 1,
            ApiEvent::ServerClash => 2,
        }
    }
}

impl fmt::Display for ApiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What listeners get to see of a call. `response` is only set for
/// [`ApiEvent::AfterRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct EventPayload {
    pub uri: String,
    pub method: HttpMethod,
    pub params: Option<QueryParams>,
    pub data: Option<Value>,
    pub response: Option<HttpResponse>,
}

pub type Listener = Arc<dyn Fn(Option<&EventPayload>) + Send + Sync>;

/// Handle returned by [`EventHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: ApiEvent,
    id: u64,
}

impl Subscription {
    pub fn event(&self) -> ApiEvent {
        self.event
    }
}

/// Shared by every hub so a handle from one hub never matches a listener on
/// another.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Default)]
pub struct EventHub {
    topics: Mutex<[Vec<(u64, Listener)>; 3]>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, event: ApiEvent, listener: F) -> Subscription
    where
        F: Fn(Option<&EventPayload>) + Send + Sync + 'static,
    {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        self.lock()[event.slot()].push((id, Arc::new(listener)));
        Subscription { event, id }
    }

    /// Remove a listener. Returns `false` if the handle was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut topics = self.lock();
        let listeners = &mut topics[subscription.event.slot()];
        match listeners.iter().position(|(id, _)| *id == subscription.id) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invoke every listener of `event` in subscription order.
    pub fn publish(&self, event: ApiEvent, payload: Option<&EventPayload>) {
        let listeners: Vec<Listener> = self.lock()[event.slot()]
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        tracing::trace!(
            event = event.as_str(),
            listeners = listeners.len(),
            "publishing api event"
        );
        for listener in listeners {
            listener(payload);
        }
    }

    pub fn listener_count(&self, event: ApiEvent) -> usize {
        self.lock()[event.slot()].len()
    }

    fn lock(&self) -> MutexGuard<'_, [Vec<(u64, Listener)>; 3]> {
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event in ApiEvent::ALL {
            map.entry(&event.as_str(), &self.listener_count(event));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(
        hub: &EventHub,
        event: ApiEvent,
        tag: &'static str,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Subscription {
        let log = Arc::clone(log);
        hub.subscribe(event, move |_| log.lock().unwrap().push(tag))
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let hub = EventHub::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&hub, ApiEvent::BeforeRequest, "a", &log);
        recorder(&hub, ApiEvent::BeforeRequest, "b", &log);
        recorder(&hub, ApiEvent::BeforeRequest, "c", &log);

        hub.publish(ApiEvent::BeforeRequest, None);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let hub = EventHub::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&hub, ApiEvent::AfterRequest, "a", &log);
        let b = recorder(&hub, ApiEvent::AfterRequest, "b", &log);
        recorder(&hub, ApiEvent::AfterRequest, "c", &log);

        assert!(hub.unsubscribe(b));
        hub.publish(ApiEvent::AfterRequest, None);
        assert_eq!(*log.lock().unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn unsubscribing_twice_is_a_noop() {
        let hub = EventHub::new();
        let sub = hub.subscribe(ApiEvent::ServerClash, |_| {});
        assert!(hub.unsubscribe(sub));
        assert!(!hub.unsubscribe(sub));
        assert_eq!(hub.listener_count(ApiEvent::ServerClash), 0);
    }

    #[test]
    fn handle_from_another_hub_removes_nothing() {
        let a = EventHub::new();
        let b = EventHub::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&b, ApiEvent::ServerClash, "b", &log);
        let foreign = a.subscribe(ApiEvent::ServerClash, |_| {});

        assert!(!b.unsubscribe(foreign));
        b.publish(ApiEvent::ServerClash, None);
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
        assert_eq!(a.listener_count(ApiEvent::ServerClash), 1);
    }

    #[test]
    fn topics_are_independent() {
        let hub = EventHub::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&hub, ApiEvent::BeforeRequest, "before", &log);
        recorder(&hub, ApiEvent::ServerClash, "clash", &log);

        hub.publish(ApiEvent::ServerClash, None);
        assert_eq!(*log.lock().unwrap(), vec!["clash"]);
    }

    #[test]
    fn same_closure_may_be_registered_twice() {
        let hub = EventHub::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&hub, ApiEvent::BeforeRequest, "x", &log);
        recorder(&hub, ApiEvent::BeforeRequest, "x", &log);

        hub.publish(ApiEvent::BeforeRequest, None);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn listener_receives_payload() {
        let hub = EventHub::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        hub.subscribe(ApiEvent::BeforeRequest, move |payload| {
            *sink.lock().unwrap() = payload.map(|p| p.uri.clone());
        });

        let payload = EventPayload {
            uri: "/users".to_string(),
            method: HttpMethod::Get,
            params: None,
            data: None,
            response: None,
        };
        hub.publish(ApiEvent::BeforeRequest, Some(&payload));
        assert_eq!(seen.lock().unwrap().as_deref(), Some("/users"));
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_publish() {
        let hub = Arc::new(EventHub::new());
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let (hub_ref, slot_ref) = (Arc::clone(&hub), Arc::clone(&slot));
        let sub = hub.subscribe(ApiEvent::ServerClash, move |_| {
            if let Some(sub) = slot_ref.lock().unwrap().take() {
                hub_ref.unsubscribe(sub);
            }
        });
        *slot.lock().unwrap() = Some(sub);

        hub.publish(ApiEvent::ServerClash, None);
        assert_eq!(hub.listener_count(ApiEvent::ServerClash), 0);
    }
}
