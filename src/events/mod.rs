use crate::shared::state::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

pub const TOPIC_HEARTBEAT: &str = "heartbeat";
pub const TOPIC_LEAD_CREATED: &str = "lead:created";
pub const TOPIC_LEAD_UPDATED: &str = "lead:updated";

#[derive(Debug, Clone, Serialize)]
pub struct BusEvent {
    pub topic: String,
    pub payload: serde_json::Value,
    pub at: DateTime<Utc>,
}

type Handler = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Process-local publish/subscribe channel. Views that update leads
/// independently stay in sync by listening here instead of polling the
/// store. Delivery is synchronous and in registration order within a
/// topic; there is no ordering guarantee across topics and no delivery
/// guarantee across restarts.
pub struct EventBus {
    topics: Mutex<HashMap<String, Vec<(u64, Handler)>>>,
    last_update: Mutex<Option<DateTime<Utc>>>,
    next_id: AtomicU64,
    wire: broadcast::Sender<BusEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (wire, _) = broadcast::channel(256);
        Self {
            topics: Mutex::new(HashMap::new()),
            last_update: Mutex::new(None),
            next_id: AtomicU64::new(1),
            wire,
        }
    }

    /// Register a handler for a topic. The returned subscription removes
    /// exactly this registration when unsubscribed; other handlers on the
    /// same topic are untouched.
    pub fn subscribe<F>(self: &Arc<Self>, topic: &str, handler: F) -> Subscription
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut topics = self.topics.lock().expect("event bus poisoned");
        topics
            .entry(topic.to_string())
            .or_default()
            .push((id, Arc::new(handler)));
        Subscription {
            bus: Arc::clone(self),
            topic: topic.to_string(),
            id,
        }
    }

    fn unsubscribe(&self, topic: &str, id: u64) {
        let mut topics = self.topics.lock().expect("event bus poisoned");
        if let Some(handlers) = topics.get_mut(topic) {
            handlers.retain(|(hid, _)| *hid != id);
            if handlers.is_empty() {
                topics.remove(topic);
            }
        }
    }

    /// Invoke every handler registered for `topic`, in registration order,
    /// then stamp the channel-wide last-update time. The handler list is
    /// snapshotted before delivery, so handlers may publish or subscribe
    /// themselves; registrations made during delivery see the next publish.
    pub fn publish(&self, topic: &str, payload: serde_json::Value) {
        let handlers: Vec<Handler> = {
            let topics = self.topics.lock().expect("event bus poisoned");
            topics
                .get(topic)
                .map(|hs| hs.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };
        if !handlers.is_empty() {
            debug!("publishing {} to {} handler(s)", topic, handlers.len());
        }
        for handler in &handlers {
            handler(&payload);
        }
        *self.last_update.lock().expect("event bus poisoned") = Some(Utc::now());
        let event = BusEvent {
            topic: topic.to_string(),
            payload,
            at: Utc::now(),
        };
        // No SSE clients connected is fine.
        let _ = self.wire.send(event);
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.last_update.lock().expect("event bus poisoned")
    }

    pub fn wire_receiver(&self) -> broadcast::Receiver<BusEvent> {
        self.wire.subscribe()
    }

    #[cfg(test)]
    fn handler_count(&self, topic: &str) -> usize {
        self.topics
            .lock()
            .unwrap()
            .get(topic)
            .map(|h| h.len())
            .unwrap_or(0)
    }
}

/// Handle for one topic registration.
pub struct Subscription {
    bus: Arc<EventBus>,
    topic: String,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        self.bus.unsubscribe(&self.topic, self.id);
    }
}

/// Periodic liveness signal standing in for a real connection check.
/// Runs whether or not anyone is subscribed.
pub fn spawn_heartbeat(bus: Arc<EventBus>, secs: u64) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(secs));
        // interval fires immediately; the first heartbeat should wait a full period
        ticker.tick().await;
        loop {
            ticker.tick().await;
            bus.publish(
                TOPIC_HEARTBEAT,
                serde_json::json!({ "timestamp": Utc::now() }),
            );
        }
    })
}

async fn events_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.wire_receiver();
    let stream = BroadcastStream::new(rx).filter_map(|item| match item {
        Ok(ev) => {
            let data = serde_json::to_string(&ev.payload).unwrap_or_default();
            Some(Ok(Event::default().event(ev.topic).data(data)))
        }
        Err(e) => {
            warn!("SSE client lagged behind event bus: {}", e);
            None
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn events_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "connected": true,
        "last_update": state.events.last_update(),
    }))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(events_stream))
        .route("/events/status", get(events_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn delivers_in_registration_order() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s1 = seen.clone();
        let s2 = seen.clone();
        let _a = bus.subscribe("lead:updated", move |_| s1.lock().unwrap().push("first"));
        let _b = bus.subscribe("lead:updated", move |_| s2.lock().unwrap().push("second"));
        bus.publish("lead:updated", serde_json::json!({}));
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_registration() {
        let bus = Arc::new(EventBus::new());
        let count = Arc::new(AtomicUsize::new(0));
        let c1 = count.clone();
        let c2 = count.clone();
        let sub = bus.subscribe("heartbeat", move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let _keep = bus.subscribe("heartbeat", move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        });
        assert_eq!(bus.handler_count("heartbeat"), 2);
        sub.unsubscribe();
        assert_eq!(bus.handler_count("heartbeat"), 1);
        bus.publish("heartbeat", serde_json::json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn handlers_may_publish_reentrantly() {
        let bus = Arc::new(EventBus::new());
        let beats = Arc::new(AtomicUsize::new(0));
        let b = beats.clone();
        let _beat = bus.subscribe("heartbeat", move |_| {
            b.fetch_add(1, Ordering::SeqCst);
        });
        // a view reacting to a lead change by raising another event
        let relay_bus = Arc::clone(&bus);
        let _relay = bus.subscribe("lead:updated", move |_| {
            relay_bus.publish("heartbeat", serde_json::json!({}));
        });
        bus.publish("lead:updated", serde_json::json!({}));
        assert_eq!(beats.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handlers_may_subscribe_reentrantly() {
        let bus = Arc::new(EventBus::new());
        let sub_bus = Arc::clone(&bus);
        let _sub = bus.subscribe("lead:created", move |_| {
            let late = sub_bus.subscribe("lead:created", |_| {});
            late.unsubscribe();
        });
        // must not deadlock; the nested registration sees later publishes only
        bus.publish("lead:created", serde_json::json!({}));
        assert_eq!(bus.handler_count("lead:created"), 1);
    }

    #[test]
    fn publish_updates_last_update_even_without_subscribers() {
        let bus = Arc::new(EventBus::new());
        assert!(bus.last_update().is_none());
        bus.publish("lead:created", serde_json::json!({"id": "x"}));
        assert!(bus.last_update().is_some());
    }

    #[test]
    fn topics_are_isolated() {
        let bus = Arc::new(EventBus::new());
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _sub = bus.subscribe("lead:created", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish("lead:updated", serde_json::json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        bus.publish("lead:created", serde_json::json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_publishes_on_schedule() {
        let bus = Arc::new(EventBus::new());
        let beats = Arc::new(AtomicUsize::new(0));
        let b = beats.clone();
        let _sub = bus.subscribe(TOPIC_HEARTBEAT, move |_| {
            b.fetch_add(1, Ordering::SeqCst);
        });
        let handle = spawn_heartbeat(bus.clone(), 10);
        // paused clock: advancing 25s should yield two beats (t=10, t=20)
        tokio::time::sleep(std::time::Duration::from_secs(25)).await;
        handle.abort();
        assert_eq!(beats.load(Ordering::SeqCst), 2);
        assert!(bus.last_update().is_some());
    }
}
