//! Event bus for route and state transitions
//!
//! The router and the store notify their registered observers synchronously.
//! This module adds a second, decoupled channel: every committed transition
//! can also be published on an in-process broadcast bus, so tooling (trace
//! output, devtools panels, async consumers) can follow along without
//! registering as an observer.
//!
//! # Non-Blocking Behavior
//!
//! If no subscribers exist, events are dropped immediately. Subscribers can
//! lag without blocking emitters; a lagging subscriber loses the oldest
//! events first.
//!
//! # Example
//!
//! ```
//! use libwebui::events::{Event, EventBus, NavigationKind};
//!
//! let bus = EventBus::new(16);
//! let mut receiver = bus.subscribe();
//!
//! bus.emit(Event::route_changed("checkup", "", NavigationKind::Push));
//!
//! assert!(matches!(receiver.try_recv(), Ok(Event::RouteChanged { .. })));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Broadcast bus shared by a router and a store
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the specified per-subscriber capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Never blocks and never fails: with no receivers the event is dropped.
    pub fn emit(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    /// Number of live receivers. For diagnostics only.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// How a route change reached the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    /// New history entry (`navigate_to`)
    Push,
    /// Current history entry rewritten (`update_router_params`)
    Replace,
    /// Back/forward or initial load (`process_route`)
    Pop,
}

/// Transitions published on the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The router committed a new route
    RouteChanged {
        /// Page identifier (first path segment)
        page: String,
        /// Serialized query string, without the leading `?`
        query: String,
        navigation: NavigationKind,
        at: DateTime<Utc>,
    },

    /// An unknown path was rewritten to a known page
    RouteNormalized {
        requested_path: String,
        page: String,
        at: DateTime<Utc>,
    },

    /// The store committed the result of one action
    StateChanged {
        /// Action discriminant, e.g. `change-directory`
        action: String,
        /// Number of actions applied since the store was created
        sequence: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn route_changed(page: &str, query: &str, navigation: NavigationKind) -> Self {
        Event::RouteChanged {
            page: page.to_string(),
            query: query.to_string(),
            navigation,
            at: Utc::now(),
        }
    }

    pub fn route_normalized(requested_path: &str, page: &str) -> Self {
        Event::RouteNormalized {
            requested_path: requested_path.to_string(),
            page: page.to_string(),
            at: Utc::now(),
        }
    }

    pub fn state_changed(action: &str, sequence: u64) -> Self {
        Event::StateChanged {
            action: action.to_string(),
            sequence,
            at: Utc::now(),
        }
    }

    /// Render as a single JSON line for trace output
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
