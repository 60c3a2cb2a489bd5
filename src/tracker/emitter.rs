//! Event emitter and event sinks.
//!
//! The tracker only ever appends to the shared event bus; it never reads or clears it.
//! [`EventSink`] is that narrow append-only contract. Two sinks ship with the crate:
//!
//! - [`EventQueue`]: a shared, append-only queue, the model of a page's analytics `events`
//!   array. Downstream integrations read snapshots of it.
//! - `tokio::sync::broadcast::Sender<TrackingEvent>`: fan-out to async subscribers.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use log::{debug, trace};
use tokio::sync::broadcast;

use crate::tracker::events::{ListItem, TrackingEvent};
use crate::tracker::kind::ComponentId;

/// Append-only destination for tracking events.
pub trait EventSink {
    fn push(&self, event: TrackingEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn push(&self, event: TrackingEvent) {
        (**self).push(event)
    }
}

impl EventSink for broadcast::Sender<TrackingEvent> {
    fn push(&self, event: TrackingEvent) {
        // No subscribers is fine: the bus is fire and forget
        if self.send(event).is_err() {
            trace!("tracking event dropped, no subscribers on the event bus");
        }
    }
}

/// Shared append-only event queue. Cloning shares the same queue.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Arc<RwLock<Vec<TrackingEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<TrackingEvent>> {
        self.events.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of all events pushed so far, oldest first
    pub fn snapshot(&self) -> Vec<TrackingEvent> {
        self.read().clone()
    }

    /// Events pushed after the first `offset` ones. Lets a consumer keep a cursor.
    pub fn since(&self, offset: usize) -> Vec<TrackingEvent> {
        self.read().iter().skip(offset).cloned().collect()
    }
}

impl EventSink for EventQueue {
    fn push(&self, event: TrackingEvent) {
        self.events
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

/// Packages viewed/clicked events and hands them to a sink.
pub struct EventEmitter {
    sink: Box<dyn EventSink + Send + Sync>,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter").field("sink", &"Box<dyn EventSink + Send + Sync>").finish()
    }
}

impl EventEmitter {
    pub fn new(sink: impl EventSink + Send + Sync + 'static) -> Self {
        Self { sink: Box::new(sink) }
    }

    pub fn viewed_products(&self, list_items: Vec<ListItem>) {
        self.emit(TrackingEvent::viewed_products(list_items));
    }

    pub fn viewed_campaigns(&self, campaigns: Vec<ComponentId>) {
        self.emit(TrackingEvent::viewed_campaigns(campaigns));
    }

    pub fn clicked_product(&self, list_item: ListItem) {
        self.emit(TrackingEvent::clicked_product(list_item));
    }

    pub fn clicked_campaign(&self, campaign: &ComponentId) {
        self.emit(TrackingEvent::clicked_campaign(campaign));
    }

    fn emit(&self, event: TrackingEvent) {
        debug!("emitting '{}' ({} item(s))", event.name, event.item_count());
        self.sink.push(event);
    }
}
