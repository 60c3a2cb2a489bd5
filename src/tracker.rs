//! Component view and click tracking.
//!
//! Pages mark their product and campaign components with data attributes:
//!
//! - `data-view-marker-<kind>="<id>"` on the element whose visibility counts as a view,
//! - `data-click-marker-<kind>="<id>"` on the element whose clicks count,
//! - `data-list-name="<name>"` on a product or any of its ancestors; the closest one gives
//!   the product its list context.
//!
//! A [`ComponentTracker`] scans the document on an interval and reports every component the
//! first time it is visible (style, geometry and occlusion all pass), batched per kind per
//! scan. Clicks are caught through one delegated listener per kind and reported every
//! time. Events go to an [`EventSink`]: an [`EventQueue`], a `tokio` broadcast channel, or
//! anything else the host provides.
//!
//! The document is reached only through the [`DomHost`] trait, so the tracker runs against a
//! real embedder, a headless DOM or a test fake alike.
//!
//! # Available types
//!
//! - [`ComponentTracker`] owns the ledger, viewport cache and click bindings of one page.
//! - [`TrackerWorker`] / [`TrackerHandle`] run a tracker on a tokio task.
//! - [`TrackerConfig`] and its builder.
//! - [`TrackingEvent`] is the serializable event record.
//! - [`ViewportRect`], [`BoundaryTracker`] compute the visible document region.
//! - [`VisibilityEvaluator`] decides whether one element is visible.
//!
//! # Example
//!
//! ```no_run
//! use gosub_tracking::{ComponentTracker, DomHost, EventQueue, TrackerConfig};
//!
//! async fn track<H: DomHost + Send + 'static>(host: H) -> Result<(), gosub_tracking::TrackerError> {
//!     let queue = EventQueue::new();
//!     let tracker = ComponentTracker::new(host, TrackerConfig::default(), queue.clone())?;
//!     let (handle, join) = tracker.spawn()?;
//!
//!     // ... forward clicks, scrolls and resizes through `handle` ...
//!
//!     handle.shutdown();
//!     let _tracker = join.await.expect("worker panicked");
//!     for event in queue.snapshot() {
//!         println!("{}", event.to_json());
//!     }
//!     Ok(())
//! }
//! ```

/// Delegated click handling.
pub mod click;
pub mod config;
/// Host document capability trait and geometry/style types.
pub mod dom;
/// Event sinks and the emitter.
pub mod emitter;
pub mod errors;
/// Analytics event records.
pub mod events;
pub mod handle;
pub mod instance;
/// Component kinds, marker attributes and ids.
pub mod kind;
pub mod locator;
/// Periodic view scanning and the viewed ledger.
pub mod scan;
pub mod tick;
pub mod viewport;
pub mod visibility;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use click::ClickDispatcher;
pub use config::{ConfigError, TrackerConfig, TrackerConfigBuilder};
pub use dom::{DomHost, ElementBox, ElementId, HostError, ListenerId};
pub use emitter::{EventEmitter, EventQueue, EventSink};
pub use errors::TrackerError;
pub use events::{EventCategory, EventName, TrackingEvent};
pub use handle::TrackerHandle;
pub use instance::{ComponentTracker, TrackerId, TrackerState};
pub use kind::{ComponentId, ComponentKind, MarkerRelation, TrackedKinds};
pub use locator::Locator;
pub use scan::{ViewScanner, ViewedLedger};
pub use tick::TickResult;
pub use viewport::{BoundaryTracker, DocumentView, ViewportRect};
pub use visibility::{Visibility, VisibilityEvaluator};
pub use worker::{TrackerCommand, TrackerWorker};
