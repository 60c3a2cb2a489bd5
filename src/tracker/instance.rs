//! Tracker instance: owns all mutable tracking state.
//!
//! A [`ComponentTracker`] exclusively owns the viewed ledger, the cached viewport and the
//! click bindings of one page. Nothing is global, so several trackers (or tests) can run
//! side by side. The tracker itself is synchronous: ticks and clicks take `&mut self` and
//! therefore never interleave. [`TrackerWorker`](crate::worker::TrackerWorker) drives it
//! on a timer.

use std::fmt::{Display, Formatter};

use log::{debug, info, warn};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::tracker::click::ClickDispatcher;
use crate::tracker::config::TrackerConfig;
use crate::tracker::dom::{DomHost, ElementId, ListenerId};
use crate::tracker::emitter::{EventEmitter, EventSink};
use crate::tracker::errors::TrackerError;
use crate::tracker::handle::TrackerHandle;
use crate::tracker::scan::{ViewScanner, ViewedLedger};
use crate::tracker::tick::TickResult;
use crate::tracker::viewport::{BoundaryTracker, DocumentView};
use crate::tracker::worker::TrackerWorker;

/// A unique identifier for a tracker, represented as a UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackerId(Uuid);

impl TrackerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TrackerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a tracker
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Created, nothing bound, no scans yet
    #[default]
    Idle,
    /// Click listeners bound, ticks scan the document
    Running,
    /// Listeners detached; ticks and clicks are ignored
    TornDown,
}

pub struct ComponentTracker<H: DomHost> {
    id: TrackerId,
    label: String,
    host: H,
    config: TrackerConfig,
    state: TrackerState,
    boundaries: BoundaryTracker,
    ledger: ViewedLedger,
    clicks: ClickDispatcher,
    emitter: EventEmitter,
}

impl<H: DomHost> std::fmt::Debug for ComponentTracker<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTracker")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("config", &self.config)
            .field("ledger", &self.ledger)
            .finish()
    }
}

impl<H: DomHost> ComponentTracker<H> {
    /// Creates a tracker reading from `host` and appending events to `sink`. Nothing is
    /// bound or scanned until [`ComponentTracker::start`].
    pub fn new(
        host: H,
        config: TrackerConfig,
        sink: impl EventSink + Send + Sync + 'static,
    ) -> Result<Self, TrackerError> {
        config.validate()?;

        let id = TrackerId::new();
        Ok(Self {
            id,
            label: format!("Tracker[{}]", id),
            host,
            boundaries: BoundaryTracker::new(config.max_content_width),
            config,
            state: TrackerState::Idle,
            ledger: ViewedLedger::new(),
            clicks: ClickDispatcher::new(),
            emitter: EventEmitter::new(sink),
        })
    }

    pub fn id(&self) -> TrackerId {
        self.id
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TrackerState::Running
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn ledger(&self) -> &ViewedLedger {
        &self.ledger
    }

    pub fn click_dispatcher(&self) -> &ClickDispatcher {
        &self.clicks
    }

    /// Current viewport, computed on demand and cached until resize or scroll.
    pub fn viewport(&mut self) -> DocumentView {
        self.boundaries.current(&self.host)
    }

    /// Binds the delegated click listeners and computes the viewport.
    ///
    /// On a host without a document this fails with [`TrackerError::HostUnavailable`] and
    /// leaves the tracker untouched: nothing is bound and later ticks do nothing.
    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.state == TrackerState::Running {
            return Err(TrackerError::AlreadyStarted);
        }
        if !self.host.has_document() {
            warn!("{}: host has no document, not tracking", self.label);
            return Err(TrackerError::HostUnavailable);
        }

        if self.config.max_content_width.is_none() && self.config.detect_content_width {
            let detected = self.host.content_column_width().filter(|w| w.is_finite() && *w > 0.0);
            debug!("{}: detected content width {:?}", self.label, detected);
            self.boundaries.set_max_content_width(detected);
        }

        self.clicks.attach(&self.host, self.config.kinds)?;
        let view = self.boundaries.refresh(&self.host);
        self.state = TrackerState::Running;

        info!("{}: started, viewport {:?}", self.label, view.rect);
        Ok(())
    }

    /// One scan of the document. Does nothing unless running.
    pub fn tick(&mut self) -> TickResult {
        if self.state != TrackerState::Running {
            return TickResult::default();
        }

        let view = self.boundaries.current(&self.host);
        let result = ViewScanner::new(&self.host, &self.label).scan(
            self.config.kinds,
            &view,
            &mut self.ledger,
            &self.emitter,
        );
        if result.any() {
            debug!("{}: tick {:?}", self.label, result);
        }
        result
    }

    /// Handles one firing of a delegated click listener for an interaction on `target`.
    /// Returns the number of events emitted.
    pub fn click(&mut self, listener: ListenerId, target: ElementId) -> usize {
        if self.state != TrackerState::Running {
            return 0;
        }
        self.clicks.dispatch(&self.host, listener, target, &self.emitter)
    }

    pub fn on_resize(&mut self) {
        self.boundaries.invalidate();
    }

    pub fn on_scroll(&mut self) {
        self.boundaries.invalidate();
    }

    /// Detaches the click listeners. The ledger is kept, so restarting the same tracker
    /// does not report components twice.
    pub fn teardown(&mut self) {
        if self.state == TrackerState::TornDown {
            return;
        }
        self.clicks.detach(&self.host);
        self.state = TrackerState::TornDown;
        info!("{}: torn down", self.label);
    }

    /// Starts the tracker and wraps it in a worker plus the handle to talk to it. Use this
    /// for hosts that cannot move between threads (run the worker on a `LocalSet`).
    pub fn into_worker(mut self) -> Result<(TrackerWorker<H>, TrackerHandle), TrackerError> {
        self.start()?;
        Ok(TrackerWorker::new(self))
    }
}

impl<H: DomHost + Send + 'static> ComponentTracker<H> {
    /// Starts the tracker and spawns its worker on the current tokio runtime. The join
    /// handle yields the torn-down tracker once the worker stops.
    pub fn spawn(self) -> Result<(TrackerHandle, JoinHandle<ComponentTracker<H>>), TrackerError> {
        let (worker, handle) = self.into_worker()?;
        let join_handle = tokio::spawn(worker.run());
        Ok((handle, join_handle))
    }
}
