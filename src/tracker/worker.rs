use std::time::Duration;

use log::{debug, trace};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::tracker::dom::{DomHost, ElementId, ListenerId};
use crate::tracker::handle::TrackerHandle;
use crate::tracker::instance::ComponentTracker;

/// Notifications the host forwards to a running tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCommand {
    /// A delegated click listener fired for this target element
    Click { listener: ListenerId, target: ElementId },
    /// Window has been resized
    Resize,
    /// Window has been scrolled
    Scroll,
}

/// Drives a started [`ComponentTracker`]: one scan right away, then one per scan interval,
/// with host notifications handled in between. Everything runs on a single task, so a
/// scan and a click never overlap.
pub struct TrackerWorker<H: DomHost> {
    tracker: ComponentTracker<H>,
    cmd_rx: mpsc::Receiver<TrackerCommand>,
    cancel: CancellationToken,
    interval: Duration,
}

impl<H: DomHost> TrackerWorker<H> {
    pub(crate) fn new(tracker: ComponentTracker<H>) -> (Self, TrackerHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(tracker.config().command_capacity);
        let cancel = CancellationToken::new();
        let handle = TrackerHandle::new(tracker.id(), cmd_tx, cancel.clone());
        let interval = tracker.config().scan_interval;

        let worker = Self {
            tracker,
            cmd_rx,
            cancel,
            interval,
        };
        (worker, handle)
    }

    /// Runs until shutdown is requested or every handle is gone, then tears the tracker
    /// down and hands it back.
    pub async fn run(mut self) -> ComponentTracker<H> {
        let mut ticker = tokio::time::interval(self.interval);
        // a slow scan delays the next one instead of causing a burst
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                cmd = self.cmd_rx.recv() => {
                    let Some(cmd) = cmd else {
                        break; // all handles dropped
                    };
                    self.handle_command(cmd);
                }
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        debug!("Tracker[{}]: worker stopping", self.tracker.id());
        self.tracker.teardown();
        self.tracker
    }

    pub fn handle_command(&mut self, cmd: TrackerCommand) {
        trace!("Tracker[{}]: command {:?}", self.tracker.id(), cmd);
        match cmd {
            TrackerCommand::Click { listener, target } => {
                self.tracker.click(listener, target);
            }
            TrackerCommand::Resize => self.tracker.on_resize(),
            TrackerCommand::Scroll => self.tracker.on_scroll(),
        }
    }

    pub fn tick(&mut self) {
        self.tracker.tick();
    }
}
