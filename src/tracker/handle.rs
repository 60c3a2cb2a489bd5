use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

use crate::tracker::dom::{ElementId, ListenerId};
use crate::tracker::errors::TrackerError;
use crate::tracker::instance::TrackerId;
use crate::tracker::worker::TrackerCommand;

/// Host-side handle of a running tracker worker.
///
/// The host forwards what its DOM bindings observe: clicks caught by the delegated
/// listeners, window resizes and scrolls. Cloning is cheap; all clones talk to the same
/// worker. The worker stops once [`TrackerHandle::shutdown`] is called or every handle has
/// been dropped.
#[derive(Clone)]
pub struct TrackerHandle {
    id: TrackerId,
    cmd_tx: mpsc::Sender<TrackerCommand>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for TrackerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerHandle")
            .field("id", &self.id)
            .field("cmd_tx", &self.cmd_tx)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl TrackerHandle {
    pub(crate) fn new(id: TrackerId, cmd_tx: mpsc::Sender<TrackerCommand>, cancel: CancellationToken) -> Self {
        Self { id, cmd_tx, cancel }
    }

    pub fn id(&self) -> TrackerId {
        self.id
    }

    /// The delegated click `listener` fired for an interaction on `target`. Report each
    /// firing listener once per interaction.
    pub async fn click(&self, listener: ListenerId, target: ElementId) -> Result<(), TrackerError> {
        self.send(TrackerCommand::Click { listener, target }).await
    }

    /// Non-blocking variant of [`TrackerHandle::click`] for synchronous DOM callbacks.
    pub fn try_click(&self, listener: ListenerId, target: ElementId) -> Result<(), TrackerError> {
        self.try_send(TrackerCommand::Click { listener, target })
    }

    /// The window was resized.
    pub async fn resized(&self) -> Result<(), TrackerError> {
        self.send(TrackerCommand::Resize).await
    }

    /// The window was scrolled.
    pub async fn scrolled(&self) -> Result<(), TrackerError> {
        self.send(TrackerCommand::Scroll).await
    }

    /// Non-blocking resize/scroll notification. A full queue is not an error here: the
    /// pending notification already invalidates the viewport.
    pub fn try_notify_viewport_changed(&self) -> Result<(), TrackerError> {
        match self.try_send(TrackerCommand::Scroll) {
            Err(TrackerError::CommandQueueFull) => Ok(()),
            other => other,
        }
    }

    /// Stops the worker: the timer ends and click listeners are detached.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.cmd_tx.is_closed()
    }

    async fn send(&self, cmd: TrackerCommand) -> Result<(), TrackerError> {
        if self.cancel.is_cancelled() {
            return Err(TrackerError::ChannelClosed);
        }
        self.cmd_tx.send(cmd).await.map_err(|_| TrackerError::ChannelClosed)
    }

    fn try_send(&self, cmd: TrackerCommand) -> Result<(), TrackerError> {
        if self.cancel.is_cancelled() {
            return Err(TrackerError::ChannelClosed);
        }
        self.cmd_tx.try_send(cmd).map_err(|e| match e {
            TrySendError::Full(_) => TrackerError::CommandQueueFull,
            TrySendError::Closed(_) => TrackerError::ChannelClosed,
        })
    }
}
