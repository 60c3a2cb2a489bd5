use crate::tracker::config::ConfigError;
use crate::tracker::dom::HostError;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Host has no document, tracking disabled")]
    HostUnavailable,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Tracker is already started")]
    AlreadyStarted,

    #[error("Tracker has stopped")]
    ChannelClosed,

    #[error("Tracker command queue is full")]
    CommandQueueFull,
}
