//! Tracker configuration.
//!
//! `TrackerConfig` controls a single [`ComponentTracker`](crate::instance::ComponentTracker):
//! which component kinds it tracks, how often it rescans the document, and whether the
//! viewport is narrowed to a centered content column.
//!
//! `TrackerConfig` provides defaults via [`Default`] and a fluent [`TrackerConfig::builder()`]
//! for customization with validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_tracking::config::TrackerConfig;
//! let cfg = TrackerConfig::default();
//! assert_eq!(cfg.scan_interval.as_millis(), 500);
//! assert!(cfg.max_content_width.is_none());
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::time::Duration;
//! use gosub_tracking::config::TrackerConfig;
//! use gosub_tracking::kind::TrackedKinds;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = TrackerConfig::builder()
//!     .max_content_width(1200.0)
//!     .scan_interval(Duration::from_millis(250))
//!     .kinds(TrackedKinds::PRODUCT)
//!     .build()?; // returns Result<TrackerConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `max_content_width`: Width of a centered fixed-width layout. `None` uses raw viewport bounds.
//! - `detect_content_width`: Ask the host for the content column width at start when
//!   `max_content_width` is not set (default: off).
//! - `scan_interval`: Time between view scans (default: 500 ms). The first scan runs at start.
//! - `kinds`: Component kinds to track (default: products and campaigns).
//! - `command_capacity`: Capacity of the worker's command channel (default: 64).
//!
//! # Errors
//!
//! Builder validation can return [`ConfigError`] if values are invalid (e.g. a
//! non-positive `max_content_width`, a zero `scan_interval` or an empty `kinds` set).

use std::fmt;
use std::time::Duration;

use crate::tracker::kind::TrackedKinds;

pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub max_content_width: Option<f64>,
    pub detect_content_width: bool,
    pub scan_interval: Duration,
    pub kinds: TrackedKinds,
    pub command_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_content_width: None,
            detect_content_width: false,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            kinds: TrackedKinds::all(),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
        }
    }
}

impl TrackerConfig {
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

/// Builder for [`TrackerConfig`]
#[derive(Debug, Clone, Default)]
pub struct TrackerConfigBuilder {
    inner: TrackerConfig,
}

impl TrackerConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut TrackerConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn max_content_width(self, px: f64) -> Self { self.map(|c| c.max_content_width = Some(px)) }
    pub fn detect_content_width(self, on: bool) -> Self { self.map(|c| c.detect_content_width = on) }
    pub fn scan_interval(self, interval: Duration) -> Self { self.map(|c| c.scan_interval = interval) }
    pub fn kinds(self, kinds: TrackedKinds) -> Self { self.map(|c| c.kinds = kinds) }
    pub fn command_capacity(self, n: usize) -> Self { self.map(|c| c.command_capacity = n) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut TrackerConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<TrackerConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidContentWidth(f64),
    ZeroScanInterval,
    NoKinds,
    ZeroCommandCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidContentWidth(w) =>
                write!(f, "max_content_width {w} must be a positive, finite number of pixels"),
            ConfigError::ZeroScanInterval =>
                write!(f, "scan_interval must be longer than zero"),
            ConfigError::NoKinds =>
                write!(f, "at least one component kind must be tracked"),
            ConfigError::ZeroCommandCapacity =>
                write!(f, "command_capacity must be at least 1"),
        }
    }
}
impl std::error::Error for ConfigError {}

fn validate(c: &TrackerConfig) -> Result<(), ConfigError> {
    if let Some(w) = c.max_content_width {
        if !(w.is_finite() && w > 0.0) {
            return Err(ConfigError::InvalidContentWidth(w));
        }
    }
    if c.scan_interval.is_zero() {
        return Err(ConfigError::ZeroScanInterval);
    }
    if c.kinds.is_empty() {
        return Err(ConfigError::NoKinds);
    }
    if c.command_capacity == 0 {
        return Err(ConfigError::ZeroCommandCapacity);
    }
    Ok(())
}
