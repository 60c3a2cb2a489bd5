//! Viewport boundaries for visibility checks.
//!
//! A [`ViewportRect`] is the part of the document the user can currently see, in document
//! coordinates. It is derived from the window's scroll offsets and size. Sites with a
//! centered fixed-width layout can configure a maximum content width: while the page is
//! not scrolled horizontally, the rectangle is then narrowed to the centered content
//! column so components in the side gutters are not counted as on screen.
//!
//! [`BoundaryTracker`] caches the computed [`DocumentView`] until the host reports a resize
//! or a scroll.
//!
//! # Examples
//!
//! ```
//! use gosub_tracking::viewport::ViewportRect;
//! use gosub_tracking::dom::WindowMetrics;
//!
//! let metrics = WindowMetrics { scroll_top: 100.0, scroll_left: 0.0, width: 1600.0, height: 900.0 };
//!
//! let raw = ViewportRect::from_metrics(&metrics, None);
//! assert_eq!((raw.top, raw.bottom, raw.left, raw.right), (100.0, 1000.0, 0.0, 1600.0));
//!
//! let centered = ViewportRect::from_metrics(&metrics, Some(1200.0));
//! assert_eq!((centered.left, centered.right), (200.0, 1400.0));
//! ```

use crate::tracker::dom::{DomHost, WindowMetrics};

/// Visible document area, in document coordinates.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct ViewportRect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl std::fmt::Debug for ViewportRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ViewportRect {{ top: {}, bottom: {}, left: {}, right: {} }}",
            self.top, self.bottom, self.left, self.right
        )
    }
}

impl ViewportRect {
    /// Computes the rectangle from window metrics.
    ///
    /// When `max_content_width` is set, narrower than the window, and the page is not
    /// scrolled horizontally, the horizontal bounds are recentered on the content column.
    pub fn from_metrics(metrics: &WindowMetrics, max_content_width: Option<f64>) -> Self {
        let top = metrics.scroll_top;
        let bottom = top + metrics.height;
        let mut left = metrics.scroll_left;
        let mut right = left + metrics.width;

        if let Some(max_width) = max_content_width {
            if max_width < right - left && left == 0.0 {
                left = (right - max_width) / 2.0;
                right = left + max_width;
            }
        }

        Self { top, bottom, left, right }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Viewport rectangle plus the raw scroll offsets, needed to turn document coordinates into
/// viewport coordinates for hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocumentView {
    pub rect: ViewportRect,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl DocumentView {
    pub fn from_metrics(metrics: &WindowMetrics, max_content_width: Option<f64>) -> Self {
        Self {
            rect: ViewportRect::from_metrics(metrics, max_content_width),
            scroll_left: metrics.scroll_left,
            scroll_top: metrics.scroll_top,
        }
    }

    /// Converts a document-coordinate point into viewport coordinates.
    pub fn to_viewport(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.scroll_left, y - self.scroll_top)
    }
}

/// Owns the cached [`DocumentView`] of a tracker.
#[derive(Debug, Clone, Default)]
pub struct BoundaryTracker {
    max_content_width: Option<f64>,
    cached: Option<DocumentView>,
}

impl BoundaryTracker {
    pub fn new(max_content_width: Option<f64>) -> Self {
        Self {
            max_content_width,
            cached: None,
        }
    }

    pub fn max_content_width(&self) -> Option<f64> {
        self.max_content_width
    }

    /// Changes the content width. Drops the cache.
    pub fn set_max_content_width(&mut self, width: Option<f64>) {
        self.max_content_width = width;
        self.cached = None;
    }

    /// Returns the cached view, computing it from the host's window metrics when needed.
    pub fn current<H: DomHost + ?Sized>(&mut self, host: &H) -> DocumentView {
        match self.cached {
            Some(view) => view,
            None => self.refresh(host),
        }
    }

    /// Recomputes the view right away.
    pub fn refresh<H: DomHost + ?Sized>(&mut self, host: &H) -> DocumentView {
        let view = DocumentView::from_metrics(&host.window_metrics(), self.max_content_width);
        self.cached = Some(view);
        view
    }

    /// Marks the cache stale; call on resize and scroll. Safe to call any number of times.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::testing::FakeDom;

    fn metrics(scroll_left: f64, scroll_top: f64, width: f64, height: f64) -> WindowMetrics {
        WindowMetrics {
            scroll_top,
            scroll_left,
            width,
            height,
        }
    }

    #[test]
    fn raw_bounds_without_content_width() {
        let r = ViewportRect::from_metrics(&metrics(30.0, 400.0, 1024.0, 768.0), None);
        assert_eq!(r.top, 400.0);
        assert_eq!(r.bottom, 1168.0);
        assert_eq!(r.left, 30.0);
        assert_eq!(r.right, 1054.0);
        assert_eq!(r.width(), 1024.0);
        assert_eq!(r.height(), 768.0);
    }

    #[test]
    fn centers_on_content_column() {
        let r = ViewportRect::from_metrics(&metrics(0.0, 0.0, 1920.0, 1080.0), Some(1000.0));
        assert_eq!(r.left, 460.0);
        assert_eq!(r.right, 1460.0);
        assert_eq!(r.top, 0.0);
        assert_eq!(r.bottom, 1080.0);
    }

    #[test]
    fn no_centering_when_content_is_wider_than_window() {
        let r = ViewportRect::from_metrics(&metrics(0.0, 0.0, 800.0, 600.0), Some(1000.0));
        assert_eq!((r.left, r.right), (0.0, 800.0));

        // equal width is not narrower either
        let r = ViewportRect::from_metrics(&metrics(0.0, 0.0, 1000.0, 600.0), Some(1000.0));
        assert_eq!((r.left, r.right), (0.0, 1000.0));
    }

    #[test]
    fn no_centering_once_scrolled_horizontally() {
        let r = ViewportRect::from_metrics(&metrics(10.0, 0.0, 1920.0, 1080.0), Some(1000.0));
        assert_eq!((r.left, r.right), (10.0, 1930.0));
    }

    #[test]
    fn document_view_converts_to_viewport_coordinates() {
        let view = DocumentView::from_metrics(&metrics(0.0, 500.0, 1920.0, 1080.0), Some(1000.0));
        // the recentered rectangle does not shift hit-test coordinates
        assert_eq!(view.to_viewport(600.0, 700.0), (600.0, 200.0));
    }

    #[test]
    fn boundary_tracker_caches_until_invalidated() {
        let dom = FakeDom::new(800.0, 600.0);
        let mut tracker = BoundaryTracker::new(None);
        assert!(!tracker.is_cached());

        let first = tracker.current(&dom);
        assert_eq!(first.rect.bottom, 600.0);

        dom.scroll_to(0.0, 300.0);
        assert_eq!(tracker.current(&dom), first, "cached view must survive until invalidated");

        tracker.invalidate();
        tracker.invalidate();
        let second = tracker.current(&dom);
        assert_eq!(second.rect.top, 300.0);
        assert_eq!(second.rect.bottom, 900.0);
        assert_eq!(second.scroll_top, 300.0);
    }

    #[test]
    fn changing_content_width_drops_cache() {
        let dom = FakeDom::new(1600.0, 900.0);
        let mut tracker = BoundaryTracker::new(None);
        assert_eq!(tracker.current(&dom).rect.left, 0.0);

        tracker.set_max_content_width(Some(1200.0));
        assert!(!tracker.is_cached());
        assert_eq!(tracker.current(&dom).rect.left, 200.0);
        assert_eq!(tracker.max_content_width(), Some(1200.0));
    }
}
