//! Visibility evaluator.
//!
//! Decides whether an element is "really seen". Being present in the document is not
//! enough, and neither is being scrolled into bounds. An element counts as visible only
//! when all three checks below pass, in this order:
//!
//! 1. **Style**: effectively displayed, non-zero opacity, not `visibility: hidden`
//!    (or `collapse`), and a layout box with an area.
//! 2. **Overlap**: at least three quarters of its height lies inside the viewport
//!    vertically, and three quarters of its width horizontally. Boundaries are inclusive.
//! 3. **Occlusion**: hit-testing the element's center point lands on the element itself or
//!    on one of its descendants. Overlays, modals and siblings painted on top fail this.
//!
//! The evaluator has no state and no side effects. It reads the host and the
//! [`DocumentView`] it is handed.

use crate::tracker::dom::{CssDisplay, CssVisibility, DomHost, ElementBox, ElementId};
use crate::tracker::viewport::{DocumentView, ViewportRect};

/// Outcome of a visibility evaluation. Only [`Visibility::Visible`] counts as seen; the
/// other variants say which check rejected the element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// All checks passed
    Visible,
    /// Hidden by CSS (display, opacity or visibility)
    Hidden,
    /// No usable geometry (no box, zero width or height, no style information)
    NoGeometry,
    /// Less than three quarters on screen along at least one axis
    OutOfBounds,
    /// Something else is painted over the element's center
    Occluded,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Fraction of each dimension that may lie outside the viewport.
const TOLERANCE: f64 = 0.25;

pub struct VisibilityEvaluator<'a, H: DomHost + ?Sized> {
    host: &'a H,
}

impl<'a, H: DomHost + ?Sized> VisibilityEvaluator<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    pub fn is_visible(&self, element: ElementId, view: &DocumentView) -> bool {
        self.evaluate(element, view).is_visible()
    }

    /// Runs all checks and reports the first one that fails.
    pub fn evaluate(&self, element: ElementId, view: &DocumentView) -> Visibility {
        let Some(style) = self.host.computed_style(element) else {
            return Visibility::NoGeometry;
        };
        if style.display == CssDisplay::None
            || !(style.opacity > 0.0)
            || style.visibility != CssVisibility::Visible
        {
            return Visibility::Hidden;
        }

        let Some(bbox) = self.host.bounding_box(element) else {
            return Visibility::NoGeometry;
        };
        if bbox.is_empty() {
            return Visibility::NoGeometry;
        }

        if !fits_viewport(&bbox, &view.rect) {
            return Visibility::OutOfBounds;
        }

        if !self.is_unobstructed(element, &bbox, view) {
            return Visibility::Occluded;
        }

        Visibility::Visible
    }

    /// Hit-tests the center of `bbox` and walks up from the hit until `element` is found or
    /// the root is passed.
    fn is_unobstructed(&self, element: ElementId, bbox: &ElementBox, view: &DocumentView) -> bool {
        let (x, y) = view.to_viewport(bbox.left + bbox.width / 2.0, bbox.top + bbox.height / 2.0);

        let mut current = self.host.element_from_point(x, y);
        while let Some(hit) = current {
            if hit == element {
                return true;
            }
            current = self.host.parent(hit);
        }
        false
    }
}

/// Three-quarter overlap test on both axes.
pub fn fits_viewport(bbox: &ElementBox, rect: &ViewportRect) -> bool {
    let slack_y = bbox.height * TOLERANCE;
    let slack_x = bbox.width * TOLERANCE;

    let fits_vertical = bbox.bottom() - slack_y <= rect.bottom && bbox.top + slack_y >= rect.top;
    let fits_horizontal = bbox.left + slack_x >= rect.left && bbox.right() - slack_x <= rect.right;

    fits_vertical && fits_horizontal
}
