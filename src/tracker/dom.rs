//! Host capability interface.
//!
//! The tracker never touches a real DOM. Everything it needs (element lookup, attributes,
//! ancestry, geometry, computed style, point hit-testing, window metrics and delegated
//! listener registration) is read through [`DomHost`]. Any binding that satisfies this
//! trait is substitutable: a wasm DOM binding, a headless layout engine, or an in-memory
//! fake in tests.

use std::fmt;

/// Opaque handle of an element node, assigned by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of a delegated listener registered at the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Border box of an element in document coordinates (offset plus width/height).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ElementBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// A box without area has nothing to look at
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// CSS `display`, reduced to what the visibility check needs
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CssDisplay {
    #[default]
    Shown,
    None,
}

/// CSS `visibility`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CssVisibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

/// Computed style values consulted by the visibility evaluator.
///
/// `display` must be the *effective* value: an element inside a `display: none` subtree
/// reports [`CssDisplay::None`] even if its own declaration differs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: CssDisplay,
    pub visibility: CssVisibility,
    pub opacity: f64,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: CssDisplay::Shown,
            visibility: CssVisibility::Visible,
            opacity: 1.0,
        }
    }
}

/// Window scroll position and viewport size, in CSS pixels
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct WindowMetrics {
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub width: f64,
    pub height: f64,
}

/// DOM event types the tracker delegates
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DomEventType {
    Click,
}

impl DomEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomEventType::Click => "click",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    #[error("no document available")]
    NoDocument,

    #[error("cannot bind delegated '{event}' listener for '{selector}': {reason}")]
    BindFailed {
        event: &'static str,
        selector: String,
        reason: String,
    },
}

/// Read access to a live document plus delegated listener registration.
///
/// All lookups must reflect the document as it is at call time. The tracker caches nothing
/// it reads through this trait except the window metrics, which it re-reads after resize
/// and scroll notifications.
pub trait DomHost {
    /// Returns false when no document (or no query capability) is available. A tracker
    /// refuses to start on such a host.
    fn has_document(&self) -> bool;

    /// All elements matching an attribute-presence selector (`[data-...]`), in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Attribute value of an element, `None` when the attribute is absent.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Parent element, `None` when `element` is the root element or detached.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Border box in document coordinates, `None` when the element has no layout box.
    fn bounding_box(&self, element: ElementId) -> Option<ElementBox>;

    /// Computed style, `None` when style information is unavailable.
    fn computed_style(&self, element: ElementId) -> Option<ComputedStyle>;

    /// Topmost element at a point in viewport coordinates, `None` when nothing there takes
    /// hits.
    fn element_from_point(&self, x: f64, y: f64) -> Option<ElementId>;

    /// Current scroll offsets and viewport size.
    fn window_metrics(&self) -> WindowMetrics;

    /// Width of the site's main content column, when the host can tell.
    fn content_column_width(&self) -> Option<f64> {
        None
    }

    /// Registers one listener at the document for `event`, firing for targets inside
    /// elements matching `selector`. Each interaction is reported back to the tracker once
    /// per firing listener, through its handle, with the returned id and the raw target.
    fn bind_delegated(&self, event: DomEventType, selector: &str) -> Result<ListenerId, HostError>;

    /// Detaches a listener registered with [`DomHost::bind_delegated`].
    fn unbind(&self, listener: ListenerId);
}

impl<H: DomHost + ?Sized> DomHost for std::sync::Arc<H> {
    fn has_document(&self) -> bool {
        (**self).has_document()
    }
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        (**self).query_all(selector)
    }
    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        (**self).attribute(element, name)
    }
    fn parent(&self, element: ElementId) -> Option<ElementId> {
        (**self).parent(element)
    }
    fn bounding_box(&self, element: ElementId) -> Option<ElementBox> {
        (**self).bounding_box(element)
    }
    fn computed_style(&self, element: ElementId) -> Option<ComputedStyle> {
        (**self).computed_style(element)
    }
    fn element_from_point(&self, x: f64, y: f64) -> Option<ElementId> {
        (**self).element_from_point(x, y)
    }
    fn window_metrics(&self) -> WindowMetrics {
        (**self).window_metrics()
    }
    fn content_column_width(&self) -> Option<f64> {
        (**self).content_column_width()
    }
    fn bind_delegated(&self, event: DomEventType, selector: &str) -> Result<ListenerId, HostError> {
        (**self).bind_delegated(event, selector)
    }
    fn unbind(&self, listener: ListenerId) {
        (**self).unbind(listener)
    }
}
