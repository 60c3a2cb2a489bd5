//! Component kinds and the marker relations that link page markup to them.
//!
//! The page author marks components with data attributes. Which attribute is consulted
//! depends on the [`MarkerRelation`] (view, click or list name) and, for the first two, on
//! the [`ComponentKind`]:
//!
//! | Attribute                          | Relation                      |
//! |------------------------------------|-------------------------------|
//! | `data-view-marker-product="<id>"`  | view marker for a product     |
//! | `data-view-marker-campaign="<id>"` | view marker for a campaign    |
//! | `data-click-marker-product="<id>"` | click marker for a product    |
//! | `data-click-marker-campaign="<id>"`| click marker for a campaign   |
//! | `data-list-name="<listId>"`        | list context for its products |

use bitflags::bitflags;
use std::fmt::{Display, Formatter};

/// Kind of trackable component
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// A product card or tile
    Product,
    /// A promotional campaign (banner, teaser)
    Campaign,
}

impl ComponentKind {
    /// All kinds, in scan and binding order.
    pub const ALL: [ComponentKind; 2] = [ComponentKind::Campaign, ComponentKind::Product];

    /// Lowercase name as used inside attribute names
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Product => "product",
            ComponentKind::Campaign => "campaign",
        }
    }

    /// Flag for this kind inside a [`TrackedKinds`] set
    pub fn flag(&self) -> TrackedKinds {
        match self {
            ComponentKind::Product => TrackedKinds::PRODUCT,
            ComponentKind::Campaign => TrackedKinds::CAMPAIGN,
        }
    }
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

bitflags! {
    /// Set of component kinds a tracker scans and binds clicks for.
    pub struct TrackedKinds: u8 {
        const PRODUCT  = 0b01;
        const CAMPAIGN = 0b10;
    }
}

impl Default for TrackedKinds {
    fn default() -> Self {
        TrackedKinds::all()
    }
}

impl TrackedKinds {
    /// Iterates the kinds in this set, in [`ComponentKind::ALL`] order.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        ComponentKind::ALL.into_iter().filter(move |k| self.contains(k.flag()))
    }
}

/// Named attribute contract between page markup and a semantic identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MarkerRelation {
    /// Element is a view tracking target
    ViewMarker,
    /// Element is a click tracking target
    ClickMarker,
    /// Element carries list context for contained products
    ListName,
}

impl MarkerRelation {
    /// Data attribute name for this relation and kind. The list-name relation is shared by
    /// all kinds.
    pub fn attribute(&self, kind: ComponentKind) -> String {
        match self {
            MarkerRelation::ViewMarker => format!("data-view-marker-{}", kind.as_str()),
            MarkerRelation::ClickMarker => format!("data-click-marker-{}", kind.as_str()),
            MarkerRelation::ListName => LIST_NAME_ATTRIBUTE.to_string(),
        }
    }

    /// Attribute-presence selector, e.g. `[data-view-marker-product]`
    pub fn selector(&self, kind: ComponentKind) -> String {
        format!("[{}]", self.attribute(kind))
    }
}

pub const LIST_NAME_ATTRIBUTE: &str = "data-list-name";

/// Identifier of a component as read from its marker attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    /// Parses a raw attribute value. Empty or whitespace-only values are malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
