//! Tracking event types.
//!
//! Every event is a flat record with a `name`, a `category` and exactly one payload field,
//! serialised the way downstream analytics integrations read it from the shared event
//! queue:
//!
//! | Name               | Category    | Payload field | Payload                         |
//! |--------------------|-------------|---------------|---------------------------------|
//! | `Viewed Product`   | `Ecommerce` | `listItems`   | `[{product:{id}, listId?}, ..]` |
//! | `Viewed Campaign`  | `Promo`     | `campaigns`   | `[id, ..]`                      |
//! | `Clicked Product`  | `Ecommerce` | `listItem`    | `{product:{id}, listId?}`       |
//! | `Clicked Campaign` | `Promo`     | `campaign`    | `id`                            |
//!
//! # Main Types
//!
//! - [`TrackingEvent`]: the record pushed to the event bus.
//! - [`EventName`], [`EventCategory`]: fixed names and categories.
//! - [`EventPayload`]: one of the four payload shapes.
//! - [`ListItem`]: a product reference with optional list context.

use serde::Serialize;
use std::fmt::{Display, Formatter};

use crate::tracker::kind::ComponentId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum EventName {
    #[serde(rename = "Viewed Product")]
    ViewedProduct,
    #[serde(rename = "Viewed Campaign")]
    ViewedCampaign,
    #[serde(rename = "Clicked Product")]
    ClickedProduct,
    #[serde(rename = "Clicked Campaign")]
    ClickedCampaign,
}

impl Display for EventName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventName::ViewedProduct => write!(f, "Viewed Product"),
            EventName::ViewedCampaign => write!(f, "Viewed Campaign"),
            EventName::ClickedProduct => write!(f, "Clicked Product"),
            EventName::ClickedCampaign => write!(f, "Clicked Campaign"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum EventCategory {
    Ecommerce,
    Promo,
}

impl Display for EventCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Ecommerce => write!(f, "Ecommerce"),
            EventCategory::Promo => write!(f, "Promo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRef {
    pub id: String,
}

/// A product, optionally tagged with the list it was shown in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub product: ProductRef,
    /// Omitted from the record entirely when there is no list context
    #[serde(rename = "listId", skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

impl ListItem {
    pub fn new(product_id: &ComponentId, list_id: Option<String>) -> Self {
        Self {
            product: ProductRef {
                id: product_id.as_str().to_string(),
            },
            list_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    /// Batch of newly viewed products
    ListItems {
        #[serde(rename = "listItems")]
        list_items: Vec<ListItem>,
    },
    /// Batch of newly viewed campaign ids
    Campaigns { campaigns: Vec<String> },
    /// A single clicked product
    ListItem {
        #[serde(rename = "listItem")]
        list_item: ListItem,
    },
    /// A single clicked campaign id
    Campaign { campaign: String },
}

/// Record appended to the shared event queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingEvent {
    pub name: EventName,
    pub category: EventCategory,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl TrackingEvent {
    pub fn viewed_products(list_items: Vec<ListItem>) -> Self {
        Self {
            name: EventName::ViewedProduct,
            category: EventCategory::Ecommerce,
            payload: EventPayload::ListItems { list_items },
        }
    }

    pub fn viewed_campaigns(campaigns: Vec<ComponentId>) -> Self {
        Self {
            name: EventName::ViewedCampaign,
            category: EventCategory::Promo,
            payload: EventPayload::Campaigns {
                campaigns: campaigns.into_iter().map(ComponentId::into_string).collect(),
            },
        }
    }

    pub fn clicked_product(list_item: ListItem) -> Self {
        Self {
            name: EventName::ClickedProduct,
            category: EventCategory::Ecommerce,
            payload: EventPayload::ListItem { list_item },
        }
    }

    pub fn clicked_campaign(campaign: &ComponentId) -> Self {
        Self {
            name: EventName::ClickedCampaign,
            category: EventCategory::Promo,
            payload: EventPayload::Campaign {
                campaign: campaign.as_str().to_string(),
            },
        }
    }

    /// Flat JSON record as integrations receive it
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Number of components this event reports
    pub fn item_count(&self) -> usize {
        match &self.payload {
            EventPayload::ListItems { list_items } => list_items.len(),
            EventPayload::Campaigns { campaigns } => campaigns.len(),
            EventPayload::ListItem { .. } | EventPayload::Campaign { .. } => 1,
        }
    }
}
