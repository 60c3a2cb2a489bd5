use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use gosub_tracking::dom::{ComputedStyle, DomEventType, WindowMetrics};
use gosub_tracking::{
    ComponentTracker, DomHost, ElementBox, ElementId, HostError, ListenerId, TrackerConfig,
    TrackingEvent,
};
use tokio::sync::broadcast;
use tokio::time::sleep;

/// A tiny flat page: every element hangs off the body, no overlays.
struct HeadlessPage {
    nodes: RwLock<Vec<Node>>,
    metrics: RwLock<WindowMetrics>,
    listeners: RwLock<Vec<(ListenerId, String)>>,
    next_listener: AtomicU64,
}

struct Node {
    bbox: ElementBox,
    attrs: HashMap<String, String>,
}

impl HeadlessPage {
    fn new(width: f64, height: f64) -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
            metrics: RwLock::new(WindowMetrics {
                width,
                height,
                ..Default::default()
            }),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    fn add(&self, bbox: ElementBox, attrs: &[(&str, &str)]) -> ElementId {
        let mut nodes = self.nodes.write().unwrap();
        nodes.push(Node {
            bbox,
            attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
        ElementId(nodes.len() as u64)
    }

    fn scroll_to(&self, top: f64) {
        self.metrics.write().unwrap().scroll_top = top;
    }

    /// Listeners a click on `target` fires. The page is flat, so only the target's own
    /// attributes can match.
    fn fire_click(&self, target: ElementId) -> Vec<ListenerId> {
        let listeners = self.listeners.read().unwrap();
        listeners
            .iter()
            .filter(|(_, selector)| {
                let attr = selector.trim_start_matches('[').trim_end_matches(']');
                self.attribute(target, attr).is_some()
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn node<T>(&self, element: ElementId, f: impl FnOnce(&Node) -> T) -> Option<T> {
        let nodes = self.nodes.read().unwrap();
        let idx = (element.0 as usize).checked_sub(1)?;
        nodes.get(idx).map(f)
    }
}

impl DomHost for HeadlessPage {
    fn has_document(&self) -> bool {
        true
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let attr = selector.trim_start_matches('[').trim_end_matches(']');
        let nodes = self.nodes.read().unwrap();
        nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.attrs.contains_key(attr))
            .map(|(i, _)| ElementId(i as u64 + 1))
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element, |n| n.attrs.get(name).cloned()).flatten()
    }

    fn parent(&self, _element: ElementId) -> Option<ElementId> {
        None
    }

    fn bounding_box(&self, element: ElementId) -> Option<ElementBox> {
        self.node(element, |n| n.bbox)
    }

    fn computed_style(&self, element: ElementId) -> Option<ComputedStyle> {
        self.node(element, |_| ComputedStyle::default())
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<ElementId> {
        let m = *self.metrics.read().unwrap();
        let (x, y) = (x + m.scroll_left, y + m.scroll_top);
        let nodes = self.nodes.read().unwrap();
        nodes
            .iter()
            .rposition(|n| x >= n.bbox.left && x < n.bbox.right() && y >= n.bbox.top && y < n.bbox.bottom())
            .map(|i| ElementId(i as u64 + 1))
    }

    fn window_metrics(&self) -> WindowMetrics {
        *self.metrics.read().unwrap()
    }

    fn bind_delegated(&self, event: DomEventType, selector: &str) -> Result<ListenerId, HostError> {
        println!("bound '{}' listener for {selector}", event.as_str());
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().unwrap().push((id, selector.to_string()));
        Ok(id)
    }

    fn unbind(&self, listener: ListenerId) {
        println!("unbound listener {}", listener.0);
        self.listeners.write().unwrap().retain(|(id, _)| *id != listener);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Lay out a page: a hero campaign, a row of products and one more product far below
    // the fold.
    let page = Arc::new(HeadlessPage::new(1280.0, 720.0));
    page.add(
        ElementBox::new(40.0, 20.0, 1200.0, 240.0),
        &[("data-view-marker-campaign", "summer-sale"), ("data-click-marker-campaign", "summer-sale")],
    );
    let shoe = page.add(
        ElementBox::new(40.0, 300.0, 280.0, 360.0),
        &[
            ("data-view-marker-product", "sku-1001"),
            ("data-click-marker-product", "sku-1001"),
            ("data-list-name", "frontpage-row"),
        ],
    );
    page.add(
        ElementBox::new(340.0, 300.0, 280.0, 360.0),
        &[("data-view-marker-product", "sku-1002"), ("data-list-name", "frontpage-row")],
    );
    page.add(
        ElementBox::new(40.0, 2000.0, 280.0, 360.0),
        &[("data-view-marker-product", "sku-2001")],
    );

    // The page uses a 1200px content column, which narrows the viewport to its middle.
    let config = TrackerConfig::builder()
        .max_content_width(1200.0)
        .scan_interval(Duration::from_millis(500))
        .build()?;

    let (events_tx, mut events_rx) = broadcast::channel::<TrackingEvent>(64);
    let printer = tokio::spawn(async move {
        while let Ok(event) = events_rx.recv().await {
            println!("{}", event.to_json());
        }
    });

    let tracker = ComponentTracker::new(page.clone(), config, events_tx)?;
    let (handle, join) = tracker.spawn()?;

    // The first scan reports the campaign and the two products above the fold.
    sleep(Duration::from_millis(100)).await;

    // A click on the shoe card. Every listener whose selector matches fires once.
    for listener in page.fire_click(shoe) {
        handle.click(listener, shoe).await?;
    }

    // Scroll down so the last product comes into view, and tell the tracker about it.
    page.scroll_to(1800.0);
    handle.scrolled().await?;
    sleep(Duration::from_millis(600)).await;

    handle.shutdown();
    let tracker = join.await?;
    println!("tracker {} stopped: {:?}", tracker.id(), tracker.ledger());

    // The tracker owned the last sender; the printer ends once it is dropped.
    drop(tracker);
    printer.await?;
    Ok(())
}
