//! In-memory document used by the unit tests.
//!
//! Elements live in a flat map keyed by id; ids grow monotonically so id order is document
//! order. Hit-testing picks the element with the highest z-index whose box contains the
//! point, later elements winning ties, which is enough to model children painting over
//! their parents and overlays painting over everything.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::tracker::dom::{
    ComputedStyle, CssDisplay, DomEventType, DomHost, ElementBox, ElementId, HostError, ListenerId,
    WindowMetrics,
};

struct FakeNode {
    parent: Option<ElementId>,
    attrs: HashMap<String, String>,
    bbox: Option<ElementBox>,
    style: ComputedStyle,
    z_index: i32,
    hit_passthrough: bool,
}

struct FakeDomState {
    nodes: BTreeMap<ElementId, FakeNode>,
    next_id: u64,
    metrics: WindowMetrics,
    has_document: bool,
    content_width: Option<f64>,
    listeners: HashMap<ListenerId, (DomEventType, String)>,
    next_listener: u64,
    refuse_selector: Option<String>,
}

pub(crate) struct FakeDom {
    state: RwLock<FakeDomState>,
    root: ElementId,
}

impl FakeDom {
    /// Document with a single root element and a viewport of the given size at scroll 0,0.
    pub fn new(width: f64, height: f64) -> Self {
        let root = ElementId(1);
        let mut nodes = BTreeMap::new();
        nodes.insert(
            root,
            FakeNode {
                parent: None,
                attrs: HashMap::new(),
                bbox: None,
                style: ComputedStyle::default(),
                z_index: 0,
                hit_passthrough: false,
            },
        );

        Self {
            state: RwLock::new(FakeDomState {
                nodes,
                next_id: 2,
                metrics: WindowMetrics {
                    scroll_top: 0.0,
                    scroll_left: 0.0,
                    width,
                    height,
                },
                has_document: true,
                content_width: None,
                listeners: HashMap::new(),
                next_listener: 1,
                refuse_selector: None,
            }),
            root,
        }
    }

    /// Host that has no document at all
    pub fn without_document() -> Self {
        let dom = Self::new(0.0, 0.0);
        dom.state.write().unwrap().has_document = false;
        dom
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn append(&self, parent: ElementId, bbox: ElementBox) -> ElementId {
        let mut state = self.state.write().unwrap();
        let id = ElementId(state.next_id);
        state.next_id += 1;
        state.nodes.insert(
            id,
            FakeNode {
                parent: Some(parent),
                attrs: HashMap::new(),
                bbox: Some(bbox),
                style: ComputedStyle::default(),
                z_index: 0,
                hit_passthrough: false,
            },
        );
        id
    }

    /// Appends an element carrying a single attribute
    pub fn append_marked(&self, parent: ElementId, bbox: ElementBox, attr: &str, value: &str) -> ElementId {
        let id = self.append(parent, bbox);
        self.set_attr(id, attr, value);
        id
    }

    pub fn set_attr(&self, element: ElementId, name: &str, value: &str) {
        let mut state = self.state.write().unwrap();
        if let Some(node) = state.nodes.get_mut(&element) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_box(&self, element: ElementId, bbox: Option<ElementBox>) {
        let mut state = self.state.write().unwrap();
        if let Some(node) = state.nodes.get_mut(&element) {
            node.bbox = bbox;
        }
    }

    pub fn set_style(&self, element: ElementId, style: ComputedStyle) {
        let mut state = self.state.write().unwrap();
        if let Some(node) = state.nodes.get_mut(&element) {
            node.style = style;
        }
    }

    pub fn set_z_index(&self, element: ElementId, z_index: i32) {
        let mut state = self.state.write().unwrap();
        if let Some(node) = state.nodes.get_mut(&element) {
            node.z_index = z_index;
        }
    }

    /// Hit testing skips the element, like `pointer-events: none`
    pub fn set_hit_passthrough(&self, element: ElementId, passthrough: bool) {
        let mut state = self.state.write().unwrap();
        if let Some(node) = state.nodes.get_mut(&element) {
            node.hit_passthrough = passthrough;
        }
    }

    /// Removes an element and its whole subtree
    pub fn remove(&self, element: ElementId) {
        let mut state = self.state.write().unwrap();
        let mut doomed = vec![element];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i];
            doomed.extend(
                state
                    .nodes
                    .iter()
                    .filter(|(_, n)| n.parent == Some(current))
                    .map(|(id, _)| *id),
            );
            i += 1;
        }
        for id in doomed {
            state.nodes.remove(&id);
        }
    }

    pub fn scroll_to(&self, left: f64, top: f64) {
        let mut state = self.state.write().unwrap();
        state.metrics.scroll_left = left;
        state.metrics.scroll_top = top;
    }

    pub fn resize(&self, width: f64, height: f64) {
        let mut state = self.state.write().unwrap();
        state.metrics.width = width;
        state.metrics.height = height;
    }

    pub fn set_content_width(&self, width: Option<f64>) {
        self.state.write().unwrap().content_width = width;
    }

    /// Makes `bind_delegated` fail for the given selector
    pub fn refuse_binding(&self, selector: &str) {
        self.state.write().unwrap().refuse_selector = Some(selector.to_string());
    }

    /// Listeners a click on `target` fires, in binding order: every listener whose selector
    /// matches an element on the target's path fires once.
    pub fn fire_click(&self, target: ElementId) -> Vec<ListenerId> {
        let state = self.state.read().unwrap();
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(el) = current {
            let Some(node) = state.nodes.get(&el) else {
                break;
            };
            path.push(node);
            current = node.parent;
        }

        let mut fired: Vec<ListenerId> = state
            .listeners
            .iter()
            .filter(|(_, (event, selector))| {
                let name = selector.trim_start_matches('[').trim_end_matches(']');
                *event == DomEventType::Click && path.iter().any(|n| n.attrs.contains_key(name))
            })
            .map(|(id, _)| *id)
            .collect();
        fired.sort_by_key(|id| id.0);
        fired
    }

    /// Selectors of the currently bound listeners, sorted
    pub fn bound_selectors(&self) -> Vec<String> {
        let state = self.state.read().unwrap();
        let mut out: Vec<String> = state.listeners.values().map(|(_, s)| s.clone()).collect();
        out.sort();
        out
    }
}

impl DomHost for FakeDom {
    fn has_document(&self) -> bool {
        self.state.read().unwrap().has_document
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let name = selector.trim_start_matches('[').trim_end_matches(']');
        let state = self.state.read().unwrap();
        state
            .nodes
            .iter()
            .filter(|(_, n)| n.attrs.contains_key(name))
            .map(|(id, _)| *id)
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let state = self.state.read().unwrap();
        state.nodes.get(&element).and_then(|n| n.attrs.get(name).cloned())
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        let state = self.state.read().unwrap();
        state.nodes.get(&element).and_then(|n| n.parent)
    }

    fn bounding_box(&self, element: ElementId) -> Option<ElementBox> {
        let state = self.state.read().unwrap();
        state.nodes.get(&element).and_then(|n| n.bbox)
    }

    fn computed_style(&self, element: ElementId) -> Option<ComputedStyle> {
        let state = self.state.read().unwrap();
        state.nodes.get(&element).map(|n| n.style)
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<ElementId> {
        let state = self.state.read().unwrap();
        let doc_x = x + state.metrics.scroll_left;
        let doc_y = y + state.metrics.scroll_top;

        let mut best: Option<(i32, ElementId)> = None;
        for (id, node) in state.nodes.iter() {
            if node.style.display == CssDisplay::None || node.hit_passthrough {
                continue;
            }
            let Some(b) = node.bbox else {
                continue;
            };
            if doc_x < b.left || doc_x >= b.right() || doc_y < b.top || doc_y >= b.bottom() {
                continue;
            }
            match best {
                Some((z, _)) if z > node.z_index => {}
                _ => best = Some((node.z_index, *id)),
            }
        }
        best.map(|(_, id)| id)
    }

    fn window_metrics(&self) -> WindowMetrics {
        self.state.read().unwrap().metrics
    }

    fn content_column_width(&self) -> Option<f64> {
        self.state.read().unwrap().content_width
    }

    fn bind_delegated(&self, event: DomEventType, selector: &str) -> Result<ListenerId, HostError> {
        let mut state = self.state.write().unwrap();
        if state.refuse_selector.as_deref() == Some(selector) {
            return Err(HostError::BindFailed {
                event: event.as_str(),
                selector: selector.to_string(),
                reason: "refused by test host".to_string(),
            });
        }
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.insert(id, (event, selector.to_string()));
        Ok(id)
    }

    fn unbind(&self, listener: ListenerId) {
        self.state.write().unwrap().listeners.remove(&listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_paint_over_parents_and_overlays_over_both() {
        let dom = FakeDom::new(800.0, 600.0);
        let card = dom.append(dom.root(), ElementBox::new(0.0, 0.0, 200.0, 200.0));
        let image = dom.append(card, ElementBox::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(dom.element_from_point(100.0, 100.0), Some(image));
        assert_eq!(dom.element_from_point(10.0, 10.0), Some(card));

        let overlay = dom.append(dom.root(), ElementBox::new(0.0, 0.0, 800.0, 600.0));
        dom.set_z_index(overlay, 100);
        assert_eq!(dom.element_from_point(100.0, 100.0), Some(overlay));

        // scrolled out of the overlay's document area
        dom.scroll_to(0.0, 1000.0);
        assert_eq!(dom.element_from_point(100.0, 100.0), None);
    }

    #[test]
    fn passthrough_elements_are_skipped_by_hit_testing() {
        let dom = FakeDom::new(800.0, 600.0);
        let card = dom.append(dom.root(), ElementBox::new(0.0, 0.0, 200.0, 200.0));
        dom.set_hit_passthrough(card, true);
        assert_eq!(dom.element_from_point(100.0, 100.0), None);
        dom.set_hit_passthrough(card, false);
        assert_eq!(dom.element_from_point(100.0, 100.0), Some(card));
    }

    #[test]
    fn clicks_fire_listeners_matching_the_path() {
        let dom = FakeDom::new(800.0, 600.0);
        let campaign = dom.bind_delegated(DomEventType::Click, "[data-click-marker-campaign]").unwrap();
        let product = dom.bind_delegated(DomEventType::Click, "[data-click-marker-product]").unwrap();
        let banner = dom.append_marked(dom.root(), ElementBox::default(), "data-click-marker-campaign", "c");
        let card = dom.append_marked(banner, ElementBox::default(), "data-click-marker-product", "p");
        let loose = dom.append(dom.root(), ElementBox::default());

        assert_eq!(dom.fire_click(card), vec![campaign, product]);
        assert_eq!(dom.fire_click(banner), vec![campaign]);
        assert!(dom.fire_click(loose).is_empty());
    }

    #[test]
    fn remove_drops_subtree() {
        let dom = FakeDom::new(800.0, 600.0);
        let list = dom.append_marked(dom.root(), ElementBox::default(), "data-list-name", "x");
        let item = dom.append_marked(list, ElementBox::default(), "data-view-marker-product", "1");
        dom.remove(list);
        assert!(dom.query_all("[data-view-marker-product]").is_empty());
        assert!(dom.attribute(item, "data-view-marker-product").is_none());
    }
}
