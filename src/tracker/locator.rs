//! Component locator: finds marked elements and resolves their semantic identity.
//!
//! Nothing is cached. Every call reads the live document so components injected after the
//! tracker started are found without registration.

use crate::tracker::dom::{DomHost, ElementId};
use crate::tracker::kind::{ComponentId, ComponentKind, MarkerRelation};

pub struct Locator<'a, H: DomHost + ?Sized> {
    host: &'a H,
}

impl<'a, H: DomHost + ?Sized> Locator<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// All elements carrying the `(relation, kind)` attribute, in document order.
    pub fn find(&self, kind: ComponentKind, relation: MarkerRelation) -> Vec<ElementId> {
        self.host.query_all(&relation.selector(kind))
    }

    /// Nearest ancestor, or the element itself, carrying the relation's attribute.
    pub fn find_ancestor_relation(
        &self,
        relation: MarkerRelation,
        kind: ComponentKind,
        element: ElementId,
    ) -> Option<ElementId> {
        let attribute = relation.attribute(kind);
        let mut current = Some(element);
        while let Some(el) = current {
            if self.host.attribute(el, &attribute).is_some() {
                return Some(el);
            }
            current = self.host.parent(el);
        }
        None
    }

    /// Every element on the path from `element` up to the root carrying the relation's
    /// attribute, innermost first.
    pub fn ancestors_with_relation(
        &self,
        relation: MarkerRelation,
        kind: ComponentKind,
        element: ElementId,
    ) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut current = self.find_ancestor_relation(relation, kind, element);
        while let Some(el) = current {
            found.push(el);
            current = self
                .host
                .parent(el)
                .and_then(|parent| self.find_ancestor_relation(relation, kind, parent));
        }
        found
    }

    /// Identifier stored under the `(relation, kind)` attribute of `element`. `None` when the
    /// attribute is missing or blank.
    pub fn component_id(&self, kind: ComponentKind, relation: MarkerRelation, element: ElementId) -> Option<ComponentId> {
        self.host
            .attribute(element, &relation.attribute(kind))
            .and_then(|raw| ComponentId::parse(&raw))
    }

    /// List name of the closest `data-list-name` ancestor. A blank list name counts as none.
    pub fn list_context(&self, element: ElementId) -> Option<String> {
        let holder = self.find_ancestor_relation(MarkerRelation::ListName, ComponentKind::Product, element)?;
        let name = self.host.attribute(holder, &MarkerRelation::ListName.attribute(ComponentKind::Product))?;
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::dom::ElementBox;
    use crate::tracker::testing::FakeDom;

    fn b() -> ElementBox {
        ElementBox::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn find_returns_marked_elements_in_document_order() {
        let dom = FakeDom::new(800.0, 600.0);
        let a = dom.append_marked(dom.root(), b(), "data-view-marker-product", "a");
        let _c = dom.append_marked(dom.root(), b(), "data-view-marker-campaign", "c");
        let d = dom.append_marked(dom.root(), b(), "data-view-marker-product", "d");

        let locator = Locator::new(&dom);
        assert_eq!(locator.find(ComponentKind::Product, MarkerRelation::ViewMarker), vec![a, d]);
        assert!(locator.find(ComponentKind::Product, MarkerRelation::ClickMarker).is_empty());
    }

    #[test]
    fn find_reflects_live_document() {
        let dom = FakeDom::new(800.0, 600.0);
        let locator = Locator::new(&dom);
        assert!(locator.find(ComponentKind::Campaign, MarkerRelation::ViewMarker).is_empty());

        let c = dom.append_marked(dom.root(), b(), "data-view-marker-campaign", "summer");
        assert_eq!(locator.find(ComponentKind::Campaign, MarkerRelation::ViewMarker), vec![c]);

        dom.remove(c);
        assert!(locator.find(ComponentKind::Campaign, MarkerRelation::ViewMarker).is_empty());
    }

    #[test]
    fn ancestor_lookup_includes_self_and_stops_at_nearest() {
        let dom = FakeDom::new(800.0, 600.0);
        let outer = dom.append_marked(dom.root(), b(), "data-list-name", "outer");
        let inner = dom.append_marked(outer, b(), "data-list-name", "inner");
        let card = dom.append(inner, b());

        let locator = Locator::new(&dom);
        assert_eq!(
            locator.find_ancestor_relation(MarkerRelation::ListName, ComponentKind::Product, card),
            Some(inner)
        );
        assert_eq!(
            locator.find_ancestor_relation(MarkerRelation::ListName, ComponentKind::Product, outer),
            Some(outer)
        );
        assert_eq!(locator.list_context(card).as_deref(), Some("inner"));
    }

    #[test]
    fn ancestors_with_relation_lists_every_marker_on_the_path() {
        let dom = FakeDom::new(800.0, 600.0);
        let outer = dom.append_marked(dom.root(), b(), "data-click-marker-product", "bundle");
        let plain = dom.append(outer, b());
        let inner = dom.append_marked(plain, b(), "data-click-marker-product", "item");
        let image = dom.append(inner, b());

        let locator = Locator::new(&dom);
        assert_eq!(
            locator.ancestors_with_relation(MarkerRelation::ClickMarker, ComponentKind::Product, image),
            vec![inner, outer]
        );
        assert!(locator
            .ancestors_with_relation(MarkerRelation::ClickMarker, ComponentKind::Campaign, image)
            .is_empty());
    }

    #[test]
    fn list_context_absent_or_blank_is_none() {
        let dom = FakeDom::new(800.0, 600.0);
        let loose = dom.append(dom.root(), b());
        let blank_list = dom.append_marked(dom.root(), b(), "data-list-name", "  ");
        let in_blank = dom.append(blank_list, b());

        let locator = Locator::new(&dom);
        assert_eq!(locator.list_context(loose), None);
        assert_eq!(locator.list_context(in_blank), None);
    }

    #[test]
    fn component_id_skips_malformed_values() {
        let dom = FakeDom::new(800.0, 600.0);
        let ok = dom.append_marked(dom.root(), b(), "data-click-marker-product", "sku-1");
        let blank = dom.append_marked(dom.root(), b(), "data-click-marker-product", "");

        let locator = Locator::new(&dom);
        assert_eq!(
            locator.component_id(ComponentKind::Product, MarkerRelation::ClickMarker, ok).map(|id| id.into_string()),
            Some("sku-1".to_string())
        );
        assert!(locator.component_id(ComponentKind::Product, MarkerRelation::ClickMarker, blank).is_none());
        assert!(locator.component_id(ComponentKind::Campaign, MarkerRelation::ClickMarker, ok).is_none());
    }
}
