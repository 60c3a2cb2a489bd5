//! View tracking: one scan pass over the live document.
//!
//! Per tracked kind, each component moves from *unseen* to *reported* at most once over
//! the lifetime of a tracker: the first scan that finds it visible records its identifier
//! in the [`ViewedLedger`] and adds it to that tick's batch. There is no way back to
//! unseen. Every non-empty batch becomes one aggregated "viewed" event per kind.
//!
//! The marked element set is fetched fresh on every pass, so components added to or
//! removed from the document between ticks are picked up without registration.

use std::collections::HashSet;

use log::{debug, trace};

use crate::tracker::dom::DomHost;
use crate::tracker::emitter::EventEmitter;
use crate::tracker::events::ListItem;
use crate::tracker::kind::{ComponentId, ComponentKind, MarkerRelation, TrackedKinds};
use crate::tracker::locator::Locator;
use crate::tracker::tick::TickResult;
use crate::tracker::viewport::DocumentView;
use crate::tracker::visibility::VisibilityEvaluator;

/// Identifiers already reported as viewed, per kind. Insert-only.
#[derive(Debug, Default, Clone)]
pub struct ViewedLedger {
    products: HashSet<ComponentId>,
    campaigns: HashSet<ComponentId>,
}

impl ViewedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: ComponentKind) -> &HashSet<ComponentId> {
        match kind {
            ComponentKind::Product => &self.products,
            ComponentKind::Campaign => &self.campaigns,
        }
    }

    pub fn contains(&self, kind: ComponentKind, id: &ComponentId) -> bool {
        self.set(kind).contains(id)
    }

    /// Records `id` as reported. Returns false if it already was.
    pub fn insert(&mut self, kind: ComponentKind, id: ComponentId) -> bool {
        match kind {
            ComponentKind::Product => self.products.insert(id),
            ComponentKind::Campaign => self.campaigns.insert(id),
        }
    }

    pub fn len(&self, kind: ComponentKind) -> usize {
        self.set(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.campaigns.is_empty()
    }
}

/// Newly viewed components of one kind within one tick
enum Batch {
    Products(Vec<ListItem>),
    Campaigns(Vec<ComponentId>),
}

impl Batch {
    fn for_kind(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Product => Batch::Products(Vec::new()),
            ComponentKind::Campaign => Batch::Campaigns(Vec::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Batch::Products(items) => items.len(),
            Batch::Campaigns(ids) => ids.len(),
        }
    }

    fn emit(self, emitter: &EventEmitter) {
        match self {
            Batch::Products(items) => emitter.viewed_products(items),
            Batch::Campaigns(ids) => emitter.viewed_campaigns(ids),
        }
    }
}

/// Scans every tracked kind once.
pub struct ViewScanner<'a, H: DomHost + ?Sized> {
    host: &'a H,
    label: &'a str,
}

impl<'a, H: DomHost + ?Sized> ViewScanner<'a, H> {
    /// `label` prefixes log lines, normally the tracker's name
    pub fn new(host: &'a H, label: &'a str) -> Self {
        Self { host, label }
    }

    pub fn scan(
        &self,
        kinds: TrackedKinds,
        view: &DocumentView,
        ledger: &mut ViewedLedger,
        emitter: &EventEmitter,
    ) -> TickResult {
        let mut result = TickResult::default();
        for kind in kinds.kinds() {
            self.scan_kind(kind, view, ledger, emitter, &mut result);
        }
        result
    }

    fn scan_kind(
        &self,
        kind: ComponentKind,
        view: &DocumentView,
        ledger: &mut ViewedLedger,
        emitter: &EventEmitter,
        result: &mut TickResult,
    ) {
        let locator = Locator::new(self.host);
        let evaluator = VisibilityEvaluator::new(self.host);
        let mut batch = Batch::for_kind(kind);

        for element in locator.find(kind, MarkerRelation::ViewMarker) {
            result.scanned += 1;

            let Some(id) = locator.component_id(kind, MarkerRelation::ViewMarker, element) else {
                trace!("{}: {} element {} has no usable id, skipped", self.label, kind, element);
                result.malformed += 1;
                continue;
            };

            if ledger.contains(kind, &id) {
                continue;
            }

            let verdict = evaluator.evaluate(element, view);
            trace!("{}: {} '{}' on {} is {:?}", self.label, kind, id, element, verdict);
            if !verdict.is_visible() {
                continue;
            }

            match &mut batch {
                Batch::Products(items) => {
                    let list_id = locator.list_context(element);
                    items.push(ListItem::new(&id, list_id));
                }
                Batch::Campaigns(ids) => ids.push(id.clone()),
            }
            ledger.insert(kind, id);
        }

        let count = batch.len();
        if count > 0 {
            debug!("{}: {} new {} view(s)", self.label, count, kind);
            result.add_viewed(kind, count);
            result.events_emitted += 1;
            batch.emit(emitter);
        }
    }
}
