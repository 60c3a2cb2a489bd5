//! Delegated click handling.
//!
//! One listener per tracked kind is registered at the document (event `click`, selector
//! `[data-click-marker-<kind>]`) instead of one per element, so components added later are
//! covered and removed ones leave nothing behind. The host reports each firing listener
//! once per interaction, together with the interaction target. The dispatcher then walks
//! up from the target and emits one event for every element on the path that carries the
//! firing listener's click marker, innermost first, the way delegated handlers run once
//! per matching element.
//!
//! Clicks are not deduplicated: every interaction emits its own event.

use log::{debug, trace, warn};

use crate::tracker::dom::{DomEventType, DomHost, ElementId, HostError, ListenerId};
use crate::tracker::emitter::EventEmitter;
use crate::tracker::events::ListItem;
use crate::tracker::kind::{ComponentKind, MarkerRelation, TrackedKinds};
use crate::tracker::locator::Locator;

/// A delegated listener owned by the dispatcher
#[derive(Debug, Clone)]
pub struct DelegatedBinding {
    pub kind: ComponentKind,
    pub event: DomEventType,
    pub selector: String,
    pub listener: ListenerId,
}

#[derive(Debug, Default)]
pub struct ClickDispatcher {
    bindings: Vec<DelegatedBinding>,
}

impl ClickDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one delegated click listener per kind. Either all bindings are made or, on
    /// the first failure, the ones already made are detached again and the error returned.
    pub fn attach<H: DomHost + ?Sized>(&mut self, host: &H, kinds: TrackedKinds) -> Result<(), HostError> {
        for kind in kinds.kinds() {
            if self.bindings.iter().any(|b| b.kind == kind) {
                continue;
            }

            let selector = MarkerRelation::ClickMarker.selector(kind);
            match host.bind_delegated(DomEventType::Click, &selector) {
                Ok(listener) => {
                    trace!("bound delegated click listener {:?} for {}", listener, selector);
                    self.bindings.push(DelegatedBinding {
                        kind,
                        event: DomEventType::Click,
                        selector,
                        listener,
                    });
                }
                Err(e) => {
                    warn!("cannot bind click listener for {}: {}", selector, e);
                    self.detach(host);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Detaches every listener. Safe to call repeatedly.
    pub fn detach<H: DomHost + ?Sized>(&mut self, host: &H) {
        for binding in self.bindings.drain(..) {
            host.unbind(binding.listener);
        }
    }

    pub fn bindings(&self) -> &[DelegatedBinding] {
        &self.bindings
    }

    pub fn is_attached(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Listener bound for `kind`, if any
    pub fn listener(&self, kind: ComponentKind) -> Option<ListenerId> {
        self.bindings.iter().find(|b| b.kind == kind).map(|b| b.listener)
    }

    /// Handles one firing of `listener` for an interaction on `target`. Emits one event per
    /// element on the target's path carrying the listener's click marker. Returns the number
    /// of events emitted; unknown listeners emit nothing.
    pub fn dispatch<H: DomHost + ?Sized>(
        &self,
        host: &H,
        listener: ListenerId,
        target: ElementId,
        emitter: &EventEmitter,
    ) -> usize {
        let Some(binding) = self.bindings.iter().find(|b| b.listener == listener) else {
            trace!("click on {} reported for unknown listener {:?}", target, listener);
            return 0;
        };

        let kind = binding.kind;
        let locator = Locator::new(host);
        let mut emitted = 0;

        for marked in locator.ancestors_with_relation(MarkerRelation::ClickMarker, kind, target) {
            let Some(id) = locator.component_id(kind, MarkerRelation::ClickMarker, marked) else {
                trace!("click on {} reached {} marker {} without usable id", target, kind, marked);
                continue;
            };

            debug!("click on {} resolved to {} '{}'", target, kind, id);
            match kind {
                ComponentKind::Product => {
                    let list_id = locator.list_context(marked);
                    emitter.clicked_product(ListItem::new(&id, list_id));
                }
                ComponentKind::Campaign => emitter.clicked_campaign(&id),
            }
            emitted += 1;
        }

        emitted
    }
}
