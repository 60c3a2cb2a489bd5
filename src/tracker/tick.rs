use crate::tracker::kind::ComponentKind;

// A tick result reports what a single scan did
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Marked elements inspected over all tracked kinds
    pub scanned: usize,
    /// Products reported as viewed for the first time in this tick
    pub new_products: usize,
    /// Campaigns reported as viewed for the first time in this tick
    pub new_campaigns: usize,
    /// Elements skipped because their marker held no usable identifier
    pub malformed: usize,
    /// Events appended to the event bus (at most one per kind)
    pub events_emitted: usize,
}

impl TickResult {
    pub fn newly_viewed(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Product => self.new_products,
            ComponentKind::Campaign => self.new_campaigns,
        }
    }

    pub(crate) fn add_viewed(&mut self, kind: ComponentKind, count: usize) {
        match kind {
            ComponentKind::Product => self.new_products += count,
            ComponentKind::Campaign => self.new_campaigns += count,
        }
    }

    /// Did this tick report anything?
    pub fn any(&self) -> bool {
        self.events_emitted > 0
    }
}
