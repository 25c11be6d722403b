use std::collections::HashMap;

use crate::model::item::ItemId;

/// Remembers which link brought the user to a target, so stepping back
/// from the target returns to where the link lives.
#[derive(Debug, Clone, Default)]
pub struct LinkHistory {
    /// target -> link that produced the most recent visit
    visits: HashMap<ItemId, ItemId>,
}

impl LinkHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `target` was reached through `link`. Only the most recent
    /// link entry per target is kept.
    pub fn store_visit(&mut self, target: ItemId, link: ItemId) {
        self.visits.insert(target, link);
    }

    pub fn has_visit(&self, item: ItemId) -> bool {
        self.visits.contains_key(&item)
    }

    pub fn source_link(&self, item: ItemId) -> Option<ItemId> {
        self.visits.get(&item).copied()
    }

    pub fn reset_visit(&mut self, item: ItemId) {
        self.visits.remove(&item);
    }

    pub fn clear(&mut self) {
        self.visits.clear();
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}
