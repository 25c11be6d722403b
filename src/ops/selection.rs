use std::collections::BTreeSet;

/// Multi-selection of child positions at the current level.
///
/// Select mode is active exactly while at least one position is selected.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn is_selected(&self, position: usize) -> bool {
        self.selected.contains(&position)
    }

    /// Selected positions in ascending order
    pub fn positions(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Long-press entry point. Returns true when this call started select mode.
    pub fn mark_selected(&mut self, position: usize) -> bool {
        let started = !self.is_active();
        self.selected.insert(position);
        started
    }

    pub fn set_selected(&mut self, position: usize, selected: bool) {
        if selected {
            self.selected.insert(position);
        } else {
            self.selected.remove(&position);
        }
    }

    /// Flip one position and return its new membership. Callers refresh the
    /// whole list on `true` and only the toggled row on `false`.
    pub fn toggle(&mut self, position: usize) -> bool {
        if self.selected.remove(&position) {
            false
        } else {
            self.selected.insert(position);
            true
        }
    }

    /// Select every position below `count`
    pub fn select_all(&mut self, count: usize) {
        self.selected = (0..count).collect();
    }

    /// Leave select mode
    pub fn cancel(&mut self) {
        self.selected.clear();
    }
}
