use std::collections::HashMap;

use crate::model::item::{ItemId, ItemKind, display_link_path};
use crate::model::tree::Tree;

use super::link_history::LinkHistory;

/// Error type for navigation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// Already at the root. Callers treat this as an exit request.
    #[error("no parent item: already at the root")]
    NoParent,
    #[error("item not found")]
    NotFound,
    #[error("link is broken: {0}")]
    BrokenLink(String),
}

/// Current position in the tree plus the per-level view cues
#[derive(Debug, Clone)]
pub struct Navigator {
    current: ItemId,
    /// Item to highlight after returning to a level
    focus: Option<ItemId>,
    /// Scroll offset of the level being shown
    scroll_offset: usize,
    /// Scroll offset last seen per level
    scroll_cache: HashMap<ItemId, usize>,
    history: LinkHistory,
}

impl Navigator {
    pub fn new(tree: &Tree) -> Self {
        Navigator {
            current: tree.root(),
            focus: None,
            scroll_offset: 0,
            scroll_cache: HashMap::new(),
            history: LinkHistory::new(),
        }
    }

    pub fn current(&self) -> ItemId {
        self.current
    }

    pub fn focus(&self) -> Option<ItemId> {
        self.focus
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Report the view's scroll position for the current level
    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }

    pub fn history(&self) -> &LinkHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut LinkHistory {
        &mut self.history
    }

    fn store_scroll(&mut self) {
        self.scroll_cache.insert(self.current, self.scroll_offset);
    }

    fn restore_scroll(&mut self) {
        self.scroll_offset = self.scroll_cache.get(&self.current).copied().unwrap_or(0);
    }

    /// Descend into the child at `index`. Out-of-range indexes are a no-op.
    pub fn go_into(&mut self, tree: &Tree, index: usize) -> bool {
        let Some(child) = tree.child_at(self.current, index) else {
            return false;
        };
        self.store_scroll();
        self.current = child;
        self.focus = None;
        self.scroll_offset = 0;
        true
    }

    /// Move to the structural parent
    pub fn go_up(&mut self, tree: &Tree) -> Result<(), NavError> {
        if !tree.contains(self.current) {
            return Err(NavError::NotFound);
        }
        let parent = tree.parent(self.current).ok_or(NavError::NoParent)?;
        self.focus = Some(self.current);
        self.current = parent;
        self.restore_scroll();
        Ok(())
    }

    /// Absolute jump, showing the destination from the top
    pub fn go_to(&mut self, tree: &Tree, item: ItemId) -> Result<(), NavError> {
        if !tree.contains(item) {
            return Err(NavError::NotFound);
        }
        self.store_scroll();
        self.current = item;
        self.focus = None;
        self.scroll_offset = 0;
        Ok(())
    }

    /// Follow a link to its target and remember where it was followed from
    pub fn follow_link(&mut self, tree: &Tree, link: ItemId) -> Result<ItemId, NavError> {
        let Some(ItemKind::Link { target, .. }) = tree.kind(link) else {
            return Err(NavError::NotFound);
        };
        let resolved = tree
            .link_target(link)
            .ok_or_else(|| NavError::BrokenLink(display_link_path(target)))?;
        self.history.store_visit(resolved, link);
        self.go_to(tree, resolved)?;
        Ok(resolved)
    }

    /// Step back with link awareness: an item reached through a link goes
    /// back to the link's parent, anything else to its structural parent.
    pub fn go_back(&mut self, tree: &Tree) -> Result<(), NavError> {
        let current = self.current;
        if let Some(link) = self.history.source_link(current) {
            self.history.reset_visit(current);
            if let Some(link_parent) = tree.parent(link) {
                tracing::debug!("returning to the parent of the followed link");
                self.current = link_parent;
                self.focus = Some(link);
                self.restore_scroll();
                return Ok(());
            }
            tracing::debug!("followed link is gone, stepping up structurally");
        }
        self.go_up(tree)?;
        self.history.reset_visit(current);
        Ok(())
    }

    /// Same as `go_back`, but standing at the root is not an error
    pub fn go_back_until_root(&mut self, tree: &Tree) -> Result<(), NavError> {
        match self.go_back(tree) {
            Err(NavError::NoParent) => Ok(()),
            other => other,
        }
    }

    /// One structural step up that drops any link history of the item left
    pub fn go_step_up(&mut self, tree: &Tree) -> Result<(), NavError> {
        let current = self.current;
        self.go_up(tree)?;
        self.history.reset_visit(current);
        Ok(())
    }

    /// Jump to the root and forget all link history
    pub fn go_to_root(&mut self, tree: &Tree) {
        self.store_scroll();
        self.current = tree.root();
        self.focus = None;
        self.scroll_offset = 0;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        tree: Tree,
        work: ItemId,
        ideas: ItemId,
        home: ItemId,
        shortcuts: ItemId,
        link: ItemId,
    }

    /// /Work/Ideas, /Home/Shortcuts/-> Work/Ideas
    fn fixture() -> Fixture {
        let mut tree = Tree::new();
        let root = tree.root();
        let work = tree.add_new(root, ItemKind::text("Work")).unwrap();
        let ideas = tree.add_new(work, ItemKind::text("Ideas")).unwrap();
        tree.add_new(ideas, ItemKind::text("Rust")).unwrap();
        let home = tree.add_new(root, ItemKind::text("Home")).unwrap();
        let shortcuts = tree.add_new(home, ItemKind::text("Shortcuts")).unwrap();
        let link = tree
            .add_new(shortcuts, ItemKind::link("Work\tIdeas", None))
            .unwrap();
        Fixture {
            tree,
            work,
            ideas,
            home,
            shortcuts,
            link,
        }
    }

    #[test]
    fn go_into_and_up() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        assert!(nav.go_into(&f.tree, 1));
        assert_eq!(nav.current(), f.home);
        nav.go_up(&f.tree).unwrap();
        assert_eq!(nav.current(), f.tree.root());
        assert_eq!(nav.focus(), Some(f.home));
    }

    #[test]
    fn go_into_out_of_range_is_noop() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        assert!(!nav.go_into(&f.tree, 7));
        assert_eq!(nav.current(), f.tree.root());
    }

    #[test]
    fn go_up_at_root_reports_no_parent() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        assert_eq!(nav.go_up(&f.tree), Err(NavError::NoParent));
    }

    #[test]
    fn back_from_link_target_returns_to_link_parent() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        nav.go_to(&f.tree, f.shortcuts).unwrap();
        assert_eq!(nav.follow_link(&f.tree, f.link).unwrap(), f.ideas);
        assert_eq!(nav.current(), f.ideas);
        assert!(nav.history().has_visit(f.ideas));

        nav.go_back(&f.tree).unwrap();
        assert_eq!(nav.current(), f.shortcuts);
        assert_ne!(nav.current(), f.work);
        assert_eq!(nav.focus(), Some(f.link));
        assert!(!nav.history().has_visit(f.ideas));

        // without a visit record the next back is structural
        nav.go_back(&f.tree).unwrap();
        assert_eq!(nav.current(), f.home);
    }

    #[test]
    fn back_without_link_goes_to_structural_parent() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        nav.go_to(&f.tree, f.ideas).unwrap();
        nav.go_back(&f.tree).unwrap();
        assert_eq!(nav.current(), f.work);
    }

    #[test]
    fn back_at_root_fails_but_until_root_does_not() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        assert_eq!(nav.go_back(&f.tree), Err(NavError::NoParent));
        assert_eq!(nav.go_back_until_root(&f.tree), Ok(()));
        assert_eq!(nav.current(), f.tree.root());
    }

    #[test]
    fn step_up_breaks_link_history() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        nav.go_to(&f.tree, f.shortcuts).unwrap();
        nav.follow_link(&f.tree, f.link).unwrap();

        nav.go_step_up(&f.tree).unwrap();
        assert_eq!(nav.current(), f.work);
        assert!(!nav.history().has_visit(f.ideas));
    }

    #[test]
    fn back_falls_back_to_parent_when_link_was_removed() {
        let mut f = fixture();
        let mut nav = Navigator::new(&f.tree);
        nav.go_to(&f.tree, f.shortcuts).unwrap();
        nav.follow_link(&f.tree, f.link).unwrap();
        f.tree.remove(f.link).unwrap();

        nav.go_back(&f.tree).unwrap();
        assert_eq!(nav.current(), f.work);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn broken_link_does_not_move() {
        let mut f = fixture();
        let mut nav = Navigator::new(&f.tree);
        nav.go_to(&f.tree, f.shortcuts).unwrap();
        f.tree.remove(f.ideas).unwrap();
        assert_eq!(
            nav.follow_link(&f.tree, f.link),
            Err(NavError::BrokenLink("/Work/Ideas".into()))
        );
        assert_eq!(nav.current(), f.shortcuts);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn scroll_positions_are_restored_per_level() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        nav.set_scroll_offset(12);
        nav.go_into(&f.tree, 0);
        assert_eq!(nav.scroll_offset(), 0);
        nav.set_scroll_offset(3);
        nav.go_into(&f.tree, 0);
        nav.go_up(&f.tree).unwrap();
        assert_eq!(nav.scroll_offset(), 3);
        nav.go_up(&f.tree).unwrap();
        assert_eq!(nav.scroll_offset(), 12);
    }

    #[test]
    fn root_jump_clears_history() {
        let f = fixture();
        let mut nav = Navigator::new(&f.tree);
        nav.follow_link(&f.tree, f.link).unwrap();
        nav.go_to_root(&f.tree);
        assert_eq!(nav.current(), f.tree.root());
        assert!(nav.history().is_empty());
    }
}
