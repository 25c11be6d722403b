use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::model::config::Settings;
use crate::model::item::{ItemId, ItemKind};
use crate::model::tree::Tree;
use crate::util::simplify::matches_simplified;

use super::navigation::{NavError, Navigator};
use super::notice::{Notice, NoticeAction};
use super::remote::{
    FetchError, FetchOutcome, FetchRequest, FetchTicket, PendingFetch, RemoteRecord, fetch_summary,
    merge_records,
};
use super::selection::Selection;

/// Monotonic counter bumped on every structural change. Clones share the
/// same value, so a save scheduler can watch it from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct ChangeCounter(Arc<AtomicU64>);

impl ChangeCounter {
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn value(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a click on a list row led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Select mode was on; the row's new membership
    SelectionToggled { position: usize, selected: bool },
    /// Position changed
    Navigated,
    /// The item should be opened in an editor
    EditRequested(ItemId),
    /// Entered a remote item; run the fetch and hand the result back
    FetchStarted(PendingFetch),
    /// Link without a resolvable target; a notice was emitted
    BrokenLink,
    /// Nothing to do (separator, stale position)
    Ignored,
}

/// Everything one editing session works on: the tree, the position in it,
/// the selection and pending notices.
#[derive(Debug)]
pub struct AppSession {
    pub(crate) tree: Tree,
    pub(crate) nav: Navigator,
    pub(crate) selection: Selection,
    changes: ChangeCounter,
    settings: Settings,
    notices: Vec<Notice>,
    fetch_epoch: u64,
}

impl AppSession {
    pub fn new(tree: Tree, settings: Settings) -> Self {
        let nav = Navigator::new(&tree);
        AppSession {
            tree,
            nav,
            selection: Selection::new(),
            changes: ChangeCounter::default(),
            settings,
            notices: Vec::new(),
            fetch_epoch: 0,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared handle on the change counter
    pub fn changes(&self) -> ChangeCounter {
        self.changes.clone()
    }

    pub(crate) fn mark_changed(&self) {
        let value = self.changes.bump();
        tracing::trace!(change = value, "tree changed");
    }

    pub fn current(&self) -> ItemId {
        self.nav.current()
    }

    /// Children of the level being shown
    pub fn current_items(&self) -> &[ItemId] {
        self.tree.children(self.nav.current())
    }

    /// Title of the level being shown, e.g. `Work [3]`
    pub fn title(&self) -> String {
        self.tree.title(self.nav.current())
    }

    /// Swap in a freshly loaded tree and start over at its root
    pub fn replace_tree(&mut self, tree: Tree) {
        self.nav = Navigator::new(&tree);
        self.tree = tree;
        self.selection.cancel();
        self.fetch_epoch += 1;
        self.mark_changed();
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.nav.set_scroll_offset(offset);
    }

    pub fn push_notice(&mut self, notice: Notice) {
        tracing::info!(message = %notice.message, "notice");
        self.notices.push(notice);
    }

    /// Drain notices emitted since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    fn after_navigation(&mut self) {
        self.selection.cancel();
        self.fetch_epoch += 1;
    }

    fn navigated<T>(&mut self, result: Result<T, NavError>) -> Result<T, NavError> {
        if result.is_ok() {
            self.after_navigation();
        }
        result
    }

    pub fn go_into(&mut self, position: usize) -> bool {
        let moved = self.nav.go_into(&self.tree, position);
        if moved {
            self.after_navigation();
        }
        moved
    }

    pub fn go_up(&mut self) -> Result<(), NavError> {
        let result = self.nav.go_up(&self.tree);
        self.navigated(result)
    }

    pub fn go_to(&mut self, item: ItemId) -> Result<(), NavError> {
        let result = self.nav.go_to(&self.tree, item);
        self.navigated(result)
    }

    /// Link-aware step back. `Err(NavError::NoParent)` means the user
    /// backed out of the root and the application should exit.
    pub fn go_back(&mut self) -> Result<(), NavError> {
        let result = self.nav.go_back(&self.tree);
        self.navigated(result)
    }

    /// Link-aware step back that stops quietly at the root
    pub fn go_back_until_root(&mut self) -> Result<(), NavError> {
        let before = self.nav.current();
        self.nav.go_back_until_root(&self.tree)?;
        if self.nav.current() != before {
            self.after_navigation();
        }
        Ok(())
    }

    /// Structural step up that forgets how the current item was reached
    pub fn go_step_up(&mut self) -> Result<(), NavError> {
        let result = self.nav.go_step_up(&self.tree);
        self.navigated(result)
    }

    pub fn navigate_to_root(&mut self) {
        self.nav.go_to_root(&self.tree);
        self.after_navigation();
    }

    /// Find a text-like item by name path, tolerating name drift
    pub fn find_item_by_path<S: AsRef<str>>(&self, path: &[S]) -> Option<ItemId> {
        self.tree.find_by_path(path)
    }

    // -----------------------------------------------------------------------
    // Clicks
    // -----------------------------------------------------------------------

    /// Row click. Toggles selection in select mode, otherwise enters,
    /// follows or edits the item depending on its kind.
    pub fn click(&mut self, position: usize) -> ClickOutcome {
        if self.selection.is_active() {
            let selected = self.selection.toggle(position);
            return ClickOutcome::SelectionToggled { position, selected };
        }
        let Some(item) = self.tree.child_at(self.nav.current(), position) else {
            return ClickOutcome::Ignored;
        };
        let Some(kind) = self.tree.kind(item) else {
            return ClickOutcome::Ignored;
        };
        match kind {
            ItemKind::Remote { .. } | ItemKind::Link { .. } => self.go_into_clicked(position),
            ItemKind::Text { .. } | ItemKind::Checkbox { .. } => {
                let is_empty = self.tree.get(item).is_none_or(|i| i.is_empty());
                if !is_empty || self.is_always_navigable(item) {
                    self.go_into_clicked(position)
                } else {
                    ClickOutcome::EditRequested(item)
                }
            }
            ItemKind::Root | ItemKind::Separator => ClickOutcome::Ignored,
        }
    }

    /// Explicit "go into" on a row, regardless of whether it is empty
    pub fn go_into_clicked(&mut self, position: usize) -> ClickOutcome {
        let Some(item) = self.tree.child_at(self.nav.current(), position) else {
            return ClickOutcome::Ignored;
        };
        match self.tree.kind(item) {
            Some(ItemKind::Link { .. }) => self.follow_link(item),
            Some(ItemKind::Remote { .. }) => {
                self.go_into(position);
                ClickOutcome::FetchStarted(self.begin_fetch(item))
            }
            Some(ItemKind::Separator) | None => ClickOutcome::Ignored,
            Some(_) => {
                if self.go_into(position) {
                    ClickOutcome::Navigated
                } else {
                    ClickOutcome::Ignored
                }
            }
        }
    }

    /// Jump to a link's target, or emit a broken-link notice
    pub fn follow_link(&mut self, link: ItemId) -> ClickOutcome {
        match self.nav.follow_link(&self.tree, link) {
            Ok(_) => {
                self.after_navigation();
                ClickOutcome::Navigated
            }
            Err(NavError::BrokenLink(path)) => {
                self.push_notice(Notice::info(format!("Link is broken: {}", path)));
                ClickOutcome::BrokenLink
            }
            Err(_) => ClickOutcome::Ignored,
        }
    }

    /// Empty items whose name is configured as always navigable are entered
    /// instead of edited, but only directly under the root.
    pub fn is_always_navigable(&self, item: ItemId) -> bool {
        let parent_is_root = match self.tree.parent(item) {
            None => true,
            Some(parent) => parent == self.tree.root(),
        };
        if !parent_is_root {
            return false;
        }
        let name = self.tree.display_name(item);
        self.settings
            .navigation
            .always_navigable
            .iter()
            .any(|expected| matches_simplified(&name, expected))
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Long-press on a row. Returns true when this started select mode.
    pub fn mark_selected(&mut self, position: usize) -> bool {
        if position >= self.current_items().len() {
            return false;
        }
        self.selection.mark_selected(position)
    }

    pub fn toggle_selected(&mut self, position: usize) -> bool {
        self.selection.toggle(position)
    }

    pub fn select_all(&mut self) {
        let count = self.current_items().len();
        self.selection.select_all(count);
    }

    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    // -----------------------------------------------------------------------
    // Remote fetch
    // -----------------------------------------------------------------------

    /// Start a fetch for a remote item. Any earlier pending fetch goes stale.
    pub fn begin_fetch(&mut self, item: ItemId) -> PendingFetch {
        self.fetch_epoch += 1;
        self.push_notice(Notice::info("Fetching remote items…"));
        PendingFetch {
            ticket: FetchTicket {
                item,
                epoch: self.fetch_epoch,
            },
            request: FetchRequest {
                item,
                name: self.tree.display_name(item),
                path: self.tree.path_of(item),
            },
        }
    }

    /// Apply a finished fetch. Results for a ticket that went stale are dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<RemoteRecord>, FetchError>,
    ) -> FetchOutcome {
        if ticket.epoch != self.fetch_epoch || !self.tree.contains(ticket.item) {
            tracing::debug!("discarding stale remote fetch result");
            return FetchOutcome::Discarded;
        }
        match result {
            Ok(records) => match merge_records(&mut self.tree, ticket.item, &records) {
                Ok(added) => {
                    if added > 0 {
                        self.mark_changed();
                    }
                    let summary =
                        fetch_summary(&records, &self.settings.remote.timestamp_format);
                    self.push_notice(Notice::info(summary));
                    self.nav.set_scroll_offset(0);
                    FetchOutcome::Applied {
                        fetched: records.len(),
                        added,
                    }
                }
                Err(e) => {
                    let error = FetchError::FetchFailed(e.to_string());
                    self.fetch_failed(ticket.item, &error);
                    FetchOutcome::Failed(error)
                }
            },
            Err(error) => {
                self.fetch_failed(ticket.item, &error);
                FetchOutcome::Failed(error)
            }
        }
    }

    fn fetch_failed(&mut self, item: ItemId, error: &FetchError) {
        tracing::warn!(%error, "remote fetch failed");
        self.push_notice(
            Notice::error(format!("Communication breakdown!: {}", error))
                .with_action(NoticeAction::RetryFetch(item)),
        );
    }
}
