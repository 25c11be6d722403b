use super::item::{ItemId, ItemKind, ItemNode, TreeItem, split_link_path};
use crate::util::simplify::simplify;

/// Error type for structural tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    #[error("item not found")]
    NotFound,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    item: Option<TreeItem>,
}

/// Arena-backed outline tree with exactly one root.
///
/// Parent and child edges are handles into the arena. Links store a name
/// path and are resolved on use, so removing a node can only turn links
/// into broken links, never into dangling ones.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ItemId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only an empty root
    pub fn new() -> Self {
        let root_slot = Slot {
            generation: 0,
            item: Some(TreeItem::new(ItemKind::Root)),
        };
        Tree {
            slots: vec![root_slot],
            free: Vec::new(),
            root: ItemId {
                index: 0,
                generation: 0,
            },
        }
    }

    /// Build a tree from a detached subtree. A non-root node becomes the
    /// only child of a fresh root.
    pub fn from_node(mut node: ItemNode) -> Result<Self, TreeError> {
        let mut tree = Tree::new();
        let root = tree.root();
        if node.kind == ItemKind::Root {
            for child in std::mem::take(&mut node.children) {
                tree.attach_node(root, child)?;
            }
        } else {
            tree.attach_node(root, node)?;
        }
        Ok(tree)
    }

    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.item.is_some()).count()
    }

    /// True when the root has no children
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ItemId) -> Option<&TreeItem> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.item.as_ref()
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut TreeItem> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.item.as_mut()
    }

    fn require(&self, id: ItemId) -> Result<&TreeItem, TreeError> {
        self.get(id).ok_or(TreeError::NotFound)
    }

    pub fn kind(&self, id: ItemId) -> Option<&ItemKind> {
        self.get(id).map(|item| &item.kind)
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.get(id).and_then(|item| item.parent)
    }

    /// Children of `id` in display order; empty for unknown handles
    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.get(id).map(|item| item.children()).unwrap_or(&[])
    }

    pub fn child_at(&self, id: ItemId, index: usize) -> Option<ItemId> {
        self.children(id).get(index).copied()
    }

    pub fn size(&self, id: ItemId) -> usize {
        self.children(id).len()
    }

    pub fn last_child(&self, id: ItemId) -> Option<ItemId> {
        self.get(id).and_then(TreeItem::last_child)
    }

    pub fn position_in_parent(&self, id: ItemId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// True if `ancestor` is `id` itself or lies on its parent chain
    pub fn is_ancestor_or_self(&self, ancestor: ItemId, id: ItemId) -> bool {
        let mut current = Some(id);
        while let Some(item) = current {
            if item == ancestor {
                return true;
            }
            current = self.parent(item);
        }
        false
    }

    // -----------------------------------------------------------------------
    // Creation and attachment
    // -----------------------------------------------------------------------

    /// Allocate a detached node. Roots cannot be created.
    pub fn create(&mut self, kind: ItemKind) -> Result<ItemId, TreeError> {
        if kind == ItemKind::Root {
            return Err(TreeError::InvalidStructure(
                "tree already has a root".to_string(),
            ));
        }
        let item = TreeItem::new(kind);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.item = Some(item);
            Ok(ItemId {
                index,
                generation: slot.generation,
            })
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                item: Some(item),
            });
            Ok(ItemId {
                index,
                generation: 0,
            })
        }
    }

    /// Append a detached `child` to `parent`
    pub fn add(&mut self, parent: ItemId, child: ItemId) -> Result<(), TreeError> {
        let end = self.size(parent);
        self.insert(parent, end, child)
    }

    /// Insert a detached `child` at `index` (clamped) among `parent`'s children
    pub fn insert(&mut self, parent: ItemId, index: usize, child: ItemId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        if self.require(child)?.parent.is_some() {
            return Err(TreeError::InvalidStructure(
                "item already has a parent".to_string(),
            ));
        }
        self.link_child(parent, index, child);
        Ok(())
    }

    /// Create a node and append it to `parent`
    pub fn add_new(&mut self, parent: ItemId, kind: ItemKind) -> Result<ItemId, TreeError> {
        let end = self.size(parent);
        self.insert_new(parent, end, kind)
    }

    /// Create a node and insert it at `index` among `parent`'s children
    pub fn insert_new(
        &mut self,
        parent: ItemId,
        index: usize,
        kind: ItemKind,
    ) -> Result<ItemId, TreeError> {
        self.require(parent)?;
        let child = self.create(kind)?;
        if let Err(e) = self.insert(parent, index, child) {
            self.free_subtree(child);
            return Err(e);
        }
        Ok(child)
    }

    /// Adopt a detached subtree under `parent`, returning the new node's handle
    pub fn attach_node(&mut self, parent: ItemId, node: ItemNode) -> Result<ItemId, TreeError> {
        let end = self.size(parent);
        self.insert_node(parent, end, node)
    }

    pub fn insert_node(
        &mut self,
        parent: ItemId,
        index: usize,
        mut node: ItemNode,
    ) -> Result<ItemId, TreeError> {
        let (kind, children) = take_node(&mut node);
        let id = self.insert_new(parent, index, kind)?;

        // (adopted parent, its children still to adopt)
        let mut pending = vec![(id, children.into_iter())];
        loop {
            let Some((parent, children)) = pending.last_mut() else {
                return Ok(id);
            };
            let parent = *parent;
            let Some(mut child) = children.next() else {
                pending.pop();
                continue;
            };
            let (kind, grandchildren) = take_node(&mut child);
            match self.add_new(parent, kind) {
                Ok(child_id) => pending.push((child_id, grandchildren.into_iter())),
                Err(e) => {
                    drop(pending);
                    self.remove(id)?;
                    return Err(e);
                }
            }
        }
    }

    fn check_attach(&self, parent: ItemId, child: ItemId) -> Result<(), TreeError> {
        let parent_item = self.require(parent)?;
        let child_item = self.require(child)?;
        if child == self.root {
            return Err(TreeError::InvalidStructure(
                "root cannot be a child".to_string(),
            ));
        }
        if !parent_item.kind.can_have_children() {
            return Err(TreeError::InvalidStructure(format!(
                "{} items cannot have children",
                parent_item.kind.type_name()
            )));
        }
        // a childless item can only contain itself
        let cycle = if child_item.children.is_empty() {
            child == parent
        } else {
            self.is_ancestor_or_self(child, parent)
        };
        if cycle {
            return Err(TreeError::InvalidStructure(
                "item cannot be moved under itself or its descendant".to_string(),
            ));
        }
        Ok(())
    }

    fn link_child(&mut self, parent: ItemId, index: usize, child: ItemId) {
        if let Some(item) = self.get_mut(child) {
            item.parent = Some(parent);
        }
        if let Some(item) = self.get_mut(parent) {
            let index = index.min(item.children.len());
            item.children.insert(index, child);
        }
    }

    fn unlink_child(&mut self, child: ItemId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(item) = self.get_mut(parent) {
            item.children.retain(|c| *c != child);
        }
        if let Some(item) = self.get_mut(child) {
            item.parent = None;
        }
    }

    // -----------------------------------------------------------------------
    // Removal and reparenting
    // -----------------------------------------------------------------------

    /// Detach `id` from its parent and destroy its subtree, returning an
    /// owned copy of what was removed
    pub fn remove(&mut self, id: ItemId) -> Result<ItemNode, TreeError> {
        if id == self.root {
            return Err(TreeError::InvalidStructure(
                "cannot remove the root".to_string(),
            ));
        }
        let node = self.to_node(id).ok_or(TreeError::NotFound)?;
        self.unlink_child(id);
        self.free_subtree(id);
        Ok(node)
    }

    /// Remove the most recently added child of `parent`
    pub fn remove_last(&mut self, parent: ItemId) -> Result<Option<ItemNode>, TreeError> {
        match self.require(parent)?.last_child() {
            Some(last) => self.remove(last).map(Some),
            None => Ok(None),
        }
    }

    /// Move `child` under `new_parent` at `index` (append when `None`).
    ///
    /// All checks run before anything is touched, so a rejected move leaves
    /// the tree unchanged.
    pub fn reparent(
        &mut self,
        child: ItemId,
        new_parent: ItemId,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        self.check_attach(new_parent, child)?;
        self.unlink_child(child);
        let index = index.unwrap_or_else(|| self.size(new_parent));
        self.link_child(new_parent, index, child);
        Ok(())
    }

    /// Replace `parent`'s children with `order`, which must be a
    /// duplicate-free subset of the current children. Children left out are
    /// removed and returned.
    pub fn replace_children(
        &mut self,
        parent: ItemId,
        order: Vec<ItemId>,
    ) -> Result<Vec<ItemNode>, TreeError> {
        let current = self.require(parent)?.children.clone();
        for (i, id) in order.iter().enumerate() {
            if !current.contains(id) {
                return Err(TreeError::InvalidStructure(
                    "reorder may only use the item's own children".to_string(),
                ));
            }
            if order[..i].contains(id) {
                return Err(TreeError::InvalidStructure(
                    "reorder lists an item twice".to_string(),
                ));
            }
        }
        let dropped: Vec<ItemId> = current
            .iter()
            .copied()
            .filter(|id| !order.contains(id))
            .collect();
        let mut removed = Vec::with_capacity(dropped.len());
        for id in dropped {
            removed.push(self.remove(id)?);
        }
        if let Some(item) = self.get_mut(parent) {
            item.children = order;
        }
        Ok(removed)
    }

    fn free_subtree(&mut self, id: ItemId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let index = current.index as usize;
            let Some(slot) = self.slots.get_mut(index) else {
                continue;
            };
            if slot.generation != current.generation {
                continue;
            }
            if let Some(item) = slot.item.take() {
                stack.extend(item.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Replace a node's payload. The new kind must fit the node's position.
    pub fn set_kind(&mut self, id: ItemId, kind: ItemKind) -> Result<(), TreeError> {
        let item = self.require(id)?;
        if (id == self.root) != (kind == ItemKind::Root) {
            return Err(TreeError::InvalidStructure(
                "only the root may be a root item".to_string(),
            ));
        }
        if !kind.can_have_children() && !item.children.is_empty() {
            return Err(TreeError::InvalidStructure(format!(
                "{} items cannot have children",
                kind.type_name()
            )));
        }
        if let Some(item) = self.get_mut(id) {
            item.kind = kind;
        }
        Ok(())
    }

    /// Change the stored name of a text-like item or the alias of a link
    pub fn rename(&mut self, id: ItemId, new_name: &str) -> Result<(), TreeError> {
        let item = self.get_mut(id).ok_or(TreeError::NotFound)?;
        match &mut item.kind {
            ItemKind::Text { name } | ItemKind::Checkbox { name, .. } | ItemKind::Remote { name } => {
                *name = new_name.to_string();
                Ok(())
            }
            ItemKind::Link { name, .. } => {
                *name = (!new_name.is_empty()).then(|| new_name.to_string());
                Ok(())
            }
            other => Err(TreeError::InvalidStructure(format!(
                "{} items have no name",
                other.type_name()
            ))),
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Name shown for an item. Links show their alias, else their target's name.
    pub fn display_name(&self, id: ItemId) -> String {
        let Some(kind) = self.kind(id) else {
            return String::new();
        };
        match kind {
            ItemKind::Root => "/".to_string(),
            ItemKind::Separator => String::new(),
            ItemKind::Text { name } | ItemKind::Checkbox { name, .. } | ItemKind::Remote { name } => {
                name.clone()
            }
            ItemKind::Link { target, name } => {
                if let Some(alias) = name.as_deref().filter(|n| !n.is_empty()) {
                    return alias.to_string();
                }
                match self.link_target(id) {
                    Some(resolved) => self.display_name(resolved),
                    None => split_link_path(target)
                        .last()
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                }
            }
        }
    }

    /// Title of a level: the display name plus the child count for non-empty items
    pub fn title(&self, id: ItemId) -> String {
        let name = self.display_name(id);
        match self.get(id) {
            Some(item) if !item.is_empty() => format!("{} [{}]", name, item.size()),
            _ => name,
        }
    }

    /// Find a text-like child by display name: exact match first, then
    /// a match on the simplified name
    pub fn find_child(&self, parent: ItemId, name: &str) -> Option<ItemId> {
        let children = self.children(parent);
        let text_children = || {
            children
                .iter()
                .copied()
                .filter(|c| self.kind(*c).is_some_and(ItemKind::is_text_like))
        };
        if let Some(found) = text_children().find(|c| self.display_name(*c) == name) {
            return Some(found);
        }
        let expected = simplify(name);
        text_children().find(|c| simplify(&self.display_name(*c)) == expected)
    }

    /// Resolve a name path from the root
    pub fn find_by_path<S: AsRef<str>>(&self, path: &[S]) -> Option<ItemId> {
        let mut current = self.root;
        for segment in path {
            current = self.find_child(current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Name path from the root to `id` (root itself has an empty path)
    pub fn path_of(&self, id: ItemId) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(item) = current {
            if item == self.root {
                break;
            }
            names.push(self.display_name(item));
            current = self.parent(item);
        }
        names.reverse();
        names
    }

    /// Current target of a link, or `None` for broken links and non-links
    pub fn link_target(&self, id: ItemId) -> Option<ItemId> {
        let path = self.kind(id)?.link_path()?;
        self.find_by_path(&path)
    }

    /// All live handles in depth-first pre-order starting at the root
    pub fn iter_depth_first(&self) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Links whose target path no longer resolves
    pub fn broken_links(&self) -> Vec<ItemId> {
        self.iter_depth_first()
            .into_iter()
            .filter(|id| matches!(self.kind(*id), Some(ItemKind::Link { .. })))
            .filter(|id| self.link_target(*id).is_none())
            .collect()
    }

    /// Owned copy of the subtree at `id`
    pub fn to_node(&self, id: ItemId) -> Option<ItemNode> {
        let item = self.get(id)?;
        // (node being built, its source children not yet copied)
        let mut pending = vec![(ItemNode::new(item.kind.clone()), item.children.iter())];
        loop {
            let (_, children) = pending.last_mut()?;
            match children.find_map(|c| self.get(*c)) {
                Some(child) => {
                    pending.push((ItemNode::new(child.kind.clone()), child.children.iter()))
                }
                None => {
                    let (node, _) = pending.pop()?;
                    match pending.last_mut() {
                        Some((parent, _)) => parent.children.push(node),
                        None => return Some(node),
                    }
                }
            }
        }
    }
}

/// Move the payload and children out of a node that is about to be dropped
fn take_node(node: &mut ItemNode) -> (ItemKind, Vec<ItemNode>) {
    let kind = std::mem::replace(&mut node.kind, ItemKind::Separator);
    (kind, std::mem::take(&mut node.children))
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self.root, other.root)];
        while let Some((a, b)) = pending.pop() {
            let (Some(a), Some(b)) = (self.get(a), other.get(b)) else {
                return false;
            };
            if a.kind != b.kind || a.children.len() != b.children.len() {
                return false;
            }
            pending.extend(a.children.iter().copied().zip(b.children.iter().copied()));
        }
        true
    }
}

impl Eq for Tree {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, ItemId, ItemId, ItemId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let work = tree.add_new(root, ItemKind::text("Work")).unwrap();
        let ideas = tree.add_new(work, ItemKind::text("Ideas")).unwrap();
        let home = tree.add_new(root, ItemKind::text("Home")).unwrap();
        (tree, work, ideas, home)
    }

    #[test]
    fn add_sets_parent_and_order() {
        let (tree, work, ideas, home) = sample();
        let root = tree.root();
        assert_eq!(tree.children(root), &[work, home]);
        assert_eq!(tree.parent(ideas), Some(work));
        assert_eq!(tree.last_child(root), Some(home));
        assert_eq!(tree.size(work), 1);
        assert_eq!(tree.size(ideas), 0);
        assert!(tree.parent(root).is_none());
    }

    #[test]
    fn add_rejects_item_that_already_has_parent() {
        let (mut tree, work, ideas, home) = sample();
        let err = tree.add(home, ideas).unwrap_err();
        assert!(matches!(err, TreeError::InvalidStructure(_)));
        assert_eq!(tree.parent(ideas), Some(work));
        assert!(tree.children(home).is_empty());
    }

    #[test]
    fn root_cannot_be_created_or_attached() {
        let (mut tree, work, _, _) = sample();
        assert!(tree.create(ItemKind::Root).is_err());
        let root = tree.root();
        assert!(tree.reparent(root, work, None).is_err());
        assert!(tree.remove(root).is_err());
    }

    #[test]
    fn separators_never_get_children() {
        let mut tree = Tree::new();
        let root = tree.root();
        let sep = tree.add_new(root, ItemKind::Separator).unwrap();
        let err = tree.add_new(sep, ItemKind::text("x")).unwrap_err();
        assert!(matches!(err, TreeError::InvalidStructure(_)));
        // the rejected node was not leaked into the arena
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn remove_detaches_and_invalidates_subtree() {
        let (mut tree, work, ideas, _) = sample();
        let removed = tree.remove(work).unwrap();
        assert_eq!(removed.count(), 2);
        assert!(!tree.contains(work));
        assert!(!tree.contains(ideas));
        assert_eq!(tree.size(tree.root()), 1);

        // slot reuse never resurrects the old handle
        let fresh = tree.add_new(tree.root(), ItemKind::text("New")).unwrap();
        assert_ne!(fresh, work);
        assert!(!tree.contains(work));
    }

    #[test]
    fn remove_last_pops_most_recent_child() {
        let (mut tree, _, _, home) = sample();
        let root = tree.root();
        let popped = tree.remove_last(root).unwrap().unwrap();
        assert_eq!(popped.kind, ItemKind::text("Home"));
        assert!(!tree.contains(home));
        assert!(tree.remove_last(home).is_err());
    }

    #[test]
    fn reparent_moves_atomically() {
        let (mut tree, work, ideas, home) = sample();
        tree.reparent(ideas, home, None).unwrap();
        assert!(tree.children(work).is_empty());
        assert_eq!(tree.children(home), &[ideas]);
        assert_eq!(tree.parent(ideas), Some(home));
    }

    #[test]
    fn reparent_under_own_descendant_is_rejected_without_changes() {
        let (mut tree, work, ideas, _) = sample();
        let before = tree.clone();
        let err = tree.reparent(work, ideas, None).unwrap_err();
        assert!(matches!(err, TreeError::InvalidStructure(_)));
        let err = tree.reparent(work, work, None).unwrap_err();
        assert!(matches!(err, TreeError::InvalidStructure(_)));
        assert_eq!(tree, before);
        assert_eq!(tree.parent(work), Some(tree.root()));
    }

    #[test]
    fn replace_children_reorders_and_drops() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_new(root, ItemKind::text("a")).unwrap();
        let b = tree.add_new(root, ItemKind::text("b")).unwrap();
        let c = tree.add_new(root, ItemKind::text("c")).unwrap();

        let removed = tree.replace_children(root, vec![c, a]).unwrap();
        assert_eq!(tree.children(root), &[c, a]);
        assert_eq!(removed, vec![ItemNode::new(ItemKind::text("b"))]);
        assert!(!tree.contains(b));
    }

    #[test]
    fn replace_children_rejects_foreign_or_duplicate_items() {
        let (mut tree, work, ideas, home) = sample();
        let root = tree.root();
        assert!(tree.replace_children(root, vec![work, ideas]).is_err());
        assert!(tree.replace_children(root, vec![work, work]).is_err());
        assert_eq!(tree.children(root), &[work, home]);
    }

    #[test]
    fn find_child_prefers_exact_then_simplified() {
        let mut tree = Tree::new();
        let root = tree.root();
        let cafe = tree.add_new(root, ItemKind::text("Café!")).unwrap();
        let exact = tree.add_new(root, ItemKind::text("cafe")).unwrap();
        tree.add_new(root, ItemKind::Separator).unwrap();

        assert_eq!(tree.find_child(root, "Café!"), Some(cafe));
        assert_eq!(tree.find_child(root, "cafe"), Some(exact));
        assert_eq!(tree.find_child(root, "CAFE"), Some(cafe));
        assert_eq!(tree.find_child(root, "tea"), None);
    }

    #[test]
    fn links_resolve_by_path_and_break_when_target_removed() {
        let (mut tree, work, ideas, home) = sample();
        let link = tree
            .add_new(home, ItemKind::link("Work\tIdeas", None))
            .unwrap();
        assert_eq!(tree.link_target(link), Some(ideas));
        assert_eq!(tree.display_name(link), "Ideas");

        tree.remove(work).unwrap();
        assert_eq!(tree.link_target(link), None);
        assert_eq!(tree.display_name(link), "Ideas");
        assert_eq!(tree.broken_links(), vec![link]);
    }

    #[test]
    fn link_alias_overrides_display_name() {
        let (mut tree, _, _, home) = sample();
        let link = tree
            .add_new(home, ItemKind::link("Work", Some("Job".into())))
            .unwrap();
        assert_eq!(tree.display_name(link), "Job");
        tree.rename(link, "").unwrap();
        assert_eq!(tree.display_name(link), "Work");
    }

    #[test]
    fn path_of_and_title() {
        let (tree, work, ideas, _) = sample();
        assert_eq!(tree.path_of(ideas), vec!["Work", "Ideas"]);
        assert!(tree.path_of(tree.root()).is_empty());
        assert_eq!(tree.title(work), "Work [1]");
        assert_eq!(tree.title(ideas), "Ideas");
    }

    #[test]
    fn from_node_wraps_non_root_items() {
        let tree = Tree::from_node(ItemNode::new(ItemKind::text("a"))).unwrap();
        assert_eq!(tree.size(tree.root()), 1);

        let nested_root = ItemNode::with_children(
            ItemKind::Root,
            vec![ItemNode::new(ItemKind::Root)],
        );
        assert!(Tree::from_node(nested_root).is_err());
    }

    #[test]
    fn set_kind_guards_root_and_separators() {
        let (mut tree, work, ideas, _) = sample();
        assert!(tree.set_kind(work, ItemKind::Separator).is_err());
        assert!(tree.set_kind(ideas, ItemKind::Root).is_err());
        tree.set_kind(ideas, ItemKind::checkbox("Ideas", true)).unwrap();
        assert_eq!(tree.kind(ideas), Some(&ItemKind::checkbox("Ideas", true)));
    }

    #[test]
    fn deep_subtrees_attach_copy_and_compare() {
        fn chain() -> ItemNode {
            let mut node = ItemNode::new(ItemKind::text("bottom"));
            for _ in 0..50_000 {
                node = ItemNode::with_children(ItemKind::text("level"), vec![node]);
            }
            node
        }
        let tree = Tree::from_node(chain()).unwrap();
        assert_eq!(tree.len(), 50_002);

        let top = tree.children(tree.root())[0];
        assert!(tree.to_node(top) == Some(chain()));
        assert!(tree == tree.clone());

        let mut other = tree.clone();
        let leaf = *other.iter_depth_first().last().unwrap();
        other.rename(leaf, "changed").unwrap();
        assert!(tree != other);
    }

    #[test]
    fn failed_attach_leaves_no_partial_subtree() {
        let mut tree = Tree::new();
        let root = tree.root();
        let bad = ItemNode::with_children(
            ItemKind::text("a"),
            vec![ItemNode::with_children(
                ItemKind::Separator,
                vec![ItemNode::new(ItemKind::text("b"))],
            )],
        );
        assert!(tree.attach_node(root, bad).is_err());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
    }
}
