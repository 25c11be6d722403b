/// Separator between name segments of a stored link target path
pub const LINK_PATH_SEPARATOR: char = '\t';

/// Stable handle to a node in a [`Tree`](super::tree::Tree).
///
/// Handles carry a generation so a handle to a removed node never resolves
/// to whatever node later reuses the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Node variant with its variant-specific payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// The single root of a tree
    Root,
    /// Plain text item
    Text { name: String },
    /// Text item with a check mark
    Checkbox { name: String, checked: bool },
    /// Visual divider, never has children
    Separator,
    /// Symbolic link to another location, stored as a name path
    Link {
        target: String,
        name: Option<String>,
    },
    /// Text item whose children are filled by a remote fetch
    Remote { name: String },
}

impl ItemKind {
    pub fn text(name: impl Into<String>) -> Self {
        ItemKind::Text { name: name.into() }
    }

    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        ItemKind::Checkbox {
            name: name.into(),
            checked,
        }
    }

    pub fn remote(name: impl Into<String>) -> Self {
        ItemKind::Remote { name: name.into() }
    }

    pub fn link(target: impl Into<String>, name: Option<String>) -> Self {
        ItemKind::Link {
            target: target.into(),
            name,
        }
    }

    /// The discriminator used by the structured format
    pub fn type_name(&self) -> &'static str {
        match self {
            ItemKind::Root => "/",
            ItemKind::Text { .. } => "text",
            ItemKind::Checkbox { .. } => "checkbox",
            ItemKind::Separator => "separator",
            ItemKind::Link { .. } => "link",
            ItemKind::Remote { .. } => "remote",
        }
    }

    /// Own name of text-like items (text, checkbox, remote)
    pub fn name(&self) -> Option<&str> {
        match self {
            ItemKind::Text { name } | ItemKind::Checkbox { name, .. } | ItemKind::Remote { name } => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Text-like items take part in name lookup and can be navigated into
    pub fn is_text_like(&self) -> bool {
        self.name().is_some()
    }

    pub fn can_have_children(&self) -> bool {
        !matches!(self, ItemKind::Separator)
    }

    /// Split a stored link target into its name segments
    pub fn link_path(&self) -> Option<Vec<&str>> {
        match self {
            ItemKind::Link { target, .. } => Some(split_link_path(target)),
            _ => None,
        }
    }
}

/// Split a tab-separated target path, dropping empty segments
pub fn split_link_path(target: &str) -> Vec<&str> {
    target
        .split(LINK_PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Join name segments into a stored link target
pub fn join_link_path<S: AsRef<str>>(segments: &[S]) -> String {
    let parts: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
    parts.join(&LINK_PATH_SEPARATOR.to_string())
}

/// Human-readable form of a link target path, e.g. `/Work/Ideas`
pub fn display_link_path(target: &str) -> String {
    let mut out = String::new();
    for segment in split_link_path(target) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// A node stored in the tree arena
#[derive(Debug, Clone)]
pub struct TreeItem {
    pub kind: ItemKind,
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
}

impl TreeItem {
    pub(crate) fn new(kind: ItemKind) -> Self {
        TreeItem {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    /// Number of children
    pub fn size(&self) -> usize {
        self.children.len()
    }

    /// True for items without children. Empty items show no size suffix
    /// in titles and are opened for editing instead of navigated into.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn last_child(&self) -> Option<ItemId> {
        self.children.last().copied()
    }
}

/// Owned, detached subtree.
///
/// Codecs produce and consume these; a [`Tree`](super::tree::Tree) adopts
/// them with `attach_node`. Comparison, counting and dropping walk the
/// subtree with an explicit stack, so nesting depth is bounded by memory
/// rather than by the call stack.
#[derive(Debug, Clone)]
pub struct ItemNode {
    pub kind: ItemKind,
    pub children: Vec<ItemNode>,
}

impl ItemNode {
    pub fn new(kind: ItemKind) -> Self {
        ItemNode {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: ItemKind, children: Vec<ItemNode>) -> Self {
        ItemNode { kind, children }
    }

    /// Total number of nodes in this subtree, including self
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            total += 1;
            pending.extend(node.children.iter());
        }
        total
    }
}

impl PartialEq for ItemNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.kind != b.kind || a.children.len() != b.children.len() {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for ItemNode {}

impl Drop for ItemNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_match_structured_discriminators() {
        assert_eq!(ItemKind::Root.type_name(), "/");
        assert_eq!(ItemKind::text("a").type_name(), "text");
        assert_eq!(ItemKind::checkbox("a", true).type_name(), "checkbox");
        assert_eq!(ItemKind::Separator.type_name(), "separator");
        assert_eq!(ItemKind::link("a", None).type_name(), "link");
        assert_eq!(ItemKind::remote("a").type_name(), "remote");
    }

    #[test]
    fn only_text_like_kinds_have_names() {
        assert_eq!(ItemKind::checkbox("buy milk", false).name(), Some("buy milk"));
        assert_eq!(ItemKind::remote("inbox").name(), Some("inbox"));
        assert!(ItemKind::Separator.name().is_none());
        assert!(ItemKind::link("x", Some("alias".into())).name().is_none());
        assert!(!ItemKind::Separator.can_have_children());
    }

    #[test]
    fn link_paths_split_and_join() {
        let target = join_link_path(&["Work", "Ideas"]);
        assert_eq!(target, "Work\tIdeas");
        assert_eq!(split_link_path(&target), vec!["Work", "Ideas"]);
        assert_eq!(split_link_path("\tWork\t\t"), vec!["Work"]);
        assert_eq!(display_link_path(&target), "/Work/Ideas");
        assert_eq!(display_link_path(""), "/");
    }

    #[test]
    fn node_count_includes_descendants() {
        let node = ItemNode::with_children(
            ItemKind::text("a"),
            vec![ItemNode::with_children(
                ItemKind::text("b"),
                vec![ItemNode::new(ItemKind::Separator)],
            )],
        );
        assert_eq!(node.count(), 3);
    }

    #[test]
    fn deep_nodes_compare_and_drop_without_recursion() {
        fn chain(depth: usize) -> ItemNode {
            let mut node = ItemNode::new(ItemKind::text("leaf"));
            for _ in 0..depth {
                node = ItemNode::with_children(ItemKind::text("level"), vec![node]);
            }
            node
        }
        let a = chain(100_000);
        let b = chain(100_000);
        assert_eq!(a.count(), 100_001);
        assert!(a == b);
        assert!(a != chain(99_999));
    }
}
