use serde::Serialize;

use crate::model::config::TreeFormat;
use crate::model::item::{ItemId, ItemKind, display_link_path, join_link_path};
use crate::model::tree::Tree;
use crate::ops::check::{CheckError, CheckResult, CheckWarning};
use crate::util::unicode::{single_line, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct FoundJson {
    pub path: String,
    #[serde(rename = "type")]
    pub item_type: &'static str,
    pub name: String,
    pub size: usize,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub parent: String,
    #[serde(rename = "type")]
    pub item_type: &'static str,
    pub name: String,
    pub position: usize,
}

pub fn found_to_json(tree: &Tree, id: ItemId) -> FoundJson {
    FoundJson {
        path: canonical_path(tree, id),
        item_type: tree.kind(id).map_or("unknown", |k| k.type_name()),
        name: tree.display_name(id),
        size: tree.size(id),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `/Work/Ideas` style path of an item
pub fn canonical_path(tree: &Tree, id: ItemId) -> String {
    display_link_path(&join_link_path(&tree.path_of(id)))
}

/// One outline row for an item, without indentation
pub fn format_item_line(tree: &Tree, id: ItemId) -> String {
    let name = single_line(&tree.display_name(id));
    match tree.kind(id) {
        Some(ItemKind::Root) => "/".to_string(),
        Some(ItemKind::Text { .. }) => format!("- {}", name),
        Some(ItemKind::Checkbox { checked, .. }) => {
            format!("[{}] {}", if *checked { 'x' } else { ' ' }, name)
        }
        Some(ItemKind::Separator) => "---".to_string(),
        Some(ItemKind::Remote { .. }) => format!("@ {}", name),
        Some(ItemKind::Link { target, .. }) => {
            let suffix = if tree.link_target(id).is_some() {
                String::new()
            } else {
                " (broken)".to_string()
            };
            format!("-> {} [{}]{}", name, display_link_path(target), suffix)
        }
        None => String::new(),
    }
}

/// The subtree below `id`, indented two spaces per level. `depth` limits how
/// many levels are printed; `width` truncates each row.
pub fn format_outline(
    tree: &Tree,
    id: ItemId,
    depth: Option<usize>,
    width: Option<usize>,
) -> Vec<String> {
    let within_depth = |level: usize| depth.is_none_or(|d| level < d);
    let mut lines = Vec::new();
    // links are shown, not expanded, so cycles through links are never walked
    let mut pending: Vec<(ItemId, usize)> = Vec::new();
    if within_depth(0) {
        pending.extend(tree.children(id).iter().rev().map(|c| (*c, 0)));
    }
    while let Some((child, level)) = pending.pop() {
        lines.push(format!("{}{}", "  ".repeat(level), format_item_line(tree, child)));
        if within_depth(level + 1) {
            pending.extend(tree.children(child).iter().rev().map(|c| (*c, level + 1)));
        }
    }
    if let Some(width) = width {
        for line in &mut lines {
            *line = truncate_to_width(line, width);
        }
    }
    lines
}

pub fn format_check_result(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();
    if !result.errors.is_empty() {
        lines.push("Errors:".to_string());
        for err in &result.errors {
            match err {
                CheckError::BrokenLink { path, target } => {
                    lines.push(format!("  {} has broken link: {}", path, target));
                }
            }
        }
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            lines.push(String::new());
        }
        lines.push("Warnings:".to_string());
        for warn in &result.warnings {
            match warn {
                CheckWarning::AmbiguousName { path, name } => {
                    lines.push(format!("  {} has more than one item named like \"{}\"", path, name));
                }
            }
        }
    }
    if result.valid && result.warnings.is_empty() {
        lines.push(format!(
            "OK: {} items, {} links",
            result.items, result.links
        ));
    }
    lines
}

pub fn parse_tree_format(s: &str) -> Result<TreeFormat, String> {
    match s.to_lowercase().as_str() {
        "json" => Ok(TreeFormat::Json),
        "text" | "txt" => Ok(TreeFormat::Text),
        _ => Err(format!("invalid format: {} (expected json or text)", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        let work = tree.add_new(root, ItemKind::text("Work")).unwrap();
        let ideas = tree.add_new(work, ItemKind::text("Ideas")).unwrap();
        tree.add_new(ideas, ItemKind::checkbox("write docs", true)).unwrap();
        tree.add_new(root, ItemKind::Separator).unwrap();
        tree.add_new(root, ItemKind::remote("Inbox")).unwrap();
        tree.add_new(root, ItemKind::link("Work\tIdeas", None)).unwrap();
        tree.add_new(root, ItemKind::link("Nowhere", Some("old".into())))
            .unwrap();
        tree
    }

    #[test]
    fn outline_marks_each_kind() {
        let tree = sample();
        let lines = format_outline(&tree, tree.root(), None, None);
        assert_eq!(
            lines,
            vec![
                "- Work",
                "  - Ideas",
                "    [x] write docs",
                "---",
                "@ Inbox",
                "-> Ideas [/Work/Ideas]",
                "-> old [/Nowhere] (broken)",
            ]
        );
    }

    #[test]
    fn outline_depth_and_width() {
        let tree = sample();
        let lines = format_outline(&tree, tree.root(), Some(1), Some(8));
        assert_eq!(lines[0], "- Work");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "-> Idea…");
    }

    #[test]
    fn canonical_path_of_nested_item() {
        let tree = sample();
        let ideas = tree.find_by_path(&["work", "ideas"]).unwrap();
        assert_eq!(canonical_path(&tree, ideas), "/Work/Ideas");
        assert_eq!(canonical_path(&tree, tree.root()), "/");
    }

    #[test]
    fn parses_format_names() {
        assert_eq!(parse_tree_format("JSON").unwrap(), TreeFormat::Json);
        assert_eq!(parse_tree_format("txt").unwrap(), TreeFormat::Text);
        assert!(parse_tree_format("xml").is_err());
    }
}
