use std::collections::HashMap;

use serde::Serialize;

use crate::model::item::{ItemKind, display_link_path, join_link_path};
use crate::model::tree::Tree;
use crate::util::simplify::simplify;

/// Structured result from `todotree check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub items: usize,
    pub links: usize,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (something that should be fixed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// A link whose target path no longer resolves
    #[serde(rename = "broken_link")]
    BrokenLink { path: String, target: String },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Siblings whose names simplify to the same string; a link path
    /// through them always resolves to the first one
    #[serde(rename = "ambiguous_name")]
    AmbiguousName { path: String, name: String },
}

/// Validate a tree: broken links are errors, ambiguous sibling names are
/// warnings.
pub fn check_tree(tree: &Tree) -> CheckResult {
    let mut result = CheckResult {
        items: tree.len().saturating_sub(1),
        ..Default::default()
    };

    for id in tree.iter_depth_first() {
        if let Some(ItemKind::Link { target, .. }) = tree.kind(id) {
            result.links += 1;
            if tree.link_target(id).is_none() {
                let parent_path = tree.parent(id).map(|p| tree.path_of(p)).unwrap_or_default();
                result.errors.push(CheckError::BrokenLink {
                    path: display_link_path(&join_link_path(&parent_path)),
                    target: display_link_path(target),
                });
            }
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        for child in tree.children(id) {
            let is_text_like = tree.kind(*child).is_some_and(|k| k.is_text_like());
            if !is_text_like {
                continue;
            }
            let name = tree.display_name(*child);
            let count = seen.entry(simplify(&name)).or_insert(0);
            *count += 1;
            if *count == 2 {
                result.warnings.push(CheckWarning::AmbiguousName {
                    path: display_link_path(&join_link_path(&tree.path_of(id))),
                    name,
                });
            }
        }
    }

    result.valid = result.errors.is_empty();
    result
}
