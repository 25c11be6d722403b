use crate::model::item::{ItemId, ItemKind};
use crate::model::tree::Tree;

use super::text_parser::TextFormatError;

/// Marker line written for separators
const SEPARATOR_LINE: &str = "---";

/// One step of the writer: an item to emit, or the `}` closing a block
enum Step {
    Item(ItemId, usize),
    Close(usize),
}

/// Serialize a tree to the legacy brace-delimited format.
///
/// The format only knows plain names, so checkbox state, remote flags and
/// link targets are not preserved; links are written by display name.
/// Names that would not parse back as the same single line are rejected.
pub fn serialize_text_tree(tree: &Tree) -> Result<String, TextFormatError> {
    let mut lines = Vec::new();
    let mut pending: Vec<Step> = tree
        .children(tree.root())
        .iter()
        .rev()
        .map(|c| Step::Item(*c, 0))
        .collect();

    while let Some(step) = pending.pop() {
        match step {
            Step::Close(indent) => lines.push(format!("{}}}", "  ".repeat(indent))),
            Step::Item(id, indent) => {
                let indent_str = "  ".repeat(indent);
                let line = match tree.kind(id) {
                    Some(ItemKind::Separator) => SEPARATOR_LINE.to_string(),
                    Some(_) => text_line(&tree.display_name(id))?,
                    None => continue,
                };
                lines.push(format!("{}{}", indent_str, line));

                let children = tree.children(id);
                if !children.is_empty() {
                    lines.push(format!("{}{{", indent_str));
                    pending.push(Step::Close(indent));
                    pending.extend(children.iter().rev().map(|c| Step::Item(*c, indent + 1)));
                }
            }
        }
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

fn text_line(name: &str) -> Result<String, TextFormatError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "{" || trimmed == "}" || trimmed.contains('\n') {
        return Err(TextFormatError::Unrepresentable(format!("{:?}", name)));
    }
    Ok(trimmed.to_string())
}
