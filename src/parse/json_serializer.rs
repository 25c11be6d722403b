use crate::model::item::{ItemId, ItemKind, ItemNode};
use crate::model::tree::Tree;

use super::json_parser::JsonError;

/// Spaces per nesting level of the pretty-printed output
const INDENT: usize = 2;

/// Serialize a whole tree, starting at its root
pub fn serialize_tree(tree: &Tree) -> Result<String, JsonError> {
    serialize_item(tree, tree.root())
}

/// Serialize the subtree at `id`
pub fn serialize_item(tree: &Tree, id: ItemId) -> Result<String, JsonError> {
    let node = tree
        .to_node(id)
        .ok_or_else(|| JsonError::SerializationFailed("item not found".to_string()))?;
    serialize_node(&node)
}

/// Serialize a detached subtree as pretty-printed JSON.
///
/// Objects carry `type`, then `name`, `target` and `checked` where the
/// variant has them, then `items` when there are children. The walk keeps
/// its own stack of open `items` arrays, so deep trees write as readily as
/// shallow ones.
pub fn serialize_node(node: &ItemNode) -> Result<String, JsonError> {
    let mut out = String::new();
    // (object whose items are being written, its indent, next child index)
    let mut open: Vec<(&ItemNode, usize, usize)> = Vec::new();
    let mut next_object = Some((node, 0));

    loop {
        if let Some((node, indent)) = next_object.take() {
            write_fields(&mut out, &node.kind, indent)?;
            if node.children.is_empty() {
                close(&mut out, indent, '}');
            } else {
                out.push_str(",\n");
                pad(&mut out, indent + INDENT);
                out.push_str("\"items\": [");
                open.push((node, indent, 0));
            }
        }

        let Some((parent, indent, next)) = open.last_mut() else {
            return Ok(out);
        };
        let (parent, indent) = (*parent, *indent);
        match parent.children.get(*next) {
            Some(child) => {
                out.push_str(if *next == 0 { "\n" } else { ",\n" });
                *next += 1;
                let child_indent = indent + 2 * INDENT;
                pad(&mut out, child_indent);
                next_object = Some((child, child_indent));
            }
            None => {
                close(&mut out, indent + INDENT, ']');
                close(&mut out, indent, '}');
                open.pop();
            }
        }
    }
}

/// Write `{` and the scalar fields of one item, without the closing brace
fn write_fields(out: &mut String, kind: &ItemKind, indent: usize) -> Result<(), JsonError> {
    let mut fields: Vec<(&str, &str)> = vec![("type", kind.type_name())];
    match kind {
        ItemKind::Root | ItemKind::Separator => {}
        ItemKind::Text { name } | ItemKind::Remote { name } => fields.push(("name", name.as_str())),
        ItemKind::Checkbox { name, checked } => {
            fields.push(("name", name.as_str()));
            fields.push(("checked", if *checked { "true" } else { "false" }));
        }
        ItemKind::Link { target, name } => {
            if let Some(name) = name {
                fields.push(("name", name.as_str()));
            }
            fields.push(("target", target.as_str()));
        }
    }

    out.push('{');
    for (i, (key, value)) in fields.into_iter().enumerate() {
        out.push_str(if i == 0 { "\n" } else { ",\n" });
        pad(out, indent + INDENT);
        out.push_str(&quoted(key)?);
        out.push_str(": ");
        out.push_str(&quoted(value)?);
    }
    Ok(())
}

fn quoted(s: &str) -> Result<String, JsonError> {
    serde_json::to_string(s).map_err(|e| JsonError::SerializationFailed(e.to_string()))
}

fn close(out: &mut String, indent: usize, bracket: char) {
    out.push('\n');
    pad(out, indent);
    out.push(bracket);
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}
