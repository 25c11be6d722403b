use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::model::item::{ItemKind, ItemNode};
use crate::model::tree::Tree;

/// Error type for the structured format
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonError {
    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),
    #[error("serialization failed: {0}")]
    SerializationFailed(String),
}

impl JsonError {
    fn failed(message: impl Into<String>) -> Self {
        JsonError::DeserializationFailed(message.into())
    }

    fn missing(property: &str) -> Self {
        Self::failed(format!("property '{}' not found", property))
    }
}

/// `},` directly followed by a line that closes an array
static TRAILING_ITEM_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\},\r?\n(\s*)\]").expect("valid trailing comma pattern"));

/// Wire shape of one item. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct JsonItem {
    #[serde(rename = "type", default, deserialize_with = "loose_scalar")]
    item_type: Option<String>,
    #[serde(default, deserialize_with = "loose_scalar")]
    name: Option<String>,
    #[serde(default, deserialize_with = "loose_scalar")]
    target: Option<String>,
    #[serde(default, deserialize_with = "loose_scalar")]
    checked: Option<String>,
    #[serde(default)]
    items: Option<Vec<Option<JsonItem>>>,
}

impl JsonItem {
    fn take_items(&mut self) -> std::iter::Flatten<std::vec::IntoIter<Option<JsonItem>>> {
        self.items.take().unwrap_or_default().into_iter().flatten()
    }
}

impl Drop for JsonItem {
    fn drop(&mut self) {
        let mut pending: Vec<JsonItem> = self.take_items().collect();
        while let Some(mut item) = pending.pop() {
            pending.extend(item.take_items());
        }
    }
}

/// Scalar written with or without quotes: `"true"`, `true`, `1`
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Text(String),
    Flag(bool),
    Number(serde_json::Number),
}

fn loose_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<LooseScalar> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        LooseScalar::Text(s) => s,
        LooseScalar::Flag(b) => b.to_string(),
        LooseScalar::Number(n) => n.to_string(),
    }))
}

/// Repair the sloppy output older versions left behind: surrounding
/// whitespace, one trailing comma after the document, and trailing commas
/// after the last element of an `items` array.
pub fn preprocess(data: &str) -> String {
    let mut trimmed = data.trim_start_matches('\u{feff}').trim();
    if let Some(stripped) = trimmed.strip_suffix(',') {
        trimmed = stripped.trim_end();
    }
    TRAILING_ITEM_COMMA
        .replace_all(trimmed, "}\n$1]")
        .into_owned()
}

/// Quote bare words outside string literals, so hand-written input such as
/// `{type: text, name: Groceries}` reads as if every word were quoted.
/// `true`, `false`, `null` and numbers are left alone.
pub fn quote_bare_words(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut word_start: Option<usize> = None;

    for (i, c) in data.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        let delimiter = c.is_whitespace() || matches!(c, '{' | '}' | '[' | ']' | ':' | ',' | '"');
        if !delimiter {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = word_start.take() {
            push_word(&mut out, &data[start..i]);
        }
        in_string = c == '"';
        out.push(c);
    }
    if let Some(start) = word_start {
        push_word(&mut out, &data[start..]);
    }
    out
}

fn push_word(out: &mut String, word: &str) {
    let numeric = word.starts_with(|c: char| c.is_ascii_digit() || c == '-')
        && word.parse::<f64>().is_ok();
    if numeric || matches!(word, "true" | "false" | "null") {
        out.push_str(word);
    } else {
        out.push_str(&serde_json::Value::from(word).to_string());
    }
}

/// Decode one item (and its subtree) from the structured format.
///
/// Nesting depth is not capped: the reader grows its stack on the heap as
/// needed, and the decoded items are mapped without recursion.
pub fn deserialize_item(data: &str) -> Result<ItemNode, JsonError> {
    let data = quote_bare_words(&preprocess(data));
    let mut reader = serde_json::Deserializer::from_str(&data);
    reader.disable_recursion_limit();
    let json_item = JsonItem::deserialize(serde_stacker::Deserializer::new(&mut reader))
        .map_err(|e| JsonError::failed(e.to_string()))?;
    reader.end().map_err(|e| JsonError::failed(e.to_string()))?;
    map_json_item(json_item)
}

/// Decode a whole tree. A top-level item that is not a root becomes the
/// only child of a fresh root.
pub fn deserialize_tree(data: &str) -> Result<Tree, JsonError> {
    let start = Instant::now();
    let node = deserialize_item(data)?;
    let tree = Tree::from_node(node).map_err(|e| JsonError::failed(e.to_string()))?;
    tracing::debug!(
        items = tree.len() - 1,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "tree deserialization done"
    );
    Ok(tree)
}

fn map_json_item(mut top: JsonItem) -> Result<ItemNode, JsonError> {
    let kind = take_kind(&mut top, true)?;
    // (node being built, wire children not yet mapped)
    let mut pending = vec![(ItemNode::new(kind), top.take_items())];
    loop {
        let Some((_, items)) = pending.last_mut() else {
            return Err(JsonError::failed("empty document"));
        };
        match items.next() {
            Some(mut json_child) => {
                let kind = take_kind(&mut json_child, false)?;
                pending.push((ItemNode::new(kind), json_child.take_items()));
            }
            None => {
                let Some((node, _)) = pending.pop() else {
                    return Err(JsonError::failed("empty document"));
                };
                if !node.kind.can_have_children() && !node.children.is_empty() {
                    return Err(JsonError::failed(format!(
                        "{} item cannot contain items",
                        node.kind.type_name()
                    )));
                }
                match pending.last_mut() {
                    Some((parent, _)) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
        }
    }
}

fn take_kind(json_item: &mut JsonItem, top_level: bool) -> Result<ItemKind, JsonError> {
    let item_type = json_item.item_type.take().ok_or_else(|| JsonError::missing("type"))?;
    let name = json_item.name.take();
    let kind = match item_type.as_str() {
        "/" => {
            if !top_level {
                return Err(JsonError::failed("root item nested inside another item"));
            }
            ItemKind::Root
        }
        "text" => ItemKind::Text {
            name: name.ok_or_else(|| JsonError::missing("name"))?,
        },
        "remote" => ItemKind::Remote {
            name: name.ok_or_else(|| JsonError::missing("name"))?,
        },
        "separator" => ItemKind::Separator,
        "link" => ItemKind::Link {
            target: json_item.target.take().ok_or_else(|| JsonError::missing("target"))?,
            name,
        },
        "checkbox" => ItemKind::Checkbox {
            name: name.ok_or_else(|| JsonError::missing("name"))?,
            checked: json_item.checked.as_deref() == Some("true"),
        },
        other => return Err(JsonError::failed(format!("unknown item type: {}", other))),
    };
    Ok(kind)
}
