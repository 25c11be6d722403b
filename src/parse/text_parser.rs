use crate::model::item::{ItemId, ItemKind};
use crate::model::tree::{Tree, TreeError};

/// Error type for the legacy text format
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextFormatError {
    #[error("{message} (line {line})")]
    ParseError { message: String, line: usize },
    #[error("cannot write item in text format: {0}")]
    Unrepresentable(String),
    #[error(transparent)]
    Structure(#[from] TreeError),
}

impl TextFormatError {
    fn at(message: &str, line: usize) -> Self {
        TextFormatError::ParseError {
            message: message.to_string(),
            line,
        }
    }
}

/// Parse the legacy brace-delimited format.
///
/// Every non-blank line is a text item. A line holding only `{` opens a
/// block of children for the item right before it; `}` closes the block.
/// Open blocks are kept on an explicit stack, so the input is read in one
/// pass and nesting depth is not limited by the call stack.
pub fn parse_text_tree(source: &str) -> Result<Tree, TextFormatError> {
    let source = source.trim_start_matches('\u{feff}');
    let mut tree = Tree::new();
    let mut parent = tree.root();
    // (parent outside the block, line of its opening bracket)
    let mut open_blocks: Vec<(ItemId, usize)> = Vec::new();

    for (index, raw) in source.split('\n').enumerate() {
        let line = index + 1;
        match raw.trim() {
            "" => {}
            "{" => {
                let last = tree.last_child(parent).ok_or_else(|| {
                    TextFormatError::at("no matching element before opening bracket", line)
                })?;
                open_blocks.push((parent, line));
                parent = last;
            }
            "}" => {
                let (outer, _) = open_blocks
                    .pop()
                    .ok_or_else(|| TextFormatError::at("redundant closing bracket", line))?;
                parent = outer;
            }
            text => {
                tree.add_new(parent, ItemKind::text(text))?;
            }
        }
    }

    if let Some((_, line)) = open_blocks.first() {
        return Err(TextFormatError::at("no matching closing bracket", *line));
    }
    tracing::debug!(items = tree.len() - 1, "parsed text-format tree");
    Ok(tree)
}
