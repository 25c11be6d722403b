use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::NamedTempFile;

use crate::model::config::TreeFormat;
use crate::model::tree::Tree;
use crate::parse::{
    JsonError, TextFormatError, deserialize_tree, parse_text_tree, serialize_text_tree,
    serialize_tree,
};

/// Error type for loading and saving tree databases
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("{path}: {source}")]
    Json { path: PathBuf, source: JsonError },
    #[error("{path}: {source}")]
    Text {
        path: PathBuf,
        source: TextFormatError,
    },
    #[error("could not serialize tree: {0}")]
    Serialize(String),
    #[error("could not parse settings: {0}")]
    SettingsParseError(#[from] toml::de::Error),
}

/// Guess the format of a tree database from its content
pub fn sniff_format(text: &str) -> TreeFormat {
    let first = text
        .trim_start_matches('\u{feff}')
        .chars()
        .find(|c| !c.is_whitespace());
    match first {
        Some('{') => TreeFormat::Json,
        _ => TreeFormat::Text,
    }
}

/// Decode a tree from text in the given format
pub fn decode_tree(text: &str, format: TreeFormat) -> Result<Tree, DecodeError> {
    match format {
        TreeFormat::Json => deserialize_tree(text).map_err(DecodeError::Json),
        TreeFormat::Text => parse_text_tree(text).map_err(DecodeError::Text),
    }
}

/// Encode a tree in the given format
pub fn encode_tree(tree: &Tree, format: TreeFormat) -> Result<String, StoreError> {
    match format {
        TreeFormat::Json => serialize_tree(tree).map_err(|e| StoreError::Serialize(e.to_string())),
        TreeFormat::Text => {
            serialize_text_tree(tree).map_err(|e| StoreError::Serialize(e.to_string()))
        }
    }
}

/// Codec failure without a path attached
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Json(JsonError),
    #[error(transparent)]
    Text(TextFormatError),
}

impl DecodeError {
    fn at(self, path: &Path) -> StoreError {
        let path = path.to_path_buf();
        match self {
            DecodeError::Json(source) => StoreError::Json { path, source },
            DecodeError::Text(source) => StoreError::Text { path, source },
        }
    }
}

/// Read a tree database, picking the codec from its content
pub fn load_tree(path: &Path) -> Result<Tree, StoreError> {
    let started = Instant::now();
    let text = fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let format = sniff_format(&text);
    tracing::debug!(path = %path.display(), %format, "detected tree format");
    let tree = decode_tree(&text, format).map_err(|e| e.at(path))?;
    tracing::info!(
        path = %path.display(),
        items = tree.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded tree"
    );
    Ok(tree)
}

/// Load a tree, falling back to an empty root when the file is missing or
/// malformed. The error that caused the fallback is returned alongside.
pub fn load_tree_or_empty(path: &Path) -> (Tree, Option<StoreError>) {
    match load_tree(path) {
        Ok(tree) => (tree, None),
        Err(StoreError::ReadError { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no tree database yet, starting empty");
            (Tree::new(), None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not load tree, starting empty");
            (Tree::new(), Some(e))
        }
    }
}

/// Serialize and write a tree atomically
pub fn save_tree(path: &Path, tree: &Tree, format: TreeFormat) -> Result<(), StoreError> {
    let started = Instant::now();
    let content = encode_tree(tree, format)?;
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(
        path = %path.display(),
        %format,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "saved tree"
    );
    Ok(())
}

/// Write to a temp file next to `path`, then rename over it
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
