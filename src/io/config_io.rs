use std::fs;
use std::io;
use std::path::Path;

use crate::io::tree_io::StoreError;
use crate::model::config::Settings;

/// Read settings from a TOML file. A missing file yields the defaults.
pub fn read_settings(path: &Path) -> Result<Settings, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        Err(e) => {
            return Err(StoreError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let settings: Settings = toml::from_str(&text)?;
    Ok(settings)
}
