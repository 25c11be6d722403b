use serde::{Deserialize, Serialize};

/// User settings from todotree.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// On-disk format of a tree database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeFormat {
    /// Structured JSON format
    Json,
    /// Legacy brace-delimited text format
    Text,
}

impl std::fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeFormat::Json => write!(f, "json"),
            TreeFormat::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Default: todo.json
    #[serde(default = "default_file")]
    pub file: String,
    /// Default: json
    #[serde(default = "default_format")]
    pub format: TreeFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            file: default_file(),
            format: default_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Names of empty items directly under the root that are entered
    /// rather than edited when clicked. Compared after simplification.
    #[serde(default = "default_always_navigable")]
    pub always_navigable: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            always_navigable: default_always_navigable(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// chrono format string for timestamps shown in fetch notices
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_file() -> String {
    "todo.json".to_string()
}

fn default_format() -> TreeFormat {
    TreeFormat::Json
}

fn default_always_navigable() -> Vec<String> {
    vec!["Tmp".to_string()]
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.storage.file, "todo.json");
        assert_eq!(settings.storage.format, TreeFormat::Json);
        assert_eq!(settings.navigation.always_navigable, vec!["Tmp"]);
        assert_eq!(settings.remote.timestamp_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[storage]
format = "text"

[navigation]
always_navigable = ["Tmp", "Scratch"]
"#,
        )
        .unwrap();
        assert_eq!(settings.storage.file, "todo.json");
        assert_eq!(settings.storage.format, TreeFormat::Text);
        assert_eq!(settings.navigation.always_navigable, vec!["Tmp", "Scratch"]);
    }
}
