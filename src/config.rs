use crate::tree::DEFAULT_AUTO_EXPAND_DEPTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "scopeyank";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

fn default_auto_expand_depth() -> usize {
    DEFAULT_AUTO_EXPAND_DEPTH
}

fn default_true() -> bool {
    true
}

fn default_summary_limit() -> usize {
    3
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default = "default_auto_expand_depth")]
    pub auto_expand_depth: usize,
    #[serde(default = "default_true")]
    pub show_hidden: bool,
    #[serde(default = "default_true")]
    pub include_ignored: bool,
    #[serde(default = "default_true")]
    pub force_root: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            auto_expand_depth: DEFAULT_AUTO_EXPAND_DEPTH,
            show_hidden: true,
            include_ignored: true,
            force_root: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Selected paths listed before the rest collapse into `+N`.
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            summary_limit: default_summary_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub credential: String,
    /// Permitted roots; empty means unrestricted.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// An explicit path must exist; the default location may be absent.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tree.auto_expand_depth, 3);
        assert_eq!(config.display.summary_limit, 3);
        assert!(config.tree.force_root);
    }

    #[test]
    fn load_reads_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[tree]
auto_expand_depth = 5
show_hidden = false

[access]
credential = "secret"
scopes = ["/docs", "/media"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.tree.auto_expand_depth, 5);
        assert!(!config.tree.show_hidden);
        assert!(config.tree.include_ignored);
        assert_eq!(config.access.credential, "secret");
        assert_eq!(config.access.scopes, vec!["/docs", "/media"]);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tree\nauto_expand_depth = ").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
