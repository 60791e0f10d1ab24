//! User settings kept in `config.toml` inside the data directory.
//!
//! ```toml
//! dark_mode = true
//! default_view = "list"
//! log_level = "debug"
//! # data_dir = "/somewhere/else"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskflowError};
use crate::store::ViewMode;

const DATA_DIR_NAME: &str = ".taskflow";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Where `tasks.json` lives. Defaults to `~/.taskflow`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub dark_mode: bool,
    pub default_view: ViewMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| TaskflowError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Directory for task data: the configured one, or `fallback`.
    pub fn resolve_data_dir(&self, fallback: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| fallback.to_path_buf())
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(TaskflowError::NoHomeDir)?;
    Ok(home_dir.join(DATA_DIR_NAME))
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&config_path(dir.path())).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_view, ViewMode::Kanban);
        assert!(!config.dark_mode);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());
        let config = Config {
            dark_mode: true,
            default_view: ViewMode::List,
            log_level: Some("debug".to_string()),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_and_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = config_path(dir.path());

        fs::write(&path, "default_view = \"list\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_view, ViewMode::List);
        assert_eq!(config.resolve_data_dir(dir.path()), dir.path());

        fs::write(&path, "default_view = 3\n").unwrap();
        assert!(matches!(Config::load(&path), Err(TaskflowError::ConfigParse { .. })));
    }
}
