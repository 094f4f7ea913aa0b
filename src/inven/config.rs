use crate::error::{InvenError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATA_FILE: &str = "data.json";
const DEFAULT_BACKUP_PREFIX: &str = "inventory-backup";

/// Configuration for inven, stored next to the data file as config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvenConfig {
    /// File name of the snapshot inside the data directory
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// File name prefix for backup exports
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_backup_prefix() -> String {
    DEFAULT_BACKUP_PREFIX.to_string()
}

impl Default for InvenConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            backup_prefix: default_backup_prefix(),
        }
    }
}

impl InvenConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(InvenError::Io)?;
        let config: InvenConfig =
            serde_json::from_str(&content).map_err(InvenError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(InvenError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(InvenError::Serialization)?;
        fs::write(config_path, content).map_err(InvenError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InvenConfig::default();
        assert_eq!(config.data_file, "data.json");
        assert_eq!(config.backup_prefix, "inventory-backup");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = InvenConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, InvenConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = InvenConfig::default();
        config.backup_prefix = "attic".to_string();
        config.save(dir.path()).unwrap();

        let loaded = InvenConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.backup_prefix, "attic");
        assert_eq!(loaded.data_file, "data.json");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "data_file": "stock.json" }"#,
        )
        .unwrap();

        let loaded = InvenConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.data_file, "stock.json");
        assert_eq!(loaded.backup_prefix, "inventory-backup");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = InvenConfig {
            data_file: "inv.json".to_string(),
            backup_prefix: "basement".to_string(),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: InvenConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, parsed);
    }
}
