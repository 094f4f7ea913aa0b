use crate::commands::{CmdMessage, CmdResult};
use crate::config::InvenConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set { key: String, value: String },
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = InvenConfig::load(config_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {}
        ConfigAction::ShowKey(key) => {
            if lookup(&config, &key).is_none() {
                result.add_message(CmdMessage::warning(format!("Unknown config key: {}", key)));
                return Ok(result);
            }
        }
        ConfigAction::Set { key, value } => {
            match key.as_str() {
                "data-file" => config.data_file = value,
                "backup-prefix" => config.backup_prefix = value,
                other => {
                    result.add_message(CmdMessage::warning(format!(
                        "Unknown config key: {}",
                        other
                    )));
                    return Ok(result);
                }
            }
            config.save(config_dir)?;
            result.add_message(CmdMessage::success(format!("Set {}", key)));
        }
    }

    Ok(result.with_config(config))
}

fn lookup<'a>(config: &'a InvenConfig, key: &str) -> Option<&'a str> {
    match key {
        "data-file" => Some(&config.data_file),
        "backup-prefix" => Some(&config.backup_prefix),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    #[test]
    fn set_then_show_round_trips() {
        let dir = tempfile::tempdir().unwrap();

        let result = run(
            dir.path(),
            ConfigAction::Set {
                key: "backup-prefix".into(),
                value: "cellar".into(),
            },
        )
        .unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Success));

        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config.unwrap().backup_prefix, "cellar");
    }

    #[test]
    fn unknown_key_warns_and_leaves_config_alone() {
        let dir = tempfile::tempdir().unwrap();

        let result = run(
            dir.path(),
            ConfigAction::Set {
                key: "nope".into(),
                value: "x".into(),
            },
        )
        .unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Warning));
        assert!(result.config.is_none());

        let config = InvenConfig::load(dir.path()).unwrap();
        assert_eq!(config, InvenConfig::default());
    }
}
