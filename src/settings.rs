use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the location of the settings file
pub const CONFIG_ENV: &str = "TERMBONSAI_CONFIG";

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub bonsai: BonsaiSettings,
}

/// Defaults for options not given on the command line
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BonsaiSettings {
    pub life: Option<u32>,
    pub multiplier: Option<u32>,
    pub base: Option<i64>,
    pub leaves: Option<String>, // comma-separated, same as --leaf
    pub time: Option<f64>,
    pub wait: Option<f64>,
    pub noir: Option<bool>,
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "ignoring malformed settings");
                Self::default()
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "could not read settings");
                Self::default()
            }
        }
    }

    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termbonsai")
            .join("config.toml")
    }
}
