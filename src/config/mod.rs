use crate::core::error::MagicError;
use crate::providers::openrouter::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_VAR: &str = "MAGICCOMMAND_OPENROUTER_KEY";
pub const MODEL_VAR: &str = "MAGICCOMMAND_OPENROUTER_MODEL";
pub const BASE_URL_VAR: &str = "MAGICCOMMAND_OPENROUTER_BASE_URL";

pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-exp:free";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".magiccommand")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Loads `~/.magiccommand/config.yaml` when present, then applies environment overrides.
    pub fn load() -> Result<Config, MagicError> {
        let path = Self::config_path();
        let file_config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Config::default()
        };

        Ok(file_config.with_overrides(|key| env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Config, MagicError> {
        let contents = fs::read_to_string(path)?;
        serde_yml::from_str::<Config>(&contents)
            .map_err(|e| MagicError::Config(format!("Parse {}: {}", path.display(), e)))
    }

    /// Environment values win over the file. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Config {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = var(API_KEY_VAR) {
            self.api_key = Some(api_key);
        }
        if let Some(model) = var(MODEL_VAR) {
            self.model = Some(model);
        }
        if let Some(base_url) = var(BASE_URL_VAR) {
            self.base_url = Some(base_url);
        }
        self
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn require_api_key(&self) -> Result<&str, MagicError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                MagicError::Config(format!(
                    "You need to provide an OpenRouter API key using the following\nenvironment variable: {}",
                    API_KEY_VAR
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_sources() {
        let config = Config::default().with_overrides(lookup(&[]));
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.base_url(), "https://openrouter.ai/api/v1");
        assert!(matches!(config.require_api_key(), Err(MagicError::Config(_))));
    }

    #[test]
    fn environment_overrides_file() {
        let file: Config = serde_yml::from_str("api_key: from-file\nmodel: vendor/file-model\n").unwrap();
        let config = file.with_overrides(lookup(&[(API_KEY_VAR, "from-env"), (MODEL_VAR, "")]));
        assert_eq!(config.require_api_key().unwrap(), "from-env");
        assert_eq!(config.model(), "vendor/file-model");
    }

    #[test]
    fn blank_key_is_missing() {
        let config = Config {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        let err = config.require_api_key().unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn unreadable_yaml_is_config_error() {
        let dir = std::env::temp_dir().join(format!("magiccommand-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        fs::write(&path, "api_key: [unterminated").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, MagicError::Config(_)));
        fs::remove_dir_all(&dir).unwrap();
    }
}
