//! Generator configuration.
//!
//! Loaded from an optional YAML file; command-line flags override individual
//! values afterwards. Every key is optional.
//!
//! # Example YAML
//!
//! ```yaml
//! source_url: https://core.telegram.org/bots/api
//! cache_path: cache/bot-api.html
//! timeout_secs: 30
//! wrap_width: 100
//! registry_name: Methods
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bot_api_typegen_extract::emit::{DEFAULT_REGISTRY_NAME, DEFAULT_WRAP_WIDTH};
use bot_api_typegen_extract::source::{
    DEFAULT_CACHE_PATH, DEFAULT_SOURCE_URL, DEFAULT_TIMEOUT_SECS,
};

/// Errors raised while loading or checking a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Documentation page fetched on a cache miss.
    pub source_url: String,
    /// Cache file holding the documentation page.
    pub cache_path: PathBuf,
    /// Network timeout for the fetch, in seconds.
    pub timeout_secs: u64,
    /// Column width for wrapped description comments.
    pub wrap_width: usize,
    /// Name of the emitted registry type.
    pub registry_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            wrap_width: DEFAULT_WRAP_WIDTH,
            registry_name: DEFAULT_REGISTRY_NAME.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Rejects values the generator cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.wrap_width == 0 {
            return Err(ConfigError::Invalid("wrap_width must be greater than 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".into()));
        }
        if self.source_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source_url must not be empty".into()));
        }
        if !is_type_identifier(&self.registry_name) {
            return Err(ConfigError::Invalid(format!(
                "registry_name {:?} is not a valid type name",
                self.registry_name
            )));
        }
        Ok(())
    }
}

fn is_type_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_' || ch == '$')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typegen.yml");
        std::fs::write(&path, "wrap_width: 100\nregistry_name: BotMethods\n").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.wrap_width, 100);
        assert_eq!(config.registry_name, "BotMethods");
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typegen.yml");
        std::fs::write(&path, "wrap_width: [not, a, number]\n").unwrap();

        assert!(matches!(GeneratorConfig::load(&path), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeneratorConfig::load("/nonexistent/typegen.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = GeneratorConfig {
            wrap_width: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = GeneratorConfig {
            timeout_secs: 0,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_registry_name() {
        let config = GeneratorConfig {
            registry_name: "not a type".into(),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
