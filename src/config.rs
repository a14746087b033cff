//! Generator configuration (`soy.toml`) parsing and types.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Errors loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),
    /// The file is not valid configuration.
    #[error("invalid configuration in {0}: {1}")]
    Parse(String, #[source] toml::de::Error),
}

/// Root configuration structure for `soy.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SoyConfig {
    /// Path to the class model document.
    pub model: Option<String>,
    /// Generation options.
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Generation options section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateConfig {
    /// Output directory for generated sources.
    pub out_dir: Option<String>,
    /// Round budget before still-deferred classes are escalated.
    pub rounds: Option<usize>,
    /// Package the generated code imports the runtime facilities from.
    pub runtime_package: Option<String>,
}

impl SoyConfig {
    /// Load configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse(path.display().to_string(), e))
    }

    /// Load `soy.toml` from a directory when present.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = dir.as_ref().join("soy.toml");
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: SoyConfig = toml::from_str(
            r#"
            model = "classes.json"

            [generate]
            out_dir = "build/generated"
            rounds = 4
            runtime_package = "org.example.di"
            "#,
        )
        .unwrap();
        assert_eq!(config.model.as_deref(), Some("classes.json"));
        assert_eq!(config.generate.out_dir.as_deref(), Some("build/generated"));
        assert_eq!(config.generate.rounds, Some(4));
        assert_eq!(
            config.generate.runtime_package.as_deref(),
            Some("org.example.di")
        );
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config: SoyConfig = toml::from_str("").unwrap();
        assert!(config.model.is_none());
        assert!(config.generate.out_dir.is_none());
        assert!(config.generate.rounds.is_none());
    }
}
