//! Configuration management for HashLedger

use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "hashledger.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub keys: KeysConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Hex-encoded key material used instead of prompting.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct KeysConfig {
    pub private_key: Option<String>,
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// List each block's transactions when viewing the chain.
    #[serde(default = "default_show_transactions")]
    pub show_transactions: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_transactions: default_show_transactions(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_show_transactions() -> bool {
    true
}

impl Config {
    pub fn log_level(&self) -> Result<Level, ChainError> {
        parse_log_level(&self.logging.level)
    }
}

pub fn parse_log_level(level: &str) -> Result<Level, ChainError> {
    level
        .trim()
        .parse::<Level>()
        .map_err(|_| ChainError::ConfigError(format!("Unknown log level '{}'", level)))
}

/// Loads configuration from `path`, or from [`DEFAULT_CONFIG_PATH`].
/// A missing file yields the defaults; an unreadable or malformed one is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ChainError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let config = match fs::read_to_string(path) {
        Ok(text) => toml::from_str::<Config>(&text)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(e.into()),
    };

    // Validate critical values
    config.log_level()?;
    for (name, value) in [
        ("keys.private_key", &config.keys.private_key),
        ("keys.public_key", &config.keys.public_key),
    ] {
        if let Some(hex_key) = value {
            if hex_key.trim().is_empty() {
                return Err(ChainError::ConfigError(format!("{} is set but empty", name)));
            }
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.display.show_transactions);
        assert!(config.keys.private_key.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = write_config("[keys]\npublic_key = \"02abcd\"\n");
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.keys.public_key.as_deref(), Some("02abcd"));
        assert_eq!(config.logging.level, "info");
        assert!(config.display.show_transactions);
    }

    #[test]
    fn test_full_file() {
        let file = write_config(
            "[logging]\nlevel = \"debug\"\n\n[display]\nshow_transactions = false\n",
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.log_level().unwrap(), Level::DEBUG);
        assert!(!config.display.show_transactions);
    }

    #[test]
    fn test_unknown_level_rejected() {
        let file = write_config("[logging]\nlevel = \"loud\"\n");
        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ChainError::ConfigError(msg)) if msg.contains("loud")));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let file = write_config("[logging\nlevel = ");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ChainError::ConfigError(_))
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        let file = write_config("[keys]\nprivate_key = \"  \"\n");
        let result = load_config(Some(file.path()));
        assert!(result.unwrap_err().to_string().contains("keys.private_key"));
    }
}
