use crate::error::{Result, SwapError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct AppConfig {
    pub directory: DirectoryConfig,
    pub negotiation: NegotiationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct DirectoryConfig {
    pub endpoint: String,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct NegotiationConfig {
    /// Simulated "teacher is typing" latency before a reply is delivered.
    pub reply_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig::default(),
            negotiation: NegotiationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000".to_string(),
            request_timeout_seconds: Some(10),
        }
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self { reply_delay_ms: 1000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Some("compact".to_string()),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| SwapError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = toml::from_str(&config_str)
            .map_err(|e| SwapError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    pub fn load_with_env_overrides<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;

        if let Ok(endpoint) = std::env::var("SKILL_DIRECTORY_URL") {
            config.directory.endpoint = endpoint;
        }

        if let Ok(log_level) = std::env::var("RUST_LOG") {
            config.logging.level = log_level;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.directory.endpoint.is_empty() {
            return Err(SwapError::Config(
                "Directory endpoint cannot be empty".to_string(),
            ));
        }

        if self.negotiation.reply_delay_ms == 0 {
            return Err(SwapError::Config(
                "Reply delay must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn get_directory_endpoint(&self) -> &str {
        &self.directory.endpoint
    }

    pub fn reply_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.negotiation.reply_delay_ms)
    }
}

pub fn create_default_config_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let default_config = AppConfig::default();
    let toml_str = toml::to_string_pretty(&default_config)
        .map_err(|e| SwapError::Config(format!("Failed to serialize default config: {}", e)))?;

    std::fs::write(path, toml_str)
        .map_err(|e| SwapError::Config(format!("Failed to write default config file: {}", e)))?;

    Ok(())
}

/// Installs the global tracing subscriber from the logging section.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.directory.endpoint, "http://localhost:3000");
        assert_eq!(config.negotiation.reply_delay_ms, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.negotiation.reply_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        create_default_config_file(path).unwrap();
        assert!(path.exists());

        let loaded_config = AppConfig::load(path).unwrap();
        assert_eq!(loaded_config.negotiation.reply_delay_ms, 1000);
        assert!(loaded_config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_missing_section_error() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "[directory]\nendpoint = \"http://localhost:4000\"\n")
            .unwrap();

        // All sections are required; a partial file is a config error.
        assert!(AppConfig::load(temp_file.path()).is_err());
    }
}
