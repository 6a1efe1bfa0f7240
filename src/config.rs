//! Configuration loader and validator for the book store client.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub server: Server,
    pub view: View,
}

/// Remote book store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Initial view settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct View {
    pub page_size: usize,
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.server.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("server.base_url must be non-empty"));
    }
    if reqwest::Url::parse(&cfg.server.base_url).is_err() {
        return Err(ConfigError::Invalid("server.base_url must be a valid URL"));
    }
    if cfg.server.timeout_seconds == 0 {
        return Err(ConfigError::Invalid("server.timeout_seconds must be > 0"));
    }
    if cfg.view.page_size == 0 {
        return Err(ConfigError::Invalid("view.page_size must be > 0"));
    }
    Ok(())
}

/// Example YAML document matching the schema above.
pub fn example() -> &'static str {
    r#"server:
  base_url: "http://127.0.0.1:8000"
  timeout_seconds: 30

view:
  page_size: 10
"#
}
