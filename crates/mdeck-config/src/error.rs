use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for mdeck-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Failed to {action} {}: {source}", .path.display())]
  Io {
    action: &'static str,
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to parse JSON config from {}: {source}", .path.display())]
  Json {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to parse TOML config from {}: {source}", .path.display())]
  Toml {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("TOML serialization error: {0}")]
  TomlSer(#[from] toml::ser::Error),
}
