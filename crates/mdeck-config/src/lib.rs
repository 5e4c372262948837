pub mod config;
pub mod error;

pub use config::{Config, ConfigFile, EngineFile};
pub use error::ConfigError;
