use std::{
  fs,
  path::{Path, PathBuf},
};

use mdeck_engine::{EngineOptions, ExtensionSpec};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File names searched for, in order, when no config file is given.
pub const CONFIG_FILENAMES: [&str; 5] = [
  "mdeck.toml",
  "mdeck.json",
  ".mdeck.toml",
  ".mdeck.json",
  ".config/mdeck.toml",
];

/// Configuration of a deck build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Options handed to the renderer constructor.
  pub engine: EngineOptions,

  /// Extensions to register, in order. Entries with `enabled = false` stay
  /// in the file but are not registered.
  pub extensions: Vec<ExtensionSpec>,
}

/// What a single configuration file sets.
///
/// Every field a file leaves out is `None` and keeps its earlier value when
/// the file is merged into a [`Config`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
  pub engine:     EngineFile,
  pub extensions: Option<Vec<ExtensionSpec>>,
}

/// Engine options as written in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineFile {
  pub gfm:           Option<bool>,
  pub html:          Option<bool>,
  pub breaks:        Option<bool>,
  pub slide_class:   Option<String>,
  pub anchor_prefix: Option<String>,
}

impl ConfigFile {
  /// Load a configuration file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format
  /// is unsupported.
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| {
      ConfigError::Io {
        action: "read config file",
        path: path.to_path_buf(),
        source,
      }
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content).map_err(|source| {
              ConfigError::Json {
                path: path.to_path_buf(),
                source,
              }
            })
          },
          "toml" => {
            toml::from_str(&content).map_err(|source| {
              ConfigError::Toml {
                path: path.to_path_buf(),
                source,
              }
            })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON). Options the file leaves
  /// out take their defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format
  /// is unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let mut config = Self::default();
    config.merge(ConfigFile::from_file(path)?);
    Ok(config)
  }

  /// Load configuration from the given files, merged in order, or from a
  /// discovered config file, then apply `KEY=VALUE` overrides.
  ///
  /// Without files and without a discoverable config file the defaults are
  /// used.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if config_files.is_empty() {
      if let Some(discovered_config) = Self::find_config_file() {
        log::info!(
          "Using discovered config file: {}",
          discovered_config.display()
        );
        config.merge(ConfigFile::from_file(&discovered_config)?);
      } else {
        log::debug!("No config file found, using defaults");
      }
    } else {
      for config_path in config_files {
        config.merge(ConfigFile::from_file(config_path)?);
      }
      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
    }

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Merge a configuration file into this config, with the file's values
  /// taking precedence.
  ///
  /// # Merge Rules
  ///
  /// - Engine options: each option the file sets replaces the current value
  /// - `extensions`: replaced as a whole when the file has the key, since
  ///   the order of a list is part of its meaning. `extensions = []` clears
  ///   the list.
  pub fn merge(&mut self, file: ConfigFile) {
    let EngineFile {
      gfm,
      html,
      breaks,
      slide_class,
      anchor_prefix,
    } = file.engine;

    let engine = &mut self.engine;
    if let Some(gfm) = gfm {
      engine.gfm = gfm;
    }
    if let Some(html) = html {
      engine.html = html;
    }
    if let Some(breaks) = breaks {
      engine.breaks = breaks;
    }
    if let Some(slide_class) = slide_class {
      engine.slide_class = slide_class;
    }
    if let Some(anchor_prefix) = anchor_prefix {
      engine.anchor_prefix = anchor_prefix;
    }

    if let Some(extensions) = file.extensions {
      self.extensions = extensions;
    }
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust
  /// use mdeck_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&["engine.gfm=yes".to_string()])
  ///   .expect("known key");
  /// assert!(config.engine.gfm);
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    let engine = &mut self.engine;
    match key {
      "engine.gfm" => engine.gfm = parse_bool(key, value)?,
      "engine.html" => engine.html = parse_bool(key, value)?,
      "engine.breaks" => engine.breaks = parse_bool(key, value)?,
      "engine.slide_class" => engine.slide_class = value.to_string(),
      "engine.anchor_prefix" => engine.anchor_prefix = value.to_string(),
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }
    log::debug!("Applied config override {key}={value}");
    Ok(())
  }

  /// Search for a config file in the current directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search `dir` for the first of [`CONFIG_FILENAMES`] that exists.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Starter configuration file, in TOML.
  ///
  /// Lists every built-in extension. Only `gfm` is enabled, the others are
  /// kept as disabled entries to switch on later.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails.
  pub fn default_toml() -> Result<String, ConfigError> {
    let starter = Self {
      engine:     EngineOptions::default(),
      extensions: vec![
        ExtensionSpec::new("gfm"),
        ExtensionSpec::new("heading-anchors").enabled(false),
        ExtensionSpec::new("prompts").enabled(false),
        ExtensionSpec::new("external-links").enabled(false),
      ],
    };
    Ok(toml::to_string_pretty(&starter)?)
  }

  /// Write [`Config::default_toml`] to `path`.
  ///
  /// # Errors
  ///
  /// Returns an error if the file exists and `force` is not set, or if it
  /// cannot be written.
  pub fn generate_default_config(
    path: &Path,
    force: bool,
  ) -> Result<(), ConfigError> {
    if path.exists() && !force {
      return Err(ConfigError::Config(format!(
        "Refusing to overwrite existing file: {}",
        path.display()
      )));
    }

    fs::write(path, Self::default_toml()?).map_err(|source| {
      ConfigError::Io {
        action: "write default config to",
        path: path.to_path_buf(),
        source,
      }
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no or 1/0"
      )))
    },
  }
}
