//! The `init` command: write a starter configuration file.
use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use log::info;
use mdeck_config::Config;

/// Write the default configuration to `output`, creating missing parent
/// directories.
///
/// # Errors
///
/// Returns an error if `output` exists and `force` is not set, or if the
/// directory or the file cannot be written.
pub fn init_config(output: &Path, force: bool) -> Result<()> {
  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(output, force).wrap_err_with(|| {
    format!(
      "Failed to generate configuration file: {}. Use --force to overwrite \
       an existing file.",
      output.display()
    )
  })
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_init_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join(".config/mdeck.toml");

    init_config(&output, false).unwrap();

    let config = Config::from_file(&output).unwrap();
    assert_eq!(config.extensions.len(), 4);
  }

  #[test]
  fn test_init_keeps_existing_file_without_force() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("mdeck.toml");
    fs::write(&output, "# mine\n").unwrap();

    let err = init_config(&output, false).unwrap_err();
    assert!(format!("{err:?}").contains("Refusing to overwrite"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "# mine\n");

    init_config(&output, true).unwrap();
    assert!(fs::read_to_string(&output).unwrap().contains("gfm"));
  }
}
