#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  clippy::panic,
  reason = "Fine in tests"
)]
use std::{fs, path::PathBuf};

use mdeck_config::{Config, ConfigError};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
  let path = dir.path().join(name);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

#[test]
fn test_load_toml_file() {
  let dir = TempDir::new().unwrap();
  let path = write(
    &dir,
    "mdeck.toml",
    r#"
[engine]
gfm = true
slide_class = "page"

[[extensions]]
name = "heading-anchors"
options = { permalink = true, symbol = "§" }

[[extensions]]
name = "prompts"
enabled = false
"#,
  );

  let config = Config::from_file(&path).unwrap();

  assert!(config.engine.gfm);
  assert!(config.engine.html);
  assert_eq!(config.engine.slide_class, "page");
  assert_eq!(config.extensions.len(), 2);
  assert_eq!(config.extensions[0].name, "heading-anchors");
  assert_eq!(
    config.extensions[0].options.as_value()["symbol"],
    serde_json::json!("§")
  );
  assert!(!config.extensions[1].enabled);
}

#[test]
fn test_load_json_file() {
  let dir = TempDir::new().unwrap();
  let path = write(
    &dir,
    "deck.json",
    r#"{
  "engine": { "breaks": true },
  "extensions": [{ "name": "gfm" }, { "name": "external-links", "options": { "rel": "nofollow" } }]
}"#,
  );

  let config = Config::from_file(&path).unwrap();

  assert!(config.engine.breaks);
  assert_eq!(config.engine.slide_class, "slide");
  assert_eq!(config.extensions[1].name, "external-links");
}

#[test]
fn test_unsupported_format() {
  let dir = TempDir::new().unwrap();
  let path = write(&dir, "mdeck.yaml", "engine: {}");

  let err = Config::from_file(&path).unwrap_err();
  assert!(matches!(err, ConfigError::Config(_)));
  assert!(err.to_string().contains("Unsupported config file format"));
}

#[test]
fn test_missing_extension() {
  let dir = TempDir::new().unwrap();
  let path = write(&dir, "mdeckrc", "");

  let err = Config::from_file(&path).unwrap_err();
  assert!(err.to_string().contains("no extension"));
}

#[test]
fn test_parse_error_names_file() {
  let dir = TempDir::new().unwrap();
  let path = write(&dir, "broken.toml", "[engine\ngfm = true");

  let err = Config::from_file(&path).unwrap_err();
  assert!(matches!(err, ConfigError::Toml { .. }));
  assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_json_parse_error_names_file() {
  let dir = TempDir::new().unwrap();
  let path = write(&dir, "mdeck.json", r#"{ "engine": { "gfm": "often" } }"#);

  let err = Config::from_file(&path).unwrap_err();
  match err {
    ConfigError::Json { path: failed, .. } => assert_eq!(failed, path),
    other => panic!("expected a JSON error, got {other:?}"),
  }
}

#[test]
fn test_load_merges_files_in_order() {
  let dir = TempDir::new().unwrap();
  let base = write(
    &dir,
    "base.toml",
    "[engine]\ngfm = true\n\n[[extensions]]\nname = \"gfm\"\n",
  );
  let local = write(
    &dir,
    "local.json",
    r#"{ "engine": { "slide_class": "page" } }"#,
  );

  let config = Config::load(&[base, local], &[]).unwrap();

  // Options the later file leaves out keep their earlier values
  assert!(config.engine.gfm);
  assert_eq!(config.engine.slide_class, "page");
  assert_eq!(config.extensions.len(), 1);
}

#[test]
fn test_load_applies_overrides_last() {
  let dir = TempDir::new().unwrap();
  let path = write(&dir, "mdeck.toml", "[engine]\ngfm = false\n");

  let config = Config::load(&[path], &[
    "engine.gfm=true".to_string(),
    "engine.anchor_prefix=s-".to_string(),
  ])
  .unwrap();

  assert!(config.engine.gfm);
  assert_eq!(config.engine.anchor_prefix, "s-");
}

#[test]
fn test_load_reports_missing_file() {
  let err = Config::load(&[PathBuf::from("/nonexistent/mdeck.toml")], &[])
    .unwrap_err();
  assert!(matches!(err, ConfigError::Io { .. }));
  assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_find_config_file_order() {
  let dir = TempDir::new().unwrap();
  assert!(Config::find_config_file_in(dir.path()).is_none());

  let nested = write(&dir, ".config/mdeck.toml", "");
  assert_eq!(Config::find_config_file_in(dir.path()), Some(nested));

  let hidden = write(&dir, ".mdeck.toml", "");
  assert_eq!(Config::find_config_file_in(dir.path()), Some(hidden));

  let primary = write(&dir, "mdeck.toml", "");
  assert_eq!(Config::find_config_file_in(dir.path()), Some(primary));
}

#[test]
fn test_generate_default_config() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("mdeck.toml");

  Config::generate_default_config(&path, false).unwrap();
  let config = Config::from_file(&path).unwrap();
  assert_eq!(config.extensions[0].name, "gfm");

  let err = Config::generate_default_config(&path, false).unwrap_err();
  assert!(err.to_string().contains("Refusing to overwrite"));
  Config::generate_default_config(&path, true).unwrap();
}
