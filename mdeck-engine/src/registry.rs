//! Name-based lookup of extensions.
//!
//! Configuration files refer to extensions by name. The registry turns such
//! a list of [`ExtensionSpec`] entries into a [`Composer`], keeping the
//! declared order.
use std::{collections::BTreeMap, fmt, sync::Arc};

use log::{debug, info, warn};

use crate::{
  compose::Composer,
  error::RegistryError,
  extension::{Extension, ExtensionSpec},
  extensions,
  renderer::Renderer,
};

/// Extensions available by name.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
  entries: BTreeMap<String, Arc<dyn Extension<Renderer>>>,
}

impl fmt::Debug for ExtensionRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ExtensionRegistry")
      .field("entries", &self.names())
      .finish()
  }
}

impl ExtensionRegistry {
  /// An empty registry.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding every built-in extension.
  #[must_use]
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    for extension in extensions::builtins() {
      registry.register_shared(extension);
    }
    registry
  }

  /// Make `extension` available under its name.
  ///
  /// An extension already registered under the same name is replaced.
  pub fn register<E>(&mut self, extension: E) -> &mut Self
  where
    E: Extension<Renderer> + 'static,
  {
    self.register_shared(Arc::new(extension))
  }

  pub fn register_shared(
    &mut self,
    extension: Arc<dyn Extension<Renderer>>,
  ) -> &mut Self {
    let name = extension.name().to_string();
    if self.entries.insert(name.clone(), extension).is_some() {
      warn!("Extension '{name}' was already registered, replacing it");
    } else {
      debug!("Registered extension '{name}'");
    }
    self
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&Arc<dyn Extension<Renderer>>> {
    self.entries.get(name)
  }

  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  /// Registered names, sorted.
  #[must_use]
  pub fn names(&self) -> Vec<&str> {
    self.entries.keys().map(String::as_str).collect()
  }

  /// Build a composer from configuration entries, in the order given.
  ///
  /// Disabled entries are skipped.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::UnknownExtension`] for the first enabled entry
  /// whose name is not registered.
  pub fn resolve<'a, I>(
    &self,
    entries: I,
  ) -> Result<Composer<Renderer>, RegistryError>
  where
    I: IntoIterator<Item = &'a ExtensionSpec>,
  {
    entries
      .into_iter()
      .try_fold(Composer::new(), |composer, entry| {
        if !entry.enabled {
          info!("Extension '{}' is disabled, skipping", entry.name);
          return Ok(composer);
        }
        let extension = self
          .get(&entry.name)
          .ok_or_else(|| RegistryError::UnknownExtension(entry.name.clone()))?;
        Ok(composer.with_shared(Arc::clone(extension), entry.options.clone()))
      })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::{EngineOptions, extension::extension_fn};

  #[test]
  fn test_builtins_are_sorted() {
    let registry = ExtensionRegistry::with_builtins();
    assert_eq!(registry.names(), vec![
      "external-links",
      "gfm",
      "heading-anchors",
      "prompts"
    ]);
  }

  #[test]
  fn test_resolve_keeps_declared_order() {
    let registry = ExtensionRegistry::with_builtins();
    let entries = vec![
      ExtensionSpec::new("prompts"),
      ExtensionSpec::new("gfm"),
      ExtensionSpec::new("heading-anchors"),
    ];
    let composer = registry.resolve(&entries).unwrap();
    assert_eq!(composer.names(), vec!["prompts", "gfm", "heading-anchors"]);
  }

  #[test]
  fn test_resolve_skips_disabled_entries() {
    let registry = ExtensionRegistry::with_builtins();
    let entries = vec![
      ExtensionSpec::new("gfm").enabled(false),
      ExtensionSpec::new("prompts"),
    ];
    let composer = registry.resolve(&entries).unwrap();
    assert_eq!(composer.names(), vec!["prompts"]);
  }

  #[test]
  fn test_resolve_unknown_extension() {
    let registry = ExtensionRegistry::with_builtins();
    let entries = vec![ExtensionSpec::new("gfm"), ExtensionSpec::new("toc")];
    let err = registry.resolve(&entries).unwrap_err();
    assert!(matches!(
      err,
      RegistryError::UnknownExtension(ref name) if name == "toc"
    ));
  }

  #[test]
  fn test_disabled_unknown_extension_is_ignored() {
    let registry = ExtensionRegistry::with_builtins();
    let entries = vec![ExtensionSpec::new("plantuml").enabled(false)];
    assert!(registry.resolve(&entries).unwrap().is_empty());
  }

  #[test]
  fn test_resolved_options_reach_extension() {
    let registry = ExtensionRegistry::with_builtins();
    let entries = vec![
      ExtensionSpec::new("heading-anchors")
        .with_options(json!({ "permalink": true })),
    ];
    let renderer = registry
      .resolve(&entries)
      .unwrap()
      .build(EngineOptions::default())
      .unwrap();
    assert!(renderer.render("# Hi").html.contains("header-anchor"));
  }

  #[test]
  fn test_register_replaces_existing() {
    let mut registry = ExtensionRegistry::with_builtins();
    registry.register(extension_fn("gfm", |renderer: Renderer, _| {
      Ok(renderer.postprocess_with(|html: &str| format!("{html}<!-- x -->")))
    }));
    assert_eq!(registry.names().len(), 4);

    let renderer = registry
      .resolve(&[ExtensionSpec::new("gfm")])
      .unwrap()
      .build(EngineOptions::default())
      .unwrap();
    assert!(!renderer.options().gfm);
    assert!(renderer.render("x").html.contains("<!-- x -->"));
  }
}
