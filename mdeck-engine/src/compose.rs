//! Engine composition.
//!
//! A [`Composer`] holds an ordered list of extension registrations. Composing
//! calls the renderer constructor once, then folds every registration over
//! its output in list order. The first error stops the fold; later
//! registrations are never invoked.
use std::{fmt, sync::Arc};

use log::{debug, trace};

use crate::{
  error::{BoxError, ComposeError},
  extension::{Extension, ExtensionOptions, ExtensionTarget},
  renderer::{EngineOptions, Renderer},
};

/// An extension paired with the options it will be registered with.
pub struct Registration<R> {
  extension: Arc<dyn Extension<R>>,
  options:   ExtensionOptions,
}

impl<R> Registration<R> {
  #[must_use]
  pub fn name(&self) -> &str {
    self.extension.name()
  }

  #[must_use]
  pub const fn options(&self) -> &ExtensionOptions {
    &self.options
  }
}

impl<R> Clone for Registration<R> {
  fn clone(&self) -> Self {
    Self {
      extension: Arc::clone(&self.extension),
      options:   self.options.clone(),
    }
  }
}

/// Ordered extension list applied on top of a freshly constructed renderer.
pub struct Composer<R> {
  registrations: Vec<Registration<R>>,
}

impl<R> Default for Composer<R> {
  fn default() -> Self {
    Self {
      registrations: Vec::new(),
    }
  }
}

impl<R> Clone for Composer<R> {
  fn clone(&self) -> Self {
    Self {
      registrations: self.registrations.clone(),
    }
  }
}

impl<R> fmt::Debug for Composer<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Composer")
      .field("extensions", &self.names())
      .finish()
  }
}

impl<R> Composer<R> {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an extension without options.
  #[must_use]
  pub fn with<E>(self, extension: E) -> Self
  where
    E: Extension<R> + 'static,
  {
    self.with_options(extension, ExtensionOptions::none())
  }

  /// Append an extension with options.
  #[must_use]
  pub fn with_options<E, O>(self, extension: E, options: O) -> Self
  where
    E: Extension<R> + 'static,
    O: Into<ExtensionOptions>,
  {
    self.with_shared(Arc::new(extension), options.into())
  }

  /// Append an already shared extension, e.g. one owned by a registry.
  #[must_use]
  pub fn with_shared(
    mut self,
    extension: Arc<dyn Extension<R>>,
    options: ExtensionOptions,
  ) -> Self {
    self.registrations.push(Registration { extension, options });
    self
  }

  /// Number of registrations.
  #[must_use]
  pub const fn len(&self) -> usize {
    self.registrations.len()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.registrations.is_empty()
  }

  /// Extension names in registration order.
  #[must_use]
  pub fn names(&self) -> Vec<&str> {
    self.registrations.iter().map(Registration::name).collect()
  }

  #[must_use]
  pub fn registrations(&self) -> &[Registration<R>] {
    &self.registrations
  }
}

impl<R: ExtensionTarget> Composer<R> {
  /// Register every extension against `target`, in order.
  ///
  /// Every successful registration is reported to the target through
  /// [`ExtensionTarget::registered`].
  ///
  /// # Errors
  ///
  /// Returns [`ComposeError::Registration`] for the first extension that
  /// fails; no later extension is invoked.
  pub fn apply(&self, target: R) -> Result<R, ComposeError> {
    let total = self.registrations.len();
    self.registrations.iter().enumerate().try_fold(
      target,
      |target, (position, registration)| {
        let name = registration.name();
        debug!("Registering extension '{name}' ({}/{total})", position + 1);
        let target = registration
          .extension
          .register(target, &registration.options)
          .map_err(|source| {
            ComposeError::Registration {
              extension: name.to_string(),
              source,
            }
          })?;
        Ok(target.registered(name))
      },
    )
  }

  /// Construct a renderer from `config` and register every extension on it.
  ///
  /// # Errors
  ///
  /// Returns [`ComposeError::Construction`] if `constructor` fails, or
  /// [`ComposeError::Registration`] for the first failing extension.
  pub fn compose<C, F, E>(
    &self,
    constructor: F,
    config: C,
  ) -> Result<R, ComposeError>
  where
    F: FnOnce(C) -> Result<R, E>,
    E: Into<BoxError>,
  {
    trace!("Constructing renderer");
    let target =
      constructor(config).map_err(|e| ComposeError::Construction(e.into()))?;
    self.apply(target)
  }

  /// Turn this composer into an entry point: a function from configuration
  /// to a fully composed renderer.
  pub fn engine<C, F, E>(
    self,
    constructor: F,
  ) -> impl Fn(C) -> Result<R, ComposeError>
  where
    F: Fn(C) -> Result<R, E>,
    E: Into<BoxError>,
  {
    move |config| self.compose(&constructor, config)
  }
}

impl Composer<Renderer> {
  /// Construct a [`Renderer`] from `options` and register every extension.
  ///
  /// Each successfully registered extension is recorded on the renderer, see
  /// [`Renderer::extensions`].
  ///
  /// # Errors
  ///
  /// Same as [`Composer::compose`].
  pub fn build(&self, options: EngineOptions) -> Result<Renderer, ComposeError> {
    self.compose(Renderer::new, options)
  }

  /// Entry point for the built-in renderer.
  pub fn into_engine(
    self,
  ) -> impl Fn(EngineOptions) -> Result<Renderer, ComposeError> {
    move |options| self.build(options)
  }
}

/// Compose a [`Renderer`] from `options` and an ordered extension list.
///
/// # Errors
///
/// Same as [`Composer::compose`].
pub fn compose(
  options: EngineOptions,
  composer: &Composer<Renderer>,
) -> Result<Renderer, ComposeError> {
  composer.build(options)
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::{error::ExtensionError, extension::extension_fn};

  impl ExtensionTarget for Vec<&'static str> {}
  impl ExtensionTarget for u8 {}

  fn recording(
    name: &'static str,
    calls: &Arc<Mutex<Vec<String>>>,
  ) -> impl Extension<Vec<&'static str>> + 'static {
    let calls = Arc::clone(calls);
    extension_fn(name, move |mut target: Vec<&'static str>, _| {
      calls.lock().unwrap().push(name.to_string());
      target.push(name);
      Ok(target)
    })
  }

  #[test]
  fn test_apply_keeps_declared_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let composer = Composer::new()
      .with(recording("b", &calls))
      .with(recording("a", &calls))
      .with(recording("c", &calls));

    let result = composer.apply(Vec::new()).unwrap();
    assert_eq!(result, ["b", "a", "c"]);
    assert_eq!(*calls.lock().unwrap(), ["b", "a", "c"]);
  }

  #[test]
  fn test_construction_error_skips_registrations() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let composer = Composer::new().with(recording("a", &calls));

    let err = composer
      .compose(
        |(): ()| Err::<Vec<&'static str>, _>(ExtensionError::Failed("boom".into())),
        (),
      )
      .unwrap_err();

    assert!(matches!(err, ComposeError::Construction(_)));
    assert!(err.extension().is_none());
    assert!(calls.lock().unwrap().is_empty());
  }

  #[test]
  fn test_registration_error_names_extension() {
    let composer = Composer::new().with(extension_fn(
      "broken",
      |_: u8, _| Err(ExtensionError::Failed("nope".into())),
    ));
    let err = composer.apply(0).unwrap_err();
    assert_eq!(err.extension(), Some("broken"));
    assert!(err.to_string().contains("'broken'"));
  }

  #[test]
  fn test_names_in_registration_order() {
    let composer = Composer::new()
      .with(extension_fn("x", |n: u8, _| Ok(n)))
      .with(extension_fn("y", |n: u8, _| Ok(n)));
    assert_eq!(composer.names(), ["x", "y"]);
    assert_eq!(composer.len(), 2);
  }
}
