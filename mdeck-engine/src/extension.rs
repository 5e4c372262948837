//! The extension contract.
//!
//! An [`Extension`] is registered against a renderer exactly once, receiving
//! the renderer by value together with its per-extension options, and
//! returning the renderer that replaces it. The returned value is the only
//! one the composer keeps.
use std::{fmt, marker::PhantomData};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::ExtensionError;

/// A unit of optional behavior attached to a renderer of type `R`.
pub trait Extension<R>: Send + Sync {
  /// Identity used in logs and in [`crate::ComposeError::Registration`].
  fn name(&self) -> &str;

  /// Attach this extension to `target`.
  ///
  /// # Errors
  ///
  /// Returns an error if the options are invalid or the renderer cannot
  /// support this extension.
  fn register(
    &self,
    target: R,
    options: &ExtensionOptions,
  ) -> Result<R, ExtensionError>;
}

/// A value extensions can be registered against.
///
/// The composer calls [`ExtensionTarget::registered`] after every successful
/// registration, so targets that keep track of their extensions see each one
/// exactly once and in order. The default does nothing.
pub trait ExtensionTarget: Sized {
  #[must_use]
  fn registered(self, _name: &str) -> Self {
    self
  }
}

/// Per-extension options.
///
/// Stored as an untyped JSON value so that configuration files can carry any
/// shape; each extension deserializes the part it understands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionOptions(Value);

impl ExtensionOptions {
  /// No options.
  #[must_use]
  pub const fn none() -> Self {
    Self(Value::Null)
  }

  #[must_use]
  pub const fn new(value: Value) -> Self {
    Self(value)
  }

  /// Whether no options were supplied.
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    matches!(self.0, Value::Null)
  }

  #[must_use]
  pub const fn as_value(&self) -> &Value {
    &self.0
  }

  /// Deserialize the options into `T`, falling back to `T::default()` when
  /// none were supplied.
  ///
  /// # Errors
  ///
  /// Returns [`ExtensionError::InvalidOptions`] if the value does not match
  /// `T`.
  pub fn parse<T>(&self) -> Result<T, ExtensionError>
  where
    T: DeserializeOwned + Default,
  {
    if self.is_empty() {
      return Ok(T::default());
    }
    Ok(serde_json::from_value(self.0.clone())?)
  }
}

impl From<Value> for ExtensionOptions {
  fn from(value: Value) -> Self {
    Self(value)
  }
}

/// One entry of an ordered extension list, as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionSpec {
  /// Registry name of the extension.
  pub name: String,

  /// Disabled entries stay in the list but are never registered.
  #[serde(default = "default_true")]
  pub enabled: bool,

  #[serde(default, skip_serializing_if = "ExtensionOptions::is_empty")]
  pub options: ExtensionOptions,
}

const fn default_true() -> bool {
  true
}

impl ExtensionSpec {
  /// An enabled entry without options.
  #[must_use]
  pub fn new<S: Into<String>>(name: S) -> Self {
    Self {
      name:    name.into(),
      enabled: true,
      options: ExtensionOptions::none(),
    }
  }

  #[must_use]
  pub fn with_options<O: Into<ExtensionOptions>>(mut self, options: O) -> Self {
    self.options = options.into();
    self
  }

  #[must_use]
  pub const fn enabled(mut self, enabled: bool) -> Self {
    self.enabled = enabled;
    self
  }
}

/// Extension backed by a closure.
///
/// Created with [`extension_fn`].
pub struct FnExtension<R, F> {
  name:     String,
  register: F,
  _target:  PhantomData<fn(R) -> R>,
}

impl<R, F> Extension<R> for FnExtension<R, F>
where
  F: Fn(R, &ExtensionOptions) -> Result<R, ExtensionError> + Send + Sync,
{
  fn name(&self) -> &str {
    &self.name
  }

  fn register(
    &self,
    target: R,
    options: &ExtensionOptions,
  ) -> Result<R, ExtensionError> {
    (self.register)(target, options)
  }
}

impl<R, F> fmt::Debug for FnExtension<R, F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FnExtension")
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}

/// Wrap a closure as a named extension.
pub fn extension_fn<R, F, S>(name: S, register: F) -> FnExtension<R, F>
where
  F: Fn(R, &ExtensionOptions) -> Result<R, ExtensionError> + Send + Sync,
  S: Into<String>,
{
  FnExtension {
    name: name.into(),
    register,
    _target: PhantomData,
  }
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;
  use serde_json::json;

  use super::*;

  #[derive(Debug, Default, Deserialize, PartialEq)]
  #[serde(default, deny_unknown_fields)]
  struct Sample {
    level: u8,
  }

  #[test]
  fn test_empty_options_fall_back_to_default() {
    let parsed: Sample = ExtensionOptions::none().parse().unwrap();
    assert_eq!(parsed, Sample::default());
  }

  #[test]
  fn test_options_parse_into_struct() {
    let options = ExtensionOptions::new(json!({ "level": 3 }));
    let parsed: Sample = options.parse().unwrap();
    assert_eq!(parsed.level, 3);
  }

  #[test]
  fn test_unknown_option_is_rejected() {
    let options = ExtensionOptions::new(json!({ "depth": 3 }));
    let err = options.parse::<Sample>().unwrap_err();
    assert!(matches!(err, ExtensionError::InvalidOptions(_)));
  }

  #[test]
  fn test_spec_defaults_to_enabled() {
    let spec: ExtensionSpec =
      serde_json::from_value(json!({ "name": "gfm" })).unwrap();
    assert!(spec.enabled);
    assert!(spec.options.is_empty());
  }

  #[test]
  fn test_fn_extension_reports_name() {
    let ext = extension_fn("noop", |n: u32, _| Ok(n));
    assert_eq!(Extension::<u32>::name(&ext), "noop");
    assert_eq!(ext.register(7, &ExtensionOptions::none()).unwrap(), 7);
  }
}
