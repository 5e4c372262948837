//! Error types for composing and configuring renderers.

/// Boxed error produced by an arbitrary renderer constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort composition.
///
/// Composition stops at the first failing step, so at most one of these is
/// ever produced per call.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
  #[error("Failed to construct renderer: {0}")]
  Construction(#[source] BoxError),

  #[error("Failed to register extension '{extension}': {source}")]
  Registration {
    extension: String,
    #[source]
    source:    ExtensionError,
  },
}

impl ComposeError {
  /// Name of the extension whose registration failed, if any.
  #[must_use]
  pub fn extension(&self) -> Option<&str> {
    match self {
      Self::Construction(_) => None,
      Self::Registration { extension, .. } => Some(extension),
    }
  }
}

/// Errors raised by an extension while registering itself.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
  #[error("Invalid options: {0}")]
  InvalidOptions(String),

  #[error("Unsupported engine configuration: {0}")]
  Unsupported(String),

  #[error("{0}")]
  Failed(String),
}

impl From<serde_json::Error> for ExtensionError {
  fn from(e: serde_json::Error) -> Self {
    Self::InvalidOptions(e.to_string())
  }
}

impl From<regex::Error> for ExtensionError {
  fn from(e: regex::Error) -> Self {
    Self::InvalidOptions(e.to_string())
  }
}

/// Errors raised by [`crate::Renderer::new`].
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
  #[error("Invalid value for '{option}': {reason}")]
  InvalidOption {
    option: &'static str,
    reason: String,
  },
}

/// Errors raised while resolving extension names.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
  #[error("Unknown extension '{0}'")]
  UnknownExtension(String),
}
