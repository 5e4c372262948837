//! Type definitions for the renderer.
//!
//! Contains the types a renderer is made of:
//! - Engine options (`EngineOptions`) handed to the constructor
//! - The renderer itself (`Renderer`)
//! - The hook traits extensions attach to it
//!
//! # Examples
//!
//! ```
//! use mdeck_engine::{EngineOptions, Renderer};
//!
//! let options = EngineOptions {
//!   gfm: true,
//!   breaks: true,
//!   ..Default::default()
//! };
//!
//! let renderer = Renderer::new(options).expect("default classes are valid");
//! ```

use std::{fmt, sync::Arc};

use comrak::nodes::AstNode;
use serde::{Deserialize, Serialize};

/// Options for constructing a [`Renderer`].
///
/// The composer passes these through untouched; only [`Renderer::new`]
/// looks at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions.
  pub gfm: bool,

  /// Pass raw HTML in the Markdown source through to the output.
  pub html: bool,

  /// Render soft line breaks as `<br>`.
  pub breaks: bool,

  /// Class attribute of every slide `<section>`.
  pub slide_class: String,

  /// Prefix prepended to generated heading IDs.
  pub anchor_prefix: String,
}

impl Default for EngineOptions {
  fn default() -> Self {
    Self {
      gfm:           false,
      html:          true,
      breaks:        false,
      slide_class:   "slide".to_string(),
      anchor_prefix: String::new(),
    }
  }
}

/// Rewrites Markdown source before it is split into slides.
pub trait MarkdownPreprocessor: Send + Sync {
  fn preprocess(&self, markdown: &str) -> String;
}

impl<F> MarkdownPreprocessor for F
where
  F: Fn(&str) -> String + Send + Sync,
{
  fn preprocess(&self, markdown: &str) -> String {
    self(markdown)
  }
}

/// Trait for AST transformations (e.g., prompt highlighting).
pub trait AstTransformer: Send + Sync {
  fn transform<'a>(&self, node: &'a AstNode<'a>);
}

/// Rewrites the HTML of one slide, before it is wrapped in its `<section>`.
pub trait HtmlPostprocessor: Send + Sync {
  fn postprocess(&self, html: &str) -> String;
}

impl<F> HtmlPostprocessor for F
where
  F: Fn(&str) -> String + Send + Sync,
{
  fn postprocess(&self, html: &str) -> String {
    self(html)
  }
}

/// Markdown slide renderer.
///
/// Created by [`Renderer::new`] and extended by registering extensions,
/// which attach hooks. Hooks run in the order they were attached. Cheap to
/// clone since hooks are shared behind `Arc`.
#[derive(Clone)]
pub struct Renderer {
  pub(crate) options:        EngineOptions,
  pub(crate) preprocessors:  Vec<Arc<dyn MarkdownPreprocessor>>,
  pub(crate) transformers:   Vec<Arc<dyn AstTransformer>>,
  pub(crate) postprocessors: Vec<Arc<dyn HtmlPostprocessor>>,
  pub(crate) extensions:     Vec<String>,
}

impl fmt::Debug for Renderer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Renderer")
      .field("options", &self.options)
      .field("preprocessors", &self.preprocessors.len())
      .field("transformers", &self.transformers.len())
      .field("postprocessors", &self.postprocessors.len())
      .field("extensions", &self.extensions)
      .finish()
  }
}

/// Builder for constructing `EngineOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct EngineOptionsBuilder {
  options: EngineOptions,
}

impl EngineOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Enable or disable raw HTML passthrough.
  #[must_use]
  pub const fn html(mut self, enabled: bool) -> Self {
    self.options.html = enabled;
    self
  }

  /// Enable or disable hard line breaks.
  #[must_use]
  pub const fn breaks(mut self, enabled: bool) -> Self {
    self.options.breaks = enabled;
    self
  }

  /// Set the class of slide sections.
  #[must_use]
  pub fn slide_class<S: Into<String>>(mut self, class: S) -> Self {
    self.options.slide_class = class.into();
    self
  }

  /// Set the prefix for generated heading IDs.
  #[must_use]
  pub fn anchor_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
    self.options.anchor_prefix = prefix.into();
    self
  }

  /// Build the final `EngineOptions`.
  #[must_use]
  pub fn build(self) -> EngineOptions {
    self.options
  }
}
