//! Core implementation of the renderer.
//!
//! This module contains the constructor, the hook attachment methods used by
//! extensions, and the rendering pipeline itself.
use std::sync::Arc;

use comrak::{
  Arena,
  nodes::{AstNode, NodeHeading, NodeValue},
  options::Options,
  parse_document,
};
use log::{error, trace};

use super::{
  slides::split_deck,
  types::{
    AstTransformer,
    EngineOptions,
    HtmlPostprocessor,
    MarkdownPreprocessor,
    Renderer,
  },
};
use crate::{
  error::RendererError,
  extension::ExtensionTarget,
  types::{Header, RenderResult, Slide},
  utils,
};

impl Renderer {
  /// Create a bare renderer with no extensions attached.
  ///
  /// # Errors
  ///
  /// Returns [`RendererError::InvalidOption`] if `slide_class` is empty, or
  /// if `slide_class` or `anchor_prefix` contain characters other than ASCII
  /// letters, digits, `-` and `_`.
  pub fn new(options: EngineOptions) -> Result<Self, RendererError> {
    if options.slide_class.is_empty() {
      return Err(RendererError::InvalidOption {
        option: "slide_class",
        reason: "must not be empty".to_string(),
      });
    }
    validate_identifier("slide_class", &options.slide_class)?;
    validate_identifier("anchor_prefix", &options.anchor_prefix)?;

    Ok(Self {
      options,
      preprocessors: Vec::new(),
      transformers: Vec::new(),
      postprocessors: Vec::new(),
      extensions: Vec::new(),
    })
  }

  /// Access engine options.
  #[must_use]
  pub const fn options(&self) -> &EngineOptions {
    &self.options
  }

  /// Adjust engine options after construction.
  #[must_use]
  pub fn configure<F>(mut self, f: F) -> Self
  where
    F: FnOnce(&mut EngineOptions),
  {
    f(&mut self.options);
    self
  }

  /// Attach a Markdown preprocessor. Runs over the whole deck, before it is
  /// split into slides.
  #[must_use]
  pub fn preprocess_with<P>(mut self, preprocessor: P) -> Self
  where
    P: MarkdownPreprocessor + 'static,
  {
    self.preprocessors.push(Arc::new(preprocessor));
    self
  }

  /// Attach an AST transformer. Runs on every slide's parsed document.
  #[must_use]
  pub fn transform_with<T>(mut self, transformer: T) -> Self
  where
    T: AstTransformer + 'static,
  {
    self.transformers.push(Arc::new(transformer));
    self
  }

  /// Attach an HTML postprocessor. Runs on every slide's HTML.
  #[must_use]
  pub fn postprocess_with<P>(mut self, postprocessor: P) -> Self
  where
    P: HtmlPostprocessor + 'static,
  {
    self.postprocessors.push(Arc::new(postprocessor));
    self
  }

  /// Names of the extensions registered on this renderer, in order.
  #[must_use]
  pub fn extensions(&self) -> &[String] {
    &self.extensions
  }

  /// Check if an extension has been registered.
  #[must_use]
  pub fn has_extension(&self, name: &str) -> bool {
    self.extensions.iter().any(|e| e == name)
  }

  /// Render a Markdown deck to HTML slides.
  #[must_use]
  pub fn render(&self, markdown: &str) -> RenderResult {
    let preprocessed = self.preprocess(markdown);
    let deck = split_deck(&preprocessed);
    trace!("Rendering deck with {} slides", deck.slides.len());

    let slides = deck
      .slides
      .iter()
      .enumerate()
      .map(|(i, source)| self.render_slide(i + 1, source))
      .collect::<Vec<_>>();

    let headers = slides
      .iter()
      .flat_map(|slide| slide.headers.iter().cloned())
      .collect::<Vec<_>>();
    let title = headers
      .iter()
      .find(|header| header.level == 1)
      .map(|header| header.text.clone());
    let html = slides
      .iter()
      .map(|slide| slide.html.as_str())
      .collect::<Vec<_>>()
      .join("\n");

    RenderResult {
      html,
      slides,
      headers,
      title,
      front_matter: deck.front_matter.map(ToString::to_string),
    }
  }

  fn preprocess(&self, markdown: &str) -> String {
    self
      .preprocessors
      .iter()
      .fold(markdown.to_string(), |content, p| p.preprocess(&content))
  }

  fn render_slide(&self, index: usize, source: &str) -> Slide {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, source, &options);

    // Headers are read before transformers may rewrite inline nodes
    let headers = self.extract_headers(root);

    for transformer in &self.transformers {
      transformer.transform(root);
    }

    let mut html = String::new();
    if let Err(e) = comrak::format_html(root, &options, &mut html) {
      error!("Failed to format slide {index}: {e}");
    }

    let html = self
      .postprocessors
      .iter()
      .fold(html, |html, p| p.postprocess(&html));

    Slide {
      index,
      html: format!(
        "<section id=\"{index}\" class=\"{}\">\n{html}</section>",
        self.options.slide_class
      ),
      headers,
    }
  }

  /// Extract headers from a parsed slide.
  fn extract_headers<'a>(&self, root: &'a AstNode<'a>) -> Vec<Header> {
    let mut headers = Vec::new();

    for node in root.descendants() {
      if let NodeValue::Heading(NodeHeading { level, .. }) =
        &node.data.borrow().value
      {
        let text = extract_inline_text(node);
        let (text, explicit_id) = utils::split_explicit_anchor(&text);
        let text = text.trim();
        let id = explicit_id.map_or_else(
          || utils::heading_id(text, &self.options.anchor_prefix),
          ToString::to_string,
        );
        headers.push(Header {
          text: text.to_string(),
          level: *level,
          id,
        });
      }
    }

    headers
  }

  /// Build comrak options from `EngineOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.superscript = true;
      options.extension.autolink = true;
    }
    options.extension.header_ids = None;
    options.render.r#unsafe = self.options.html;
    options.render.hardbreaks = self.options.breaks;
    options
  }
}

impl ExtensionTarget for Renderer {
  fn registered(mut self, name: &str) -> Self {
    self.extensions.push(name.to_string());
    self
  }
}

fn validate_identifier(
  option: &'static str,
  value: &str,
) -> Result<(), RendererError> {
  match value
    .chars()
    .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
  {
    Some(c) => {
      Err(RendererError::InvalidOption {
        option,
        reason: format!("character {c:?} is not allowed"),
      })
    },
    None => Ok(()),
  }
}

/// Extract all inline text from a heading node.
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::Link(..)
      | NodeValue::Emph
      | NodeValue::Strong
      | NodeValue::Strikethrough
      | NodeValue::Superscript
      | NodeValue::Subscript => text.push_str(&extract_inline_text(child)),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      _ => {},
    }
  }
  text
}
