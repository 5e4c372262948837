//! Types for mdeck-engine public API and internal use.
use serde::{Deserialize, Serialize};

/// Represents a header in a Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
  /// Header text (inline content, no markdown formatting).
  pub text:  String,
  /// Header level (1-6).
  pub level: u8,
  /// Generated or explicit anchor ID for the header.
  pub id:    String,
}

/// A single rendered slide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slide {
  /// 1-based position of the slide in the deck.
  pub index:   usize,
  /// Rendered `<section>` element for this slide.
  pub html:    String,
  /// Headers found on this slide, in document order.
  pub headers: Vec<Header>,
}

/// Result of rendering a Markdown deck.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderResult {
  /// Every slide's `<section>`, concatenated in order.
  pub html: String,

  /// Individual slides.
  pub slides: Vec<Slide>,

  /// Extracted headers across the whole deck (for `ToC`, navigation, etc).
  pub headers: Vec<Header>,

  /// Title of the deck, if found (first H1 on any slide).
  pub title: Option<String>,

  /// Raw front matter block, without its `---` fences.
  pub front_matter: Option<String>,
}
