//! Markdown slide renderer.
//!
//! # Architecture
//!
//! The renderer module is organized into focused submodules:
//!
//! - [`core`]: Constructor, hook attachment and the rendering pipeline
//! - [`slides`]: Front matter and slide separation
//! - [`process`]: Rendering with error recovery
//! - [`types`]: Engine options, the renderer struct and hook traits
//!
//! Rendering a deck runs these steps:
//!
//! 1. Markdown preprocessors, over the whole deck
//! 2. Front matter extraction and slide splitting
//! 3. Per slide: parse, header extraction, AST transformers, HTML
//!    formatting, HTML postprocessors, `<section>` wrapping
pub mod core;
pub mod process;
pub mod slides;
pub mod types;

pub use process::render_with_recovery;
pub use self::core::extract_inline_text;
pub use types::{
  AstTransformer,
  EngineOptions,
  EngineOptionsBuilder,
  HtmlPostprocessor,
  MarkdownPreprocessor,
  Renderer,
};
