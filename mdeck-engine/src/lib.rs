//! # mdeck-engine - composable Markdown slide rendering
//!
//! A renderer is built in two steps: a constructor turns engine options into
//! a bare [`Renderer`], then every configured extension is registered against
//! it, one after another, in the order they were declared. The first failing
//! step stops composition and is reported as a [`ComposeError`].
//!
//! ## Quick Start
//!
//! ```rust
//! use mdeck_engine::{Composer, EngineOptions, extensions};
//!
//! let renderer = Composer::new()
//!   .with(extensions::Gfm)
//!   .with(extensions::HeadingAnchors)
//!   .build(EngineOptions::default())
//!   .expect("built-in extensions register cleanly");
//!
//! let deck = renderer.render("# Hello\n\n---\n\n## World {#world}");
//! assert_eq!(deck.slides.len(), 2);
//! assert_eq!(deck.title.as_deref(), Some("Hello"));
//! assert!(renderer.has_extension("heading-anchors"));
//! ```
//!
//! ## Writing an extension
//!
//! An extension receives the renderer by value and hands back the renderer
//! that should be used from then on. It usually attaches hooks:
//!
//! ```rust
//! use mdeck_engine::{Composer, EngineOptions, Renderer, extension_fn};
//!
//! let shout = extension_fn("shout", |renderer: Renderer, _| {
//!   Ok(renderer.postprocess_with(|html: &str| html.to_uppercase()))
//! });
//!
//! let renderer = Composer::new()
//!   .with(shout)
//!   .build(EngineOptions::default())
//!   .expect("closure extension cannot fail");
//! assert!(renderer.render("hi").html.contains("HI"));
//! ```
//!
//! ## Generic composition
//!
//! [`Composer`] is generic over the renderer type, so the same ordered fold
//! works for any constructor whose output implements [`ExtensionTarget`]:
//!
//! ```rust
//! use mdeck_engine::{Composer, ExtensionTarget, extension_fn};
//!
//! struct Trace(Vec<String>);
//!
//! impl ExtensionTarget for Trace {
//!   fn registered(mut self, name: &str) -> Self {
//!     self.0.push(format!("{name} done"));
//!     self
//!   }
//! }
//!
//! let engine = Composer::new()
//!   .with(extension_fn("a", |mut trace: Trace, _| {
//!     trace.0.push("a".into());
//!     Ok(trace)
//!   }))
//!   .engine(|seed: String| Ok::<_, std::io::Error>(Trace(vec![seed])));
//!
//! let trace = engine("init".to_string()).expect("no failing steps");
//! assert_eq!(trace.0, ["init", "a", "a done"]);
//! ```

pub mod compose;
pub mod error;
pub mod extension;
pub mod extensions;
pub mod registry;
pub mod renderer;
mod types;
pub mod utils;

pub use crate::{
  compose::{Composer, compose},
  error::{
    BoxError,
    ComposeError,
    ExtensionError,
    RegistryError,
    RendererError,
  },
  extension::{
    Extension,
    ExtensionOptions,
    ExtensionSpec,
    ExtensionTarget,
    FnExtension,
    extension_fn,
  },
  registry::ExtensionRegistry,
  renderer::{
    AstTransformer,
    EngineOptions,
    EngineOptionsBuilder,
    HtmlPostprocessor,
    MarkdownPreprocessor,
    Renderer,
    render_with_recovery,
  },
  types::{Header, RenderResult, Slide},
};
