//! Built-in extensions.
//!
//! Each extension attaches hooks to a [`Renderer`] and takes its options as
//! JSON, rejecting unknown fields:
//!
//! | Name | Type | Effect |
//! |------|------|--------|
//! | `gfm` | [`Gfm`] | GitHub Flavored Markdown features |
//! | `heading-anchors` | [`HeadingAnchors`] | `id` attributes and permalinks on headings |
//! | `prompts` | [`Prompts`] | Shell and REPL prompt styling for inline code |
//! | `external-links` | [`ExternalLinks`] | Open absolute links in a new tab |
use std::sync::Arc;

use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use log::error;
use markup5ever::{LocalName, QualName, ns};

use crate::{Renderer, extension::Extension};

mod anchors;
mod gfm;
mod links;
mod prompts;

pub use anchors::{HeadingAnchors, HeadingAnchorsOptions};
pub use gfm::Gfm;
pub use links::{ExternalLinks, ExternalLinksOptions};
pub use prompts::{PromptTransformer, Prompts, PromptsOptions};

/// Every built-in extension, in the order they are listed by the registry.
#[must_use]
pub fn builtins() -> Vec<Arc<dyn Extension<Renderer>>> {
  vec![
    Arc::new(Gfm),
    Arc::new(HeadingAnchors),
    Arc::new(Prompts),
    Arc::new(ExternalLinks),
  ]
}

/// Parse an HTML fragment, apply `transform_fn` to the DOM, and serialize the
/// fragment back.
///
/// Falls back to the unmodified input if parsing or transformation panics.
pub(crate) fn transform_fragment<F>(html: &str, transform_fn: F) -> String
where
  F: FnOnce(&NodeRef),
{
  use tendril::TendrilSink;

  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    let document = kuchikikiki::parse_html().one(html);
    transform_fn(&document);

    let body = document.select_first("body").ok()?;
    let mut out = Vec::new();
    for child in body.as_node().children() {
      child.serialize(&mut out).ok()?;
    }
    String::from_utf8(out).ok()
  }));

  match result {
    Ok(Some(transformed)) => transformed,
    Ok(None) => html.to_string(),
    Err(e) => {
      if let Some(message) = e.downcast_ref::<String>() {
        error!("Error transforming slide HTML: {message}");
      } else if let Some(message) = e.downcast_ref::<&str>() {
        error!("Error transforming slide HTML: {message}");
      } else {
        error!("Unknown error occurred while transforming slide HTML");
      }
      html.to_string()
    },
  }
}

/// Create an HTML element node with the given attributes.
pub(crate) fn new_element(
  name: LocalName,
  attributes: Vec<(&str, String)>,
) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), name),
    attributes.into_iter().map(|(key, value)| {
      (ExpandedName::new("", key), Attribute {
        prefix: None,
        value,
      })
    }),
  )
}

#[cfg(test)]
mod tests {
  use markup5ever::local_name;

  use super::*;

  #[test]
  fn test_builtin_names_are_unique() {
    let mut names = builtins()
      .iter()
      .map(|e| e.name().to_string())
      .collect::<Vec<_>>();
    let count = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), count);
  }

  #[test]
  fn test_transform_fragment_roundtrips_without_wrappers() {
    let html = "<h1>Title</h1>\n<p>Text</p>\n";
    let out = transform_fragment(html, |_| {});
    assert!(out.contains("<h1>Title</h1>"));
    assert!(out.contains("<p>Text</p>"));
    assert!(!out.contains("<body>"));
    assert!(!out.contains("<html>"));
  }

  #[test]
  #[allow(clippy::panic)]
  fn test_transform_fragment_falls_back_on_panic() {
    let html = "<p>kept</p>\n";
    let out = transform_fragment(html, |_| panic!("broken rewrite"));
    assert_eq!(out, html);
  }

  #[test]
  fn test_new_element_attributes() {
    let node = new_element(local_name!("span"), vec![(
      "class",
      "marker".to_string(),
    )]);
    let mut out = Vec::new();
    node.serialize(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "<span class=\"marker\"></span>");
  }
}
