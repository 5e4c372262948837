use std::cell::RefCell;

use kuchikikiki::{NodeDataRef, NodeRef, iter::NodeIterator};
use markup5ever::local_name;
use serde::{Deserialize, Serialize};

use super::{new_element, transform_fragment};
use crate::{
  Renderer,
  error::ExtensionError,
  extension::{Extension, ExtensionOptions},
  renderer::HtmlPostprocessor,
  utils,
};

/// Gives every heading an `id`, optionally followed by a permalink.
///
/// A trailing `{#id}` in the heading text sets the id explicitly and is
/// removed from the output. Other headings get a slug of their text,
/// prefixed with the renderer's `anchor_prefix`, so the ids always agree
/// with [`crate::RenderResult::headers`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingAnchors;

/// Options of the `heading-anchors` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadingAnchorsOptions {
  /// Append a `<a class="header-anchor">` link to every heading.
  pub permalink: bool,

  /// Link text of the permalink.
  pub symbol: String,
}

impl Default for HeadingAnchorsOptions {
  fn default() -> Self {
    Self {
      permalink: false,
      symbol:    "#".to_string(),
    }
  }
}

impl Extension<Renderer> for HeadingAnchors {
  fn name(&self) -> &str {
    "heading-anchors"
  }

  fn register(
    &self,
    renderer: Renderer,
    options: &ExtensionOptions,
  ) -> Result<Renderer, ExtensionError> {
    let options = options.parse::<HeadingAnchorsOptions>()?;
    if options.permalink && options.symbol.is_empty() {
      return Err(ExtensionError::InvalidOptions(
        "symbol must not be empty when permalink is enabled".to_string(),
      ));
    }

    let postprocessor = AnchorPostprocessor {
      prefix:    renderer.options().anchor_prefix.clone(),
      permalink: options.permalink.then_some(options.symbol),
    };
    Ok(renderer.postprocess_with(postprocessor))
  }
}

struct AnchorPostprocessor {
  prefix:    String,
  permalink: Option<String>,
}

impl HtmlPostprocessor for AnchorPostprocessor {
  fn postprocess(&self, html: &str) -> String {
    if !html.contains("<h") {
      return html.to_string();
    }
    transform_fragment(html, |document| self.apply(document))
  }
}

impl AnchorPostprocessor {
  fn apply(&self, document: &NodeRef) {
    let Ok(headings) = document.select("h1, h2, h3, h4, h5, h6") else {
      return;
    };

    for heading in headings.collect::<Vec<_>>() {
      let node = heading.as_node();
      let texts = heading_texts(node);
      let explicit = take_explicit_anchor(&texts);
      let existing = heading
        .attributes
        .borrow()
        .get(local_name!("id"))
        .map(ToString::to_string);

      let id = explicit.or(existing).unwrap_or_else(|| {
        let text = texts
          .iter()
          .map(|text| text.borrow().to_string())
          .collect::<String>();
        utils::heading_id(text.trim(), &self.prefix)
      });
      heading
        .attributes
        .borrow_mut()
        .insert(local_name!("id"), id.clone());

      if let Some(symbol) = &self.permalink {
        let link = new_element(local_name!("a"), vec![
          ("class", "header-anchor".to_string()),
          ("href", format!("#{id}")),
          ("aria-hidden", "true".to_string()),
        ]);
        link.append(NodeRef::new_text(symbol.clone()));
        node.append(NodeRef::new_text(" "));
        node.append(link);
      }
    }
  }
}

type TextNode = NodeDataRef<RefCell<String>>;

/// Text nodes of a heading, leaving out footnote reference markers.
fn heading_texts(heading: &NodeRef) -> Vec<TextNode> {
  heading
    .inclusive_descendants()
    .text_nodes()
    .filter(|text| !text.as_node().ancestors().any(|a| is_footnote_ref(&a)))
    .collect()
}

fn is_footnote_ref(node: &NodeRef) -> bool {
  node.as_element().is_some_and(|element| {
    element.name.local == local_name!("sup")
      && element
        .attributes
        .borrow()
        .get(local_name!("class"))
        .is_some_and(|class| {
          class.split_whitespace().any(|c| c == "footnote-ref")
        })
  })
}

/// Remove a trailing `{#id}` from the heading's last text node.
fn take_explicit_anchor(texts: &[TextNode]) -> Option<String> {
  let mut content = texts.last()?.borrow_mut();
  let (stripped, id) = utils::split_explicit_anchor(&content);
  let (stripped, id) = (stripped.to_string(), id?.to_string());
  *content = stripped;
  Some(id)
}
