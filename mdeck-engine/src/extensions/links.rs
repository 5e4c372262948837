use kuchikikiki::NodeRef;
use markup5ever::local_name;
use serde::{Deserialize, Serialize};

use super::transform_fragment;
use crate::{
  Renderer,
  error::ExtensionError,
  extension::{Extension, ExtensionOptions},
  renderer::HtmlPostprocessor,
};

/// Opens absolute `http(s)` links in a new browsing context.
///
/// Links that already carry a `target` keep it. Relative links and fragment
/// links are never touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalLinks;

/// Options of the `external-links` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExternalLinksOptions {
  /// Value of the `rel` attribute. Empty to leave `rel` unset.
  pub rel: String,
}

impl Default for ExternalLinksOptions {
  fn default() -> Self {
    Self {
      rel: "noopener noreferrer".to_string(),
    }
  }
}

impl Extension<Renderer> for ExternalLinks {
  fn name(&self) -> &str {
    "external-links"
  }

  fn register(
    &self,
    renderer: Renderer,
    options: &ExtensionOptions,
  ) -> Result<Renderer, ExtensionError> {
    let options = options.parse::<ExternalLinksOptions>()?;
    if options.rel.contains(['"', '<', '>']) {
      return Err(ExtensionError::InvalidOptions(format!(
        "rel contains invalid characters: {:?}",
        options.rel
      )));
    }
    Ok(renderer.postprocess_with(LinkPostprocessor { rel: options.rel }))
  }
}

struct LinkPostprocessor {
  rel: String,
}

impl HtmlPostprocessor for LinkPostprocessor {
  fn postprocess(&self, html: &str) -> String {
    if !html.contains("<a") {
      return html.to_string();
    }
    transform_fragment(html, |document| self.apply(document))
  }
}

impl LinkPostprocessor {
  fn apply(&self, document: &NodeRef) {
    let Ok(links) = document.select("a[href]") else {
      return;
    };

    for link in links {
      let mut attributes = link.attributes.borrow_mut();
      let is_external = attributes
        .get(local_name!("href"))
        .is_some_and(is_external_url);
      if !is_external {
        continue;
      }

      if !attributes.contains(local_name!("target")) {
        attributes.insert(local_name!("target"), "_blank".to_string());
      }
      if !self.rel.is_empty() {
        attributes.insert(local_name!("rel"), self.rel.clone());
      }
    }
  }
}

fn is_external_url(href: &str) -> bool {
  let href = href.trim_start().to_ascii_lowercase();
  href.starts_with("http://") || href.starts_with("https://")
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::EngineOptions;

  fn renderer(options: serde_json::Value) -> Renderer {
    ExternalLinks
      .register(
        Renderer::new(EngineOptions::default()).unwrap(),
        &ExtensionOptions::new(options),
      )
      .unwrap()
  }

  #[test]
  fn test_external_link_opens_new_tab() {
    let result = renderer(serde_json::Value::Null)
      .render("[site](https://example.com)");
    assert!(result.html.contains("target=\"_blank\""));
    assert!(result.html.contains("rel=\"noopener noreferrer\""));
  }

  #[test]
  fn test_relative_links_are_untouched() {
    let result =
      renderer(serde_json::Value::Null).render("[next](#2) and [doc](a.md)");
    assert!(!result.html.contains("target="));
    assert!(result.html.contains("<a href=\"#2\">next</a>"));
  }

  #[test]
  fn test_existing_target_is_kept() {
    let result = renderer(serde_json::Value::Null)
      .render("<a href=\"http://example.com\" target=\"_self\">x</a>");
    assert!(result.html.contains("target=\"_self\""));
    assert!(!result.html.contains("_blank"));
  }

  #[test]
  fn test_custom_rel() {
    let result =
      renderer(json!({ "rel": "nofollow" })).render("<https://example.com>");
    assert!(result.html.contains("rel=\"nofollow\""));
  }

  #[test]
  fn test_empty_rel_is_omitted() {
    let result = renderer(json!({ "rel": "" })).render("[x](https://a.b)");
    assert!(result.html.contains("target=\"_blank\""));
    assert!(!result.html.contains("rel="));
  }

  #[test]
  fn test_rejects_unsafe_rel() {
    let err = ExternalLinks
      .register(
        Renderer::new(EngineOptions::default()).unwrap(),
        &ExtensionOptions::new(json!({ "rel": "x\" onclick=\"y" })),
      )
      .unwrap_err();
    assert!(matches!(err, ExtensionError::InvalidOptions(_)));
  }

  #[test]
  fn test_is_external_url() {
    assert!(is_external_url("HTTPS://example.com"));
    assert!(!is_external_url("mailto:a@b.c"));
    assert!(!is_external_url("/local"));
  }
}
