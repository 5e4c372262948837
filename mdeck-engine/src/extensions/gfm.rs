use serde::Deserialize;

use crate::{
  Renderer,
  error::ExtensionError,
  extension::{Extension, ExtensionOptions},
};

/// Enables GitHub Flavored Markdown: tables, footnotes, strikethrough, task
/// lists, superscript and bare autolinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gfm;

// Braces make serde accept `{}` and reject any field
#[allow(clippy::empty_structs_with_brackets, reason = "Deserialized from a map")]
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

impl Extension<Renderer> for Gfm {
  fn name(&self) -> &str {
    "gfm"
  }

  fn register(
    &self,
    renderer: Renderer,
    options: &ExtensionOptions,
  ) -> Result<Renderer, ExtensionError> {
    options.parse::<NoOptions>()?;
    Ok(renderer.configure(|engine| engine.gfm = true))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::EngineOptions;

  #[test]
  fn test_gfm_enables_tables() {
    let renderer = Gfm
      .register(
        Renderer::new(EngineOptions::default()).unwrap(),
        &ExtensionOptions::none(),
      )
      .unwrap();
    let result = renderer.render("| a |\n|---|\n| 1 |\n\n~~gone~~");
    assert!(result.html.contains("<table>"));
    assert!(result.html.contains("<del>gone</del>"));
  }

  #[test]
  fn test_gfm_rejects_options() {
    let err = Gfm
      .register(
        Renderer::new(EngineOptions::default()).unwrap(),
        &ExtensionOptions::new(json!({ "tables": false })),
      )
      .unwrap_err();
    assert!(matches!(err, ExtensionError::InvalidOptions(_)));
  }
}
