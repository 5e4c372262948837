//! The `render` command: compose a renderer from configuration and turn a
//! deck into HTML.
use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use log::{debug, info};
use mdeck_config::Config;
use mdeck_engine::{
  ExtensionRegistry,
  RenderResult,
  Renderer,
  render_with_recovery,
};

/// Compose a renderer from the engine options and extension list of
/// `config`, using the built-in extensions.
///
/// # Errors
///
/// Returns an error if an extension is unknown, the renderer cannot be
/// constructed, or an extension fails to register.
pub fn build_renderer(config: &Config) -> Result<Renderer> {
  let registry = ExtensionRegistry::with_builtins();
  let composer = registry
    .resolve(&config.extensions)
    .wrap_err("Failed to resolve configured extensions")?;
  debug!("Composing renderer with extensions: {:?}", composer.names());

  let renderer = composer
    .build(config.engine.clone())
    .wrap_err("Failed to compose renderer")?;
  info!(
    "Renderer ready with {} extension(s)",
    renderer.extensions().len()
  );
  Ok(renderer)
}

/// Render the deck at `input`.
///
/// Returns the bare slide sections if `fragment` is set, otherwise a
/// standalone HTML document.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn render_file(
  renderer: &Renderer,
  input: &Path,
  fragment: bool,
) -> Result<String> {
  let markdown = fs::read_to_string(input)
    .wrap_err_with(|| format!("Failed to read deck: {}", input.display()))?;

  let result = render_with_recovery(renderer, &markdown);
  info!(
    "Rendered {} slide(s) from {}",
    result.slides.len(),
    input.display()
  );

  if fragment {
    return Ok(result.html);
  }

  let fallback_title = input.file_stem().map_or_else(
    || "Slides".to_string(),
    |stem| stem.to_string_lossy().into_owned(),
  );
  Ok(standalone_document(&result, &fallback_title))
}

/// Wrap rendered slides in a minimal HTML document.
///
/// The title is the deck's first level-1 heading, or `fallback_title`.
#[must_use]
pub fn standalone_document(
  result: &RenderResult,
  fallback_title: &str,
) -> String {
  let title = result.title.as_deref().unwrap_or(fallback_title);
  format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body>
{}
</body>
</html>
"#,
    html_escape::encode_text(title),
    result.html
  )
}

#[cfg(test)]
mod tests {
  use mdeck_engine::EngineOptions;

  use super::*;

  #[test]
  fn test_document_title_is_escaped() {
    let renderer = Renderer::new(EngineOptions::default()).unwrap();
    let result = renderer.render("# Fish & Chips");
    let html = standalone_document(&result, "fallback");

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Fish &amp; Chips</title>"));
    assert!(html.contains("<section id=\"1\" class=\"slide\">"));
  }

  #[test]
  fn test_document_fallback_title() {
    let renderer = Renderer::new(EngineOptions::default()).unwrap();
    let html = standalone_document(&renderer.render("no heading"), "talk");
    assert!(html.contains("<title>talk</title>"));
  }
}
