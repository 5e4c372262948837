//! Rendering helpers with error recovery.
use log::error;

use super::types::Renderer;
use crate::types::{RenderResult, Slide};

/// Render a deck, recovering from panics raised inside extension hooks.
///
/// Hooks are third-party code; a panicking hook should not take the host
/// down with it. On panic an error placeholder deck is returned instead.
#[must_use]
pub fn render_with_recovery(
  renderer: &Renderer,
  markdown: &str,
) -> RenderResult {
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    renderer.render(markdown)
  })) {
    Ok(result) => result,
    Err(panic_err) => {
      error!("Panic during deck rendering: {panic_err:?}");
      let html = "<section id=\"1\" class=\"error\">Critical error rendering \
                  deck</section>"
        .to_string();
      RenderResult {
        slides:       vec![Slide {
          index:   1,
          html:    html.clone(),
          headers: Vec::new(),
        }],
        html,
        headers:      Vec::new(),
        title:        None,
        front_matter: None,
      }
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::renderer::EngineOptions;

  #[test]
  #[allow(clippy::panic)]
  fn test_render_with_recovery_catches_hook_panic() {
    let renderer = Renderer::new(EngineOptions::default())
      .unwrap()
      .postprocess_with(|_: &str| -> String { panic!("hook exploded") });

    let result = render_with_recovery(&renderer, "# Title");
    assert!(result.html.contains("Critical error"));
    assert_eq!(result.slides.len(), 1);
    assert!(result.title.is_none());
  }

  #[test]
  fn test_render_with_recovery_passes_through() {
    let renderer = Renderer::new(EngineOptions::default()).unwrap();
    let result = render_with_recovery(&renderer, "# Title");
    assert_eq!(result.title.as_deref(), Some("Title"));
  }
}
