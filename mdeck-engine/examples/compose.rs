#![allow(clippy::print_stdout, reason = "Fine in examples")]
use mdeck_engine::{
  Composer,
  EngineOptionsBuilder,
  ExtensionRegistry,
  ExtensionSpec,
  Renderer,
  extension_fn,
  extensions::{HeadingAnchors, HeadingAnchorsOptions},
};

const DECK: &str = "---
paginate: true
---
# mdeck

Run `$ mdeck render talk.md`

---

## Composition {#composition}

Extensions register [in order](https://example.org).
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
  println!("mdeck-engine composition examples\n");

  // 1. Composing in code
  example_composer()?;

  // 2. Resolving configured extension names
  example_registry()?;

  Ok(())
}

/// Build a renderer from extension values.
fn example_composer() -> Result<(), Box<dyn std::error::Error>> {
  println!("== Composer ==");

  let footer = extension_fn("footer", |renderer: Renderer, _| {
    Ok(renderer.postprocess_with(|html: &str| {
      format!("{html}<footer>mdeck</footer>\n")
    }))
  });

  let anchors = HeadingAnchorsOptions {
    permalink: true,
    ..Default::default()
  };
  let renderer = Composer::new()
    .with_options(HeadingAnchors, serde_json::to_value(anchors)?)
    .with(footer)
    .build(EngineOptionsBuilder::new().gfm(true).build())?;

  let result = renderer.render(DECK);
  println!("extensions: {:?}", renderer.extensions());
  println!("title: {:?}", result.title);
  println!("{}\n", result.html);
  Ok(())
}

/// Build a renderer the way the CLI does, from configuration entries.
fn example_registry() -> Result<(), Box<dyn std::error::Error>> {
  println!("== Registry ==");

  let registry = ExtensionRegistry::with_builtins();
  println!("available: {:?}", registry.names());

  let entries = [
    ExtensionSpec::new("gfm"),
    ExtensionSpec::new("prompts"),
    ExtensionSpec::new("external-links").enabled(false),
  ];
  let renderer = registry
    .resolve(&entries)?
    .build(EngineOptionsBuilder::new().slide_class("page").build())?;

  for slide in renderer.render(DECK).slides {
    println!("slide {}: {} header(s)", slide.index, slide.headers.len());
  }
  Ok(())
}
