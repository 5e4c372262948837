use comrak::nodes::{AstNode, NodeValue};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
  Renderer,
  error::ExtensionError,
  extension::{Extension, ExtensionOptions},
  renderer::AstTransformer,
};

/// Styles inline code that starts with a shell or REPL prompt.
///
/// `` `$ make` `` becomes
/// `<code class="terminal"><span class="prompt">$</span> make</code>` and
/// `` `>>> 1 + 1` `` gets the `repl` class instead. A prompt written twice or
/// preceded by a backslash is left alone. The output is raw HTML, so this
/// extension refuses to register on a renderer with `html` disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prompts;

/// Options of the `prompts` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptsOptions {
  /// Prompt of shell commands.
  pub shell: String,

  /// Prompt of REPL expressions.
  pub repl: String,
}

impl Default for PromptsOptions {
  fn default() -> Self {
    Self {
      shell: "$".to_string(),
      repl:  ">>>".to_string(),
    }
  }
}

impl Extension<Renderer> for Prompts {
  fn name(&self) -> &str {
    "prompts"
  }

  fn register(
    &self,
    renderer: Renderer,
    options: &ExtensionOptions,
  ) -> Result<Renderer, ExtensionError> {
    if !renderer.options().html {
      return Err(ExtensionError::Unsupported(
        "prompt styling emits raw HTML, enable `html` in the engine options"
          .to_string(),
      ));
    }

    let options = options.parse::<PromptsOptions>()?;
    let transformer = PromptTransformer::new(&options)?;
    Ok(renderer.transform_with(transformer))
  }
}

/// AST transformer for processing command and REPL prompts in inline code
/// spans.
#[derive(Debug, Clone)]
pub struct PromptTransformer {
  shell: Prompt,
  repl:  Prompt,
}

#[derive(Debug, Clone)]
struct Prompt {
  text:  String,
  class: &'static str,
  re:    Regex,
}

impl Prompt {
  fn new(
    field: &str,
    text: &str,
    class: &'static str,
  ) -> Result<Self, ExtensionError> {
    if text.trim().is_empty() {
      return Err(ExtensionError::InvalidOptions(format!(
        "{field} prompt must not be empty"
      )));
    }
    let re = Regex::new(&format!(r"^{}\s+(.+)$", regex::escape(text)))?;
    Ok(Self {
      text: text.to_string(),
      class,
      re,
    })
  }

  /// Styled HTML for `literal`, unless it does not start with this prompt or
  /// the prompt is escaped.
  fn render(&self, literal: &str) -> Option<String> {
    if literal.starts_with(&format!("\\{}", self.text)) {
      return None;
    }
    let rest = literal.strip_prefix(&self.text)?;
    if self.text.chars().next_back().is_some_and(|c| rest.starts_with(c)) {
      return None;
    }

    let caps = self.re.captures(literal)?;
    let command = caps.get(1)?.as_str().trim();
    Some(format!(
      "<code class=\"{}\"><span class=\"prompt\">{}</span> {}</code>",
      self.class,
      html_escape::encode_text(&self.text),
      html_escape::encode_text(command),
    ))
  }
}

impl PromptTransformer {
  /// Build a transformer for the given prompts.
  ///
  /// # Errors
  ///
  /// Returns [`ExtensionError::InvalidOptions`] if a prompt is blank.
  pub fn new(options: &PromptsOptions) -> Result<Self, ExtensionError> {
    Ok(Self {
      shell: Prompt::new("shell", &options.shell, "terminal")?,
      repl:  Prompt::new("repl", &options.repl, "repl")?,
    })
  }
}

impl AstTransformer for PromptTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for child in node.children() {
      {
        let mut data = child.data.borrow_mut();
        if let NodeValue::Code(ref code) = data.value {
          let literal = code.literal.trim();
          let html = self
            .shell
            .render(literal)
            .or_else(|| self.repl.render(literal));
          if let Some(html) = html {
            data.value = NodeValue::HtmlInline(html);
          }
        }
      }
      self.transform(child);
    }
  }
}
