//! Small text helpers shared by the renderer and built-in extensions.
use std::sync::OnceLock;

use regex::Regex;

/// Slugify a string for use as an anchor ID.
/// Converts to lowercase, replaces non-alphanumeric characters with dashes,
/// and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  text
    .to_lowercase()
    .replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_', "-")
    .trim_matches('-')
    .to_string()
}

/// Generated anchor ID for a heading without an explicit one.
#[must_use]
pub fn heading_id(text: &str, prefix: &str) -> String {
  format!("{prefix}{}", slugify(text))
}

/// Split a trailing `{#id}` anchor off heading text.
///
/// Returns the text before the anchor (trailing whitespace removed) and the
/// anchor, if there is a valid one.
#[must_use]
pub fn split_explicit_anchor(text: &str) -> (&str, Option<&str>) {
  static ANCHOR_RE: OnceLock<Regex> = OnceLock::new();
  let anchor_re = ANCHOR_RE.get_or_init(|| {
    Regex::new(r"\s*\{#([a-zA-Z0-9_-]+)\}\s*$")
      .unwrap_or_else(|_| never_matching_regex())
  });

  match anchor_re.captures(text) {
    Some(caps) => {
      let start = caps.get(0).map_or(text.len(), |m| m.start());
      (text[..start].trim_end(), caps.get(1).map(|m| m.as_str()))
    },
    None => (text.trim_end(), None),
  }
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
///
/// # Panics
///
/// Panics if the fallback regex pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
#[allow(clippy::unwrap_used, reason = "Both patterns are known to be valid")]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| Regex::new(r"^\b$").unwrap())
}
