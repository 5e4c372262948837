//! Splitting a Markdown deck into front matter and slides.
//!
//! Slides are separated by thematic breaks (`---`, `***`, `___`) outside of
//! fenced code blocks. A `---` line directly below a line of paragraph text
//! is a setext heading underline and does not start a new slide. Below a
//! heading, a fence, a list item or a block quote it is a break.

/// A deck split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck<'a> {
  /// Content between the leading `---` fences, if the deck has any.
  pub front_matter: Option<&'a str>,
  /// Markdown source of every slide. Never empty.
  pub slides:       Vec<String>,
}

/// Split `markdown` into front matter and slides.
#[must_use]
pub fn split_deck(markdown: &str) -> Deck<'_> {
  let (front_matter, body) = split_front_matter(markdown);

  let mut slides = Vec::new();
  let mut current = String::new();
  let mut previous = Block::Blank;
  let mut fence: Option<(char, usize)> = None;

  for line in body.lines() {
    let trimmed = line.trim_start();

    if let Some((fence_char, fence_len)) = code_fence(trimmed) {
      match fence {
        None => fence = Some((fence_char, fence_len)),
        Some((open_char, open_len))
          if open_char == fence_char
            && fence_len >= open_len
            && trimmed.trim_end().chars().all(|c| c == fence_char) =>
        {
          fence = None;
        },
        Some(_) => {},
      }
      previous = Block::Other;
    } else if fence.is_some() {
      previous = Block::Other;
    } else if let Some(marker) = thematic_break(line) {
      if marker != '-' || previous != Block::Paragraph {
        slides.push(std::mem::take(&mut current));
        previous = Block::Blank;
        continue;
      }
      // Setext underline
      previous = Block::Other;
    } else {
      previous = classify(line, previous);
    }

    current.push_str(line);
    current.push('\n');
  }

  slides.push(current);
  Deck {
    front_matter,
    slides,
  }
}

/// Kind of block the previous line belongs to, as far as slide splitting
/// cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
  Blank,
  /// Paragraph text, which a `---` underlines.
  Paragraph,
  /// List items, block quotes and their lazy continuation lines.
  Container,
  Other,
}

fn classify(line: &str, previous: Block) -> Block {
  let trimmed = line.trim_start();
  let indent = line.len() - trimmed.len();

  if trimmed.is_empty() {
    Block::Blank
  } else if indent >= 4 {
    match previous {
      Block::Paragraph | Block::Container => previous,
      Block::Blank | Block::Other => Block::Other,
    }
  } else if atx_heading(trimmed) {
    Block::Other
  } else if list_marker(trimmed)
    || trimmed.starts_with('>')
    || previous == Block::Container
  {
    Block::Container
  } else {
    Block::Paragraph
  }
}

fn atx_heading(trimmed: &str) -> bool {
  let level = trimmed.chars().take_while(|&c| c == '#').count();
  (1..=6).contains(&level)
    && trimmed[level..]
      .chars()
      .next()
      .is_none_or(|c| c == ' ' || c == '\t')
}

fn list_marker(trimmed: &str) -> bool {
  let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
  let rest = if (1..=9).contains(&digits) {
    trimmed[digits..].strip_prefix(['.', ')'])
  } else {
    trimmed.strip_prefix(['-', '*', '+'])
  };
  rest.is_some_and(|rest| {
    rest.chars().next().is_none_or(|c| c == ' ' || c == '\t')
  })
}

/// Separate a leading `---` fenced block from the rest of the document.
///
/// An opening fence without a matching closing fence is not front matter.
fn split_front_matter(markdown: &str) -> (Option<&str>, &str) {
  let Some(rest) = markdown
    .strip_prefix("---\n")
    .or_else(|| markdown.strip_prefix("---\r\n"))
  else {
    return (None, markdown);
  };

  let mut offset = 0;
  for line in rest.split_inclusive('\n') {
    if line.trim_end() == "---" {
      let front_matter = &rest[..offset];
      let body = &rest[offset + line.len()..];
      return (Some(front_matter), body);
    }
    offset += line.len();
  }

  (None, markdown)
}

/// Opening/closing code fence marker at the start of `trimmed`.
fn code_fence(trimmed: &str) -> Option<(char, usize)> {
  let fence_char = trimmed.chars().next()?;
  if fence_char != '`' && fence_char != '~' {
    return None;
  }
  let count = trimmed.chars().take_while(|&c| c == fence_char).count();
  (count >= 3).then_some((fence_char, count))
}

/// The marker character if `line` is a thematic break.
fn thematic_break(line: &str) -> Option<char> {
  let indent = line.len() - line.trim_start_matches(' ').len();
  if indent >= 4 {
    return None;
  }

  let mut marker = None;
  let mut count = 0;
  for c in line.trim().chars() {
    match (c, marker) {
      (' ' | '\t', _) => {},
      ('-' | '*' | '_', None) => {
        marker = Some(c);
        count = 1;
      },
      (c, Some(m)) if c == m => count += 1,
      _ => return None,
    }
  }

  marker.filter(|_| count >= 3)
}
