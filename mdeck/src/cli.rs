use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for mdeck
#[derive(Parser, Debug)]
#[command(author, version, about = "mdeck: Markdown decks to HTML slides")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// the options they set
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the mdeck CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Render a Markdown deck to HTML.
  Render {
    /// Markdown file to render.
    input: PathBuf,

    /// Output file. Writes to stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit only the slide sections instead of a full HTML document.
    #[arg(long)]
    fragment: bool,
  },

  /// List the built-in extensions.
  Extensions,

  /// Initialize a new mdeck configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mdeck.toml")]
    output: PathBuf,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_render_arguments() {
    let cli = Cli::try_parse_from([
      "mdeck",
      "render",
      "talk.md",
      "-o",
      "talk.html",
      "--fragment",
      "--config",
      "engine.gfm=true",
      "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config_overrides, ["engine.gfm=true"]);
    match cli.command {
      Commands::Render {
        input,
        output,
        fragment,
      } => {
        assert_eq!(input, PathBuf::from("talk.md"));
        assert_eq!(output, Some(PathBuf::from("talk.html")));
        assert!(fragment);
      },
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn test_config_files_accumulate() {
    let cli = Cli::try_parse_from([
      "mdeck", "-c", "a.toml", "-c", "b.json", "extensions",
    ])
    .unwrap();
    assert_eq!(cli.config_files, [
      PathBuf::from("a.toml"),
      PathBuf::from("b.json")
    ]);
  }

  #[test]
  fn test_init_defaults() {
    let cli = Cli::try_parse_from(["mdeck", "init"]).unwrap();
    match cli.command {
      Commands::Init { output, force } => {
        assert_eq!(output, PathBuf::from("mdeck.toml"));
        assert!(!force);
      },
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn test_subcommand_is_required() {
    assert!(Cli::try_parse_from(["mdeck"]).is_err());
  }
}
