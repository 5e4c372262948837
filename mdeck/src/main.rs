use std::{
  fs,
  io::{self, Write},
};

use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, info};
use mdeck::{
  cli::{Cli, Commands},
  init,
  render,
};
use mdeck_config::Config;
use mdeck_engine::ExtensionRegistry;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init { output, force } => {
      init::init_config(output, *force)?;
      info!(
        "Configuration file created successfully. Enable the extensions you \
         need in it."
      );
    },

    Commands::Extensions => {
      let mut stdout = io::stdout().lock();
      for name in ExtensionRegistry::with_builtins().names() {
        writeln!(stdout, "{name}")?;
      }
    },

    Commands::Render {
      input,
      output,
      fragment,
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)?;
      let renderer = render::build_renderer(&config)?;
      let html = render::render_file(&renderer, input, *fragment)?;

      match output {
        Some(path) => {
          fs::write(path, html).wrap_err_with(|| {
            format!("Failed to write output: {}", path.display())
          })?;
          info!("Slides written to {}", path.display());
        },
        None => io::stdout().lock().write_all(html.as_bytes())?,
      }
    },
  }

  Ok(())
}
