mod ci;
mod commands;
mod core;
mod go;
mod graph;

use clap::{Parser, Subcommand};
use crate::core::error::{ImpactError, print_error};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Detect which services of a Go monorepo are affected by changed files
#[derive(Parser)]
#[command(name = "changed-services")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Repository root (defaults to the current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Config file (defaults to changed-services.toml, .changed-services.toml, .github/changed-services.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true, conflicts_with = "quiet")]
  verbose: bool,

  /// Only log errors
  #[arg(short, long, global = true)]
  quiet: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show which services are affected by changed files
  Affected {
    /// Repository path under the module host, e.g. acme/monorepo [env: INPUT_BASE-REPOSITORY]
    #[arg(long)]
    base_repository: Option<String>,
    /// JSON array of changed file paths [env: INPUT_CHANGED-FILES]
    #[arg(long)]
    changed_files: Option<String>,
    /// Output format: github (default), json, text, names-only
    #[arg(long, default_value = "github")]
    format: String,
  },

  /// List every service
  Services {
    /// Output format: text (default), json, names-only, github
    #[arg(long, default_value = "text")]
    format: String,
  },

  /// Show the dependency paths each service is matched against
  Deps {
    /// Repository path under the module host, e.g. acme/monorepo [env: INPUT_BASE-REPOSITORY]
    #[arg(long)]
    base_repository: Option<String>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  init_logging(&cli);

  let root = match cli.root.clone() {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(ImpactError::message(format!("Failed to get current directory: {}", e))),
    },
  };

  let ctx = match crate::core::context::RepoContext::build(&root, cli.config.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Affected {
      base_repository,
      changed_files,
      format,
    } => commands::run_affected(&ctx, base_repository, changed_files, format),
    Commands::Services { format } => commands::run_services(&ctx, format),
    Commands::Deps { base_repository, json } => commands::run_deps(&ctx, base_repository, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Log to stderr. `RUST_LOG` wins over the flags.
fn init_logging(cli: &Cli) {
  let level = if cli.verbose {
    "debug"
  } else if cli.quiet {
    "error"
  } else {
    "warn"
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .init();
}

fn handle_error(err: ImpactError) -> ! {
  ci::debug(&format!("{:?}", err));
  if ci::is_github_actions() {
    ci::error(&err.to_string());
  }
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
