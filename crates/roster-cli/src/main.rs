//! Roster administrative CLI.
//!
//! Course enrollment and grade management from the terminal.
//!
//! # Quick Start
//!
//! ```bash
//! # Interactive console, preloaded with sample data
//! roster console
//!
//! # Run a script of operations against an empty registry
//! roster run term.roster --no-seed
//!
//! # Inspect the merged configuration
//! roster config show --format toml
//! ```

mod commands;
mod style;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use roster_config::{ConfigLoader, RosterConfig};
use tracing_subscriber::EnvFilter;

/// Roster - course enrollment and grade management.
#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Interactive administration console.
    Console {
        /// Start with an empty registry instead of the sample data.
        #[arg(long)]
        no_seed: bool,

        /// Project directory holding roster.toml.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Execute operations from a script, one per line.
    Run {
        /// Path to the script file.
        script: PathBuf,

        /// Start with an empty registry instead of the sample data.
        #[arg(long)]
        no_seed: bool,

        /// Print one JSON object per operation.
        #[arg(long)]
        json: bool,

        /// Project directory holding roster.toml.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the merged configuration.
    Show {
        /// Project directory holding roster.toml.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Toml,
}

impl Commands {
    fn project_dir(&self) -> Option<&Path> {
        match self {
            Commands::Version => None,
            Commands::Console { project, .. }
            | Commands::Run { project, .. }
            | Commands::Config(ConfigCommands::Show { project, .. }) => Some(project.as_path()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command.project_dir() {
        Some(dir) => ConfigLoader::new()
            .with_project_dir(dir)
            .load()
            .with_context(|| format!("Failed to load configuration from {}", dir.display()))?,
        None => RosterConfig::default(),
    };

    init_logging(&config);

    style::set_no_color(
        cli.no_color || !config.console.color || std::env::var_os("NO_COLOR").is_some(),
    );

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Console { no_seed, .. } => commands::console::run(&config, no_seed),
        Commands::Run {
            script,
            no_seed,
            json,
            ..
        } => commands::run::run(&config, &script, no_seed, json),
        Commands::Config(ConfigCommands::Show { project, format }) => {
            commands::config::show(&config, &project, format)
        }
    }
}

/// Logs go to stderr so operation output on stdout stays clean.
/// `RUST_LOG` takes precedence over `[logging] level`.
fn init_logging(config: &RosterConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
