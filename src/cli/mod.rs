//! Command-line interface.
//!
//! clap definitions for the `padel-scheduler` binary. Each subcommand lives in
//! [`commands`] and renders its result through [`output::CommandOutput`], so
//! every command supports `--json`.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Parser, Debug)]
#[command(name = "padel-scheduler")]
#[command(about = "Class scheduling engine for padel clubs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file to load instead of ./padel.yaml
    #[arg(short, long, global = true, env = "PADEL_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the config file and database, applying migrations
    Init(commands::init::InitArgs),

    /// Run the scheduling HTTP API
    Serve(commands::serve::ServeArgs),

    /// Preview the dates a recurrence pattern expands to
    Expand(commands::expand::ExpandArgs),

    /// Load club settings, courts and instructors from a YAML fixture
    Seed(commands::seed::SeedArgs),
}

/// Resolve configuration from `--config` or the default hierarchy.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Print an error in the selected output mode and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_expand_with_global_json() {
        let cli = Cli::try_parse_from([
            "padel-scheduler",
            "expand",
            "--start",
            "2025-01-31",
            "--frequency",
            "monthly",
            "--occurrences",
            "4",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Expand(args) => {
                assert_eq!(args.start, "2025-01-31");
                assert_eq!(args.occurrences, Some(4));
            }
            other => panic!("Expected expand, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_seed_requires_file() {
        assert!(Cli::try_parse_from(["padel-scheduler", "seed"]).is_err());
    }
}
