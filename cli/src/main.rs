//! # sheetnav CLI
//!
//! Command-line interface for sheetnav - the navigation model of a game
//! cheat-sheet site.
//!
//! ## Usage
//!
//! - `sheetnav` - Start the interactive navigation shell
//! - `sheetnav resolve /sheets/abc123` - Resolve paths against the route table
//! - `sheetnav href sheet -p sheetid=abc123` - Build the path of a named route
//! - `sheetnav routes` - List the route table in match order
//! - `sheetnav check` - Validate the site configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;
mod pages;

use commands::{check_command, href_command, interactive_command, resolve_command, routes_command};
use config::CliConfigLoader;

/// sheetnav - route table and navigation for a cheat-sheet site
#[derive(Parser)]
#[command(name = "sheetnav")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve, reverse and browse the routes of a cheat-sheet site")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable analytics with this measurement id (e.g. G-XXXXXXX)
    #[arg(long, global = true)]
    analytics_id: Option<String>,

    /// Match literal path segments case-sensitively
    #[arg(long, global = true)]
    case_sensitive: bool,

    /// Print machine-readable JSON where supported
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to open first in interactive mode
    #[arg(long)]
    start: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more paths without navigating
    Resolve {
        /// Paths to resolve, optionally with query and fragment
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Build the path of a named route
    Href {
        /// Route name
        name: String,

        /// Path parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// List the route table in match order
    Routes,

    /// Validate the site configuration
    Check,
}

/// Errors from `key=value` arguments
#[derive(Debug, thiserror::Error)]
enum ParamError {
    #[error("expected key=value, got '{0}'")]
    MissingEquals(String),

    #[error("parameter name cannot be empty in '{0}'")]
    EmptyKey(String),
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), ParamError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ParamError::MissingEquals(raw.to_string()))?;
    if key.trim().is_empty() {
        return Err(ParamError::EmptyKey(raw.to_string()));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(analytics_id) = &cli.analytics_id {
        loader = loader.with_analytics_id_override(analytics_id.clone());
    }

    if cli.case_sensitive {
        loader = loader.with_case_sensitive_override(true);
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    sheetnav_core::init_tracing_with_debug(cli.verbose);

    // Build configuration loader
    let config_loader = build_config_loader(&cli);

    match cli.command {
        Some(Commands::Resolve { paths }) => resolve_command(config_loader, paths, cli.json).await,
        Some(Commands::Href { name, params }) => href_command(config_loader, name, params).await,
        Some(Commands::Routes) => routes_command(config_loader, cli.json).await,
        Some(Commands::Check) => check_command(config_loader).await,
        // Default to interactive mode
        None => interactive_command(config_loader, cli.start).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("sheetid=pets").unwrap(),
            ("sheetid".to_string(), "pets".to_string())
        );
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(matches!(parse_param("pets"), Err(ParamError::MissingEquals(_))));
        assert!(matches!(parse_param("=pets"), Err(ParamError::EmptyKey(_))));
    }
}
