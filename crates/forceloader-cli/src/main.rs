//! forceloader CLI tool.
//!
//! Usage:
//! ```bash
//! forceloader check [OPTIONS] [PATH]
//! forceloader init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use forceloader_core::{PolicyKind, SuppressionMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Keeps GraphQL resolvers from calling the use case layer directly
#[derive(Parser)]
#[command(name = "forceloader")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FORCELOADER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check resolver methods for direct use case calls
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Classification policy (overrides the config file)
        #[arg(long, value_parser = parse_policy)]
        policy: Option<PolicyKind>,

        /// Placement rule for `nolint` comments (overrides the config file)
        #[arg(long, value_parser = parse_suppression)]
        suppression: Option<SuppressionMode>,

        /// Analyzer option as key=value, e.g. -o restrictedPackages=app/usecase
        #[arg(short = 'o', long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Fail instead of skipping files that cannot be parsed
        #[arg(long)]
        strict: bool,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Source snippets rendered by miette.
    Pretty,
}

fn parse_policy(s: &str) -> Result<PolicyKind, String> {
    s.parse().map_err(|e: forceloader_core::ConfigError| e.to_string())
}

fn parse_suppression(s: &str) -> Result<SuppressionMode, String> {
    s.parse().map_err(|e: forceloader_core::ConfigError| e.to_string())
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            policy,
            suppression,
            options,
            exclude,
            strict,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let args = commands::check::CheckArgs {
                path,
                format,
                policy,
                suppression,
                options,
                exclude,
                strict,
            };
            let failed = commands::check::run(&args, &source)?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
