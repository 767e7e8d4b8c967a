//! CLI command definitions and dispatch.

pub mod config;
pub mod library;
pub mod render;
pub mod serve;
pub mod sweep;

use clap::{Parser, Subcommand};

use animhub_core::config::AppConfig;
use animhub_core::error::AppError;

use crate::output::OutputFormat;

/// AnimHub: animate SVG logos with an external renderer
#[derive(Debug, Parser)]
#[command(name = "animhub", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "ANIMHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the AnimHub server
    Serve(serve::ServeArgs),
    /// Run one retention sweep now
    Sweep(sweep::SweepArgs),
    /// Render a local SVG without going through HTTP
    Render(render::RenderArgs),
    /// List the item and block library
    Library(library::LibraryArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Log level used when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        match self.command {
            Commands::Serve(_) => "info",
            _ => "warn",
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(&self.config, &self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Sweep(args) => sweep::execute(args, config, self.format).await,
            Commands::Render(args) => render::execute(args, config, self.format).await,
            Commands::Library(args) => library::execute(args, config, self.format).await,
            Commands::Config(args) => config::execute(args, config, &self.config, &self.env),
        }
    }
}

/// Helper: load configuration from file, overlay, and environment
pub fn load_config(config_path: &str, env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_from(config_path, env)
}
