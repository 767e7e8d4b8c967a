//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use animhub_core::config::AppConfig;
use animhub_core::error::AppError;

use crate::output;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON (default)
    Show,
    /// Summarize the effective configuration
    Validate,
}

/// Execute config commands
///
/// Loading already validated the configuration; an invalid one never gets
/// this far.
pub fn execute(
    args: &ConfigArgs,
    config: AppConfig,
    config_path: &str,
    env: &str,
) -> Result<(), AppError> {
    match args.command.as_ref().unwrap_or(&ConfigCommand::Show) {
        ConfigCommand::Show => output::print_json(&config),
        ConfigCommand::Validate => {
            output::print_success(&format!(
                "Configuration '{}' (env: {}) is valid",
                config_path, env
            ));
            output::print_kv("Server", &config.server.bind_address());
            output::print_kv("Storage root", &config.storage.root.display().to_string());
            output::print_kv(
                "Renderer",
                &format!(
                    "{} (timeout {}s, max {} concurrent)",
                    config.render.command,
                    config.render.timeout_seconds,
                    config.render.max_concurrent
                ),
            );
            output::print_kv(
                "Retention",
                &if config.retention.enabled {
                    format!(
                        "every {}s, max age {}s",
                        config.retention.interval_seconds, config.retention.max_age_seconds
                    )
                } else {
                    "disabled".to_string()
                },
            );
        }
    }
    Ok(())
}
