//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked)
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = mask_password(&shown.database.url);
            shown.storage.signing.secret = "****".to_string();

            match format {
                OutputFormat::Table => {
                    output::print_kv("Database", &shown.database.url);
                    output::print_kv(
                        "Cache",
                        &if shown.cache.enabled {
                            format!(
                                "memory ({} entries, {}s TTL)",
                                shown.cache.max_capacity, shown.cache.time_to_live_seconds
                            )
                        } else {
                            "disabled".to_string()
                        },
                    );
                    output::print_kv("Storage", &shown.storage.provider);
                    output::print_kv("Blob root", &shown.storage.local.root_path);
                    output::print_kv("URL base", &shown.storage.signing.base_url);
                    output::print_kv(
                        "Upload limits",
                        &format!(
                            "{} files, {} per file",
                            shown.upload.max_batch_files,
                            output::human_size(shown.upload.max_file_size_bytes as i64)
                        ),
                    );
                    output::print_kv(
                        "Logging",
                        &format!("{} ({})", shown.logging.level, shown.logging.format),
                    );
                }
                OutputFormat::Json => output::print_item(&shown, format),
            }
        }
    }

    Ok(())
}

/// Mask password in database URL for display
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
        if let Some(colon_pos) = url[scheme_end..at_pos].find(':') {
            let colon_pos = scheme_end + colon_pos;
            return format!("{}:****{}", &url[..colon_pos], &url[at_pos..]);
        }
    }
    url.to_string()
}
