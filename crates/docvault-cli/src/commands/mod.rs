//! CLI command definitions and dispatch.

pub mod browse;
pub mod config;
pub mod maintenance;
pub mod migrate;
pub mod node;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_database::DatabasePool;
use docvault_service::Services;
use docvault_storage::build_provider;

use crate::output::OutputFormat;

/// DocVault: hierarchical document storage
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Log at debug level regardless of configuration
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List a folder (top level when omitted)
    Ls(browse::LsArgs),
    /// Show the folder hierarchy
    Tree,
    /// Show the breadcrumb path of a folder
    Path(browse::PathArgs),
    /// Create a folder
    Mkdir(node::MkdirArgs),
    /// Rename a folder or file
    Rename(node::RenameArgs),
    /// Move a folder or file
    Mv(node::MvArgs),
    /// Delete folders (with their contents) and files
    Rm(node::RmArgs),
    /// Download a file
    Get(node::GetArgs),
    /// Mark a file as the current document of a category
    Flag(node::FlagArgs),
    /// Print a temporary read URL for a file
    Url(node::UrlArgs),
    /// Upload local files
    Upload(upload::UploadArgs),
    /// Remove blobs that no record references
    Sweep(maintenance::SweepArgs),
    /// Apply database migrations
    Migrate,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        debug!(command = ?self.command, "Executing command");
        match &self.command {
            Commands::Config(args) => return config::execute(args, config, self.format),
            Commands::Migrate => return migrate::execute(config).await,
            _ => {}
        }

        let (pool, services) = connect(config).await?;
        let result = self.run(&services).await;
        pool.close().await;
        result
    }

    async fn run(&self, services: &Services) -> Result<(), AppError> {
        let format = self.format;
        match &self.command {
            Commands::Ls(args) => browse::ls(args, services, format).await,
            Commands::Tree => browse::tree(services, format).await,
            Commands::Path(args) => browse::path(args, services, format).await,
            Commands::Mkdir(args) => node::mkdir(args, services, format).await,
            Commands::Rename(args) => node::rename(args, services, format).await,
            Commands::Mv(args) => node::mv(args, services, format).await,
            Commands::Rm(args) => node::rm(args, services, format).await,
            Commands::Get(args) => node::get(args, services).await,
            Commands::Flag(args) => node::flag(args, services, format).await,
            Commands::Url(args) => node::url(args, services).await,
            Commands::Upload(args) => upload::execute(args, services, format).await,
            Commands::Sweep(args) => maintenance::sweep(args, services, format).await,
            Commands::Config(_) | Commands::Migrate => Ok(()),
        }
    }
}

/// Connect to the metadata store and object store and wire the services.
pub async fn connect(config: &AppConfig) -> Result<(DatabasePool, Services), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    let storage = build_provider(&config.storage).await?;
    let services = Services::new(Arc::new(pool.node_repository()), storage, config);
    Ok((pool, services))
}
