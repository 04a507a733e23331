//! Commands that change the tree.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;

use docvault_core::error::AppError;
use docvault_core::types::NodeId;
use docvault_entity::node::{FlagCategory, Node};
use docvault_service::{MoveOutcome, Services};

use crate::output::{self, OutputFormat};

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Folder name
    pub name: String,
    /// Parent folder ID (omit for the top level)
    #[arg(short, long)]
    pub parent: Option<NodeId>,
}

/// Arguments for `rename`
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Node ID
    pub id: NodeId,
    /// New name
    pub name: String,
}

/// Arguments for `mv`
#[derive(Debug, Args)]
pub struct MvArgs {
    /// Node ID
    pub id: NodeId,
    /// Destination folder ID (omit to move to the top level)
    #[arg(short, long)]
    pub to: Option<NodeId>,
}

/// Arguments for `rm`
#[derive(Debug, Args)]
pub struct RmArgs {
    /// Node IDs
    #[arg(required = true)]
    pub ids: Vec<NodeId>,
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `get`
#[derive(Debug, Args)]
pub struct GetArgs {
    /// File ID
    pub id: NodeId,
    /// Output path (defaults to the file's name in the working directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `flag`
#[derive(Debug, Args)]
pub struct FlagArgs {
    /// File ID
    pub id: NodeId,
    /// Category: safety-plan, risk-assessment or insurance
    pub category: FlagCategory,
}

/// Arguments for `url`
#[derive(Debug, Args)]
pub struct UrlArgs {
    /// File ID
    pub id: NodeId,
    /// Lifetime in seconds (defaults to the configured value)
    #[arg(long)]
    pub ttl: Option<u64>,
}

/// Create a folder.
pub async fn mkdir(args: &MkdirArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let folder = services.nodes.create_folder(args.parent, &args.name).await?;
    match format {
        OutputFormat::Table => output::print_success(&format!(
            "Folder '{}' created (id: {})",
            folder.name, folder.id
        )),
        OutputFormat::Json => output::print_item(&folder, format),
    }
    Ok(())
}

/// Rename a node.
pub async fn rename(args: &RenameArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let node = services.nodes.rename(args.id, &args.name).await?;
    match format {
        OutputFormat::Table => output::print_success(&format!("Renamed to '{}'", node.name)),
        OutputFormat::Json => output::print_item(&node, format),
    }
    Ok(())
}

/// Move a node. A refused move is reported, not treated as a failure.
pub async fn mv(args: &MvArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let outcome = services.nodes.move_node(args.id, args.to).await?;
    match (&outcome, format) {
        (_, OutputFormat::Json) => output::print_item(&outcome, format),
        (MoveOutcome::Moved { node }, _) => {
            output::print_success(&format!("Moved '{}'", node.name));
        }
        (MoveOutcome::Rejected { reason }, _) => {
            output::print_warning(&format!("Move not performed: {reason}"));
        }
    }
    Ok(())
}

/// Delete nodes after confirmation.
pub async fn rm(args: &RmArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    if !args.yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete {} item(s)? Folders are removed with everything inside them.",
                args.ids.len()
            ))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let report = services.nodes.delete(&args.ids).await?;
    match format {
        OutputFormat::Table => {
            output::print_success(&format!("{} record(s) deleted", report.deleted));
            for id in &report.missing {
                output::print_warning(&format!("{id} not found"));
            }
            for warning in &report.warnings {
                output::print_warning(&format!(
                    "Blob {} could not be removed: {}",
                    warning.storage_key, warning.reason
                ));
            }
        }
        OutputFormat::Json => output::print_item(&report, format),
    }
    Ok(())
}

/// Download a file to disk.
pub async fn get(args: &GetArgs, services: &Services) -> Result<(), AppError> {
    let (node, data) = services.nodes.download(args.id).await?;
    let target = args
        .output
        .clone()
        .unwrap_or_else(|| default_download_path(&node));

    tokio::fs::write(&target, &data).await?;
    output::print_success(&format!(
        "Saved '{}' ({}) to {}",
        node.name,
        output::human_size(data.len() as i64),
        target.display()
    ));
    Ok(())
}

/// Final component of the node's name, so a stored name can never point
/// outside the working directory. Falls back to the id.
fn default_download_path(node: &Node) -> PathBuf {
    Path::new(&node.name)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(node.id.to_string()))
}

/// Assign a designated-document flag.
pub async fn flag(args: &FlagArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let node = services.nodes.assign_flag(args.id, args.category).await?;
    match format {
        OutputFormat::Table => output::print_success(&format!(
            "'{}' is now the current {}",
            node.name, args.category
        )),
        OutputFormat::Json => output::print_item(&node, format),
    }
    Ok(())
}

/// Print a temporary read URL.
pub async fn url(args: &UrlArgs, services: &Services) -> Result<(), AppError> {
    let ttl = args.ttl.map(Duration::from_secs);
    let url = services.nodes.temporary_url(args.id, ttl).await?;
    println!("{url}");
    Ok(())
}
