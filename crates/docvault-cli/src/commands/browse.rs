//! Read-only browsing commands.

use clap::Args;

use docvault_core::error::AppError;
use docvault_core::types::NodeId;
use docvault_service::{Services, resolve_breadcrumbs};

use crate::output::{self, OutputFormat};

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder ID (omit for the top level)
    pub folder: Option<NodeId>,
}

/// Arguments for `path`
#[derive(Debug, Args)]
pub struct PathArgs {
    /// Folder ID
    pub folder: NodeId,
}

/// List a folder's children, folders first.
pub async fn ls(args: &LsArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let children = services.store.list_children(args.folder).await?;

    if format == OutputFormat::Table {
        if let Some(folder) = args.folder {
            let folders = services.store.folder_index().await?;
            let trail: Vec<String> = resolve_breadcrumbs(folder, &folders)
                .into_iter()
                .map(|b| b.name)
                .collect();
            println!("/{}", trail.join("/"));
        } else {
            println!("/");
        }
    }
    output::print_nodes(&children, format);
    Ok(())
}

/// Print the whole folder hierarchy.
pub async fn tree(services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let folders = services.store.folder_index().await?;
    output::print_tree(&folders.tree(), format);
    Ok(())
}

/// Print the breadcrumb trail of a folder.
pub async fn path(args: &PathArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let folders = services.store.folder_index().await?;
    let trail = resolve_breadcrumbs(args.folder, &folders);
    if trail.is_empty() {
        return Err(AppError::not_found(format!("Folder {} not found", args.folder)));
    }

    match format {
        OutputFormat::Table => {
            let names: Vec<&str> = trail.iter().map(|b| b.name.as_str()).collect();
            println!("/{}", names.join("/"));
            for crumb in &trail {
                output::print_kv(&crumb.name, &crumb.id.to_string());
            }
        }
        OutputFormat::Json => output::print_item(&trail, format),
    }
    Ok(())
}
