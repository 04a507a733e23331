//! Storage housekeeping commands.

use clap::Args;

use docvault_core::error::AppError;
use docvault_service::Services;

use crate::output::{self, OutputFormat};

/// Arguments for `sweep`
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Report orphaned blobs without removing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Remove blobs that no record references.
pub async fn sweep(args: &SweepArgs, services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let report = services.sweeper.run(args.dry_run).await?;

    match format {
        OutputFormat::Table => {
            output::print_kv("Blobs scanned", &report.scanned.to_string());
            output::print_kv("Referenced", &report.referenced.to_string());
            output::print_kv("Too recent to judge", &report.skipped_recent.to_string());
            output::print_kv("Orphaned", &report.orphans.len().to_string());
            for key in &report.orphans {
                println!("    {key}");
            }
            if report.dry_run {
                output::print_warning("Dry run: nothing was removed.");
            } else {
                output::print_success(&format!("{} blob(s) removed", report.removed.len()));
                for failure in &report.failed {
                    output::print_warning(&format!("{}: {}", failure.key, failure.reason));
                }
            }
        }
        OutputFormat::Json => output::print_item(&report, format),
    }
    Ok(())
}
