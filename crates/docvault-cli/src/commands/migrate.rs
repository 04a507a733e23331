//! Database migration command.

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_database::DatabasePool;

use crate::output;

/// Apply all pending migrations.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;

    println!("Running database migrations...");
    let result = pool.migrate().await;
    pool.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
