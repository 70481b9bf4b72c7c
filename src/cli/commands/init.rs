use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::schema::init_schema;
use crate::database::DatabaseManager;

/// Create every table and index the server expects. Safe to run repeatedly.
pub async fn handle(database_url: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let url = database_url.unwrap_or_else(DatabaseManager::database_url);
    let pool = DatabaseManager::connect(&url).await?;
    init_schema(&pool).await?;
    pool.close().await;

    output_success(
        &output_format,
        "Database schema is up to date",
        Some(json!({ "database_url": url })),
    )
}
