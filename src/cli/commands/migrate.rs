use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = database::connect(&config::config().database).await?;
    database::migrate(&pool).await?;
    pool.close().await;

    output_success(&output_format, "Migrations applied", None)
}
