use sqlx::MySqlPool;
use tracing::info;

use crate::error::StorageError;

pub async fn init_db(database_url: &str) -> Result<MySqlPool, StorageError> {
    let pool = MySqlPool::connect(database_url).await?;
    Ok(pool)
}

/// Applies the schema under `migrations/`.
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
