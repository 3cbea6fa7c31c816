// Public modules
pub mod api;
pub mod auth;
pub mod domains;
pub mod errors;
pub mod globals;
pub mod types;
pub mod validation;

// Private modules
mod db_migration;

use errors::{ServiceError, ServiceResult};

const DEFAULT_DB_PATH: &str = "sqlite://dashboard_core.sqlite";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Initialize the library with the given database path.
/// This function must be called before any api action is invoked.
pub async fn initialize(db_path: &str) -> ServiceResult<()> {
    globals::initialize(db_path, DEFAULT_MAX_CONNECTIONS).await?;
    db_migration::initialize_database()
        .await
        .map_err(|e| ServiceError::Configuration(format!("Migration failed: {}", e)))?;
    Ok(())
}

/// Initialize from the environment: reads `DASHBOARD_DATABASE_URL` (via
/// a .env file if present), falling back to a local SQLite file.
pub async fn initialize_from_env() -> ServiceResult<()> {
    dotenv::dotenv().ok();
    let db_path =
        std::env::var("DASHBOARD_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    initialize(&db_path).await
}

/// Get a reference to the SQLite connection pool.
/// This is primarily for internal use.
pub fn get_db_pool() -> ServiceResult<sqlx::SqlitePool> {
    globals::get_db_pool()
}
