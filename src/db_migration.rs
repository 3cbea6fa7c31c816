use crate::errors::{DbError, DbResult};
use crate::globals;
use chrono::Utc;
use sqlx::SqlitePool;

// Embed all migration SQL files at compile time
const MIGRATION_HIERARCHY: &str = include_str!("../migrations/20250601000000_hierarchy.sql");
const MIGRATION_ORGANIZATIONAL: &str = include_str!("../migrations/20250601000001_organizational.sql");
const MIGRATION_INDEXES: &str = include_str!("../migrations/20250601000002_indexes.sql");

// List of migrations with their names and SQL content
const MIGRATIONS: &[(&str, &str)] = &[
    ("20250601000000_hierarchy.sql", MIGRATION_HIERARCHY),
    ("20250601000001_organizational.sql", MIGRATION_ORGANIZATIONAL),
    ("20250601000002_indexes.sql", MIGRATION_INDEXES),
];

/// Initialize the globally registered database with migrations
pub async fn initialize_database() -> DbResult<()> {
    let pool = globals::get_db_pool()
        .map_err(|e| DbError::ConnectionPool(e.to_string()))?;
    run_migrations(&pool).await
}

/// Apply all pending migrations to the given pool
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    log::info!("Running database migrations");

    create_migrations_table(pool).await?;
    let last_migration = get_last_migration(pool).await?;
    apply_pending_migrations(pool, last_migration).await?;

    log::info!("Database migrations complete");
    Ok(())
}

/// Create migrations table if it doesn't exist
async fn create_migrations_table(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )"
    )
    .execute(pool)
    .await
    .map_err(|e| DbError::Migration(format!("Failed to create migrations table: {}", e)))?;

    Ok(())
}

/// Get the last applied migration
async fn get_last_migration(pool: &SqlitePool) -> DbResult<Option<String>> {
    let name: Option<String> = sqlx::query_scalar(
        "SELECT name FROM migrations ORDER BY name DESC LIMIT 1"
    )
    .fetch_optional(pool)
    .await
    .map_err(|e| DbError::Migration(format!("Failed to read migrations table: {}", e)))?;

    Ok(name)
}

/// Apply all migrations that sort after the last applied one
async fn apply_pending_migrations(
    pool: &SqlitePool,
    last_migration: Option<String>,
) -> DbResult<()> {
    for (name, sql) in MIGRATIONS {
        if let Some(last) = &last_migration {
            if *name <= last.as_str() {
                continue;
            }
        }

        log::info!("Applying migration {}", name);
        apply_migration(pool, name, sql).await?;
    }

    Ok(())
}

/// Apply a single migration and record it
async fn apply_migration(pool: &SqlitePool, name: &str, sql: &str) -> DbResult<()> {
    let mut tx = pool.begin().await.map_err(DbError::Sqlx)?;

    // SQLite executes one statement at a time; split on the terminator
    for statement in sql.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::Migration(format!("Migration {} failed: {}", name, e)))?;
    }

    sqlx::query("INSERT INTO migrations (name, applied_at) VALUES (?, ?)")
        .bind(name)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::Migration(format!("Failed to record migration {}: {}", name, e)))?;

    tx.commit().await.map_err(DbError::Sqlx)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    #[tokio::test]
    async fn test_migrations_apply_to_fresh_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("core.sqlite");
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();
        // Re-running is a no-op
        run_migrations(&pool).await.unwrap();

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied as usize, MIGRATIONS.len());

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
             ('countries', 'districts', 'clusters', 'organizations', 'participants')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 5);
    }
}
