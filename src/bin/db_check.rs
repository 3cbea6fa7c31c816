//! Small operational check: open (or create) the configured database,
//! apply migrations and print row counts per table.

use dashboard_rust_core::{get_db_pool, initialize_from_env};

const TABLES: &[&str] = &[
    "countries",
    "districts",
    "counties",
    "sub_counties",
    "parishes",
    "villages",
    "municipalities",
    "cities",
    "clusters",
    "cluster_members",
    "cluster_users",
    "organizations",
    "projects",
    "participants",
];

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = initialize_from_env().await {
        eprintln!("Initialization failed: {}", e);
        std::process::exit(1);
    }

    let pool = match get_db_pool() {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("No database pool: {}", e);
            std::process::exit(1);
        }
    };

    for table in TABLES {
        let count: Result<i64, _> = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&pool)
            .await;
        match count {
            Ok(count) => println!("{:<16} {}", table, count),
            Err(e) => println!("{:<16} error: {}", table, e),
        }
    }
}
