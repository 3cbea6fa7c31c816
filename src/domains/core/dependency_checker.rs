use crate::errors::{DbError, DomainError, DomainResult};
use async_trait::async_trait;
use sqlx::{query_scalar, Pool, Sqlite};
use std::collections::HashMap;
use uuid::Uuid;

/// Dependency information
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Name of the table with dependent records
    pub table_name: String,

    /// Count of dependent records
    pub count: i64,

    /// Name of the foreign key column
    pub foreign_key_column: String,
}

/// Trait for dependency checking
#[async_trait]
pub trait DependencyChecker: Send + Sync {
    /// Check for dependencies for an entity
    async fn check_dependencies(&self, table_name: &str, id: Uuid) -> DomainResult<Vec<Dependency>>;

    /// Get a simplified list of dependency tables
    async fn get_dependency_tables(&self, table_name: &str, id: Uuid) -> DomainResult<Vec<String>> {
        let dependencies = self.check_dependencies(table_name, id).await?;
        Ok(dependencies.into_iter().map(|dep| dep.table_name).collect())
    }
}

/// SQLite implementation of the DependencyChecker
///
/// Join tables the owning service cascades itself (cluster_members,
/// cluster_users) are deliberately absent from the map: they never block
/// a delete.
pub struct SqliteDependencyChecker {
    pool: Pool<Sqlite>,
    /// Maps table name to its blocking dependencies
    dependency_map: HashMap<String, Vec<(String, String)>>,
}

impl SqliteDependencyChecker {
    /// Create a new SQLite dependency checker
    pub fn new(pool: Pool<Sqlite>) -> Self {
        let mut dependency_map: HashMap<String, Vec<(String, String)>> = HashMap::new();

        dependency_map.insert(
            "countries".to_string(),
            vec![
                ("districts".to_string(), "country_id".to_string()),
                ("clusters".to_string(), "country_id".to_string()),
                ("organizations".to_string(), "country_id".to_string()),
            ],
        );

        dependency_map.insert(
            "districts".to_string(),
            vec![
                ("counties".to_string(), "district_id".to_string()),
                ("sub_counties".to_string(), "district_id".to_string()),
                ("organizations".to_string(), "district_id".to_string()),
            ],
        );

        dependency_map.insert(
            "counties".to_string(),
            vec![("sub_counties".to_string(), "county_id".to_string())],
        );

        dependency_map.insert(
            "sub_counties".to_string(),
            vec![
                ("parishes".to_string(), "sub_county_id".to_string()),
                ("municipalities".to_string(), "sub_county_id".to_string()),
                ("cities".to_string(), "sub_county_id".to_string()),
                ("organizations".to_string(), "sub_county_id".to_string()),
            ],
        );

        dependency_map.insert(
            "parishes".to_string(),
            vec![
                ("villages".to_string(), "parish_id".to_string()),
                ("organizations".to_string(), "parish_id".to_string()),
            ],
        );

        dependency_map.insert(
            "villages".to_string(),
            vec![("organizations".to_string(), "village_id".to_string())],
        );

        dependency_map.insert(
            "clusters".to_string(),
            vec![
                ("organizations".to_string(), "cluster_id".to_string()),
                ("participants".to_string(), "cluster_id".to_string()),
            ],
        );

        dependency_map.insert(
            "organizations".to_string(),
            vec![("participants".to_string(), "organization_id".to_string())],
        );

        dependency_map.insert(
            "projects".to_string(),
            vec![
                ("organizations".to_string(), "project_id".to_string()),
                ("participants".to_string(), "project_id".to_string()),
            ],
        );

        Self { pool, dependency_map }
    }
}

#[async_trait]
impl DependencyChecker for SqliteDependencyChecker {
    async fn check_dependencies(&self, table_name: &str, id: Uuid) -> DomainResult<Vec<Dependency>> {
        let mut dependencies = Vec::new();
        let id_str = id.to_string();

        if let Some(dependent_tables) = self.dependency_map.get(table_name) {
            for (dependent_table, foreign_key) in dependent_tables {
                let query = format!(
                    "SELECT COUNT(*) FROM {} WHERE {} = ?",
                    dependent_table, foreign_key
                );

                let count: i64 = query_scalar(&query)
                    .bind(&id_str)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| DomainError::Database(DbError::from(e)))?;

                if count > 0 {
                    dependencies.push(Dependency {
                        table_name: dependent_table.clone(),
                        count,
                        foreign_key_column: foreign_key.clone(),
                    });
                }
            }
        }

        Ok(dependencies)
    }
}
