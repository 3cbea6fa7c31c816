use crate::domains::core::repository::{like_pattern, DeleteById, FindById};
use crate::domains::project::types::{NewProject, Project, ProjectRow, ProjectStatus, UpdateProject};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::types::{ListFilter, PaginatedResult, PaginationParams};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, query_scalar, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// Trait defining project repository operations
#[async_trait]
pub trait ProjectRepository: FindById<Project> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Project>>;

    async fn create(&self, new_project: &NewProject) -> DomainResult<Project>;

    async fn update(&self, id: Uuid, update_data: &UpdateProject) -> DomainResult<Project>;
}

/// SQLite implementation for ProjectRepository
#[derive(Clone)]
pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: ProjectRow) -> DomainResult<Project> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<Project> for SqliteProjectRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Project> {
        let row = query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Project".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteProjectRepository {
    fn entity_name(&self) -> &'static str {
        "projects"
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let result = query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("Project".to_string(), id))
        } else {
            Ok(())
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        match self.delete_with_tx(id, &mut tx).await {
            Ok(()) => {
                tx.commit().await.map_err(DbError::from)?;
                Ok(())
            }
            Err(e) => {
                let _ = tx.rollback().await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Project>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 = query_scalar("SELECT COUNT(*) FROM projects WHERE name LIKE ?")
                    .bind(&pattern)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, ProjectRow>(
                    "SELECT * FROM projects WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
                )
                .bind(&pattern)
                .bind(params.per_page as i64)
                .bind(params.offset() as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(DbError::from)?;
                (total, rows)
            }
            None => {
                let total: i64 = query_scalar("SELECT COUNT(*) FROM projects")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, ProjectRow>(
                    "SELECT * FROM projects ORDER BY name ASC LIMIT ? OFFSET ?",
                )
                .bind(params.per_page as i64)
                .bind(params.offset() as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(DbError::from)?;
                (total, rows)
            }
        };

        let entities = rows
            .into_iter()
            .map(Self::map_row_to_entity)
            .collect::<DomainResult<Vec<Project>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn create(&self, new_project: &NewProject) -> DomainResult<Project> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        let status = new_project.status.unwrap_or(ProjectStatus::Planned);

        query(
            "INSERT INTO projects (id, name, acronym, description, status, start_date, end_date, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new_project.name)
        .bind(&new_project.acronym)
        .bind(&new_project.description)
        .bind(status.as_str())
        .bind(new_project.start_date.map(|d| d.to_string()))
        .bind(new_project.end_date.map(|d| d.to_string()))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateProject) -> DomainResult<Project> {
        let existing = self.find_by_id(id).await?;

        let name = update_data.name.clone().unwrap_or(existing.name);
        let acronym = match &update_data.acronym {
            Some(value) => value.clone(),
            None => existing.acronym,
        };
        let description = match &update_data.description {
            Some(value) => value.clone(),
            None => existing.description,
        };
        let status = update_data.status.unwrap_or(existing.status);
        let start_date = match update_data.start_date {
            Some(value) => value,
            None => existing.start_date,
        };
        let end_date = match update_data.end_date {
            Some(value) => value,
            None => existing.end_date,
        };

        query(
            "UPDATE projects SET name = ?, acronym = ?, description = ?, status = ?, start_date = ?, end_date = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&name)
        .bind(&acronym)
        .bind(&description)
        .bind(status.as_str())
        .bind(start_date.map(|d| d.to_string()))
        .bind(end_date.map(|d| d.to_string()))
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}
