use crate::auth::AuthContext;
use crate::domains::core::dependency_checker::DependencyChecker;
use crate::domains::core::repository::{DeleteById, FindById};
use crate::domains::project::repository::ProjectRepository;
use crate::domains::project::types::{NewProject, ProjectResponse, UpdateProject};
use crate::errors::{DomainError, ServiceResult};
use crate::types::{ListFilter, PaginatedResult, PaginationParams, Permission};
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Trait defining project service operations
#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn create_project(&self, new: NewProject, auth: &AuthContext) -> ServiceResult<ProjectResponse>;

    async fn get_project_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ProjectResponse>;

    async fn list_projects(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<ProjectResponse>>;

    async fn update_project(&self, id: Uuid, update: UpdateProject, auth: &AuthContext) -> ServiceResult<ProjectResponse>;

    async fn delete_project(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

/// Implementation of the project service
#[derive(Clone)]
pub struct ProjectServiceImpl {
    repo: Arc<dyn ProjectRepository>,
    dependency_checker: Arc<dyn DependencyChecker>,
}

impl ProjectServiceImpl {
    pub fn new(
        repo: Arc<dyn ProjectRepository>,
        dependency_checker: Arc<dyn DependencyChecker>,
    ) -> Self {
        Self { repo, dependency_checker }
    }
}

#[async_trait]
impl ProjectService for ProjectServiceImpl {
    async fn create_project(&self, new: NewProject, auth: &AuthContext) -> ServiceResult<ProjectResponse> {
        auth.authorize(Permission::CreateProjects)?;
        new.validate()?;

        let project = self.repo.create(&new).await?;
        Ok(ProjectResponse::from(project))
    }

    async fn get_project_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ProjectResponse> {
        auth.authorize(Permission::ViewProjects)?;
        let project = self.repo.find_by_id(id).await?;
        Ok(ProjectResponse::from(project))
    }

    async fn list_projects(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<ProjectResponse>> {
        auth.authorize(Permission::ViewProjects)?;
        let result = self.repo.find_all(params, &filter).await?;
        Ok(result.map(ProjectResponse::from))
    }

    async fn update_project(&self, id: Uuid, update: UpdateProject, auth: &AuthContext) -> ServiceResult<ProjectResponse> {
        auth.authorize(Permission::EditProjects)?;
        update.validate()?;

        let project = self.repo.update(id, &update).await?;
        Ok(ProjectResponse::from(project))
    }

    async fn delete_project(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteProjects)?;
        let _ = self.repo.find_by_id(id).await?;

        let dependencies = self
            .dependency_checker
            .get_dependency_tables("projects", id)
            .await?;
        if !dependencies.is_empty() {
            return Err(DomainError::DependentRecordsExist {
                entity_type: "Project".to_string(),
                id,
                dependencies,
            }
            .into());
        }

        self.repo.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_migration;
    use crate::domains::core::dependency_checker::SqliteDependencyChecker;
    use crate::domains::project::repository::SqliteProjectRepository;
    use crate::domains::project::types::ProjectStatus;
    use crate::types::UserRole;
    use chrono::NaiveDate;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::str::FromStr;

    async fn setup_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        db_migration::run_migrations(&pool).await.unwrap();
        pool
    }

    fn build_service(pool: &SqlitePool) -> ProjectServiceImpl {
        ProjectServiceImpl::new(
            Arc::new(SqliteProjectRepository::new(pool.clone())),
            Arc::new(SqliteDependencyChecker::new(pool.clone())),
        )
    }

    fn admin() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), UserRole::Admin)
    }

    #[tokio::test]
    async fn test_project_crud_round_trip() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let created = service
            .create_project(
                NewProject {
                    name: "Water Access".into(),
                    acronym: Some("WA".into()),
                    description: None,
                    status: None,
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                    end_date: NaiveDate::from_ymd_opt(2025, 12, 31),
                },
                &auth,
            )
            .await
            .unwrap();
        assert_eq!(created.status, ProjectStatus::Planned);

        let updated = service
            .update_project(
                created.id,
                UpdateProject {
                    status: Some(ProjectStatus::Active),
                    description: Some(Some("Boreholes in 3 districts".into())),
                    ..Default::default()
                },
                &auth,
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::Active);
        assert_eq!(updated.description.as_deref(), Some("Boreholes in 3 districts"));
        // Untouched fields survive the update
        assert_eq!(updated.acronym.as_deref(), Some("WA"));

        service.delete_project(created.id, &auth).await.unwrap();
        assert!(service.get_project_by_id(created.id, &auth).await.is_err());
    }

    #[tokio::test]
    async fn test_update_can_clear_nullable_fields() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let created = service
            .create_project(
                NewProject {
                    name: "Nutrition".into(),
                    acronym: Some("NUT".into()),
                    description: Some("School feeding".into()),
                    status: Some(ProjectStatus::Active),
                    start_date: None,
                    end_date: None,
                },
                &auth,
            )
            .await
            .unwrap();

        let updated = service
            .update_project(
                created.id,
                UpdateProject {
                    acronym: Some(None),
                    ..Default::default()
                },
                &auth,
            )
            .await
            .unwrap();
        assert_eq!(updated.acronym, None);
        assert_eq!(updated.description.as_deref(), Some("School feeding"));
    }
}
