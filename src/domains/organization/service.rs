use crate::auth::AuthContext;
use crate::domains::cluster::repository::ClusterRepository;
use crate::domains::core::dependency_checker::DependencyChecker;
use crate::domains::core::repository::{DeleteById, FindById};
use crate::domains::organization::repository::OrganizationRepository;
use crate::domains::organization::types::{
    NewOrganization, Organization, OrganizationResponse, UpdateOrganization,
};
use crate::domains::project::repository::ProjectRepository;
use crate::errors::{DomainError, ServiceResult};
use crate::types::{ListFilter, PaginatedResult, PaginationParams, Permission};
use crate::validation::{common, validate_entity_exists, Validate};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Trait defining organization service operations
#[async_trait]
pub trait OrganizationService: Send + Sync {
    async fn create_organization(&self, new: NewOrganization, auth: &AuthContext) -> ServiceResult<OrganizationResponse>;

    async fn get_organization_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<OrganizationResponse>;

    async fn list_organizations(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<OrganizationResponse>>;

    async fn organizations_by_cluster(&self, cluster_id: Uuid, params: PaginationParams, auth: &AuthContext) -> ServiceResult<PaginatedResult<OrganizationResponse>>;

    async fn update_organization(&self, id: Uuid, update: UpdateOrganization, auth: &AuthContext) -> ServiceResult<OrganizationResponse>;

    async fn delete_organization(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

/// Implementation of the organization service
#[derive(Clone)]
pub struct OrganizationServiceImpl {
    pool: SqlitePool,
    repo: Arc<dyn OrganizationRepository>,
    cluster_repo: Arc<dyn ClusterRepository>,
    project_repo: Arc<dyn ProjectRepository>,
    dependency_checker: Arc<dyn DependencyChecker>,
}

impl OrganizationServiceImpl {
    pub fn new(
        pool: SqlitePool,
        repo: Arc<dyn OrganizationRepository>,
        cluster_repo: Arc<dyn ClusterRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        dependency_checker: Arc<dyn DependencyChecker>,
    ) -> Self {
        Self { pool, repo, cluster_repo, project_repo, dependency_checker }
    }

    /// Existence lookups for every referenced row before an insert or a
    /// reference-changing update.
    async fn validate_references(&self, new: &NewOrganization) -> ServiceResult<()> {
        common::validate_cluster_exists(&self.pool, &new.cluster_id, "cluster_id").await?;
        if let Some(project_id) = new.project_id {
            common::validate_project_exists(&self.pool, &project_id, "project_id").await?;
        }
        common::validate_country_exists(&self.pool, &new.country_id, "country_id").await?;
        validate_entity_exists(&self.pool, "districts", &new.district_id, "district_id").await?;
        validate_entity_exists(&self.pool, "sub_counties", &new.sub_county_id, "sub_county_id").await?;
        if let Some(parish_id) = new.parish_id {
            validate_entity_exists(&self.pool, "parishes", &parish_id, "parish_id").await?;
        }
        if let Some(village_id) = new.village_id {
            validate_entity_exists(&self.pool, "villages", &village_id, "village_id").await?;
        }
        Ok(())
    }

    async fn enrich_response(&self, organization: Organization) -> ServiceResult<OrganizationResponse> {
        let cluster = self.cluster_repo.find_by_id(organization.cluster_id).await?;
        let project = match organization.project_id {
            Some(project_id) => Some(self.project_repo.find_by_id(project_id).await?),
            None => None,
        };

        let mut response = OrganizationResponse::from(organization);
        response.cluster = Some((&cluster).into());
        response.project = project.as_ref().map(|p| p.into());
        Ok(response)
    }
}

#[async_trait]
impl OrganizationService for OrganizationServiceImpl {
    async fn create_organization(&self, new: NewOrganization, auth: &AuthContext) -> ServiceResult<OrganizationResponse> {
        auth.authorize(Permission::CreateOrganizations)?;
        new.validate()?;
        self.validate_references(&new).await?;

        let organization = self.repo.create(&new).await?;
        self.enrich_response(organization).await
    }

    async fn get_organization_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<OrganizationResponse> {
        auth.authorize(Permission::ViewOrganizations)?;
        let organization = self.repo.find_by_id(id).await?;
        self.enrich_response(organization).await
    }

    async fn list_organizations(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<OrganizationResponse>> {
        auth.authorize(Permission::ViewOrganizations)?;
        let result = self.repo.find_all(params, &filter).await?;
        Ok(result.map(OrganizationResponse::from))
    }

    async fn organizations_by_cluster(&self, cluster_id: Uuid, params: PaginationParams, auth: &AuthContext) -> ServiceResult<PaginatedResult<OrganizationResponse>> {
        auth.authorize(Permission::ViewOrganizations)?;
        let _ = self.cluster_repo.find_by_id(cluster_id).await?;
        let result = self.repo.find_by_cluster(cluster_id, params).await?;
        Ok(result.map(OrganizationResponse::from))
    }

    async fn update_organization(&self, id: Uuid, update: UpdateOrganization, auth: &AuthContext) -> ServiceResult<OrganizationResponse> {
        auth.authorize(Permission::EditOrganizations)?;
        update.validate()?;

        if let Some(cluster_id) = update.cluster_id {
            common::validate_cluster_exists(&self.pool, &cluster_id, "cluster_id").await?;
        }
        if let Some(Some(project_id)) = update.project_id {
            common::validate_project_exists(&self.pool, &project_id, "project_id").await?;
        }
        if let Some(country_id) = update.country_id {
            common::validate_country_exists(&self.pool, &country_id, "country_id").await?;
        }
        if let Some(district_id) = update.district_id {
            validate_entity_exists(&self.pool, "districts", &district_id, "district_id").await?;
        }
        if let Some(sub_county_id) = update.sub_county_id {
            validate_entity_exists(&self.pool, "sub_counties", &sub_county_id, "sub_county_id").await?;
        }
        if let Some(Some(parish_id)) = update.parish_id {
            validate_entity_exists(&self.pool, "parishes", &parish_id, "parish_id").await?;
        }
        if let Some(Some(village_id)) = update.village_id {
            validate_entity_exists(&self.pool, "villages", &village_id, "village_id").await?;
        }

        let organization = self.repo.update(id, &update).await?;
        self.enrich_response(organization).await
    }

    async fn delete_organization(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteOrganizations)?;
        let _ = self.repo.find_by_id(id).await?;

        let dependencies = self
            .dependency_checker
            .get_dependency_tables("organizations", id)
            .await?;
        if !dependencies.is_empty() {
            return Err(DomainError::DependentRecordsExist {
                entity_type: "Organization".to_string(),
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
    use crate::domains::cluster::repository::SqliteClusterRepository;
    use crate::domains::cluster::types::NewCluster;
    use crate::domains::core::dependency_checker::SqliteDependencyChecker;
    use crate::domains::organization::repository::SqliteOrganizationRepository;
    use crate::domains::project::repository::SqliteProjectRepository;
    use crate::errors::ServiceError;
    use crate::types::UserRole;
    use chrono::Utc;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
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

    fn build_service(pool: &SqlitePool) -> OrganizationServiceImpl {
        OrganizationServiceImpl::new(
            pool.clone(),
            Arc::new(SqliteOrganizationRepository::new(pool.clone())),
            Arc::new(SqliteClusterRepository::new(pool.clone())),
            Arc::new(SqliteProjectRepository::new(pool.clone())),
            Arc::new(SqliteDependencyChecker::new(pool.clone())),
        )
    }

    fn admin() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), UserRole::Admin)
    }

    async fn seed_location(pool: &SqlitePool) -> (Uuid, Uuid, Uuid) {
        let now = Utc::now().to_rfc3339();
        let country = Uuid::new_v4();
        let district = Uuid::new_v4();
        let county = Uuid::new_v4();
        let sub_county = Uuid::new_v4();

        sqlx::query("INSERT INTO countries (id, name, code, created_at, updated_at) VALUES (?, 'Uganda', 'UG', ?, ?)")
            .bind(country.to_string()).bind(&now).bind(&now)
            .execute(pool).await.unwrap();
        sqlx::query("INSERT INTO districts (id, name, code, country_id, created_at, updated_at) VALUES (?, 'Kampala', 'KLA', ?, ?, ?)")
            .bind(district.to_string()).bind(country.to_string()).bind(&now).bind(&now)
            .execute(pool).await.unwrap();
        sqlx::query("INSERT INTO counties (id, name, code, country_id, district_id, created_at, updated_at) VALUES (?, 'Nakawa', 'KLA-NAK', ?, ?, ?, ?)")
            .bind(county.to_string()).bind(country.to_string()).bind(district.to_string()).bind(&now).bind(&now)
            .execute(pool).await.unwrap();
        sqlx::query("INSERT INTO sub_counties (id, name, code, district_id, county_id, country_id, created_at, updated_at) VALUES (?, 'Ntinda', 'KLA-NAK-NTI', ?, ?, ?, ?, ?)")
            .bind(sub_county.to_string()).bind(district.to_string()).bind(county.to_string()).bind(country.to_string()).bind(&now).bind(&now)
            .execute(pool).await.unwrap();

        (country, district, sub_county)
    }

    async fn seed_cluster(pool: &SqlitePool, country: Uuid) -> Uuid {
        let repo = SqliteClusterRepository::new(pool.clone());
        let cluster = repo
            .create(&NewCluster {
                name: "Central Cluster".into(),
                about: None,
                country_id: Some(country),
                district_ids: vec![],
            })
            .await
            .unwrap();
        cluster.id
    }

    #[tokio::test]
    async fn test_create_organization_enriches_cluster_summary() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (country, district, sub_county) = seed_location(&pool).await;
        let cluster_id = seed_cluster(&pool, country).await;

        let org = service
            .create_organization(
                NewOrganization {
                    name: "Hope Initiative".into(),
                    acronym: Some("HI".into()),
                    cluster_id,
                    project_id: None,
                    country_id: country,
                    district_id: district,
                    sub_county_id: sub_county,
                    parish_id: None,
                    village_id: None,
                    address: Some("Plot 4, Ntinda Road".into()),
                },
                &auth,
            )
            .await
            .unwrap();

        assert_eq!(org.cluster.as_ref().unwrap().name, "Central Cluster");
        assert_eq!(org.project, None);
    }

    #[tokio::test]
    async fn test_create_organization_requires_existing_cluster() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (country, district, sub_county) = seed_location(&pool).await;

        let result = service
            .create_organization(
                NewOrganization {
                    name: "Orphan Org".into(),
                    acronym: None,
                    cluster_id: Uuid::new_v4(),
                    project_id: None,
                    country_id: country,
                    district_id: district,
                    sub_county_id: sub_county,
                    parish_id: None,
                    village_id: None,
                    address: None,
                },
                &auth,
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::Validation(_)))
        ));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_delete_organization_removes_membership_rows() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (country, district, sub_county) = seed_location(&pool).await;
        let cluster_id = seed_cluster(&pool, country).await;

        let org = service
            .create_organization(
                NewOrganization {
                    name: "Hope Initiative".into(),
                    acronym: None,
                    cluster_id,
                    project_id: None,
                    country_id: country,
                    district_id: district,
                    sub_county_id: sub_county,
                    parish_id: None,
                    village_id: None,
                    address: None,
                },
                &auth,
            )
            .await
            .unwrap();

        let cluster_repo = SqliteClusterRepository::new(pool.clone());
        cluster_repo.add_member(cluster_id, org.id).await.unwrap();

        service.delete_organization(org.id, &auth).await.unwrap();

        let members: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cluster_members WHERE organization_id = ?",
        )
        .bind(org.id.to_string())
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(members, 0);
    }
}
