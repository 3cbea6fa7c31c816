use crate::auth::AuthContext;
use crate::domains::cluster::repository::ClusterRepository;
use crate::domains::cluster::types::{
    ClusterMemberSummary, ClusterResponse, ClusterUser, ClusterUserRole, NewCluster, UpdateCluster,
};
use crate::domains::core::dependency_checker::DependencyChecker;
use crate::domains::core::repository::{DeleteById, FindById};
use crate::errors::{DomainError, ServiceResult};
use crate::types::{ListFilter, PaginatedResult, PaginationParams, Permission};
use crate::validation::{common, validate_entity_exists, Validate};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Trait defining cluster service operations
#[async_trait]
pub trait ClusterService: Send + Sync {
    async fn create_cluster(&self, new: NewCluster, auth: &AuthContext) -> ServiceResult<ClusterResponse>;

    async fn get_cluster_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ClusterResponse>;

    async fn list_clusters(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<ClusterResponse>>;

    async fn update_cluster(&self, id: Uuid, update: UpdateCluster, auth: &AuthContext) -> ServiceResult<ClusterResponse>;

    async fn delete_cluster(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    async fn add_member(&self, cluster_id: Uuid, organization_id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    async fn remove_member(&self, cluster_id: Uuid, organization_id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    async fn list_members(&self, cluster_id: Uuid, params: PaginationParams, auth: &AuthContext) -> ServiceResult<PaginatedResult<ClusterMemberSummary>>;

    async fn assign_user(&self, cluster_id: Uuid, user_id: Uuid, role: ClusterUserRole, auth: &AuthContext) -> ServiceResult<()>;

    async fn remove_user(&self, cluster_id: Uuid, user_id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    async fn list_users(&self, cluster_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ClusterUser>>;
}

/// Implementation of the cluster service
#[derive(Clone)]
pub struct ClusterServiceImpl {
    pool: SqlitePool,
    repo: Arc<dyn ClusterRepository>,
    dependency_checker: Arc<dyn DependencyChecker>,
}

impl ClusterServiceImpl {
    pub fn new(
        pool: SqlitePool,
        repo: Arc<dyn ClusterRepository>,
        dependency_checker: Arc<dyn DependencyChecker>,
    ) -> Self {
        Self { pool, repo, dependency_checker }
    }

    async fn validate_references(
        &self,
        country_id: Option<Uuid>,
        district_ids: &[Uuid],
    ) -> ServiceResult<()> {
        if let Some(country_id) = country_id {
            common::validate_country_exists(&self.pool, &country_id, "country_id").await?;
        }
        for district_id in district_ids {
            validate_entity_exists(&self.pool, "districts", district_id, "district_ids").await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterService for ClusterServiceImpl {
    async fn create_cluster(&self, new: NewCluster, auth: &AuthContext) -> ServiceResult<ClusterResponse> {
        auth.authorize(Permission::CreateClusters)?;
        new.validate()?;
        self.validate_references(new.country_id, &new.district_ids).await?;

        let cluster = self.repo.create(&new).await?;
        Ok(ClusterResponse::from(cluster))
    }

    async fn get_cluster_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ClusterResponse> {
        auth.authorize(Permission::ViewClusters)?;
        let cluster = self.repo.find_by_id(id).await?;
        let member_count = self.repo.count_members(id).await?;

        let mut response = ClusterResponse::from(cluster);
        response.member_count = Some(member_count);
        Ok(response)
    }

    async fn list_clusters(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<ClusterResponse>> {
        auth.authorize(Permission::ViewClusters)?;
        let result = self.repo.find_all(params, &filter).await?;
        Ok(result.map(ClusterResponse::from))
    }

    async fn update_cluster(&self, id: Uuid, update: UpdateCluster, auth: &AuthContext) -> ServiceResult<ClusterResponse> {
        auth.authorize(Permission::EditClusters)?;
        update.validate()?;

        let country_id = update.country_id.flatten();
        let district_ids = update.district_ids.clone().unwrap_or_default();
        self.validate_references(country_id, &district_ids).await?;

        let cluster = self.repo.update(id, &update).await?;
        Ok(ClusterResponse::from(cluster))
    }

    async fn delete_cluster(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteClusters)?;
        let _ = self.repo.find_by_id(id).await?;

        let dependencies = self
            .dependency_checker
            .get_dependency_tables("clusters", id)
            .await?;
        if !dependencies.is_empty() {
            return Err(DomainError::DependentRecordsExist {
                entity_type: "Cluster".to_string(),
                id,
                dependencies,
            }
            .into());
        }

        // Membership join rows cascade inside the repository transaction
        self.repo.delete(id).await?;
        Ok(())
    }

    async fn add_member(&self, cluster_id: Uuid, organization_id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::ManageClusterMembers)?;
        let _ = self.repo.find_by_id(cluster_id).await?;
        common::validate_organization_exists(&self.pool, &organization_id, "organization_id").await?;

        self.repo.add_member(cluster_id, organization_id).await?;
        Ok(())
    }

    async fn remove_member(&self, cluster_id: Uuid, organization_id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::ManageClusterMembers)?;
        self.repo.remove_member(cluster_id, organization_id).await?;
        Ok(())
    }

    async fn list_members(&self, cluster_id: Uuid, params: PaginationParams, auth: &AuthContext) -> ServiceResult<PaginatedResult<ClusterMemberSummary>> {
        auth.authorize(Permission::ViewClusters)?;
        let _ = self.repo.find_by_id(cluster_id).await?;
        let members = self.repo.find_members(cluster_id, params).await?;
        Ok(members)
    }

    async fn assign_user(&self, cluster_id: Uuid, user_id: Uuid, role: ClusterUserRole, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::ManageClusterUsers)?;
        let _ = self.repo.find_by_id(cluster_id).await?;
        self.repo.assign_user(cluster_id, user_id, role).await?;
        Ok(())
    }

    async fn remove_user(&self, cluster_id: Uuid, user_id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::ManageClusterUsers)?;
        self.repo.remove_user(cluster_id, user_id).await?;
        Ok(())
    }

    async fn list_users(&self, cluster_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ClusterUser>> {
        auth.authorize(Permission::ViewClusters)?;
        let _ = self.repo.find_by_id(cluster_id).await?;
        let users = self.repo.find_users(cluster_id).await?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_migration;
    use crate::domains::cluster::repository::SqliteClusterRepository;
    use crate::domains::core::dependency_checker::SqliteDependencyChecker;
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

    fn build_service(pool: &SqlitePool) -> ClusterServiceImpl {
        ClusterServiceImpl::new(
            pool.clone(),
            Arc::new(SqliteClusterRepository::new(pool.clone())),
            Arc::new(SqliteDependencyChecker::new(pool.clone())),
        )
    }

    fn admin() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), UserRole::Admin)
    }

    /// Seed a minimal location chain and return (country, district,
    /// county, sub_county) ids for rows that need them.
    async fn seed_location(pool: &SqlitePool) -> (Uuid, Uuid, Uuid, Uuid) {
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

        (country, district, county, sub_county)
    }

    async fn seed_organization(
        pool: &SqlitePool,
        cluster_id: Uuid,
        country: Uuid,
        district: Uuid,
        sub_county: Uuid,
    ) -> Uuid {
        let now = Utc::now().to_rfc3339();
        let org = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO organizations (id, name, acronym, cluster_id, country_id, district_id, sub_county_id, created_at, updated_at)
             VALUES (?, 'Hope Initiative', 'HI', ?, ?, ?, ?, ?, ?)",
        )
        .bind(org.to_string())
        .bind(cluster_id.to_string())
        .bind(country.to_string())
        .bind(district.to_string())
        .bind(sub_county.to_string())
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .unwrap();
        org
    }

    #[tokio::test]
    async fn test_delete_cluster_removes_membership_rows_first() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (country, district, _county, sub_county) = seed_location(&pool).await;

        let home = service
            .create_cluster(
                NewCluster { name: "Home Cluster".into(), about: None, country_id: Some(country), district_ids: vec![district] },
                &auth,
            )
            .await
            .unwrap();
        let shared = service
            .create_cluster(
                NewCluster { name: "Shared Cluster".into(), about: None, country_id: Some(country), district_ids: vec![] },
                &auth,
            )
            .await
            .unwrap();

        // The organization's home cluster stays; it also joins `shared`
        let org = seed_organization(&pool, home.id, country, district, sub_county).await;
        service.add_member(shared.id, org, &auth).await.unwrap();
        service
            .assign_user(shared.id, Uuid::new_v4(), ClusterUserRole::Lead, &auth)
            .await
            .unwrap();

        service.delete_cluster(shared.id, &auth).await.unwrap();

        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cluster_members WHERE cluster_id = ?")
            .bind(shared.id.to_string())
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(members, 0);
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cluster_users WHERE cluster_id = ?")
            .bind(shared.id.to_string())
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 0);
        assert!(matches!(
            service.get_cluster_by_id(shared.id, &auth).await,
            Err(ServiceError::Domain(DomainError::EntityNotFound(_, _)))
        ));
    }

    #[tokio::test]
    async fn test_delete_cluster_with_organizations_is_blocked() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (country, district, _county, sub_county) = seed_location(&pool).await;

        let cluster = service
            .create_cluster(
                NewCluster { name: "Home Cluster".into(), about: None, country_id: Some(country), district_ids: vec![] },
                &auth,
            )
            .await
            .unwrap();
        seed_organization(&pool, cluster.id, country, district, sub_county).await;

        let result = service.delete_cluster(cluster.id, &auth).await;
        match result {
            Err(ServiceError::Domain(DomainError::DependentRecordsExist { dependencies, .. })) => {
                assert!(dependencies.contains(&"organizations".to_string()));
            }
            other => panic!("expected DependentRecordsExist, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_member_listing_and_user_roles() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (country, district, _county, sub_county) = seed_location(&pool).await;

        let home = service
            .create_cluster(
                NewCluster { name: "Home".into(), about: None, country_id: Some(country), district_ids: vec![] },
                &auth,
            )
            .await
            .unwrap();
        let shared = service
            .create_cluster(
                NewCluster { name: "Shared".into(), about: None, country_id: Some(country), district_ids: vec![] },
                &auth,
            )
            .await
            .unwrap();
        let org = seed_organization(&pool, home.id, country, district, sub_county).await;

        service.add_member(shared.id, org, &auth).await.unwrap();
        let members = service
            .list_members(shared.id, PaginationParams::default(), &auth)
            .await
            .unwrap();
        assert_eq!(members.total, 1);
        assert_eq!(members.items[0].name, "Hope Initiative");

        // Re-adding the same member is a conflict
        assert!(service.add_member(shared.id, org, &auth).await.is_err());

        let user = Uuid::new_v4();
        service.assign_user(shared.id, user, ClusterUserRole::Member, &auth).await.unwrap();
        // Re-assigning upgrades the role in place
        service.assign_user(shared.id, user, ClusterUserRole::Lead, &auth).await.unwrap();
        let users = service.list_users(shared.id, &auth).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, ClusterUserRole::Lead);
    }

    #[tokio::test]
    async fn test_create_cluster_validates_district_ids() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (country, _district, _county, _sub_county) = seed_location(&pool).await;

        let result = service
            .create_cluster(
                NewCluster {
                    name: "Bad Cluster".into(),
                    about: None,
                    country_id: Some(country),
                    district_ids: vec![Uuid::new_v4()],
                },
                &auth,
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::Validation(_)))
        ));
    }
}
