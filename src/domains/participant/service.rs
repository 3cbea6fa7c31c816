use crate::auth::AuthContext;
use crate::domains::core::repository::{DeleteById, FindById};
use crate::domains::participant::import::{parse_participant_rows, ImportTarget};
use crate::domains::participant::repository::ParticipantRepository;
use crate::domains::participant::types::{
    CountBucket, DemographicSummary, NewParticipant, ParticipantResponse, UpdateParticipant,
};
use crate::errors::ServiceResult;
use crate::types::{ListFilter, PaginatedResult, PaginationParams, Permission};
use crate::validation::{common, Validate};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Trait defining participant service operations
#[async_trait]
pub trait ParticipantService: Send + Sync {
    async fn create_participant(&self, new: NewParticipant, auth: &AuthContext) -> ServiceResult<ParticipantResponse>;

    async fn get_participant_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ParticipantResponse>;

    async fn list_participants(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<ParticipantResponse>>;

    async fn participants_by_organization(&self, organization_id: Uuid, params: PaginationParams, auth: &AuthContext) -> ServiceResult<PaginatedResult<ParticipantResponse>>;

    async fn update_participant(&self, id: Uuid, update: UpdateParticipant, auth: &AuthContext) -> ServiceResult<ParticipantResponse>;

    async fn delete_participant(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    /// Counts and percentages by sex, age group and disability status
    async fn demographic_summary(&self, auth: &AuthContext) -> ServiceResult<DemographicSummary>;

    /// Bulk spreadsheet import: every row inserts, or none do
    async fn import_participants(&self, target: ImportTarget, data: &[u8], auth: &AuthContext) -> ServiceResult<Vec<ParticipantResponse>>;
}

/// Implementation of the participant service
#[derive(Clone)]
pub struct ParticipantServiceImpl {
    pool: SqlitePool,
    repo: Arc<dyn ParticipantRepository>,
}

impl ParticipantServiceImpl {
    pub fn new(pool: SqlitePool, repo: Arc<dyn ParticipantRepository>) -> Self {
        Self { pool, repo }
    }

    async fn validate_references(&self, new: &NewParticipant) -> ServiceResult<()> {
        common::validate_organization_exists(&self.pool, &new.organization_id, "organization_id").await?;
        common::validate_cluster_exists(&self.pool, &new.cluster_id, "cluster_id").await?;
        if let Some(project_id) = new.project_id {
            common::validate_project_exists(&self.pool, &project_id, "project_id").await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ParticipantService for ParticipantServiceImpl {
    async fn create_participant(&self, new: NewParticipant, auth: &AuthContext) -> ServiceResult<ParticipantResponse> {
        auth.authorize(Permission::CreateParticipants)?;
        new.validate()?;
        self.validate_references(&new).await?;

        let participant = self.repo.create(&new).await?;
        Ok(ParticipantResponse::from(participant))
    }

    async fn get_participant_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ParticipantResponse> {
        auth.authorize(Permission::ViewParticipants)?;
        let participant = self.repo.find_by_id(id).await?;
        Ok(ParticipantResponse::from(participant))
    }

    async fn list_participants(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<ParticipantResponse>> {
        auth.authorize(Permission::ViewParticipants)?;
        let result = self.repo.find_all(params, &filter).await?;
        Ok(result.map(ParticipantResponse::from))
    }

    async fn participants_by_organization(&self, organization_id: Uuid, params: PaginationParams, auth: &AuthContext) -> ServiceResult<PaginatedResult<ParticipantResponse>> {
        auth.authorize(Permission::ViewParticipants)?;
        common::validate_organization_exists(&self.pool, &organization_id, "organization_id").await?;
        let result = self.repo.find_by_organization(organization_id, params).await?;
        Ok(result.map(ParticipantResponse::from))
    }

    async fn update_participant(&self, id: Uuid, update: UpdateParticipant, auth: &AuthContext) -> ServiceResult<ParticipantResponse> {
        auth.authorize(Permission::EditParticipants)?;
        update.validate()?;

        if let Some(organization_id) = update.organization_id {
            common::validate_organization_exists(&self.pool, &organization_id, "organization_id").await?;
        }
        if let Some(Some(project_id)) = update.project_id {
            common::validate_project_exists(&self.pool, &project_id, "project_id").await?;
        }

        let participant = self.repo.update(id, &update).await?;
        Ok(ParticipantResponse::from(participant))
    }

    async fn delete_participant(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteParticipants)?;
        let _ = self.repo.find_by_id(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }

    async fn demographic_summary(&self, auth: &AuthContext) -> ServiceResult<DemographicSummary> {
        auth.authorize(Permission::ViewParticipants)?;

        let (total, pwd_count) = self.repo.count_disability().await?;

        let by_sex = self
            .repo
            .count_by_sex()
            .await?
            .into_iter()
            .map(|(sex, count)| CountBucket {
                label: sex.unwrap_or_else(|| "unknown".to_string()),
                count,
                percentage: DemographicSummary::percentage(count, total),
            })
            .collect();

        let by_age_group = self
            .repo
            .count_by_age_group()
            .await?
            .into_iter()
            .map(|(age_group, count)| CountBucket {
                label: age_group,
                count,
                percentage: DemographicSummary::percentage(count, total),
            })
            .collect();

        Ok(DemographicSummary {
            total,
            by_sex,
            by_age_group,
            pwd_count,
            pwd_percentage: DemographicSummary::percentage(pwd_count, total),
        })
    }

    async fn import_participants(&self, target: ImportTarget, data: &[u8], auth: &AuthContext) -> ServiceResult<Vec<ParticipantResponse>> {
        auth.authorize(Permission::ImportParticipants)?;

        common::validate_organization_exists(&self.pool, &target.organization_id, "organization_id").await?;
        common::validate_cluster_exists(&self.pool, &target.cluster_id, "cluster_id").await?;
        if let Some(project_id) = target.project_id {
            common::validate_project_exists(&self.pool, &project_id, "project_id").await?;
        }

        let rows = parse_participant_rows(data, &target)?;
        for row in &rows {
            row.validate()?;
        }

        log::info!(
            "Importing {} participants into organization {}",
            rows.len(),
            target.organization_id
        );
        let inserted = self.repo.bulk_insert(&rows).await?;
        Ok(inserted.into_iter().map(ParticipantResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_migration;
    use crate::domains::participant::repository::SqliteParticipantRepository;
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

    fn build_service(pool: &SqlitePool) -> ParticipantServiceImpl {
        ParticipantServiceImpl::new(
            pool.clone(),
            Arc::new(SqliteParticipantRepository::new(pool.clone())),
        )
    }

    fn admin() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), UserRole::Admin)
    }

    /// Seed the location chain, a cluster and one organization; returns
    /// (organization_id, cluster_id).
    async fn seed_organization(pool: &SqlitePool) -> (Uuid, Uuid) {
        let now = Utc::now().to_rfc3339();
        let country = Uuid::new_v4();
        let district = Uuid::new_v4();
        let county = Uuid::new_v4();
        let sub_county = Uuid::new_v4();
        let cluster = Uuid::new_v4();
        let org = Uuid::new_v4();

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
        sqlx::query("INSERT INTO clusters (id, name, district_ids, created_at, updated_at) VALUES (?, 'Central Cluster', '[]', ?, ?)")
            .bind(cluster.to_string()).bind(&now).bind(&now)
            .execute(pool).await.unwrap();
        sqlx::query(
            "INSERT INTO organizations (id, name, cluster_id, country_id, district_id, sub_county_id, created_at, updated_at)
             VALUES (?, 'Hope Initiative', ?, ?, ?, ?, ?, ?)",
        )
        .bind(org.to_string())
        .bind(cluster.to_string())
        .bind(country.to_string())
        .bind(district.to_string())
        .bind(sub_county.to_string())
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .unwrap();

        (org, cluster)
    }

    #[tokio::test]
    async fn test_import_three_rows_shares_organization() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (org, cluster) = seed_organization(&pool).await;

        let csv = "First Name,Surname,Sex,Age,Disability\n\
                   Grace,Akello,Female,34,No\n\
                   Peter,Okot,Male,28,Yes\n\
                   Mary,Nansubuga,Female,45,No\n";
        let imported = service
            .import_participants(
                ImportTarget { organization_id: org, cluster_id: cluster, project_id: None },
                csv.as_bytes(),
                &auth,
            )
            .await
            .unwrap();

        assert_eq!(imported.len(), 3);
        assert!(imported.iter().all(|p| p.organization_id == org));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM participants")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_import_is_all_or_nothing() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (org, cluster) = seed_organization(&pool).await;

        // Second row has a non-numeric age; nothing may be inserted
        let csv = "First Name,Surname,Age\n\
                   Grace,Akello,34\n\
                   Peter,Okot,abc\n";
        let result = service
            .import_participants(
                ImportTarget { organization_id: org, cluster_id: cluster, project_id: None },
                csv.as_bytes(),
                &auth,
            )
            .await;
        assert!(result.is_err());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM participants")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_demographic_summary_percentages() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (org, cluster) = seed_organization(&pool).await;

        let csv = "First Name,Surname,Sex,Age,Disability\n\
                   Grace,Akello,Female,34,No\n\
                   Peter,Okot,Male,28,Yes\n\
                   Mary,Nansubuga,Female,65,No\n\
                   Joan,Apio,Female,12,No\n";
        service
            .import_participants(
                ImportTarget { organization_id: org, cluster_id: cluster, project_id: None },
                csv.as_bytes(),
                &auth,
            )
            .await
            .unwrap();

        let summary = service.demographic_summary(&auth).await.unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.pwd_count, 1);
        assert!((summary.pwd_percentage - 25.0).abs() < f64::EPSILON);

        let female = summary.by_sex.iter().find(|b| b.label == "female").unwrap();
        assert_eq!(female.count, 3);
        assert!((female.percentage - 75.0).abs() < f64::EPSILON);

        let youth = summary.by_age_group.iter().find(|b| b.label == "youth").unwrap();
        assert_eq!(youth.count, 1);
        let child = summary.by_age_group.iter().find(|b| b.label == "child").unwrap();
        assert_eq!(child.count, 1);
    }

    #[tokio::test]
    async fn test_create_participant_validates_organization() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let result = service
            .create_participant(
                NewParticipant {
                    organization_id: Uuid::new_v4(),
                    cluster_id: Uuid::new_v4(),
                    project_id: None,
                    first_name: "Grace".into(),
                    last_name: "Akello".into(),
                    sex: None,
                    age: None,
                    phone: None,
                    is_pwd: false,
                    disability_type: None,
                    designation: None,
                    enterprise: None,
                },
                &auth,
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_participant_name_search() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();
        let (org, cluster) = seed_organization(&pool).await;

        let csv = "First Name,Surname\nGrace,Akello\nPeter,Okot\n";
        service
            .import_participants(
                ImportTarget { organization_id: org, cluster_id: cluster, project_id: None },
                csv.as_bytes(),
                &auth,
            )
            .await
            .unwrap();

        let result = service
            .list_participants(PaginationParams::default(), ListFilter::search("akello"), &auth)
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].full_name, "Grace Akello");
    }
}
