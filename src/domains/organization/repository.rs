use crate::domains::core::repository::{like_pattern, DeleteById, FindById};
use crate::domains::organization::types::{
    NewOrganization, Organization, OrganizationRow, UpdateOrganization,
};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::types::{ListFilter, PaginatedResult, PaginationParams};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, query_scalar, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// Trait defining organization repository operations
#[async_trait]
pub trait OrganizationRepository: FindById<Organization> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Organization>>;

    async fn find_by_cluster(
        &self,
        cluster_id: Uuid,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Organization>>;

    async fn create(&self, new_organization: &NewOrganization) -> DomainResult<Organization>;

    async fn update(&self, id: Uuid, update_data: &UpdateOrganization) -> DomainResult<Organization>;
}

/// SQLite implementation for OrganizationRepository
#[derive(Clone)]
pub struct SqliteOrganizationRepository {
    pool: SqlitePool,
}

impl SqliteOrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: OrganizationRow) -> DomainResult<Organization> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<Organization> for SqliteOrganizationRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Organization> {
        let row = query_as::<_, OrganizationRow>("SELECT * FROM organizations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Organization".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteOrganizationRepository {
    fn entity_name(&self) -> &'static str {
        "organizations"
    }

    /// Cluster membership rows for this organization are removed in the
    /// same transaction.
    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let id_str = id.to_string();

        query("DELETE FROM cluster_members WHERE organization_id = ?")
            .bind(&id_str)
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        let result = query("DELETE FROM organizations WHERE id = ?")
            .bind(&id_str)
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("Organization".to_string(), id))
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
impl OrganizationRepository for SqliteOrganizationRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Organization>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 =
                    query_scalar("SELECT COUNT(*) FROM organizations WHERE name LIKE ?")
                        .bind(&pattern)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(DbError::from)?;
                let rows = query_as::<_, OrganizationRow>(
                    "SELECT * FROM organizations WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM organizations")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, OrganizationRow>(
                    "SELECT * FROM organizations ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<Organization>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn find_by_cluster(
        &self,
        cluster_id: Uuid,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Organization>> {
        let id_str = cluster_id.to_string();

        let total: i64 =
            query_scalar("SELECT COUNT(*) FROM organizations WHERE cluster_id = ?")
                .bind(&id_str)
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::from)?;

        let rows = query_as::<_, OrganizationRow>(
            "SELECT * FROM organizations WHERE cluster_id = ? ORDER BY name ASC LIMIT ? OFFSET ?",
        )
        .bind(&id_str)
        .bind(params.per_page as i64)
        .bind(params.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        let entities = rows
            .into_iter()
            .map(Self::map_row_to_entity)
            .collect::<DomainResult<Vec<Organization>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn create(&self, new_organization: &NewOrganization) -> DomainResult<Organization> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO organizations (id, name, acronym, cluster_id, project_id, country_id, district_id, sub_county_id, parish_id, village_id, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new_organization.name)
        .bind(&new_organization.acronym)
        .bind(new_organization.cluster_id.to_string())
        .bind(new_organization.project_id.map(|u| u.to_string()))
        .bind(new_organization.country_id.to_string())
        .bind(new_organization.district_id.to_string())
        .bind(new_organization.sub_county_id.to_string())
        .bind(new_organization.parish_id.map(|u| u.to_string()))
        .bind(new_organization.village_id.map(|u| u.to_string()))
        .bind(&new_organization.address)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateOrganization) -> DomainResult<Organization> {
        let existing = self.find_by_id(id).await?;

        let name = update_data.name.clone().unwrap_or(existing.name);
        let acronym = match &update_data.acronym {
            Some(value) => value.clone(),
            None => existing.acronym,
        };
        let cluster_id = update_data.cluster_id.unwrap_or(existing.cluster_id);
        let project_id = match update_data.project_id {
            Some(value) => value,
            None => existing.project_id,
        };
        let country_id = update_data.country_id.unwrap_or(existing.country_id);
        let district_id = update_data.district_id.unwrap_or(existing.district_id);
        let sub_county_id = update_data.sub_county_id.unwrap_or(existing.sub_county_id);
        let parish_id = match update_data.parish_id {
            Some(value) => value,
            None => existing.parish_id,
        };
        let village_id = match update_data.village_id {
            Some(value) => value,
            None => existing.village_id,
        };
        let address = match &update_data.address {
            Some(value) => value.clone(),
            None => existing.address,
        };

        query(
            "UPDATE organizations SET name = ?, acronym = ?, cluster_id = ?, project_id = ?, country_id = ?, district_id = ?, sub_county_id = ?, parish_id = ?, village_id = ?, address = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&name)
        .bind(&acronym)
        .bind(cluster_id.to_string())
        .bind(project_id.map(|u| u.to_string()))
        .bind(country_id.to_string())
        .bind(district_id.to_string())
        .bind(sub_county_id.to_string())
        .bind(parish_id.map(|u| u.to_string()))
        .bind(village_id.map(|u| u.to_string()))
        .bind(&address)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}
