use crate::domains::cluster::types::{
    Cluster, ClusterMemberRow, ClusterMemberSummary, ClusterRow, ClusterUser, ClusterUserRole,
    ClusterUserRow, NewCluster, UpdateCluster,
};
use crate::domains::core::repository::{like_pattern, DeleteById, FindById};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::types::{ListFilter, PaginatedResult, PaginationParams};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, query_scalar, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

fn district_ids_json(district_ids: &[Uuid]) -> String {
    let strings: Vec<String> = district_ids.iter().map(Uuid::to_string).collect();
    serde_json::to_string(&strings).unwrap_or_else(|_| "[]".to_string())
}

/// Trait defining cluster repository operations
#[async_trait]
pub trait ClusterRepository: FindById<Cluster> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Cluster>>;

    async fn create(&self, new_cluster: &NewCluster) -> DomainResult<Cluster>;

    async fn update(&self, id: Uuid, update_data: &UpdateCluster) -> DomainResult<Cluster>;

    /// Count of member organizations
    async fn count_members(&self, cluster_id: Uuid) -> DomainResult<i64>;

    async fn add_member(&self, cluster_id: Uuid, organization_id: Uuid) -> DomainResult<()>;

    async fn remove_member(&self, cluster_id: Uuid, organization_id: Uuid) -> DomainResult<()>;

    async fn find_members(
        &self,
        cluster_id: Uuid,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<ClusterMemberSummary>>;

    /// Upsert a user's role on the cluster
    async fn assign_user(
        &self,
        cluster_id: Uuid,
        user_id: Uuid,
        role: ClusterUserRole,
    ) -> DomainResult<()>;

    async fn remove_user(&self, cluster_id: Uuid, user_id: Uuid) -> DomainResult<()>;

    async fn find_users(&self, cluster_id: Uuid) -> DomainResult<Vec<ClusterUser>>;
}

/// SQLite implementation for ClusterRepository
#[derive(Clone)]
pub struct SqliteClusterRepository {
    pool: SqlitePool,
}

impl SqliteClusterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: ClusterRow) -> DomainResult<Cluster> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<Cluster> for SqliteClusterRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Cluster> {
        let row = query_as::<_, ClusterRow>("SELECT * FROM clusters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Cluster".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteClusterRepository {
    fn entity_name(&self) -> &'static str {
        "clusters"
    }

    /// Join rows are removed before the cluster row so no orphaned
    /// membership survives the delete.
    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let id_str = id.to_string();

        query("DELETE FROM cluster_members WHERE cluster_id = ?")
            .bind(&id_str)
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        query("DELETE FROM cluster_users WHERE cluster_id = ?")
            .bind(&id_str)
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        let result = query("DELETE FROM clusters WHERE id = ?")
            .bind(&id_str)
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("Cluster".to_string(), id))
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
impl ClusterRepository for SqliteClusterRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Cluster>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 = query_scalar("SELECT COUNT(*) FROM clusters WHERE name LIKE ?")
                    .bind(&pattern)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, ClusterRow>(
                    "SELECT * FROM clusters WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM clusters")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, ClusterRow>(
                    "SELECT * FROM clusters ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<Cluster>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn create(&self, new_cluster: &NewCluster) -> DomainResult<Cluster> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO clusters (id, name, about, country_id, district_ids, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new_cluster.name)
        .bind(&new_cluster.about)
        .bind(new_cluster.country_id.map(|u| u.to_string()))
        .bind(district_ids_json(&new_cluster.district_ids))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateCluster) -> DomainResult<Cluster> {
        let existing = self.find_by_id(id).await?;

        let name = update_data.name.clone().unwrap_or(existing.name);
        let about = match &update_data.about {
            Some(value) => value.clone(),
            None => existing.about,
        };
        let country_id = match update_data.country_id {
            Some(value) => value,
            None => existing.country_id,
        };
        let district_ids = update_data
            .district_ids
            .clone()
            .unwrap_or(existing.district_ids);

        query(
            "UPDATE clusters SET name = ?, about = ?, country_id = ?, district_ids = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&name)
        .bind(&about)
        .bind(country_id.map(|u| u.to_string()))
        .bind(district_ids_json(&district_ids))
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn count_members(&self, cluster_id: Uuid) -> DomainResult<i64> {
        let count: i64 =
            query_scalar("SELECT COUNT(*) FROM cluster_members WHERE cluster_id = ?")
                .bind(cluster_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::from)?;
        Ok(count)
    }

    async fn add_member(&self, cluster_id: Uuid, organization_id: Uuid) -> DomainResult<()> {
        let result = query(
            "INSERT OR IGNORE INTO cluster_members (cluster_id, organization_id, created_at)
             VALUES (?, ?, ?)",
        )
        .bind(cluster_id.to_string())
        .bind(organization_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Database(DbError::Conflict(format!(
                "Organization {} is already a member of cluster {}",
                organization_id, cluster_id
            ))));
        }
        Ok(())
    }

    async fn remove_member(&self, cluster_id: Uuid, organization_id: Uuid) -> DomainResult<()> {
        let result = query(
            "DELETE FROM cluster_members WHERE cluster_id = ? AND organization_id = ?",
        )
        .bind(cluster_id.to_string())
        .bind(organization_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::Database(DbError::NotFound(
                "ClusterMember".to_string(),
                format!("{}/{}", cluster_id, organization_id),
            )))
        } else {
            Ok(())
        }
    }

    async fn find_members(
        &self,
        cluster_id: Uuid,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<ClusterMemberSummary>> {
        let id_str = cluster_id.to_string();

        let total: i64 =
            query_scalar("SELECT COUNT(*) FROM cluster_members WHERE cluster_id = ?")
                .bind(&id_str)
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::from)?;

        let rows = query_as::<_, ClusterMemberRow>(
            "SELECT cm.organization_id, o.name, o.acronym, cm.created_at
             FROM cluster_members cm
             JOIN organizations o ON o.id = cm.organization_id
             WHERE cm.cluster_id = ?
             ORDER BY o.name ASC
             LIMIT ? OFFSET ?",
        )
        .bind(&id_str)
        .bind(params.per_page as i64)
        .bind(params.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        let members = rows
            .into_iter()
            .map(ClusterMemberRow::into_summary)
            .collect::<DomainResult<Vec<ClusterMemberSummary>>>()?;

        Ok(PaginatedResult::new(members, total as u64, params))
    }

    async fn assign_user(
        &self,
        cluster_id: Uuid,
        user_id: Uuid,
        role: ClusterUserRole,
    ) -> DomainResult<()> {
        query(
            "INSERT INTO cluster_users (cluster_id, user_id, role, created_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (cluster_id, user_id) DO UPDATE SET role = excluded.role",
        )
        .bind(cluster_id.to_string())
        .bind(user_id.to_string())
        .bind(role.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(())
    }

    async fn remove_user(&self, cluster_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        let result = query("DELETE FROM cluster_users WHERE cluster_id = ? AND user_id = ?")
            .bind(cluster_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::Database(DbError::NotFound(
                "ClusterUser".to_string(),
                format!("{}/{}", cluster_id, user_id),
            )))
        } else {
            Ok(())
        }
    }

    async fn find_users(&self, cluster_id: Uuid) -> DomainResult<Vec<ClusterUser>> {
        let rows = query_as::<_, ClusterUserRow>(
            "SELECT * FROM cluster_users WHERE cluster_id = ? ORDER BY created_at ASC",
        )
        .bind(cluster_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        rows.into_iter().map(ClusterUserRow::into_entity).collect()
    }
}
