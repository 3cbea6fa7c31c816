use crate::domains::core::repository::{like_pattern, DeleteById, FindById};
use crate::domains::participant::types::{
    NewParticipant, Participant, ParticipantRow, UpdateParticipant,
};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::types::{ListFilter, PaginatedResult, PaginationParams};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, query_scalar, Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// Trait defining participant repository operations
#[async_trait]
pub trait ParticipantRepository: FindById<Participant> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Participant>>;

    async fn find_by_organization(
        &self,
        organization_id: Uuid,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Participant>>;

    async fn create(&self, new_participant: &NewParticipant) -> DomainResult<Participant>;

    /// Insert a batch of participants inside one transaction; either all
    /// rows are written or none are.
    async fn bulk_insert(&self, batch: &[NewParticipant]) -> DomainResult<Vec<Participant>>;

    async fn update(&self, id: Uuid, update_data: &UpdateParticipant) -> DomainResult<Participant>;

    /// Count participants per sex value (None for unset)
    async fn count_by_sex(&self) -> DomainResult<Vec<(Option<String>, i64)>>;

    /// Count participants per age group bucket
    async fn count_by_age_group(&self) -> DomainResult<Vec<(String, i64)>>;

    /// (total, pwd_count)
    async fn count_disability(&self) -> DomainResult<(i64, i64)>;
}

/// SQLite implementation for ParticipantRepository
#[derive(Clone)]
pub struct SqliteParticipantRepository {
    pool: SqlitePool,
}

impl SqliteParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: ParticipantRow) -> DomainResult<Participant> {
        row.into_entity()
    }

    fn insert_binds<'q>(
        sql_query: sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
        id: &'q str,
        new_participant: &'q NewParticipant,
        now: &'q str,
    ) -> sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        sql_query
            .bind(id)
            .bind(new_participant.organization_id.to_string())
            .bind(new_participant.cluster_id.to_string())
            .bind(new_participant.project_id.map(|u| u.to_string()))
            .bind(&new_participant.first_name)
            .bind(&new_participant.last_name)
            .bind(&new_participant.sex)
            .bind(new_participant.age)
            .bind(&new_participant.phone)
            .bind(new_participant.is_pwd as i64)
            .bind(&new_participant.disability_type)
            .bind(&new_participant.designation)
            .bind(&new_participant.enterprise)
            .bind(now)
            .bind(now)
    }
}

const INSERT_SQL: &str =
    "INSERT INTO participants (id, organization_id, cluster_id, project_id, first_name, last_name, sex, age, phone, is_pwd, disability_type, designation, enterprise, created_at, updated_at)
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

#[async_trait]
impl FindById<Participant> for SqliteParticipantRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Participant> {
        let row = query_as::<_, ParticipantRow>("SELECT * FROM participants WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Participant".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteParticipantRepository {
    fn entity_name(&self) -> &'static str {
        "participants"
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let result = query("DELETE FROM participants WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("Participant".to_string(), id))
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
impl ParticipantRepository for SqliteParticipantRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Participant>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 = query_scalar(
                    "SELECT COUNT(*) FROM participants WHERE (first_name || ' ' || last_name) LIKE ?",
                )
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::from)?;
                let rows = query_as::<_, ParticipantRow>(
                    "SELECT * FROM participants WHERE (first_name || ' ' || last_name) LIKE ?
                     ORDER BY last_name ASC, first_name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM participants")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, ParticipantRow>(
                    "SELECT * FROM participants ORDER BY last_name ASC, first_name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<Participant>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn find_by_organization(
        &self,
        organization_id: Uuid,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Participant>> {
        let id_str = organization_id.to_string();

        let total: i64 =
            query_scalar("SELECT COUNT(*) FROM participants WHERE organization_id = ?")
                .bind(&id_str)
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::from)?;

        let rows = query_as::<_, ParticipantRow>(
            "SELECT * FROM participants WHERE organization_id = ?
             ORDER BY last_name ASC, first_name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<Participant>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn create(&self, new_participant: &NewParticipant) -> DomainResult<Participant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now = Utc::now().to_rfc3339();

        Self::insert_binds(query(INSERT_SQL), &id_str, new_participant, &now)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn bulk_insert(&self, batch: &[NewParticipant]) -> DomainResult<Vec<Participant>> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let now = Utc::now();
        let now_str = now.to_rfc3339();
        let mut inserted = Vec::with_capacity(batch.len());

        for new_participant in batch {
            let id = Uuid::new_v4();
            let id_str = id.to_string();

            let result = Self::insert_binds(query(INSERT_SQL), &id_str, new_participant, &now_str)
                .execute(&mut *tx)
                .await;

            if let Err(e) = result {
                let _ = tx.rollback().await;
                return Err(DbError::from(e).into());
            }

            inserted.push(build_entity(id, new_participant, now));
        }

        tx.commit().await.map_err(DbError::from)?;
        Ok(inserted)
    }

    async fn update(&self, id: Uuid, update_data: &UpdateParticipant) -> DomainResult<Participant> {
        let existing = self.find_by_id(id).await?;

        let organization_id = update_data.organization_id.unwrap_or(existing.organization_id);
        let project_id = match update_data.project_id {
            Some(value) => value,
            None => existing.project_id,
        };
        let first_name = update_data.first_name.clone().unwrap_or(existing.first_name);
        let last_name = update_data.last_name.clone().unwrap_or(existing.last_name);
        let sex = match &update_data.sex {
            Some(value) => value.clone(),
            None => existing.sex,
        };
        let age = match update_data.age {
            Some(value) => value,
            None => existing.age,
        };
        let phone = match &update_data.phone {
            Some(value) => value.clone(),
            None => existing.phone,
        };
        let is_pwd = update_data.is_pwd.unwrap_or(existing.is_pwd);
        let disability_type = match &update_data.disability_type {
            Some(value) => value.clone(),
            None => existing.disability_type,
        };
        let designation = match &update_data.designation {
            Some(value) => value.clone(),
            None => existing.designation,
        };
        let enterprise = match &update_data.enterprise {
            Some(value) => value.clone(),
            None => existing.enterprise,
        };

        query(
            "UPDATE participants SET organization_id = ?, project_id = ?, first_name = ?, last_name = ?, sex = ?, age = ?, phone = ?, is_pwd = ?, disability_type = ?, designation = ?, enterprise = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(organization_id.to_string())
        .bind(project_id.map(|u| u.to_string()))
        .bind(&first_name)
        .bind(&last_name)
        .bind(&sex)
        .bind(age)
        .bind(&phone)
        .bind(is_pwd as i64)
        .bind(&disability_type)
        .bind(&designation)
        .bind(&enterprise)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn count_by_sex(&self) -> DomainResult<Vec<(Option<String>, i64)>> {
        let rows = query("SELECT sex, COUNT(*) as count FROM participants GROUP BY sex")
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("sex"), row.get("count")))
            .collect())
    }

    async fn count_by_age_group(&self) -> DomainResult<Vec<(String, i64)>> {
        let rows = query(
            "SELECT CASE
                 WHEN age IS NULL THEN 'unknown'
                 WHEN age < 18 THEN 'child'
                 WHEN age < 31 THEN 'youth'
                 WHEN age < 60 THEN 'adult'
                 ELSE 'elderly'
             END AS age_group, COUNT(*) as count
             FROM participants GROUP BY age_group",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("age_group"), row.get("count")))
            .collect())
    }

    async fn count_disability(&self) -> DomainResult<(i64, i64)> {
        let total: i64 = query_scalar("SELECT COUNT(*) FROM participants")
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::from)?;
        let pwd: i64 = query_scalar("SELECT COUNT(*) FROM participants WHERE is_pwd = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok((total, pwd))
    }
}

fn build_entity(id: Uuid, new_participant: &NewParticipant, now: DateTime<Utc>) -> Participant {
    Participant {
        id,
        organization_id: new_participant.organization_id,
        cluster_id: new_participant.cluster_id,
        project_id: new_participant.project_id,
        first_name: new_participant.first_name.clone(),
        last_name: new_participant.last_name.clone(),
        sex: new_participant.sex.clone(),
        age: new_participant.age,
        phone: new_participant.phone.clone(),
        is_pwd: new_participant.is_pwd,
        disability_type: new_participant.disability_type.clone(),
        designation: new_participant.designation.clone(),
        enterprise: new_participant.enterprise.clone(),
        created_at: now,
        updated_at: now,
    }
}
