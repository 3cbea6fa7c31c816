use crate::domains::core::repository::{like_pattern, DeleteById, FindById};
use crate::domains::hierarchy::types::{
    Country, CountryRow, County, CountyRecord, CountyRow, District, DistrictRow, NewCountry,
    NewDistrict, Parish, ParishRecord, ParishRow, SubCounty, SubCountyRecord, SubCountyRow,
    UpdateCountry, UpdateCounty, UpdateDistrict, UpdateParish, UpdateSubCounty, UpdateUrbanArea,
    UpdateVillage, UrbanArea, UrbanAreaRecord, UrbanAreaRow, UrbanKind, Village, VillageRecord,
    VillageRow,
};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::types::{ListFilter, PaginatedResult, PaginationParams};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, query_scalar, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// Trait defining country repository operations
#[async_trait]
pub trait CountryRepository: FindById<Country> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Country>>;

    async fn create(&self, new_country: &NewCountry) -> DomainResult<Country>;

    async fn update(&self, id: Uuid, update_data: &UpdateCountry) -> DomainResult<Country>;
}

/// SQLite implementation for CountryRepository
#[derive(Clone)]
pub struct SqliteCountryRepository {
    pool: SqlitePool,
}

impl SqliteCountryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: CountryRow) -> DomainResult<Country> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<Country> for SqliteCountryRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Country> {
        let row = query_as::<_, CountryRow>("SELECT * FROM countries WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Country".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteCountryRepository {
    fn entity_name(&self) -> &'static str {
        "countries"
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let result = query("DELETE FROM countries WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("Country".to_string(), id))
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
impl CountryRepository for SqliteCountryRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Country>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 =
                    query_scalar("SELECT COUNT(*) FROM countries WHERE name LIKE ?")
                        .bind(&pattern)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(DbError::from)?;
                let rows = query_as::<_, CountryRow>(
                    "SELECT * FROM countries WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM countries")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, CountryRow>(
                    "SELECT * FROM countries ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<Country>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn create(&self, new_country: &NewCountry) -> DomainResult<Country> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO countries (id, name, code, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new_country.name)
        .bind(&new_country.code)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateCountry) -> DomainResult<Country> {
        let existing = self.find_by_id(id).await?;
        let name = update_data.name.clone().unwrap_or(existing.name);
        let code = update_data.code.clone().unwrap_or(existing.code);

        query("UPDATE countries SET name = ?, code = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&code)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}

/// Trait defining district repository operations
#[async_trait]
pub trait DistrictRepository: FindById<District> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<District>>;

    /// Children of one country, for the cascading selector
    async fn find_by_country(&self, country_id: Uuid) -> DomainResult<Vec<District>>;

    async fn create(&self, new_district: &NewDistrict) -> DomainResult<District>;

    async fn update(&self, id: Uuid, update_data: &UpdateDistrict) -> DomainResult<District>;
}

/// SQLite implementation for DistrictRepository
#[derive(Clone)]
pub struct SqliteDistrictRepository {
    pool: SqlitePool,
}

impl SqliteDistrictRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: DistrictRow) -> DomainResult<District> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<District> for SqliteDistrictRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<District> {
        let row = query_as::<_, DistrictRow>("SELECT * FROM districts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("District".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteDistrictRepository {
    fn entity_name(&self) -> &'static str {
        "districts"
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let result = query("DELETE FROM districts WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("District".to_string(), id))
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
impl DistrictRepository for SqliteDistrictRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<District>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 =
                    query_scalar("SELECT COUNT(*) FROM districts WHERE name LIKE ?")
                        .bind(&pattern)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(DbError::from)?;
                let rows = query_as::<_, DistrictRow>(
                    "SELECT * FROM districts WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM districts")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, DistrictRow>(
                    "SELECT * FROM districts ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<District>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn find_by_country(&self, country_id: Uuid) -> DomainResult<Vec<District>> {
        let rows = query_as::<_, DistrictRow>(
            "SELECT * FROM districts WHERE country_id = ? ORDER BY name ASC",
        )
        .bind(country_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        rows.into_iter().map(Self::map_row_to_entity).collect()
    }

    async fn create(&self, new_district: &NewDistrict) -> DomainResult<District> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO districts (id, name, code, country_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new_district.name)
        .bind(&new_district.code)
        .bind(new_district.country_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateDistrict) -> DomainResult<District> {
        let existing = self.find_by_id(id).await?;
        let name = update_data.name.clone().unwrap_or(existing.name);
        let code = update_data.code.clone().unwrap_or(existing.code);

        query("UPDATE districts SET name = ?, code = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&code)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}

/// Trait defining county repository operations
#[async_trait]
pub trait CountyRepository: FindById<County> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<County>>;

    async fn find_by_district(&self, district_id: Uuid) -> DomainResult<Vec<County>>;

    async fn create(&self, record: &CountyRecord) -> DomainResult<County>;

    async fn update(&self, id: Uuid, update_data: &UpdateCounty) -> DomainResult<County>;
}

/// SQLite implementation for CountyRepository
#[derive(Clone)]
pub struct SqliteCountyRepository {
    pool: SqlitePool,
}

impl SqliteCountyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: CountyRow) -> DomainResult<County> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<County> for SqliteCountyRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<County> {
        let row = query_as::<_, CountyRow>("SELECT * FROM counties WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("County".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteCountyRepository {
    fn entity_name(&self) -> &'static str {
        "counties"
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let result = query("DELETE FROM counties WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("County".to_string(), id))
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
impl CountyRepository for SqliteCountyRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<County>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 = query_scalar("SELECT COUNT(*) FROM counties WHERE name LIKE ?")
                    .bind(&pattern)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, CountyRow>(
                    "SELECT * FROM counties WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM counties")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, CountyRow>(
                    "SELECT * FROM counties ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<County>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn find_by_district(&self, district_id: Uuid) -> DomainResult<Vec<County>> {
        let rows = query_as::<_, CountyRow>(
            "SELECT * FROM counties WHERE district_id = ? ORDER BY name ASC",
        )
        .bind(district_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        rows.into_iter().map(Self::map_row_to_entity).collect()
    }

    async fn create(&self, record: &CountyRecord) -> DomainResult<County> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO counties (id, name, code, country_id, district_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&record.name)
        .bind(&record.code)
        .bind(record.country_id.to_string())
        .bind(record.district_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateCounty) -> DomainResult<County> {
        let existing = self.find_by_id(id).await?;
        let name = update_data.name.clone().unwrap_or(existing.name);
        let code = update_data.code.clone().unwrap_or(existing.code);

        query("UPDATE counties SET name = ?, code = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&code)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}

/// Trait defining sub-county repository operations
#[async_trait]
pub trait SubCountyRepository: FindById<SubCounty> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<SubCounty>>;

    async fn find_by_district(&self, district_id: Uuid) -> DomainResult<Vec<SubCounty>>;

    async fn find_by_county(&self, county_id: Uuid) -> DomainResult<Vec<SubCounty>>;

    async fn create(&self, record: &SubCountyRecord) -> DomainResult<SubCounty>;

    async fn update(&self, id: Uuid, update_data: &UpdateSubCounty) -> DomainResult<SubCounty>;
}

/// SQLite implementation for SubCountyRepository
#[derive(Clone)]
pub struct SqliteSubCountyRepository {
    pool: SqlitePool,
}

impl SqliteSubCountyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: SubCountyRow) -> DomainResult<SubCounty> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<SubCounty> for SqliteSubCountyRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<SubCounty> {
        let row = query_as::<_, SubCountyRow>("SELECT * FROM sub_counties WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("SubCounty".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteSubCountyRepository {
    fn entity_name(&self) -> &'static str {
        "sub_counties"
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let result = query("DELETE FROM sub_counties WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("SubCounty".to_string(), id))
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
impl SubCountyRepository for SqliteSubCountyRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<SubCounty>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 =
                    query_scalar("SELECT COUNT(*) FROM sub_counties WHERE name LIKE ?")
                        .bind(&pattern)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(DbError::from)?;
                let rows = query_as::<_, SubCountyRow>(
                    "SELECT * FROM sub_counties WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM sub_counties")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, SubCountyRow>(
                    "SELECT * FROM sub_counties ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<SubCounty>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn find_by_district(&self, district_id: Uuid) -> DomainResult<Vec<SubCounty>> {
        let rows = query_as::<_, SubCountyRow>(
            "SELECT * FROM sub_counties WHERE district_id = ? ORDER BY name ASC",
        )
        .bind(district_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        rows.into_iter().map(Self::map_row_to_entity).collect()
    }

    async fn find_by_county(&self, county_id: Uuid) -> DomainResult<Vec<SubCounty>> {
        let rows = query_as::<_, SubCountyRow>(
            "SELECT * FROM sub_counties WHERE county_id = ? ORDER BY name ASC",
        )
        .bind(county_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        rows.into_iter().map(Self::map_row_to_entity).collect()
    }

    async fn create(&self, record: &SubCountyRecord) -> DomainResult<SubCounty> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO sub_counties (id, name, code, district_id, county_id, country_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&record.name)
        .bind(&record.code)
        .bind(record.district_id.to_string())
        .bind(record.county_id.to_string())
        .bind(record.country_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateSubCounty) -> DomainResult<SubCounty> {
        let existing = self.find_by_id(id).await?;
        let name = update_data.name.clone().unwrap_or(existing.name);
        let code = update_data.code.clone().unwrap_or(existing.code);

        query("UPDATE sub_counties SET name = ?, code = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&code)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}

/// Trait defining parish repository operations
#[async_trait]
pub trait ParishRepository: FindById<Parish> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Parish>>;

    async fn find_by_sub_county(&self, sub_county_id: Uuid) -> DomainResult<Vec<Parish>>;

    async fn create(&self, record: &ParishRecord) -> DomainResult<Parish>;

    async fn update(&self, id: Uuid, update_data: &UpdateParish) -> DomainResult<Parish>;
}

/// SQLite implementation for ParishRepository
#[derive(Clone)]
pub struct SqliteParishRepository {
    pool: SqlitePool,
}

impl SqliteParishRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: ParishRow) -> DomainResult<Parish> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<Parish> for SqliteParishRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Parish> {
        let row = query_as::<_, ParishRow>("SELECT * FROM parishes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Parish".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteParishRepository {
    fn entity_name(&self) -> &'static str {
        "parishes"
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let result = query("DELETE FROM parishes WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("Parish".to_string(), id))
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
impl ParishRepository for SqliteParishRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Parish>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 = query_scalar("SELECT COUNT(*) FROM parishes WHERE name LIKE ?")
                    .bind(&pattern)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, ParishRow>(
                    "SELECT * FROM parishes WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM parishes")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, ParishRow>(
                    "SELECT * FROM parishes ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<Parish>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn find_by_sub_county(&self, sub_county_id: Uuid) -> DomainResult<Vec<Parish>> {
        let rows = query_as::<_, ParishRow>(
            "SELECT * FROM parishes WHERE sub_county_id = ? ORDER BY name ASC",
        )
        .bind(sub_county_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        rows.into_iter().map(Self::map_row_to_entity).collect()
    }

    async fn create(&self, record: &ParishRecord) -> DomainResult<Parish> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO parishes (id, name, code, sub_county_id, county_id, district_id, country_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&record.name)
        .bind(&record.code)
        .bind(record.sub_county_id.to_string())
        .bind(record.county_id.to_string())
        .bind(record.district_id.to_string())
        .bind(record.country_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateParish) -> DomainResult<Parish> {
        let existing = self.find_by_id(id).await?;
        let name = update_data.name.clone().unwrap_or(existing.name);
        let code = update_data.code.clone().unwrap_or(existing.code);

        query("UPDATE parishes SET name = ?, code = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&code)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}

/// Trait defining village repository operations
#[async_trait]
pub trait VillageRepository: FindById<Village> + DeleteById + Send + Sync {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Village>>;

    async fn find_by_parish(&self, parish_id: Uuid) -> DomainResult<Vec<Village>>;

    async fn create(&self, record: &VillageRecord) -> DomainResult<Village>;

    async fn update(&self, id: Uuid, update_data: &UpdateVillage) -> DomainResult<Village>;
}

/// SQLite implementation for VillageRepository
#[derive(Clone)]
pub struct SqliteVillageRepository {
    pool: SqlitePool,
}

impl SqliteVillageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row_to_entity(row: VillageRow) -> DomainResult<Village> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<Village> for SqliteVillageRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Village> {
        let row = query_as::<_, VillageRow>("SELECT * FROM villages WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Village".to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteVillageRepository {
    fn entity_name(&self) -> &'static str {
        "villages"
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let result = query("DELETE FROM villages WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound("Village".to_string(), id))
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
impl VillageRepository for SqliteVillageRepository {
    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<Village>> {
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let total: i64 = query_scalar("SELECT COUNT(*) FROM villages WHERE name LIKE ?")
                    .bind(&pattern)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, VillageRow>(
                    "SELECT * FROM villages WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
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
                let total: i64 = query_scalar("SELECT COUNT(*) FROM villages")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows = query_as::<_, VillageRow>(
                    "SELECT * FROM villages ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .collect::<DomainResult<Vec<Village>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn find_by_parish(&self, parish_id: Uuid) -> DomainResult<Vec<Village>> {
        let rows = query_as::<_, VillageRow>(
            "SELECT * FROM villages WHERE parish_id = ? ORDER BY name ASC",
        )
        .bind(parish_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        rows.into_iter().map(Self::map_row_to_entity).collect()
    }

    async fn create(&self, record: &VillageRecord) -> DomainResult<Village> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        query(
            "INSERT INTO villages (id, name, code, parish_id, sub_county_id, county_id, district_id, country_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&record.name)
        .bind(&record.code)
        .bind(record.parish_id.to_string())
        .bind(record.sub_county_id.to_string())
        .bind(record.county_id.to_string())
        .bind(record.district_id.to_string())
        .bind(record.country_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateVillage) -> DomainResult<Village> {
        let existing = self.find_by_id(id).await?;
        let name = update_data.name.clone().unwrap_or(existing.name);
        let code = update_data.code.clone().unwrap_or(existing.code);

        query("UPDATE villages SET name = ?, code = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&code)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}

/// Trait defining municipality/city repository operations
#[async_trait]
pub trait UrbanAreaRepository: FindById<UrbanArea> + DeleteById + Send + Sync {
    fn kind(&self) -> UrbanKind;

    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<UrbanArea>>;

    async fn find_by_sub_county(&self, sub_county_id: Uuid) -> DomainResult<Vec<UrbanArea>>;

    async fn create(&self, record: &UrbanAreaRecord) -> DomainResult<UrbanArea>;

    async fn update(&self, id: Uuid, update_data: &UpdateUrbanArea) -> DomainResult<UrbanArea>;
}

/// SQLite implementation for UrbanAreaRepository
///
/// Municipalities and cities share a column layout; one repository serves
/// both tables, parameterized by kind.
#[derive(Clone)]
pub struct SqliteUrbanAreaRepository {
    pool: SqlitePool,
    kind: UrbanKind,
}

impl SqliteUrbanAreaRepository {
    pub fn new(pool: SqlitePool, kind: UrbanKind) -> Self {
        Self { pool, kind }
    }

    fn map_row_to_entity(row: UrbanAreaRow) -> DomainResult<UrbanArea> {
        row.into_entity()
    }
}

#[async_trait]
impl FindById<UrbanArea> for SqliteUrbanAreaRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<UrbanArea> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", self.kind.table());
        let row = query_as::<_, UrbanAreaRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound(self.kind.entity_name().to_string(), id))?;

        Self::map_row_to_entity(row)
    }
}

#[async_trait]
impl DeleteById for SqliteUrbanAreaRepository {
    fn entity_name(&self) -> &'static str {
        self.kind.table()
    }

    async fn delete_with_tx(
        &self,
        id: Uuid,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> DomainResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.kind.table());
        let result = query(&sql)
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            Err(DomainError::EntityNotFound(self.kind.entity_name().to_string(), id))
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
impl UrbanAreaRepository for SqliteUrbanAreaRepository {
    fn kind(&self) -> UrbanKind {
        self.kind
    }

    async fn find_all(
        &self,
        params: PaginationParams,
        filter: &ListFilter,
    ) -> DomainResult<PaginatedResult<UrbanArea>> {
        let table = self.kind.table();
        let (total, rows) = match filter.search_term() {
            Some(term) => {
                let pattern = like_pattern(term);
                let count_sql = format!("SELECT COUNT(*) FROM {} WHERE name LIKE ?", table);
                let total: i64 = query_scalar(&count_sql)
                    .bind(&pattern)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows_sql = format!(
                    "SELECT * FROM {} WHERE name LIKE ? ORDER BY name ASC LIMIT ? OFFSET ?",
                    table
                );
                let rows = query_as::<_, UrbanAreaRow>(&rows_sql)
                    .bind(&pattern)
                    .bind(params.per_page as i64)
                    .bind(params.offset() as i64)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                (total, rows)
            }
            None => {
                let count_sql = format!("SELECT COUNT(*) FROM {}", table);
                let total: i64 = query_scalar(&count_sql)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DbError::from)?;
                let rows_sql =
                    format!("SELECT * FROM {} ORDER BY name ASC LIMIT ? OFFSET ?", table);
                let rows = query_as::<_, UrbanAreaRow>(&rows_sql)
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
            .collect::<DomainResult<Vec<UrbanArea>>>()?;

        Ok(PaginatedResult::new(entities, total as u64, params))
    }

    async fn find_by_sub_county(&self, sub_county_id: Uuid) -> DomainResult<Vec<UrbanArea>> {
        let sql = format!(
            "SELECT * FROM {} WHERE sub_county_id = ? ORDER BY name ASC",
            self.kind.table()
        );
        let rows = query_as::<_, UrbanAreaRow>(&sql)
            .bind(sub_county_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        rows.into_iter().map(Self::map_row_to_entity).collect()
    }

    async fn create(&self, record: &UrbanAreaRecord) -> DomainResult<UrbanArea> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        let sql = format!(
            "INSERT INTO {} (id, name, code, sub_county_id, county_id, district_id, country_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.kind.table()
        );
        query(&sql)
            .bind(id.to_string())
            .bind(&record.name)
            .bind(&record.code)
            .bind(record.sub_county_id.to_string())
            .bind(record.county_id.to_string())
            .bind(record.district_id.to_string())
            .bind(record.country_id.to_string())
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update_data: &UpdateUrbanArea) -> DomainResult<UrbanArea> {
        let existing = self.find_by_id(id).await?;
        let name = update_data.name.clone().unwrap_or(existing.name);
        let code = update_data.code.clone().unwrap_or(existing.code);

        let sql = format!(
            "UPDATE {} SET name = ?, code = ?, updated_at = ? WHERE id = ?",
            self.kind.table()
        );
        query(&sql)
            .bind(&name)
            .bind(&code)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        self.find_by_id(id).await
    }
}
