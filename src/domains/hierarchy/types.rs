use crate::errors::{DomainError, DomainResult};
use crate::validation::{Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|_| DomainError::InvalidUuid(s.to_string()))
}

fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", s)))
}

/// Compact representation of a hierarchy entity for embedding in child
/// responses (the dashboard renders parent names next to each child).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSummary {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

/// Country entity - root of the administrative hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CountryRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CountryRow {
    pub fn into_entity(self) -> DomainResult<Country> {
        Ok(Country {
            id: parse_uuid(&self.id)?,
            name: self.name,
            code: self.code,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCountry {
    pub name: String,
    pub code: String,
}

impl Validate for NewCountry {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()?;
        ValidationBuilder::new("code", Some(self.code.clone()))
            .required()
            .max_length(16)
            .level_code()
            .validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCountry {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl Validate for UpdateCountry {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(100)
                .validate()?;
        }
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(16)
                .level_code()
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Country> for CountryResponse {
    fn from(c: Country) -> Self {
        Self {
            id: c.id,
            name: c.name,
            code: c.code,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<&Country> for LocationSummary {
    fn from(c: &Country) -> Self {
        Self { id: c.id, name: c.name.clone(), code: c.code.clone() }
    }
}

// ---------------------------------------------------------------------------
// District
// ---------------------------------------------------------------------------

/// District entity - belongs to one Country
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub country_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DistrictRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub country_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl DistrictRow {
    pub fn into_entity(self) -> DomainResult<District> {
        Ok(District {
            id: parse_uuid(&self.id)?,
            name: self.name,
            code: self.code,
            country_id: parse_uuid(&self.country_id)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDistrict {
    pub name: String,
    pub code: String,
    pub country_id: Uuid,
}

impl Validate for NewDistrict {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()?;
        ValidationBuilder::new("code", Some(self.code.clone()))
            .required()
            .max_length(16)
            .level_code()
            .validate()?;
        ValidationBuilder::new("country_id", Some(self.country_id))
            .not_nil()
            .validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDistrict {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl Validate for UpdateDistrict {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(100)
                .validate()?;
        }
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(16)
                .level_code()
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub country_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<LocationSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<District> for DistrictResponse {
    fn from(d: District) -> Self {
        Self {
            id: d.id,
            name: d.name,
            code: d.code,
            country_id: d.country_id,
            country: None,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl DistrictResponse {
    pub fn with_country(mut self, country: &Country) -> Self {
        self.country = Some(country.into());
        self
    }
}

impl From<&District> for LocationSummary {
    fn from(d: &District) -> Self {
        Self { id: d.id, name: d.name.clone(), code: d.code.clone() }
    }
}

// ---------------------------------------------------------------------------
// County
// ---------------------------------------------------------------------------

/// County entity - belongs to one District
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct County {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub country_id: Uuid,
    pub district_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CountyRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub country_id: String,
    pub district_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CountyRow {
    pub fn into_entity(self) -> DomainResult<County> {
        Ok(County {
            id: parse_uuid(&self.id)?,
            name: self.name,
            code: self.code,
            country_id: parse_uuid(&self.country_id)?,
            district_id: parse_uuid(&self.district_id)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// NewCounty DTO. `code` may be omitted; the service derives it from the
/// district code and the county name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCounty {
    pub name: String,
    pub code: Option<String>,
    pub district_id: Uuid,
}

impl Validate for NewCounty {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()?;
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(32)
                .level_code()
                .validate()?;
        }
        ValidationBuilder::new("district_id", Some(self.district_id))
            .not_nil()
            .validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCounty {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl Validate for UpdateCounty {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(100)
                .validate()?;
        }
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(32)
                .level_code()
                .validate()?;
        }
        Ok(())
    }
}

/// Fully resolved insert record for a county (ancestors filled in by the
/// service from the district row).
#[derive(Debug, Clone)]
pub struct CountyRecord {
    pub name: String,
    pub code: String,
    pub country_id: Uuid,
    pub district_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountyResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub country_id: Uuid,
    pub district_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<LocationSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<County> for CountyResponse {
    fn from(c: County) -> Self {
        Self {
            id: c.id,
            name: c.name,
            code: c.code,
            country_id: c.country_id,
            district_id: c.district_id,
            district: None,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl CountyResponse {
    pub fn with_district(mut self, district: &District) -> Self {
        self.district = Some(district.into());
        self
    }
}

impl From<&County> for LocationSummary {
    fn from(c: &County) -> Self {
        Self { id: c.id, name: c.name.clone(), code: c.code.clone() }
    }
}

// ---------------------------------------------------------------------------
// SubCounty
// ---------------------------------------------------------------------------

/// SubCounty entity - belongs to one County within a District
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCounty {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub district_id: Uuid,
    pub county_id: Uuid,
    pub country_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SubCountyRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub district_id: String,
    pub county_id: String,
    pub country_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl SubCountyRow {
    pub fn into_entity(self) -> DomainResult<SubCounty> {
        Ok(SubCounty {
            id: parse_uuid(&self.id)?,
            name: self.name,
            code: self.code,
            district_id: parse_uuid(&self.district_id)?,
            county_id: parse_uuid(&self.county_id)?,
            country_id: parse_uuid(&self.country_id)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// NewSubCounty DTO. Both the district and the county must resolve, and
/// the county must belong to the district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubCounty {
    pub name: String,
    pub code: Option<String>,
    pub district_id: Uuid,
    pub county_id: Uuid,
}

impl Validate for NewSubCounty {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()?;
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(32)
                .level_code()
                .validate()?;
        }
        ValidationBuilder::new("district_id", Some(self.district_id))
            .not_nil()
            .validate()?;
        ValidationBuilder::new("county_id", Some(self.county_id))
            .not_nil()
            .validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSubCounty {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl Validate for UpdateSubCounty {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(100)
                .validate()?;
        }
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(32)
                .level_code()
                .validate()?;
        }
        Ok(())
    }
}

/// Fully resolved insert record for a sub-county
#[derive(Debug, Clone)]
pub struct SubCountyRecord {
    pub name: String,
    pub code: String,
    pub district_id: Uuid,
    pub county_id: Uuid,
    pub country_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCountyResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub district_id: Uuid,
    pub county_id: Uuid,
    pub country_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<LocationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<LocationSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubCounty> for SubCountyResponse {
    fn from(s: SubCounty) -> Self {
        Self {
            id: s.id,
            name: s.name,
            code: s.code,
            district_id: s.district_id,
            county_id: s.county_id,
            country_id: s.country_id,
            district: None,
            county: None,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

impl From<&SubCounty> for LocationSummary {
    fn from(s: &SubCounty) -> Self {
        Self { id: s.id, name: s.name.clone(), code: s.code.clone() }
    }
}

// ---------------------------------------------------------------------------
// Parish
// ---------------------------------------------------------------------------

/// Parish entity - belongs to one SubCounty; ancestor ids cached on the row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parish {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ParishRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub sub_county_id: String,
    pub county_id: String,
    pub district_id: String,
    pub country_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ParishRow {
    pub fn into_entity(self) -> DomainResult<Parish> {
        Ok(Parish {
            id: parse_uuid(&self.id)?,
            name: self.name,
            code: self.code,
            sub_county_id: parse_uuid(&self.sub_county_id)?,
            county_id: parse_uuid(&self.county_id)?,
            district_id: parse_uuid(&self.district_id)?,
            country_id: parse_uuid(&self.country_id)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParish {
    pub name: String,
    pub code: Option<String>,
    pub sub_county_id: Uuid,
}

impl Validate for NewParish {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()?;
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(48)
                .level_code()
                .validate()?;
        }
        ValidationBuilder::new("sub_county_id", Some(self.sub_county_id))
            .not_nil()
            .validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateParish {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl Validate for UpdateParish {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(100)
                .validate()?;
        }
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(48)
                .level_code()
                .validate()?;
        }
        Ok(())
    }
}

/// Fully resolved insert record for a parish
#[derive(Debug, Clone)]
pub struct ParishRecord {
    pub name: String,
    pub code: String,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParishResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_county: Option<LocationSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Parish> for ParishResponse {
    fn from(p: Parish) -> Self {
        Self {
            id: p.id,
            name: p.name,
            code: p.code,
            sub_county_id: p.sub_county_id,
            county_id: p.county_id,
            district_id: p.district_id,
            country_id: p.country_id,
            sub_county: None,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<&Parish> for LocationSummary {
    fn from(p: &Parish) -> Self {
        Self { id: p.id, name: p.name.clone(), code: p.code.clone() }
    }
}

// ---------------------------------------------------------------------------
// Village
// ---------------------------------------------------------------------------

/// Village entity - leaf of the hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Village {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub parish_id: Uuid,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct VillageRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub parish_id: String,
    pub sub_county_id: String,
    pub county_id: String,
    pub district_id: String,
    pub country_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl VillageRow {
    pub fn into_entity(self) -> DomainResult<Village> {
        Ok(Village {
            id: parse_uuid(&self.id)?,
            name: self.name,
            code: self.code,
            parish_id: parse_uuid(&self.parish_id)?,
            sub_county_id: parse_uuid(&self.sub_county_id)?,
            county_id: parse_uuid(&self.county_id)?,
            district_id: parse_uuid(&self.district_id)?,
            country_id: parse_uuid(&self.country_id)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVillage {
    pub name: String,
    pub code: Option<String>,
    pub parish_id: Uuid,
}

impl Validate for NewVillage {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()?;
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(48)
                .level_code()
                .validate()?;
        }
        ValidationBuilder::new("parish_id", Some(self.parish_id))
            .not_nil()
            .validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateVillage {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl Validate for UpdateVillage {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(100)
                .validate()?;
        }
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(48)
                .level_code()
                .validate()?;
        }
        Ok(())
    }
}

/// Fully resolved insert record for a village
#[derive(Debug, Clone)]
pub struct VillageRecord {
    pub name: String,
    pub code: String,
    pub parish_id: Uuid,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VillageResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub parish_id: Uuid,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parish: Option<LocationSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Village> for VillageResponse {
    fn from(v: Village) -> Self {
        Self {
            id: v.id,
            name: v.name,
            code: v.code,
            parish_id: v.parish_id,
            sub_county_id: v.sub_county_id,
            county_id: v.county_id,
            district_id: v.district_id,
            country_id: v.country_id,
            parish: None,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Municipality / City
// ---------------------------------------------------------------------------

/// Urban administrative kind, anchored at sub-county level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrbanKind {
    Municipality,
    City,
}

impl UrbanKind {
    pub fn table(&self) -> &'static str {
        match self {
            UrbanKind::Municipality => "municipalities",
            UrbanKind::City => "cities",
        }
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            UrbanKind::Municipality => "Municipality",
            UrbanKind::City => "City",
        }
    }
}

/// Municipality or City entity - alternate leaf anchored at sub-county
/// level, carrying denormalized ancestor ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrbanArea {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UrbanAreaRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub sub_county_id: String,
    pub county_id: String,
    pub district_id: String,
    pub country_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UrbanAreaRow {
    pub fn into_entity(self) -> DomainResult<UrbanArea> {
        Ok(UrbanArea {
            id: parse_uuid(&self.id)?,
            name: self.name,
            code: self.code,
            sub_county_id: parse_uuid(&self.sub_county_id)?,
            county_id: parse_uuid(&self.county_id)?,
            district_id: parse_uuid(&self.district_id)?,
            country_id: parse_uuid(&self.country_id)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// New municipality/city DTO. `code` may be omitted; the service derives
/// it from the sub-county code and the entity name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUrbanArea {
    pub name: String,
    pub code: Option<String>,
    pub sub_county_id: Uuid,
}

impl Validate for NewUrbanArea {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()?;
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(48)
                .level_code()
                .validate()?;
        }
        ValidationBuilder::new("sub_county_id", Some(self.sub_county_id))
            .not_nil()
            .validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUrbanArea {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl Validate for UpdateUrbanArea {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(100)
                .validate()?;
        }
        if let Some(code) = &self.code {
            ValidationBuilder::new("code", Some(code.clone()))
                .max_length(48)
                .level_code()
                .validate()?;
        }
        Ok(())
    }
}

/// Fully resolved insert record for a municipality/city
#[derive(Debug, Clone)]
pub struct UrbanAreaRecord {
    pub name: String,
    pub code: String,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrbanAreaResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub sub_county_id: Uuid,
    pub county_id: Uuid,
    pub district_id: Uuid,
    pub country_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_county: Option<LocationSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UrbanArea> for UrbanAreaResponse {
    fn from(u: UrbanArea) -> Self {
        Self {
            id: u.id,
            name: u.name,
            code: u.code,
            sub_county_id: u.sub_county_id,
            county_id: u.county_id,
            district_id: u.district_id,
            country_id: u.country_id,
            sub_county: None,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}
