use crate::errors::{DomainError, DomainResult};
use crate::validation::{common, Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|_| DomainError::InvalidUuid(s.to_string()))
}

fn parse_opt_uuid(s: &Option<String>) -> DomainResult<Option<Uuid>> {
    s.as_deref().map(parse_uuid).transpose()
}

fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", s)))
}

/// Participant entity - a person record tied to an organization, used
/// for demographic aggregation only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub cluster_id: Uuid,
    pub project_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub phone: Option<String>,
    pub is_pwd: bool,
    pub disability_type: Option<String>,
    pub designation: Option<String>,
    pub enterprise: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// ParticipantRow - SQLite row representation
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub id: String,
    pub organization_id: String,
    pub cluster_id: String,
    pub project_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub phone: Option<String>,
    pub is_pwd: i64,
    pub disability_type: Option<String>,
    pub designation: Option<String>,
    pub enterprise: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ParticipantRow {
    pub fn into_entity(self) -> DomainResult<Participant> {
        Ok(Participant {
            id: parse_uuid(&self.id)?,
            organization_id: parse_uuid(&self.organization_id)?,
            cluster_id: parse_uuid(&self.cluster_id)?,
            project_id: parse_opt_uuid(&self.project_id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            sex: self.sex,
            age: self.age,
            phone: self.phone,
            is_pwd: self.is_pwd != 0,
            disability_type: self.disability_type,
            designation: self.designation,
            enterprise: self.enterprise,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// NewParticipant DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParticipant {
    pub organization_id: Uuid,
    pub cluster_id: Uuid,
    pub project_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_pwd: bool,
    pub disability_type: Option<String>,
    pub designation: Option<String>,
    pub enterprise: Option<String>,
}

impl Validate for NewParticipant {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("first_name", Some(self.first_name.clone()))
            .required()
            .max_length(80)
            .validate()?;
        ValidationBuilder::new("last_name", Some(self.last_name.clone()))
            .required()
            .max_length(80)
            .validate()?;
        ValidationBuilder::new("organization_id", Some(self.organization_id))
            .not_nil()
            .validate()?;
        ValidationBuilder::new("cluster_id", Some(self.cluster_id))
            .not_nil()
            .validate()?;
        if let Some(sex) = &self.sex {
            common::validate_sex(sex)?;
        }
        if let Some(age) = self.age {
            ValidationBuilder::new("age", Some(age)).range(0, 120).validate()?;
        }
        if let Some(phone) = &self.phone {
            ValidationBuilder::new("phone", Some(phone.clone()))
                .phone()
                .validate()?;
        }
        Ok(())
    }
}

/// UpdateParticipant DTO. Double options distinguish "leave unchanged"
/// (outer None) from "set to null" (inner None).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateParticipant {
    pub organization_id: Option<Uuid>,
    pub project_id: Option<Option<Uuid>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sex: Option<Option<String>>,
    pub age: Option<Option<i64>>,
    pub phone: Option<Option<String>>,
    pub is_pwd: Option<bool>,
    pub disability_type: Option<Option<String>>,
    pub designation: Option<Option<String>>,
    pub enterprise: Option<Option<String>>,
}

impl Validate for UpdateParticipant {
    fn validate(&self) -> DomainResult<()> {
        if let Some(first_name) = &self.first_name {
            ValidationBuilder::new("first_name", Some(first_name.clone()))
                .required()
                .max_length(80)
                .validate()?;
        }
        if let Some(last_name) = &self.last_name {
            ValidationBuilder::new("last_name", Some(last_name.clone()))
                .required()
                .max_length(80)
                .validate()?;
        }
        if let Some(Some(sex)) = &self.sex {
            common::validate_sex(sex)?;
        }
        if let Some(Some(age)) = self.age {
            ValidationBuilder::new("age", Some(age)).range(0, 120).validate()?;
        }
        if let Some(Some(phone)) = &self.phone {
            ValidationBuilder::new("phone", Some(phone.clone()))
                .phone()
                .validate()?;
        }
        Ok(())
    }
}

/// Participant response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub cluster_id: Uuid,
    pub project_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub phone: Option<String>,
    pub is_pwd: bool,
    pub disability_type: Option<String>,
    pub designation: Option<String>,
    pub enterprise: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        let full_name = p.full_name();
        Self {
            id: p.id,
            organization_id: p.organization_id,
            cluster_id: p.cluster_id,
            project_id: p.project_id,
            first_name: p.first_name,
            last_name: p.last_name,
            full_name,
            sex: p.sex,
            age: p.age,
            phone: p.phone,
            is_pwd: p.is_pwd,
            disability_type: p.disability_type,
            designation: p.designation,
            enterprise: p.enterprise,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// One labeled bucket in a demographic breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountBucket {
    pub label: String,
    pub count: i64,
    pub percentage: f64,
}

/// Aggregated demographics across all participants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicSummary {
    pub total: i64,
    pub by_sex: Vec<CountBucket>,
    pub by_age_group: Vec<CountBucket>,
    pub pwd_count: i64,
    pub pwd_percentage: f64,
}

impl DemographicSummary {
    pub fn percentage(count: i64, total: i64) -> f64 {
        if total == 0 {
            0.0
        } else {
            (count as f64 / total as f64) * 100.0
        }
    }
}
