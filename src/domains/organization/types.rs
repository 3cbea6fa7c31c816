use crate::domains::cluster::types::Cluster;
use crate::domains::project::types::ProjectSummary;
use crate::errors::{DomainError, DomainResult};
use crate::validation::{Validate, ValidationBuilder};
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

/// Organization entity - located within the administrative hierarchy,
/// tied to a cluster and optionally a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub acronym: Option<String>,
    pub cluster_id: Uuid,
    pub project_id: Option<Uuid>,
    pub country_id: Uuid,
    pub district_id: Uuid,
    pub sub_county_id: Uuid,
    pub parish_id: Option<Uuid>,
    pub village_id: Option<Uuid>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// OrganizationRow - SQLite row representation
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationRow {
    pub id: String,
    pub name: String,
    pub acronym: Option<String>,
    pub cluster_id: String,
    pub project_id: Option<String>,
    pub country_id: String,
    pub district_id: String,
    pub sub_county_id: String,
    pub parish_id: Option<String>,
    pub village_id: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl OrganizationRow {
    pub fn into_entity(self) -> DomainResult<Organization> {
        Ok(Organization {
            id: parse_uuid(&self.id)?,
            name: self.name,
            acronym: self.acronym,
            cluster_id: parse_uuid(&self.cluster_id)?,
            project_id: parse_opt_uuid(&self.project_id)?,
            country_id: parse_uuid(&self.country_id)?,
            district_id: parse_uuid(&self.district_id)?,
            sub_county_id: parse_uuid(&self.sub_county_id)?,
            parish_id: parse_opt_uuid(&self.parish_id)?,
            village_id: parse_opt_uuid(&self.village_id)?,
            address: self.address,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// NewOrganization DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    pub acronym: Option<String>,
    pub cluster_id: Uuid,
    pub project_id: Option<Uuid>,
    pub country_id: Uuid,
    pub district_id: Uuid,
    pub sub_county_id: Uuid,
    pub parish_id: Option<Uuid>,
    pub village_id: Option<Uuid>,
    pub address: Option<String>,
}

impl Validate for NewOrganization {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(150)
            .validate()?;
        if let Some(acronym) = &self.acronym {
            ValidationBuilder::new("acronym", Some(acronym.clone()))
                .max_length(16)
                .validate()?;
        }
        ValidationBuilder::new("cluster_id", Some(self.cluster_id))
            .not_nil()
            .validate()?;
        ValidationBuilder::new("country_id", Some(self.country_id))
            .not_nil()
            .validate()?;
        ValidationBuilder::new("district_id", Some(self.district_id))
            .not_nil()
            .validate()?;
        ValidationBuilder::new("sub_county_id", Some(self.sub_county_id))
            .not_nil()
            .validate()?;
        if let Some(address) = &self.address {
            ValidationBuilder::new("address", Some(address.clone()))
                .max_length(300)
                .validate()?;
        }
        Ok(())
    }
}

/// UpdateOrganization DTO. Double options distinguish "leave unchanged"
/// (outer None) from "set to null" (inner None).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub acronym: Option<Option<String>>,
    pub cluster_id: Option<Uuid>,
    pub project_id: Option<Option<Uuid>>,
    pub country_id: Option<Uuid>,
    pub district_id: Option<Uuid>,
    pub sub_county_id: Option<Uuid>,
    pub parish_id: Option<Option<Uuid>>,
    pub village_id: Option<Option<Uuid>>,
    pub address: Option<Option<String>>,
}

impl Validate for UpdateOrganization {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(150)
                .validate()?;
        }
        if let Some(Some(acronym)) = &self.acronym {
            ValidationBuilder::new("acronym", Some(acronym.clone()))
                .max_length(16)
                .validate()?;
        }
        if let Some(cluster_id) = self.cluster_id {
            ValidationBuilder::new("cluster_id", Some(cluster_id))
                .not_nil()
                .validate()?;
        }
        if let Some(Some(address)) = &self.address {
            ValidationBuilder::new("address", Some(address.clone()))
                .max_length(300)
                .validate()?;
        }
        Ok(())
    }
}

/// Compact cluster representation for nested responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Cluster> for ClusterSummary {
    fn from(c: &Cluster) -> Self {
        Self { id: c.id, name: c.name.clone() }
    }
}

/// Organization response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationResponse {
    pub id: Uuid,
    pub name: String,
    pub acronym: Option<String>,
    pub cluster_id: Uuid,
    pub project_id: Option<Uuid>,
    pub country_id: Uuid,
    pub district_id: Uuid,
    pub sub_county_id: Uuid,
    pub parish_id: Option<Uuid>,
    pub village_id: Option<Uuid>,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationResponse {
    fn from(o: Organization) -> Self {
        Self {
            id: o.id,
            name: o.name,
            acronym: o.acronym,
            cluster_id: o.cluster_id,
            project_id: o.project_id,
            country_id: o.country_id,
            district_id: o.district_id,
            sub_county_id: o.sub_county_id,
            parish_id: o.parish_id,
            village_id: o.village_id,
            address: o.address,
            cluster: None,
            project: None,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}
