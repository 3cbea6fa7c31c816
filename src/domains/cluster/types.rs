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

/// Role of a user within a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterUserRole {
    Lead,
    Member,
    Viewer,
}

impl ClusterUserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterUserRole::Lead => "lead",
            ClusterUserRole::Member => "member",
            ClusterUserRole::Viewer => "viewer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lead" => Some(ClusterUserRole::Lead),
            "member" => Some(ClusterUserRole::Member),
            "viewer" => Some(ClusterUserRole::Viewer),
            _ => None,
        }
    }
}

/// Cluster entity - a named grouping of organizations within a
/// country/district scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: Uuid,
    pub name: String,
    pub about: Option<String>,
    pub country_id: Option<Uuid>,
    pub district_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// ClusterRow - SQLite row representation. `district_ids` is a JSON
/// array column.
#[derive(Debug, Clone, FromRow)]
pub struct ClusterRow {
    pub id: String,
    pub name: String,
    pub about: Option<String>,
    pub country_id: Option<String>,
    pub district_ids: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ClusterRow {
    pub fn into_entity(self) -> DomainResult<Cluster> {
        let district_id_strings: Vec<String> = serde_json::from_str(&self.district_ids)
            .map_err(|e| DomainError::Internal(format!("Invalid district_ids JSON: {}", e)))?;
        let district_ids = district_id_strings
            .iter()
            .map(|s| parse_uuid(s))
            .collect::<DomainResult<Vec<Uuid>>>()?;

        Ok(Cluster {
            id: parse_uuid(&self.id)?,
            name: self.name,
            about: self.about,
            country_id: self.country_id.as_deref().map(parse_uuid).transpose()?,
            district_ids,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// NewCluster DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCluster {
    pub name: String,
    pub about: Option<String>,
    pub country_id: Option<Uuid>,
    #[serde(default)]
    pub district_ids: Vec<Uuid>,
}

impl Validate for NewCluster {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .min_length(2)
            .max_length(100)
            .validate()?;
        if let Some(about) = &self.about {
            ValidationBuilder::new("about", Some(about.clone()))
                .max_length(2000)
                .validate()?;
        }
        if let Some(country_id) = self.country_id {
            ValidationBuilder::new("country_id", Some(country_id))
                .not_nil()
                .validate()?;
        }
        Ok(())
    }
}

/// UpdateCluster DTO. Double options distinguish "leave unchanged"
/// (outer None) from "set to null" (inner None).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCluster {
    pub name: Option<String>,
    pub about: Option<Option<String>>,
    pub country_id: Option<Option<Uuid>>,
    pub district_ids: Option<Vec<Uuid>>,
}

impl Validate for UpdateCluster {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .min_length(2)
                .max_length(100)
                .validate()?;
        }
        if let Some(Some(about)) = &self.about {
            ValidationBuilder::new("about", Some(about.clone()))
                .max_length(2000)
                .validate()?;
        }
        if let Some(Some(country_id)) = self.country_id {
            ValidationBuilder::new("country_id", Some(country_id))
                .not_nil()
                .validate()?;
        }
        Ok(())
    }
}

/// An organization's membership of a cluster, joined with the
/// organization row for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterMemberSummary {
    pub organization_id: Uuid,
    pub name: String,
    pub acronym: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ClusterMemberRow {
    pub organization_id: String,
    pub name: String,
    pub acronym: Option<String>,
    pub created_at: String,
}

impl ClusterMemberRow {
    pub fn into_summary(self) -> DomainResult<ClusterMemberSummary> {
        Ok(ClusterMemberSummary {
            organization_id: parse_uuid(&self.organization_id)?,
            name: self.name,
            acronym: self.acronym,
            joined_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// A user's role assignment on a cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterUser {
    pub cluster_id: Uuid,
    pub user_id: Uuid,
    pub role: ClusterUserRole,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ClusterUserRow {
    pub cluster_id: String,
    pub user_id: String,
    pub role: String,
    pub created_at: String,
}

impl ClusterUserRow {
    pub fn into_entity(self) -> DomainResult<ClusterUser> {
        Ok(ClusterUser {
            cluster_id: parse_uuid(&self.cluster_id)?,
            user_id: parse_uuid(&self.user_id)?,
            role: ClusterUserRole::from_str(&self.role)
                .ok_or_else(|| DomainError::Internal(format!("Invalid cluster role: {}", self.role)))?,
            assigned_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// Cluster response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterResponse {
    pub id: Uuid,
    pub name: String,
    pub about: Option<String>,
    pub country_id: Option<Uuid>,
    pub district_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Cluster> for ClusterResponse {
    fn from(c: Cluster) -> Self {
        Self {
            id: c.id,
            name: c.name,
            about: c.about,
            country_id: c.country_id,
            district_ids: c.district_ids,
            member_count: None,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_user_role_round_trip() {
        for role in [ClusterUserRole::Lead, ClusterUserRole::Member, ClusterUserRole::Viewer] {
            assert_eq!(ClusterUserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(ClusterUserRole::from_str("owner"), None);
    }

    #[test]
    fn test_cluster_row_parses_district_ids_json() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let row = ClusterRow {
            id: Uuid::new_v4().to_string(),
            name: "Northern Cluster".into(),
            about: None,
            country_id: None,
            district_ids: format!(r#"["{}","{}"]"#, a, b),
            created_at: Utc::now().to_rfc3339(),
            updated_at: Utc::now().to_rfc3339(),
        };
        let cluster = row.into_entity().unwrap();
        assert_eq!(cluster.district_ids, vec![a, b]);
    }

    #[test]
    fn test_cluster_row_rejects_bad_json() {
        let row = ClusterRow {
            id: Uuid::new_v4().to_string(),
            name: "Broken".into(),
            about: None,
            country_id: None,
            district_ids: "not-json".into(),
            created_at: Utc::now().to_rfc3339(),
            updated_at: Utc::now().to_rfc3339(),
        };
        assert!(row.into_entity().is_err());
    }
}
