use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::validation::{Validate, ValidationBuilder};
use chrono::{DateTime, NaiveDate, Utc};
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

fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", s)))
}

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planned,
    Active,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(ProjectStatus::Planned),
            "active" => Some(ProjectStatus::Active),
            "on_hold" => Some(ProjectStatus::OnHold),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }
}

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// ProjectRow - SQLite row representation
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectRow {
    pub fn into_entity(self) -> DomainResult<Project> {
        Ok(Project {
            id: parse_uuid(&self.id)?,
            name: self.name,
            acronym: self.acronym,
            description: self.description,
            status: ProjectStatus::from_str(&self.status)
                .ok_or_else(|| DomainError::Internal(format!("Invalid project status: {}", self.status)))?,
            start_date: self.start_date.as_deref().map(parse_date).transpose()?,
            end_date: self.end_date.as_deref().map(parse_date).transpose()?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// NewProject DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Validate for NewProject {
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
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(DomainError::Validation(ValidationError::invalid_value(
                    "end_date",
                    "cannot be before start_date",
                )));
            }
        }
        Ok(())
    }
}

/// UpdateProject DTO. Double options distinguish "leave unchanged"
/// (outer None) from "set to null" (inner None).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub acronym: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl Validate for UpdateProject {
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
        if let (Some(Some(start)), Some(Some(end))) = (self.start_date, self.end_date) {
            if end < start {
                return Err(DomainError::Validation(ValidationError::invalid_value(
                    "end_date",
                    "cannot be before start_date",
                )));
            }
        }
        Ok(())
    }
}

/// Project response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            acronym: p.acronym,
            description: p.description,
            status: p.status,
            start_date: p.start_date,
            end_date: p.end_date,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Basic project summary for nested responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub acronym: Option<String>,
    pub status: ProjectStatus,
}

impl From<&Project> for ProjectSummary {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            acronym: p.acronym.clone(),
            status: p.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ProjectStatus::Planned,
            ProjectStatus::Active,
            ProjectStatus::OnHold,
            ProjectStatus::Completed,
        ] {
            assert_eq!(ProjectStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ProjectStatus::from_str("cancelled"), None);
    }

    #[test]
    fn test_new_project_date_ordering() {
        let project = NewProject {
            name: "Water Access".into(),
            acronym: None,
            description: None,
            status: None,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        assert!(project.validate().is_err());
    }
}
