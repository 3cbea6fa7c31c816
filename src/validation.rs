use crate::errors::{ValidationError, DomainResult, DomainError};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use sqlx::{query_scalar, SqlitePool};
use uuid::Uuid;

/// A trait that entities should implement for validation.
pub trait Validate {
    /// Validates the entity and returns an error if validation fails.
    fn validate(&self) -> DomainResult<()>;
}

// Common regex patterns
fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[0-9]{8,15}$").unwrap())
}

fn code_regex() -> &'static Regex {
    static CODE_REGEX: OnceLock<Regex> = OnceLock::new();
    // Level codes like "UG", "KLA" or derived ones like "KLA-NAK"
    CODE_REGEX.get_or_init(|| Regex::new(r"^[A-Z0-9]+(-[A-Z0-9]+)*$").unwrap())
}

/// Struct for configuring validations in a fluent style
#[derive(Default)]
pub struct ValidationBuilder<T> {
    field_name: String,
    value: Option<T>,
    errors: Vec<ValidationError>,
}

/// Generic validation implementations
impl<T> ValidationBuilder<T> {
    pub fn new(field_name: &str, value: Option<T>) -> Self {
        Self {
            field_name: field_name.to_string(),
            value,
            errors: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self
    where T: Default + PartialEq {
        if self.value.is_none() || self.value == Some(T::default()) {
            self.errors.push(ValidationError::required(&self.field_name));
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> DomainResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            // Return the first error for simplicity
            Err(DomainError::Validation(self.errors[0].clone()))
        }
    }
}

/// String-specific validations
impl ValidationBuilder<String> {
    pub fn min_length(mut self, min: usize) -> Self {
        if let Some(value) = &self.value {
            if value.len() < min {
                self.errors.push(ValidationError::min_length(&self.field_name, min));
            }
        }
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        if let Some(value) = &self.value {
            if value.len() > max {
                self.errors.push(ValidationError::max_length(&self.field_name, max));
            }
        }
        self
    }

    pub fn matches_pattern(mut self, pattern: &Regex, message: &str) -> Self {
        if let Some(value) = &self.value {
            if !pattern.is_match(value) {
                self.errors.push(ValidationError::format(&self.field_name, message));
            }
        }
        self
    }

    pub fn phone(self) -> Self {
        self.matches_pattern(phone_regex(), "must be a valid phone number")
    }

    /// Location/level codes: uppercase alphanumeric segments joined by '-'
    pub fn level_code(self) -> Self {
        self.matches_pattern(
            code_regex(),
            "must be uppercase letters/digits, optionally dash-separated",
        )
    }

    pub fn one_of(mut self, allowed_values: &[&str], message: Option<&str>) -> Self {
        if let Some(value) = &self.value {
            if !allowed_values.contains(&value.as_str()) {
                let reason = message.unwrap_or("must be one of the allowed values");
                self.errors.push(ValidationError::invalid_value(&self.field_name, reason));
            }
        }
        self
    }
}

/// Numeric validations
impl<T> ValidationBuilder<T>
where T: PartialOrd + Clone + std::fmt::Display
{
    pub fn min(mut self, min: T) -> Self {
        if let Some(value) = &self.value {
            if value < &min {
                self.errors.push(ValidationError::range(
                    &self.field_name,
                    min.to_string(),
                    "maximum".to_string()
                ));
            }
        }
        self
    }

    pub fn max(mut self, max: T) -> Self {
        if let Some(value) = &self.value {
            if value > &max {
                self.errors.push(ValidationError::range(
                    &self.field_name,
                    "minimum".to_string(),
                    max.to_string()
                ));
            }
        }
        self
    }

    pub fn range(mut self, min: T, max: T) -> Self {
        if let Some(value) = &self.value {
            if value < &min || value > &max {
                self.errors.push(ValidationError::range(
                    &self.field_name,
                    min.to_string(),
                    max.to_string()
                ));
            }
        }
        self
    }
}

/// UUID validation helpers
impl ValidationBuilder<Uuid> {
    pub fn not_nil(mut self) -> Self {
        if let Some(value) = &self.value {
            if *value == Uuid::nil() {
                self.errors.push(ValidationError::invalid_value(
                    &self.field_name,
                    "cannot be a nil UUID"
                ));
            }
        }
        self
    }
}

/// Validation utility for checking entity exists in the database
pub async fn validate_entity_exists(
    pool: &SqlitePool,
    table: &str,
    id: &Uuid,
    field_name: &str,
) -> DomainResult<()> {
    let query = format!("SELECT COUNT(*) FROM {} WHERE id = ?", table);

    let count: i64 = query_scalar(&query)
        .bind(id.to_string())
        .fetch_one(pool)
        .await
        .map_err(|e| DomainError::Database(e.into()))?;

    if count == 0 {
        return Err(DomainError::Validation(
            ValidationError::relationship(&format!("{} does not exist", field_name))
        ));
    }

    Ok(())
}

// Common validation utility module for frequently validated fields
pub mod common {
    use super::*;

    pub const SEX_VALUES: &[&str] = &["male", "female", "other"];

    pub async fn validate_country_exists(
        pool: &SqlitePool,
        country_id: &Uuid,
        field_name: &str,
    ) -> DomainResult<()> {
        validate_entity_exists(pool, "countries", country_id, field_name).await
    }

    pub async fn validate_cluster_exists(
        pool: &SqlitePool,
        cluster_id: &Uuid,
        field_name: &str,
    ) -> DomainResult<()> {
        validate_entity_exists(pool, "clusters", cluster_id, field_name).await
    }

    pub async fn validate_organization_exists(
        pool: &SqlitePool,
        organization_id: &Uuid,
        field_name: &str,
    ) -> DomainResult<()> {
        validate_entity_exists(pool, "organizations", organization_id, field_name).await
    }

    pub async fn validate_project_exists(
        pool: &SqlitePool,
        project_id: &Uuid,
        field_name: &str,
    ) -> DomainResult<()> {
        validate_entity_exists(pool, "projects", project_id, field_name).await
    }

    pub fn validate_sex(sex: &str) -> DomainResult<()> {
        ValidationBuilder::new("sex", Some(sex.to_string()))
            .one_of(SEX_VALUES, None)
            .validate()
    }

    pub fn validate_date_format(date_str: &str, field_name: &str) -> DomainResult<()> {
        match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
            Ok(_) => Ok(()),
            Err(_) => Err(DomainError::Validation(ValidationError::format(
                field_name,
                "must be in the format YYYY-MM-DD",
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_validation() {
        assert!(phone_regex().is_match("0772123456"));
        assert!(phone_regex().is_match("+256772123456"));
        assert!(!phone_regex().is_match("123"));
        assert!(!phone_regex().is_match("not-a-phone"));
    }

    #[test]
    fn test_level_code_validation() {
        assert!(code_regex().is_match("UG"));
        assert!(code_regex().is_match("KLA-NAK"));
        assert!(code_regex().is_match("KLA-NAK-KIS"));
        assert!(!code_regex().is_match("kla"));
        assert!(!code_regex().is_match("KLA-"));
        assert!(!code_regex().is_match(""));
    }

    #[test]
    fn test_validation_builder() {
        let result = ValidationBuilder::new("name", Some("".to_string()))
            .required()
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("name", Some("test".to_string()))
            .required()
            .min_length(5)
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("code", Some("UG".to_string()))
            .level_code()
            .validate();
        assert!(result.is_ok());

        let result = ValidationBuilder::new("age", Some(15))
            .min(18)
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("age", Some(25))
            .range(18, 65)
            .validate();
        assert!(result.is_ok());

        let value: Option<String> = None;
        let result = ValidationBuilder::new("name", value)
            .required()
            .validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_common_validations() {
        assert!(common::validate_sex("female").is_ok());
        assert!(common::validate_sex("unknown").is_err());

        assert!(common::validate_date_format("2024-01-01", "start_date").is_ok());
        assert!(common::validate_date_format("01/01/2024", "start_date").is_err());
    }
}
