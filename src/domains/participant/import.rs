use crate::domains::participant::types::NewParticipant;
use crate::errors::{DomainResult, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Target rows are attached to: every imported participant shares these
/// references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportTarget {
    pub organization_id: Uuid,
    pub cluster_id: Uuid,
    pub project_id: Option<Uuid>,
}

/// Canonical column keys after header normalization
const COL_FIRST_NAME: &str = "firstname";
const COL_LAST_NAME: &str = "lastname";
const COL_SEX: &str = "sex";
const COL_AGE: &str = "age";
const COL_PHONE: &str = "phone";
const COL_IS_PWD: &str = "ispwd";
const COL_DISABILITY_TYPE: &str = "disabilitytype";
const COL_DESIGNATION: &str = "designation";
const COL_ENTERPRISE: &str = "enterprise";

/// Lowercase a header and strip everything that is not a letter or
/// digit, then collapse known aliases onto canonical keys.
pub fn normalize_header(header: &str) -> String {
    let key: String = header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    match key.as_str() {
        "firstname" | "givenname" => COL_FIRST_NAME.to_string(),
        "lastname" | "surname" | "familyname" => COL_LAST_NAME.to_string(),
        "sex" | "gender" => COL_SEX.to_string(),
        "age" => COL_AGE.to_string(),
        "phone" | "phonenumber" | "telephone" | "contact" => COL_PHONE.to_string(),
        "ispwd" | "pwd" | "disability" | "disabled" | "hasdisability" => COL_IS_PWD.to_string(),
        "disabilitytype" | "typeofdisability" => COL_DISABILITY_TYPE.to_string(),
        "designation" | "position" | "title" => COL_DESIGNATION.to_string(),
        "enterprise" | "business" | "businessname" => COL_ENTERPRISE.to_string(),
        _ => key,
    }
}

/// "yes"/"no" style coercion used by boolean spreadsheet columns
pub fn coerce_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

fn cell(record: &HashMap<String, String>, key: &str) -> Option<String> {
    record
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse spreadsheet bytes (CSV) into participant DTOs for one target
/// organization. The whole sheet parses or the whole import fails; no
/// partial result is returned.
pub fn parse_participant_rows(
    data: &[u8],
    target: &ImportTarget,
) -> DomainResult<Vec<NewParticipant>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ValidationError::custom(&format!("Unreadable spreadsheet header: {}", e)))?
        .iter()
        .map(normalize_header)
        .collect();

    if !headers.iter().any(|h| h == COL_FIRST_NAME) || !headers.iter().any(|h| h == COL_LAST_NAME) {
        return Err(ValidationError::custom(
            "Spreadsheet must have first name and last name columns",
        )
        .into());
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // Header row is line 1
        let line = index + 2;
        let record = record.map_err(|e| {
            ValidationError::custom(&format!("Row {} is unreadable: {}", line, e))
        })?;

        let fields: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();

        let first_name = cell(&fields, COL_FIRST_NAME).ok_or_else(|| {
            ValidationError::custom(&format!("Row {}: first name is required", line))
        })?;
        let last_name = cell(&fields, COL_LAST_NAME).ok_or_else(|| {
            ValidationError::custom(&format!("Row {}: last name is required", line))
        })?;

        let sex = cell(&fields, COL_SEX).map(|s| s.to_lowercase());
        let age = match cell(&fields, COL_AGE) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                ValidationError::custom(&format!("Row {}: age '{}' is not a number", line, raw))
            })?),
            None => None,
        };

        rows.push(NewParticipant {
            organization_id: target.organization_id,
            cluster_id: target.cluster_id,
            project_id: target.project_id,
            first_name,
            last_name,
            sex,
            age,
            phone: cell(&fields, COL_PHONE),
            is_pwd: cell(&fields, COL_IS_PWD)
                .map(|v| coerce_bool(&v))
                .unwrap_or(false),
            disability_type: cell(&fields, COL_DISABILITY_TYPE),
            designation: cell(&fields, COL_DESIGNATION),
            enterprise: cell(&fields, COL_ENTERPRISE),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ImportTarget {
        ImportTarget {
            organization_id: Uuid::new_v4(),
            cluster_id: Uuid::new_v4(),
            project_id: None,
        }
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("First Name"), "firstname");
        assert_eq!(normalize_header("SURNAME"), "lastname");
        assert_eq!(normalize_header("Gender"), "sex");
        assert_eq!(normalize_header("Phone Number"), "phone");
        assert_eq!(normalize_header("Has Disability?"), "ispwd");
        assert_eq!(normalize_header("Something Else"), "somethingelse");
    }

    #[test]
    fn test_coerce_bool() {
        assert!(coerce_bool("Yes"));
        assert!(coerce_bool(" y "));
        assert!(coerce_bool("TRUE"));
        assert!(coerce_bool("1"));
        assert!(!coerce_bool("No"));
        assert!(!coerce_bool(""));
        assert!(!coerce_bool("maybe"));
    }

    #[test]
    fn test_parse_rows_maps_aliased_headers() {
        let csv = "First Name,Surname,Gender,Age,Phone Number,Disability\n\
                   Grace,Akello,Female,34,0772123456,Yes\n\
                   Peter,Okot,Male,28,,No\n";
        let rows = parse_participant_rows(csv.as_bytes(), &target()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].first_name, "Grace");
        assert_eq!(rows[0].sex.as_deref(), Some("female"));
        assert_eq!(rows[0].age, Some(34));
        assert!(rows[0].is_pwd);
        assert_eq!(rows[1].phone, None);
        assert!(!rows[1].is_pwd);
    }

    #[test]
    fn test_parse_rows_requires_name_columns() {
        let csv = "Gender,Age\nFemale,30\n";
        assert!(parse_participant_rows(csv.as_bytes(), &target()).is_err());
    }

    #[test]
    fn test_parse_rows_rejects_bad_age() {
        let csv = "First Name,Surname,Age\nGrace,Akello,thirty\n";
        let result = parse_participant_rows(csv.as_bytes(), &target());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rows_rejects_missing_name_cell() {
        let csv = "First Name,Surname\nGrace,\n";
        assert!(parse_participant_rows(csv.as_bytes(), &target()).is_err());
    }
}
