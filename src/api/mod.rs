//! Server-action surface: thin envelope-returning functions invoked by
//! the dashboard. Every action resolves a service from the global
//! registry, runs one operation, and folds the outcome into
//! `{ success, data?, error? }`.

pub mod hierarchy;
pub mod cluster;
pub mod organization;
pub mod project;
pub mod participant;

use crate::types::{ListFilter, PaginationParams, DEFAULT_PER_PAGE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// List-endpoint inputs as the dashboard sends them. `limit` is clamped
/// into `[1,100]` and `page` floored at 1 when converted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PER_PAGE,
            search: None,
        }
    }
}

impl ListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn filter(&self) -> ListFilter {
        ListFilter {
            search: self.search.clone(),
        }
    }
}

/// The envelope every action returns. Errors collapse to a display
/// string for the toast in the dashboard; the typed error ladder stays
/// internal.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }

    pub fn from_result<E: fmt::Display>(operation: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => {
                log::error!("{} failed: {}", operation, error);
                Self::err(error)
            }
        }
    }
}

/// Resolve a service from the registry or early-return an error envelope
macro_rules! try_service {
    ($getter:expr) => {
        match $getter {
            Ok(service) => service,
            Err(error) => return $crate::api::ActionResponse::err(error),
        }
    };
}

pub(crate) use try_service;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;

    #[test]
    fn test_envelope_shapes() {
        let ok = ActionResponse::ok(42);
        assert!(ok.success);
        assert_eq!(ok.data, Some(42));
        assert_eq!(ok.error, None);

        let err: ActionResponse<i32> = ActionResponse::from_result(
            "noop",
            Err::<i32, _>(ServiceError::PermissionDenied("nope".into())),
        );
        assert!(!err.success);
        assert_eq!(err.data, None);
        assert!(err.error.unwrap().contains("nope"));
    }

    #[test]
    fn test_envelope_serialization_omits_empty_fields() {
        let ok = ActionResponse::ok("x");
        let json = serde_json::to_string(&ok).unwrap();
        assert_eq!(json, r#"{"success":true,"data":"x"}"#);

        let err: ActionResponse<String> = ActionResponse::err("boom");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"boom"}"#);
    }
}
