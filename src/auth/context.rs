use uuid::Uuid;
use crate::types::{UserRole, Permission};
use crate::errors::ServiceError;

/// Represents the authentication context for the current operation
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The ID of the authenticated user
    pub user_id: Uuid,

    /// The role of the authenticated user
    pub role: UserRole,
}

impl AuthContext {
    /// Create a new authentication context
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Create a new authentication context for internal system operations
    pub fn internal_system_context() -> Self {
        Self {
            user_id: Uuid::nil(),
            role: UserRole::Admin,
        }
    }

    /// Check if user has a specific permission
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }

    /// Authorize a specific permission, returning an error if not allowed
    pub fn authorize(&self, permission: Permission) -> Result<(), ServiceError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "User does not have permission: {:?}",
                permission
            )))
        }
    }

    /// Verify user is an admin
    pub fn authorize_admin(&self) -> Result<(), ServiceError> {
        if matches!(self.role, UserRole::Admin) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(
                "This action requires administrator privileges".to_string()
            ))
        }
    }
}
