use serde::{Deserialize, Serialize};

/// UserRole enum for authorization in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    ClusterLead,
    DataEntry,
}

/// Permission enum representing individual permissions in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    // Administrative hierarchy (countries..villages, municipalities, cities)
    ViewLocations,
    CreateLocations,
    EditLocations,
    DeleteLocations,

    // Cluster permissions
    ViewClusters,
    CreateClusters,
    EditClusters,
    DeleteClusters,
    ManageClusterMembers,
    ManageClusterUsers,

    // Organization permissions
    ViewOrganizations,
    CreateOrganizations,
    EditOrganizations,
    DeleteOrganizations,

    // Project permissions
    ViewProjects,
    CreateProjects,
    EditProjects,
    DeleteProjects,

    // Participant permissions
    ViewParticipants,
    CreateParticipants,
    EditParticipants,
    DeleteParticipants,
    ImportParticipants,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::ClusterLead => "cluster_lead",
            UserRole::DataEntry => "data_entry",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "cluster_lead" => Some(UserRole::ClusterLead),
            "data_entry" => Some(UserRole::DataEntry),
            _ => None,
        }
    }

    /// Check if the user has a specific permission
    pub fn has_permission(&self, permission: Permission) -> bool {
        match self {
            // Admin has all permissions
            UserRole::Admin => true,
            UserRole::ClusterLead => match permission {
                // Reference data is managed centrally
                Permission::CreateLocations
                | Permission::EditLocations
                | Permission::DeleteLocations
                | Permission::DeleteClusters
                | Permission::DeleteProjects => false,
                _ => true,
            },
            UserRole::DataEntry => match permission {
                Permission::ViewLocations
                | Permission::ViewClusters
                | Permission::ViewOrganizations
                | Permission::ViewProjects
                | Permission::ViewParticipants
                | Permission::CreateParticipants
                | Permission::EditParticipants
                | Permission::ImportParticipants => true,
                _ => false,
            },
        }
    }

    pub fn has_permissions(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has_permission(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::ClusterLead, UserRole::DataEntry] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("superuser"), None);
    }

    #[test]
    fn test_permission_matrix() {
        assert!(UserRole::Admin.has_permission(Permission::DeleteLocations));
        assert!(UserRole::ClusterLead.has_permission(Permission::CreateOrganizations));
        assert!(!UserRole::ClusterLead.has_permission(Permission::DeleteClusters));
        assert!(UserRole::DataEntry.has_permission(Permission::ImportParticipants));
        assert!(!UserRole::DataEntry.has_permission(Permission::CreateClusters));
    }
}
