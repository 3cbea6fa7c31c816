//! Actions for organizations.

use crate::api::{try_service, ActionResponse, ListQuery};
use crate::auth::AuthContext;
use crate::domains::organization::types::{NewOrganization, OrganizationResponse, UpdateOrganization};
use crate::globals;
use crate::types::PaginatedResult;
use uuid::Uuid;

pub async fn create_organization(new: NewOrganization, auth: &AuthContext) -> ActionResponse<OrganizationResponse> {
    let service = try_service!(globals::get_organization_service());
    ActionResponse::from_result(
        "create_organization",
        service.create_organization(new, auth).await,
    )
}

pub async fn get_organization(id: Uuid, auth: &AuthContext) -> ActionResponse<OrganizationResponse> {
    let service = try_service!(globals::get_organization_service());
    ActionResponse::from_result(
        "get_organization",
        service.get_organization_by_id(id, auth).await,
    )
}

pub async fn list_organizations(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<OrganizationResponse>> {
    let service = try_service!(globals::get_organization_service());
    ActionResponse::from_result(
        "list_organizations",
        service.list_organizations(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn organizations_by_cluster(cluster_id: Uuid, query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<OrganizationResponse>> {
    let service = try_service!(globals::get_organization_service());
    ActionResponse::from_result(
        "organizations_by_cluster",
        service.organizations_by_cluster(cluster_id, query.pagination(), auth).await,
    )
}

pub async fn update_organization(id: Uuid, update: UpdateOrganization, auth: &AuthContext) -> ActionResponse<OrganizationResponse> {
    let service = try_service!(globals::get_organization_service());
    ActionResponse::from_result(
        "update_organization",
        service.update_organization(id, update, auth).await,
    )
}

pub async fn delete_organization(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_organization_service());
    ActionResponse::from_result(
        "delete_organization",
        service.delete_organization(id, auth).await,
    )
}
