//! Actions for clusters and their membership join tables.

use crate::api::{try_service, ActionResponse, ListQuery};
use crate::auth::AuthContext;
use crate::domains::cluster::types::{
    ClusterMemberSummary, ClusterResponse, ClusterUser, ClusterUserRole, NewCluster, UpdateCluster,
};
use crate::globals;
use crate::types::PaginatedResult;
use uuid::Uuid;

pub async fn create_cluster(new: NewCluster, auth: &AuthContext) -> ActionResponse<ClusterResponse> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result("create_cluster", service.create_cluster(new, auth).await)
}

pub async fn get_cluster(id: Uuid, auth: &AuthContext) -> ActionResponse<ClusterResponse> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result("get_cluster", service.get_cluster_by_id(id, auth).await)
}

pub async fn list_clusters(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<ClusterResponse>> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result(
        "list_clusters",
        service.list_clusters(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn update_cluster(id: Uuid, update: UpdateCluster, auth: &AuthContext) -> ActionResponse<ClusterResponse> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result("update_cluster", service.update_cluster(id, update, auth).await)
}

pub async fn delete_cluster(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result("delete_cluster", service.delete_cluster(id, auth).await)
}

pub async fn add_cluster_member(cluster_id: Uuid, organization_id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result(
        "add_cluster_member",
        service.add_member(cluster_id, organization_id, auth).await,
    )
}

pub async fn remove_cluster_member(cluster_id: Uuid, organization_id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result(
        "remove_cluster_member",
        service.remove_member(cluster_id, organization_id, auth).await,
    )
}

pub async fn list_cluster_members(cluster_id: Uuid, query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<ClusterMemberSummary>> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result(
        "list_cluster_members",
        service.list_members(cluster_id, query.pagination(), auth).await,
    )
}

pub async fn assign_cluster_user(cluster_id: Uuid, user_id: Uuid, role: ClusterUserRole, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result(
        "assign_cluster_user",
        service.assign_user(cluster_id, user_id, role, auth).await,
    )
}

pub async fn remove_cluster_user(cluster_id: Uuid, user_id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result(
        "remove_cluster_user",
        service.remove_user(cluster_id, user_id, auth).await,
    )
}

pub async fn list_cluster_users(cluster_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<ClusterUser>> {
    let service = try_service!(globals::get_cluster_service());
    ActionResponse::from_result("list_cluster_users", service.list_users(cluster_id, auth).await)
}
