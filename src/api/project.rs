//! Actions for projects.

use crate::api::{try_service, ActionResponse, ListQuery};
use crate::auth::AuthContext;
use crate::domains::project::types::{NewProject, ProjectResponse, UpdateProject};
use crate::globals;
use crate::types::PaginatedResult;
use uuid::Uuid;

pub async fn create_project(new: NewProject, auth: &AuthContext) -> ActionResponse<ProjectResponse> {
    let service = try_service!(globals::get_project_service());
    ActionResponse::from_result("create_project", service.create_project(new, auth).await)
}

pub async fn get_project(id: Uuid, auth: &AuthContext) -> ActionResponse<ProjectResponse> {
    let service = try_service!(globals::get_project_service());
    ActionResponse::from_result("get_project", service.get_project_by_id(id, auth).await)
}

pub async fn list_projects(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<ProjectResponse>> {
    let service = try_service!(globals::get_project_service());
    ActionResponse::from_result(
        "list_projects",
        service.list_projects(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn update_project(id: Uuid, update: UpdateProject, auth: &AuthContext) -> ActionResponse<ProjectResponse> {
    let service = try_service!(globals::get_project_service());
    ActionResponse::from_result("update_project", service.update_project(id, update, auth).await)
}

pub async fn delete_project(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_project_service());
    ActionResponse::from_result("delete_project", service.delete_project(id, auth).await)
}
