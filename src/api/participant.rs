//! Actions for participants, demographics and the spreadsheet import.

use crate::api::{try_service, ActionResponse, ListQuery};
use crate::auth::AuthContext;
use crate::domains::participant::import::ImportTarget;
use crate::domains::participant::types::{
    DemographicSummary, NewParticipant, ParticipantResponse, UpdateParticipant,
};
use crate::globals;
use crate::types::PaginatedResult;
use uuid::Uuid;

pub async fn create_participant(new: NewParticipant, auth: &AuthContext) -> ActionResponse<ParticipantResponse> {
    let service = try_service!(globals::get_participant_service());
    ActionResponse::from_result(
        "create_participant",
        service.create_participant(new, auth).await,
    )
}

pub async fn get_participant(id: Uuid, auth: &AuthContext) -> ActionResponse<ParticipantResponse> {
    let service = try_service!(globals::get_participant_service());
    ActionResponse::from_result(
        "get_participant",
        service.get_participant_by_id(id, auth).await,
    )
}

pub async fn list_participants(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<ParticipantResponse>> {
    let service = try_service!(globals::get_participant_service());
    ActionResponse::from_result(
        "list_participants",
        service.list_participants(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn participants_by_organization(organization_id: Uuid, query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<ParticipantResponse>> {
    let service = try_service!(globals::get_participant_service());
    ActionResponse::from_result(
        "participants_by_organization",
        service.participants_by_organization(organization_id, query.pagination(), auth).await,
    )
}

pub async fn update_participant(id: Uuid, update: UpdateParticipant, auth: &AuthContext) -> ActionResponse<ParticipantResponse> {
    let service = try_service!(globals::get_participant_service());
    ActionResponse::from_result(
        "update_participant",
        service.update_participant(id, update, auth).await,
    )
}

pub async fn delete_participant(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_participant_service());
    ActionResponse::from_result(
        "delete_participant",
        service.delete_participant(id, auth).await,
    )
}

pub async fn participant_demographics(auth: &AuthContext) -> ActionResponse<DemographicSummary> {
    let service = try_service!(globals::get_participant_service());
    ActionResponse::from_result(
        "participant_demographics",
        service.demographic_summary(auth).await,
    )
}

/// Bulk spreadsheet import: all rows insert or the whole call fails
pub async fn import_participants(target: ImportTarget, data: Vec<u8>, auth: &AuthContext) -> ActionResponse<Vec<ParticipantResponse>> {
    let service = try_service!(globals::get_participant_service());
    ActionResponse::from_result(
        "import_participants",
        service.import_participants(target, &data, auth).await,
    )
}
