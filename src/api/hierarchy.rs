//! Actions for the administrative hierarchy: CRUD per level plus the
//! child queries behind the cascading location selectors.

use crate::api::{try_service, ActionResponse, ListQuery};
use crate::auth::AuthContext;
use crate::domains::hierarchy::types::{
    CountryResponse, CountyResponse, DistrictResponse, NewCountry, NewCounty, NewDistrict,
    NewParish, NewSubCounty, NewUrbanArea, NewVillage, ParishResponse, SubCountyResponse,
    UpdateCountry, UpdateCounty, UpdateDistrict, UpdateParish, UpdateSubCounty, UpdateUrbanArea,
    UpdateVillage, UrbanAreaResponse, UrbanKind, VillageResponse,
};
use crate::globals;
use crate::types::PaginatedResult;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Countries
// ---------------------------------------------------------------------------

pub async fn create_country(new: NewCountry, auth: &AuthContext) -> ActionResponse<CountryResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("create_country", service.create_country(new, auth).await)
}

pub async fn get_country(id: Uuid, auth: &AuthContext) -> ActionResponse<CountryResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("get_country", service.get_country_by_id(id, auth).await)
}

pub async fn list_countries(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<CountryResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "list_countries",
        service.list_countries(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn update_country(id: Uuid, update: UpdateCountry, auth: &AuthContext) -> ActionResponse<CountryResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("update_country", service.update_country(id, update, auth).await)
}

pub async fn delete_country(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("delete_country", service.delete_country(id, auth).await)
}

// ---------------------------------------------------------------------------
// Districts
// ---------------------------------------------------------------------------

pub async fn create_district(new: NewDistrict, auth: &AuthContext) -> ActionResponse<DistrictResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("create_district", service.create_district(new, auth).await)
}

pub async fn get_district(id: Uuid, auth: &AuthContext) -> ActionResponse<DistrictResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("get_district", service.get_district_by_id(id, auth).await)
}

pub async fn list_districts(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<DistrictResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "list_districts",
        service.list_districts(query.pagination(), query.filter(), auth).await,
    )
}

/// Children of a country, for the district dropdown
pub async fn districts_by_country(country_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<DistrictResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "districts_by_country",
        service.districts_by_country(country_id, auth).await,
    )
}

pub async fn update_district(id: Uuid, update: UpdateDistrict, auth: &AuthContext) -> ActionResponse<DistrictResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("update_district", service.update_district(id, update, auth).await)
}

pub async fn delete_district(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("delete_district", service.delete_district(id, auth).await)
}

// ---------------------------------------------------------------------------
// Counties
// ---------------------------------------------------------------------------

pub async fn create_county(new: NewCounty, auth: &AuthContext) -> ActionResponse<CountyResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("create_county", service.create_county(new, auth).await)
}

pub async fn get_county(id: Uuid, auth: &AuthContext) -> ActionResponse<CountyResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("get_county", service.get_county_by_id(id, auth).await)
}

pub async fn list_counties(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<CountyResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "list_counties",
        service.list_counties(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn counties_by_district(district_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<CountyResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "counties_by_district",
        service.counties_by_district(district_id, auth).await,
    )
}

pub async fn update_county(id: Uuid, update: UpdateCounty, auth: &AuthContext) -> ActionResponse<CountyResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("update_county", service.update_county(id, update, auth).await)
}

pub async fn delete_county(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("delete_county", service.delete_county(id, auth).await)
}

// ---------------------------------------------------------------------------
// Sub-counties
// ---------------------------------------------------------------------------

pub async fn create_sub_county(new: NewSubCounty, auth: &AuthContext) -> ActionResponse<SubCountyResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("create_sub_county", service.create_sub_county(new, auth).await)
}

pub async fn get_sub_county(id: Uuid, auth: &AuthContext) -> ActionResponse<SubCountyResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("get_sub_county", service.get_sub_county_by_id(id, auth).await)
}

pub async fn list_sub_counties(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<SubCountyResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "list_sub_counties",
        service.list_sub_counties(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn sub_counties_by_district(district_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<SubCountyResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "sub_counties_by_district",
        service.sub_counties_by_district(district_id, auth).await,
    )
}

pub async fn sub_counties_by_county(county_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<SubCountyResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "sub_counties_by_county",
        service.sub_counties_by_county(county_id, auth).await,
    )
}

pub async fn update_sub_county(id: Uuid, update: UpdateSubCounty, auth: &AuthContext) -> ActionResponse<SubCountyResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("update_sub_county", service.update_sub_county(id, update, auth).await)
}

pub async fn delete_sub_county(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("delete_sub_county", service.delete_sub_county(id, auth).await)
}

// ---------------------------------------------------------------------------
// Parishes
// ---------------------------------------------------------------------------

pub async fn create_parish(new: NewParish, auth: &AuthContext) -> ActionResponse<ParishResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("create_parish", service.create_parish(new, auth).await)
}

pub async fn get_parish(id: Uuid, auth: &AuthContext) -> ActionResponse<ParishResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("get_parish", service.get_parish_by_id(id, auth).await)
}

pub async fn list_parishes(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<ParishResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "list_parishes",
        service.list_parishes(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn parishes_by_sub_county(sub_county_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<ParishResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "parishes_by_sub_county",
        service.parishes_by_sub_county(sub_county_id, auth).await,
    )
}

pub async fn update_parish(id: Uuid, update: UpdateParish, auth: &AuthContext) -> ActionResponse<ParishResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("update_parish", service.update_parish(id, update, auth).await)
}

pub async fn delete_parish(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("delete_parish", service.delete_parish(id, auth).await)
}

// ---------------------------------------------------------------------------
// Villages
// ---------------------------------------------------------------------------

pub async fn create_village(new: NewVillage, auth: &AuthContext) -> ActionResponse<VillageResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("create_village", service.create_village(new, auth).await)
}

pub async fn get_village(id: Uuid, auth: &AuthContext) -> ActionResponse<VillageResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("get_village", service.get_village_by_id(id, auth).await)
}

pub async fn list_villages(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<VillageResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "list_villages",
        service.list_villages(query.pagination(), query.filter(), auth).await,
    )
}

pub async fn villages_by_parish(parish_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<VillageResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "villages_by_parish",
        service.villages_by_parish(parish_id, auth).await,
    )
}

pub async fn update_village(id: Uuid, update: UpdateVillage, auth: &AuthContext) -> ActionResponse<VillageResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("update_village", service.update_village(id, update, auth).await)
}

pub async fn delete_village(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result("delete_village", service.delete_village(id, auth).await)
}

// ---------------------------------------------------------------------------
// Municipalities
// ---------------------------------------------------------------------------

pub async fn create_municipality(new: NewUrbanArea, auth: &AuthContext) -> ActionResponse<UrbanAreaResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "create_municipality",
        service.create_urban_area(UrbanKind::Municipality, new, auth).await,
    )
}

pub async fn get_municipality(id: Uuid, auth: &AuthContext) -> ActionResponse<UrbanAreaResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "get_municipality",
        service.get_urban_area_by_id(UrbanKind::Municipality, id, auth).await,
    )
}

pub async fn list_municipalities(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<UrbanAreaResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "list_municipalities",
        service
            .list_urban_areas(UrbanKind::Municipality, query.pagination(), query.filter(), auth)
            .await,
    )
}

pub async fn municipalities_by_sub_county(sub_county_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<UrbanAreaResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "municipalities_by_sub_county",
        service
            .urban_areas_by_sub_county(UrbanKind::Municipality, sub_county_id, auth)
            .await,
    )
}

pub async fn update_municipality(id: Uuid, update: UpdateUrbanArea, auth: &AuthContext) -> ActionResponse<UrbanAreaResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "update_municipality",
        service.update_urban_area(UrbanKind::Municipality, id, update, auth).await,
    )
}

pub async fn delete_municipality(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "delete_municipality",
        service.delete_urban_area(UrbanKind::Municipality, id, auth).await,
    )
}

// ---------------------------------------------------------------------------
// Cities
// ---------------------------------------------------------------------------

pub async fn create_city(new: NewUrbanArea, auth: &AuthContext) -> ActionResponse<UrbanAreaResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "create_city",
        service.create_urban_area(UrbanKind::City, new, auth).await,
    )
}

pub async fn get_city(id: Uuid, auth: &AuthContext) -> ActionResponse<UrbanAreaResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "get_city",
        service.get_urban_area_by_id(UrbanKind::City, id, auth).await,
    )
}

pub async fn list_cities(query: ListQuery, auth: &AuthContext) -> ActionResponse<PaginatedResult<UrbanAreaResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "list_cities",
        service.list_urban_areas(UrbanKind::City, query.pagination(), query.filter(), auth).await,
    )
}

pub async fn cities_by_sub_county(sub_county_id: Uuid, auth: &AuthContext) -> ActionResponse<Vec<UrbanAreaResponse>> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "cities_by_sub_county",
        service.urban_areas_by_sub_county(UrbanKind::City, sub_county_id, auth).await,
    )
}

pub async fn update_city(id: Uuid, update: UpdateUrbanArea, auth: &AuthContext) -> ActionResponse<UrbanAreaResponse> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "update_city",
        service.update_urban_area(UrbanKind::City, id, update, auth).await,
    )
}

pub async fn delete_city(id: Uuid, auth: &AuthContext) -> ActionResponse<()> {
    let service = try_service!(globals::get_hierarchy_service());
    ActionResponse::from_result(
        "delete_city",
        service.delete_urban_area(UrbanKind::City, id, auth).await,
    )
}
