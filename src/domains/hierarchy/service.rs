use crate::auth::AuthContext;
use crate::domains::core::dependency_checker::DependencyChecker;
use crate::domains::core::repository::{DeleteById, FindById};
use crate::domains::hierarchy::codes::derive_code;
use crate::domains::hierarchy::repository::{
    CountryRepository, CountyRepository, DistrictRepository, ParishRepository,
    SubCountyRepository, UrbanAreaRepository, VillageRepository,
};
use crate::domains::hierarchy::types::{
    CountryResponse, CountyRecord, CountyResponse, DistrictResponse, NewCountry, NewCounty,
    NewDistrict, NewParish, NewSubCounty, NewUrbanArea, NewVillage, ParishRecord, ParishResponse,
    SubCountyRecord, SubCountyResponse, UpdateCountry, UpdateCounty, UpdateDistrict, UpdateParish,
    UpdateSubCounty, UpdateUrbanArea, UpdateVillage, UrbanAreaRecord, UrbanAreaResponse,
    UrbanKind, VillageRecord, VillageResponse,
};
use crate::errors::{DomainError, ServiceResult, ValidationError};
use crate::types::{ListFilter, PaginatedResult, PaginationParams, Permission};
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Trait defining the administrative hierarchy service operations
///
/// One service covers every level because the levels only make sense
/// together: create paths resolve parent rows, and the `*_by_*` child
/// queries back the cascading selectors in the dashboard forms.
#[async_trait]
pub trait HierarchyService: Send + Sync {
    // Country
    async fn create_country(&self, new: NewCountry, auth: &AuthContext) -> ServiceResult<CountryResponse>;
    async fn get_country_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<CountryResponse>;
    async fn list_countries(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<CountryResponse>>;
    async fn update_country(&self, id: Uuid, update: UpdateCountry, auth: &AuthContext) -> ServiceResult<CountryResponse>;
    async fn delete_country(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    // District
    async fn create_district(&self, new: NewDistrict, auth: &AuthContext) -> ServiceResult<DistrictResponse>;
    async fn get_district_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<DistrictResponse>;
    async fn list_districts(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<DistrictResponse>>;
    async fn districts_by_country(&self, country_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<DistrictResponse>>;
    async fn update_district(&self, id: Uuid, update: UpdateDistrict, auth: &AuthContext) -> ServiceResult<DistrictResponse>;
    async fn delete_district(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    // County
    async fn create_county(&self, new: NewCounty, auth: &AuthContext) -> ServiceResult<CountyResponse>;
    async fn get_county_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<CountyResponse>;
    async fn list_counties(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<CountyResponse>>;
    async fn counties_by_district(&self, district_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<CountyResponse>>;
    async fn update_county(&self, id: Uuid, update: UpdateCounty, auth: &AuthContext) -> ServiceResult<CountyResponse>;
    async fn delete_county(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    // SubCounty
    async fn create_sub_county(&self, new: NewSubCounty, auth: &AuthContext) -> ServiceResult<SubCountyResponse>;
    async fn get_sub_county_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<SubCountyResponse>;
    async fn list_sub_counties(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<SubCountyResponse>>;
    async fn sub_counties_by_district(&self, district_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<SubCountyResponse>>;
    async fn sub_counties_by_county(&self, county_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<SubCountyResponse>>;
    async fn update_sub_county(&self, id: Uuid, update: UpdateSubCounty, auth: &AuthContext) -> ServiceResult<SubCountyResponse>;
    async fn delete_sub_county(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    // Parish
    async fn create_parish(&self, new: NewParish, auth: &AuthContext) -> ServiceResult<ParishResponse>;
    async fn get_parish_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ParishResponse>;
    async fn list_parishes(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<ParishResponse>>;
    async fn parishes_by_sub_county(&self, sub_county_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ParishResponse>>;
    async fn update_parish(&self, id: Uuid, update: UpdateParish, auth: &AuthContext) -> ServiceResult<ParishResponse>;
    async fn delete_parish(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    // Village
    async fn create_village(&self, new: NewVillage, auth: &AuthContext) -> ServiceResult<VillageResponse>;
    async fn get_village_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<VillageResponse>;
    async fn list_villages(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<VillageResponse>>;
    async fn villages_by_parish(&self, parish_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<VillageResponse>>;
    async fn update_village(&self, id: Uuid, update: UpdateVillage, auth: &AuthContext) -> ServiceResult<VillageResponse>;
    async fn delete_village(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    // Municipality / City
    async fn create_urban_area(&self, kind: UrbanKind, new: NewUrbanArea, auth: &AuthContext) -> ServiceResult<UrbanAreaResponse>;
    async fn get_urban_area_by_id(&self, kind: UrbanKind, id: Uuid, auth: &AuthContext) -> ServiceResult<UrbanAreaResponse>;
    async fn list_urban_areas(&self, kind: UrbanKind, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<UrbanAreaResponse>>;
    async fn urban_areas_by_sub_county(&self, kind: UrbanKind, sub_county_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<UrbanAreaResponse>>;
    async fn update_urban_area(&self, kind: UrbanKind, id: Uuid, update: UpdateUrbanArea, auth: &AuthContext) -> ServiceResult<UrbanAreaResponse>;
    async fn delete_urban_area(&self, kind: UrbanKind, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

/// Implementation of the hierarchy service
#[derive(Clone)]
pub struct HierarchyServiceImpl {
    country_repo: Arc<dyn CountryRepository>,
    district_repo: Arc<dyn DistrictRepository>,
    county_repo: Arc<dyn CountyRepository>,
    sub_county_repo: Arc<dyn SubCountyRepository>,
    parish_repo: Arc<dyn ParishRepository>,
    village_repo: Arc<dyn VillageRepository>,
    municipality_repo: Arc<dyn UrbanAreaRepository>,
    city_repo: Arc<dyn UrbanAreaRepository>,
    dependency_checker: Arc<dyn DependencyChecker>,
}

impl HierarchyServiceImpl {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        country_repo: Arc<dyn CountryRepository>,
        district_repo: Arc<dyn DistrictRepository>,
        county_repo: Arc<dyn CountyRepository>,
        sub_county_repo: Arc<dyn SubCountyRepository>,
        parish_repo: Arc<dyn ParishRepository>,
        village_repo: Arc<dyn VillageRepository>,
        municipality_repo: Arc<dyn UrbanAreaRepository>,
        city_repo: Arc<dyn UrbanAreaRepository>,
        dependency_checker: Arc<dyn DependencyChecker>,
    ) -> Self {
        Self {
            country_repo,
            district_repo,
            county_repo,
            sub_county_repo,
            parish_repo,
            village_repo,
            municipality_repo,
            city_repo,
            dependency_checker,
        }
    }

    fn urban_repo(&self, kind: UrbanKind) -> &Arc<dyn UrbanAreaRepository> {
        match kind {
            UrbanKind::Municipality => &self.municipality_repo,
            UrbanKind::City => &self.city_repo,
        }
    }

    /// Fail the delete when dependent records exist; the dashboard shows
    /// the table names to the operator.
    async fn ensure_no_dependencies(
        &self,
        table_name: &'static str,
        entity_type: &str,
        id: Uuid,
    ) -> ServiceResult<()> {
        let dependencies = self
            .dependency_checker
            .get_dependency_tables(table_name, id)
            .await?;

        if dependencies.is_empty() {
            Ok(())
        } else {
            Err(DomainError::DependentRecordsExist {
                entity_type: entity_type.to_string(),
                id,
                dependencies,
            }
            .into())
        }
    }
}

#[async_trait]
impl HierarchyService for HierarchyServiceImpl {
    // ----- Country -----

    async fn create_country(&self, new: NewCountry, auth: &AuthContext) -> ServiceResult<CountryResponse> {
        auth.authorize(Permission::CreateLocations)?;
        new.validate()?;

        let country = self.country_repo.create(&new).await?;
        Ok(CountryResponse::from(country))
    }

    async fn get_country_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<CountryResponse> {
        auth.authorize(Permission::ViewLocations)?;
        let country = self.country_repo.find_by_id(id).await?;
        Ok(CountryResponse::from(country))
    }

    async fn list_countries(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<CountryResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let result = self.country_repo.find_all(params, &filter).await?;
        Ok(result.map(CountryResponse::from))
    }

    async fn update_country(&self, id: Uuid, update: UpdateCountry, auth: &AuthContext) -> ServiceResult<CountryResponse> {
        auth.authorize(Permission::EditLocations)?;
        update.validate()?;
        let country = self.country_repo.update(id, &update).await?;
        Ok(CountryResponse::from(country))
    }

    async fn delete_country(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteLocations)?;
        let _ = self.country_repo.find_by_id(id).await?;
        self.ensure_no_dependencies("countries", "Country", id).await?;
        self.country_repo.delete(id).await?;
        Ok(())
    }

    // ----- District -----

    async fn create_district(&self, new: NewDistrict, auth: &AuthContext) -> ServiceResult<DistrictResponse> {
        auth.authorize(Permission::CreateLocations)?;
        new.validate()?;

        // Parent must resolve before anything is written
        let country = self.country_repo.find_by_id(new.country_id).await?;

        let district = self.district_repo.create(&new).await?;
        Ok(DistrictResponse::from(district).with_country(&country))
    }

    async fn get_district_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<DistrictResponse> {
        auth.authorize(Permission::ViewLocations)?;
        let district = self.district_repo.find_by_id(id).await?;
        let country = self.country_repo.find_by_id(district.country_id).await?;
        Ok(DistrictResponse::from(district).with_country(&country))
    }

    async fn list_districts(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<DistrictResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let result = self.district_repo.find_all(params, &filter).await?;
        Ok(result.map(DistrictResponse::from))
    }

    async fn districts_by_country(&self, country_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<DistrictResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let country = self.country_repo.find_by_id(country_id).await?;
        let districts = self.district_repo.find_by_country(country_id).await?;
        Ok(districts
            .into_iter()
            .map(|d| DistrictResponse::from(d).with_country(&country))
            .collect())
    }

    async fn update_district(&self, id: Uuid, update: UpdateDistrict, auth: &AuthContext) -> ServiceResult<DistrictResponse> {
        auth.authorize(Permission::EditLocations)?;
        update.validate()?;
        let district = self.district_repo.update(id, &update).await?;
        Ok(DistrictResponse::from(district))
    }

    async fn delete_district(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteLocations)?;
        let _ = self.district_repo.find_by_id(id).await?;
        self.ensure_no_dependencies("districts", "District", id).await?;
        self.district_repo.delete(id).await?;
        Ok(())
    }

    // ----- County -----

    async fn create_county(&self, new: NewCounty, auth: &AuthContext) -> ServiceResult<CountyResponse> {
        auth.authorize(Permission::CreateLocations)?;
        new.validate()?;

        let district = self.district_repo.find_by_id(new.district_id).await?;
        let code = match &new.code {
            Some(code) => code.clone(),
            None => derive_code(&district.code, &new.name),
        };

        let record = CountyRecord {
            name: new.name,
            code,
            country_id: district.country_id,
            district_id: district.id,
        };
        let county = self.county_repo.create(&record).await?;
        Ok(CountyResponse::from(county).with_district(&district))
    }

    async fn get_county_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<CountyResponse> {
        auth.authorize(Permission::ViewLocations)?;
        let county = self.county_repo.find_by_id(id).await?;
        let district = self.district_repo.find_by_id(county.district_id).await?;
        Ok(CountyResponse::from(county).with_district(&district))
    }

    async fn list_counties(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<CountyResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let result = self.county_repo.find_all(params, &filter).await?;
        Ok(result.map(CountyResponse::from))
    }

    async fn counties_by_district(&self, district_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<CountyResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let district = self.district_repo.find_by_id(district_id).await?;
        let counties = self.county_repo.find_by_district(district_id).await?;
        Ok(counties
            .into_iter()
            .map(|c| CountyResponse::from(c).with_district(&district))
            .collect())
    }

    async fn update_county(&self, id: Uuid, update: UpdateCounty, auth: &AuthContext) -> ServiceResult<CountyResponse> {
        auth.authorize(Permission::EditLocations)?;
        update.validate()?;
        let county = self.county_repo.update(id, &update).await?;
        Ok(CountyResponse::from(county))
    }

    async fn delete_county(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteLocations)?;
        let _ = self.county_repo.find_by_id(id).await?;
        self.ensure_no_dependencies("counties", "County", id).await?;
        self.county_repo.delete(id).await?;
        Ok(())
    }

    // ----- SubCounty -----

    async fn create_sub_county(&self, new: NewSubCounty, auth: &AuthContext) -> ServiceResult<SubCountyResponse> {
        auth.authorize(Permission::CreateLocations)?;
        new.validate()?;

        // Both parents must resolve, and the county must sit in the
        // selected district, before anything is written.
        let district = self.district_repo.find_by_id(new.district_id).await?;
        let county = self.county_repo.find_by_id(new.county_id).await?;
        if county.district_id != district.id {
            return Err(DomainError::Validation(ValidationError::relationship(&format!(
                "County '{}' does not belong to district '{}'",
                county.name, district.name
            )))
            .into());
        }

        let code = match &new.code {
            Some(code) => code.clone(),
            None => derive_code(&county.code, &new.name),
        };

        let record = SubCountyRecord {
            name: new.name,
            code,
            district_id: district.id,
            county_id: county.id,
            country_id: district.country_id,
        };
        let sub_county = self.sub_county_repo.create(&record).await?;

        let mut response = SubCountyResponse::from(sub_county);
        response.district = Some((&district).into());
        response.county = Some((&county).into());
        Ok(response)
    }

    async fn get_sub_county_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<SubCountyResponse> {
        auth.authorize(Permission::ViewLocations)?;
        let sub_county = self.sub_county_repo.find_by_id(id).await?;
        let district = self.district_repo.find_by_id(sub_county.district_id).await?;
        let county = self.county_repo.find_by_id(sub_county.county_id).await?;

        let mut response = SubCountyResponse::from(sub_county);
        response.district = Some((&district).into());
        response.county = Some((&county).into());
        Ok(response)
    }

    async fn list_sub_counties(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<SubCountyResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let result = self.sub_county_repo.find_all(params, &filter).await?;
        Ok(result.map(SubCountyResponse::from))
    }

    async fn sub_counties_by_district(&self, district_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<SubCountyResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let district = self.district_repo.find_by_id(district_id).await?;
        let sub_counties = self.sub_county_repo.find_by_district(district_id).await?;
        Ok(sub_counties
            .into_iter()
            .map(|s| {
                let mut response = SubCountyResponse::from(s);
                response.district = Some((&district).into());
                response
            })
            .collect())
    }

    async fn sub_counties_by_county(&self, county_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<SubCountyResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let county = self.county_repo.find_by_id(county_id).await?;
        let sub_counties = self.sub_county_repo.find_by_county(county_id).await?;
        Ok(sub_counties
            .into_iter()
            .map(|s| {
                let mut response = SubCountyResponse::from(s);
                response.county = Some((&county).into());
                response
            })
            .collect())
    }

    async fn update_sub_county(&self, id: Uuid, update: UpdateSubCounty, auth: &AuthContext) -> ServiceResult<SubCountyResponse> {
        auth.authorize(Permission::EditLocations)?;
        update.validate()?;
        let sub_county = self.sub_county_repo.update(id, &update).await?;
        Ok(SubCountyResponse::from(sub_county))
    }

    async fn delete_sub_county(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteLocations)?;
        let _ = self.sub_county_repo.find_by_id(id).await?;
        self.ensure_no_dependencies("sub_counties", "SubCounty", id).await?;
        self.sub_county_repo.delete(id).await?;
        Ok(())
    }

    // ----- Parish -----

    async fn create_parish(&self, new: NewParish, auth: &AuthContext) -> ServiceResult<ParishResponse> {
        auth.authorize(Permission::CreateLocations)?;
        new.validate()?;

        let sub_county = self.sub_county_repo.find_by_id(new.sub_county_id).await?;
        let code = match &new.code {
            Some(code) => code.clone(),
            None => derive_code(&sub_county.code, &new.name),
        };

        // Ancestor ids are copied from the parent row, not re-derived
        let record = ParishRecord {
            name: new.name,
            code,
            sub_county_id: sub_county.id,
            county_id: sub_county.county_id,
            district_id: sub_county.district_id,
            country_id: sub_county.country_id,
        };
        let parish = self.parish_repo.create(&record).await?;

        let mut response = ParishResponse::from(parish);
        response.sub_county = Some((&sub_county).into());
        Ok(response)
    }

    async fn get_parish_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ParishResponse> {
        auth.authorize(Permission::ViewLocations)?;
        let parish = self.parish_repo.find_by_id(id).await?;
        let sub_county = self.sub_county_repo.find_by_id(parish.sub_county_id).await?;

        let mut response = ParishResponse::from(parish);
        response.sub_county = Some((&sub_county).into());
        Ok(response)
    }

    async fn list_parishes(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<ParishResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let result = self.parish_repo.find_all(params, &filter).await?;
        Ok(result.map(ParishResponse::from))
    }

    async fn parishes_by_sub_county(&self, sub_county_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ParishResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let sub_county = self.sub_county_repo.find_by_id(sub_county_id).await?;
        let parishes = self.parish_repo.find_by_sub_county(sub_county_id).await?;
        Ok(parishes
            .into_iter()
            .map(|p| {
                let mut response = ParishResponse::from(p);
                response.sub_county = Some((&sub_county).into());
                response
            })
            .collect())
    }

    async fn update_parish(&self, id: Uuid, update: UpdateParish, auth: &AuthContext) -> ServiceResult<ParishResponse> {
        auth.authorize(Permission::EditLocations)?;
        update.validate()?;
        let parish = self.parish_repo.update(id, &update).await?;
        Ok(ParishResponse::from(parish))
    }

    async fn delete_parish(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteLocations)?;
        let _ = self.parish_repo.find_by_id(id).await?;
        self.ensure_no_dependencies("parishes", "Parish", id).await?;
        self.parish_repo.delete(id).await?;
        Ok(())
    }

    // ----- Village -----

    async fn create_village(&self, new: NewVillage, auth: &AuthContext) -> ServiceResult<VillageResponse> {
        auth.authorize(Permission::CreateLocations)?;
        new.validate()?;

        let parish = self.parish_repo.find_by_id(new.parish_id).await?;
        let code = match &new.code {
            Some(code) => code.clone(),
            None => derive_code(&parish.code, &new.name),
        };

        let record = VillageRecord {
            name: new.name,
            code,
            parish_id: parish.id,
            sub_county_id: parish.sub_county_id,
            county_id: parish.county_id,
            district_id: parish.district_id,
            country_id: parish.country_id,
        };
        let village = self.village_repo.create(&record).await?;

        let mut response = VillageResponse::from(village);
        response.parish = Some((&parish).into());
        Ok(response)
    }

    async fn get_village_by_id(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<VillageResponse> {
        auth.authorize(Permission::ViewLocations)?;
        let village = self.village_repo.find_by_id(id).await?;
        let parish = self.parish_repo.find_by_id(village.parish_id).await?;

        let mut response = VillageResponse::from(village);
        response.parish = Some((&parish).into());
        Ok(response)
    }

    async fn list_villages(&self, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<VillageResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let result = self.village_repo.find_all(params, &filter).await?;
        Ok(result.map(VillageResponse::from))
    }

    async fn villages_by_parish(&self, parish_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<VillageResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let parish = self.parish_repo.find_by_id(parish_id).await?;
        let villages = self.village_repo.find_by_parish(parish_id).await?;
        Ok(villages
            .into_iter()
            .map(|v| {
                let mut response = VillageResponse::from(v);
                response.parish = Some((&parish).into());
                response
            })
            .collect())
    }

    async fn update_village(&self, id: Uuid, update: UpdateVillage, auth: &AuthContext) -> ServiceResult<VillageResponse> {
        auth.authorize(Permission::EditLocations)?;
        update.validate()?;
        let village = self.village_repo.update(id, &update).await?;
        Ok(VillageResponse::from(village))
    }

    async fn delete_village(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteLocations)?;
        let _ = self.village_repo.find_by_id(id).await?;
        self.ensure_no_dependencies("villages", "Village", id).await?;
        self.village_repo.delete(id).await?;
        Ok(())
    }

    // ----- Municipality / City -----

    async fn create_urban_area(&self, kind: UrbanKind, new: NewUrbanArea, auth: &AuthContext) -> ServiceResult<UrbanAreaResponse> {
        auth.authorize(Permission::CreateLocations)?;
        new.validate()?;

        let sub_county = self.sub_county_repo.find_by_id(new.sub_county_id).await?;
        let code = match &new.code {
            Some(code) => code.clone(),
            None => derive_code(&sub_county.code, &new.name),
        };

        let record = UrbanAreaRecord {
            name: new.name,
            code,
            sub_county_id: sub_county.id,
            county_id: sub_county.county_id,
            district_id: sub_county.district_id,
            country_id: sub_county.country_id,
        };
        let area = self.urban_repo(kind).create(&record).await?;

        let mut response = UrbanAreaResponse::from(area);
        response.sub_county = Some((&sub_county).into());
        Ok(response)
    }

    async fn get_urban_area_by_id(&self, kind: UrbanKind, id: Uuid, auth: &AuthContext) -> ServiceResult<UrbanAreaResponse> {
        auth.authorize(Permission::ViewLocations)?;
        let area = self.urban_repo(kind).find_by_id(id).await?;
        let sub_county = self.sub_county_repo.find_by_id(area.sub_county_id).await?;

        let mut response = UrbanAreaResponse::from(area);
        response.sub_county = Some((&sub_county).into());
        Ok(response)
    }

    async fn list_urban_areas(&self, kind: UrbanKind, params: PaginationParams, filter: ListFilter, auth: &AuthContext) -> ServiceResult<PaginatedResult<UrbanAreaResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let result = self.urban_repo(kind).find_all(params, &filter).await?;
        Ok(result.map(UrbanAreaResponse::from))
    }

    async fn urban_areas_by_sub_county(&self, kind: UrbanKind, sub_county_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<UrbanAreaResponse>> {
        auth.authorize(Permission::ViewLocations)?;
        let sub_county = self.sub_county_repo.find_by_id(sub_county_id).await?;
        let areas = self.urban_repo(kind).find_by_sub_county(sub_county_id).await?;
        Ok(areas
            .into_iter()
            .map(|a| {
                let mut response = UrbanAreaResponse::from(a);
                response.sub_county = Some((&sub_county).into());
                response
            })
            .collect())
    }

    async fn update_urban_area(&self, kind: UrbanKind, id: Uuid, update: UpdateUrbanArea, auth: &AuthContext) -> ServiceResult<UrbanAreaResponse> {
        auth.authorize(Permission::EditLocations)?;
        update.validate()?;
        let area = self.urban_repo(kind).update(id, &update).await?;
        Ok(UrbanAreaResponse::from(area))
    }

    async fn delete_urban_area(&self, kind: UrbanKind, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        auth.authorize(Permission::DeleteLocations)?;
        let repo = self.urban_repo(kind);
        let _ = repo.find_by_id(id).await?;
        self.ensure_no_dependencies(repo.entity_name(), kind.entity_name(), id).await?;
        repo.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_migration;
    use crate::domains::core::dependency_checker::SqliteDependencyChecker;
    use crate::domains::hierarchy::repository::{
        SqliteCountryRepository, SqliteCountyRepository, SqliteDistrictRepository,
        SqliteParishRepository, SqliteSubCountyRepository, SqliteUrbanAreaRepository,
        SqliteVillageRepository,
    };
    use crate::errors::ServiceError;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::str::FromStr;

    async fn setup_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        db_migration::run_migrations(&pool).await.unwrap();
        pool
    }

    fn build_service(pool: &SqlitePool) -> HierarchyServiceImpl {
        HierarchyServiceImpl::new(
            Arc::new(SqliteCountryRepository::new(pool.clone())),
            Arc::new(SqliteDistrictRepository::new(pool.clone())),
            Arc::new(SqliteCountyRepository::new(pool.clone())),
            Arc::new(SqliteSubCountyRepository::new(pool.clone())),
            Arc::new(SqliteParishRepository::new(pool.clone())),
            Arc::new(SqliteVillageRepository::new(pool.clone())),
            Arc::new(SqliteUrbanAreaRepository::new(pool.clone(), UrbanKind::Municipality)),
            Arc::new(SqliteUrbanAreaRepository::new(pool.clone(), UrbanKind::City)),
            Arc::new(SqliteDependencyChecker::new(pool.clone())),
        )
    }

    fn admin() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), crate::types::UserRole::Admin)
    }

    #[tokio::test]
    async fn test_districts_by_country_carries_country_summary() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let uganda = service
            .create_country(NewCountry { name: "Uganda".into(), code: "UG".into() }, &auth)
            .await
            .unwrap();
        let kampala = service
            .create_district(
                NewDistrict { name: "Kampala".into(), code: "KLA".into(), country_id: uganda.id },
                &auth,
            )
            .await
            .unwrap();

        let districts = service.districts_by_country(uganda.id, &auth).await.unwrap();
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].id, kampala.id);
        assert_eq!(districts[0].country.as_ref().unwrap().name, "Uganda");
    }

    #[tokio::test]
    async fn test_create_district_requires_existing_country() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let result = service
            .create_district(
                NewDistrict { name: "Kampala".into(), code: "KLA".into(), country_id: Uuid::new_v4() },
                &auth,
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::EntityNotFound(_, _)))
        ));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM districts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_sub_county_rejects_county_from_other_district() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let uganda = service
            .create_country(NewCountry { name: "Uganda".into(), code: "UG".into() }, &auth)
            .await
            .unwrap();
        let kampala = service
            .create_district(
                NewDistrict { name: "Kampala".into(), code: "KLA".into(), country_id: uganda.id },
                &auth,
            )
            .await
            .unwrap();
        let wakiso = service
            .create_district(
                NewDistrict { name: "Wakiso".into(), code: "WAK".into(), country_id: uganda.id },
                &auth,
            )
            .await
            .unwrap();
        let nakawa = service
            .create_county(
                NewCounty { name: "Nakawa".into(), code: None, district_id: kampala.id },
                &auth,
            )
            .await
            .unwrap();

        // District that does not resolve at all
        let result = service
            .create_sub_county(
                NewSubCounty {
                    name: "Kira".into(),
                    code: None,
                    district_id: Uuid::new_v4(),
                    county_id: nakawa.id,
                },
                &auth,
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::EntityNotFound(_, _)))
        ));

        // County belongs to Kampala, district given is Wakiso
        let result = service
            .create_sub_county(
                NewSubCounty {
                    name: "Kira".into(),
                    code: None,
                    district_id: wakiso.id,
                    county_id: nakawa.id,
                },
                &auth,
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::Validation(_)))
        ));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sub_counties")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_derived_codes_chain_from_parents() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let uganda = service
            .create_country(NewCountry { name: "Uganda".into(), code: "UG".into() }, &auth)
            .await
            .unwrap();
        let kampala = service
            .create_district(
                NewDistrict { name: "Kampala".into(), code: "KLA".into(), country_id: uganda.id },
                &auth,
            )
            .await
            .unwrap();
        let nakawa = service
            .create_county(
                NewCounty { name: "Nakawa".into(), code: None, district_id: kampala.id },
                &auth,
            )
            .await
            .unwrap();
        assert_eq!(nakawa.code, "KLA-NAK");

        let ntinda = service
            .create_sub_county(
                NewSubCounty {
                    name: "Ntinda".into(),
                    code: None,
                    district_id: kampala.id,
                    county_id: nakawa.id,
                },
                &auth,
            )
            .await
            .unwrap();
        assert_eq!(ntinda.code, "KLA-NAK-NTI");

        let municipality = service
            .create_urban_area(
                UrbanKind::Municipality,
                NewUrbanArea { name: "Nakawa Division".into(), code: None, sub_county_id: ntinda.id },
                &auth,
            )
            .await
            .unwrap();
        assert_eq!(municipality.code, "KLA-NAK-NTI-NAK");
        // Ancestors denormalized from the sub-county row
        assert_eq!(municipality.district_id, kampala.id);
        assert_eq!(municipality.country_id, uganda.id);
    }

    #[tokio::test]
    async fn test_village_inherits_full_ancestor_chain() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let uganda = service
            .create_country(NewCountry { name: "Uganda".into(), code: "UG".into() }, &auth)
            .await
            .unwrap();
        let kampala = service
            .create_district(
                NewDistrict { name: "Kampala".into(), code: "KLA".into(), country_id: uganda.id },
                &auth,
            )
            .await
            .unwrap();
        let nakawa = service
            .create_county(
                NewCounty { name: "Nakawa".into(), code: None, district_id: kampala.id },
                &auth,
            )
            .await
            .unwrap();
        let ntinda = service
            .create_sub_county(
                NewSubCounty {
                    name: "Ntinda".into(),
                    code: None,
                    district_id: kampala.id,
                    county_id: nakawa.id,
                },
                &auth,
            )
            .await
            .unwrap();
        let parish = service
            .create_parish(
                NewParish { name: "Kigoowa".into(), code: None, sub_county_id: ntinda.id },
                &auth,
            )
            .await
            .unwrap();
        let village = service
            .create_village(
                NewVillage { name: "Kigoowa Central".into(), code: None, parish_id: parish.id },
                &auth,
            )
            .await
            .unwrap();

        assert_eq!(village.parish_id, parish.id);
        assert_eq!(village.sub_county_id, ntinda.id);
        assert_eq!(village.county_id, nakawa.id);
        assert_eq!(village.district_id, kampala.id);
        assert_eq!(village.country_id, uganda.id);
    }

    #[tokio::test]
    async fn test_delete_country_with_districts_is_blocked() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let uganda = service
            .create_country(NewCountry { name: "Uganda".into(), code: "UG".into() }, &auth)
            .await
            .unwrap();
        service
            .create_district(
                NewDistrict { name: "Kampala".into(), code: "KLA".into(), country_id: uganda.id },
                &auth,
            )
            .await
            .unwrap();

        let result = service.delete_country(uganda.id, &auth).await;
        match result {
            Err(ServiceError::Domain(DomainError::DependentRecordsExist { dependencies, .. })) => {
                assert!(dependencies.contains(&"districts".to_string()));
            }
            other => panic!("expected DependentRecordsExist, got {:?}", other),
        }

        // Country is still there
        assert!(service.get_country_by_id(uganda.id, &auth).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_districts_search_is_case_insensitive() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = admin();

        let uganda = service
            .create_country(NewCountry { name: "Uganda".into(), code: "UG".into() }, &auth)
            .await
            .unwrap();
        for (name, code) in [("Kampala", "KLA"), ("Wakiso", "WAK"), ("Mukono", "MUK")] {
            service
                .create_district(
                    NewDistrict { name: name.into(), code: code.into(), country_id: uganda.id },
                    &auth,
                )
                .await
                .unwrap();
        }

        let result = service
            .list_districts(PaginationParams::default(), ListFilter::search("kamp"), &auth)
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].name, "Kampala");

        // Empty search term returns the unfiltered set
        let result = service
            .list_districts(PaginationParams::default(), ListFilter::search(""), &auth)
            .await
            .unwrap();
        assert_eq!(result.total, 3);
    }

    #[tokio::test]
    async fn test_data_entry_role_cannot_create_locations() {
        let pool = setup_pool().await;
        let service = build_service(&pool);
        let auth = AuthContext::new(Uuid::new_v4(), crate::types::UserRole::DataEntry);

        let result = service
            .create_country(NewCountry { name: "Uganda".into(), code: "UG".into() }, &auth)
            .await;
        assert!(matches!(result, Err(ServiceError::PermissionDenied(_))));
    }
}
