use crate::domains::cluster::repository::SqliteClusterRepository;
use crate::domains::cluster::service::{ClusterService, ClusterServiceImpl};
use crate::domains::core::dependency_checker::SqliteDependencyChecker;
use crate::domains::hierarchy::repository::{
    SqliteCountryRepository, SqliteCountyRepository, SqliteDistrictRepository,
    SqliteParishRepository, SqliteSubCountyRepository, SqliteUrbanAreaRepository,
    SqliteVillageRepository,
};
use crate::domains::hierarchy::service::{HierarchyService, HierarchyServiceImpl};
use crate::domains::hierarchy::types::UrbanKind;
use crate::domains::organization::repository::SqliteOrganizationRepository;
use crate::domains::organization::service::{OrganizationService, OrganizationServiceImpl};
use crate::domains::participant::repository::SqliteParticipantRepository;
use crate::domains::participant::service::{ParticipantService, ParticipantServiceImpl};
use crate::domains::project::repository::SqliteProjectRepository;
use crate::domains::project::service::{ProjectService, ProjectServiceImpl};
use crate::errors::{ServiceError, ServiceResult};
use lazy_static::lazy_static;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// Global state definitions
lazy_static! {
    static ref INITIALIZED: AtomicBool = AtomicBool::new(false);

    static ref DB_POOL: Mutex<Option<SqlitePool>> = Mutex::new(None);

    static ref HIERARCHY_SERVICE: Mutex<Option<Arc<dyn HierarchyService>>> = Mutex::new(None);
    static ref CLUSTER_SERVICE: Mutex<Option<Arc<dyn ClusterService>>> = Mutex::new(None);
    static ref ORGANIZATION_SERVICE: Mutex<Option<Arc<dyn OrganizationService>>> = Mutex::new(None);
    static ref PROJECT_SERVICE: Mutex<Option<Arc<dyn ProjectService>>> = Mutex::new(None);
    static ref PARTICIPANT_SERVICE: Mutex<Option<Arc<dyn ParticipantService>>> = Mutex::new(None);
}

fn not_initialized<T>() -> ServiceResult<T> {
    Err(ServiceError::Configuration(
        "Library not initialized; call initialize() first".to_string(),
    ))
}

/// Create the connection pool and wire every repository and service.
/// Must run before any service getter is used.
pub async fn initialize(db_path: &str, max_connections: u32) -> ServiceResult<()> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        log::warn!("initialize() called twice; ignoring");
        return Ok(());
    }

    let options = SqliteConnectOptions::from_str(db_path)
        .map_err(|e| ServiceError::Configuration(format!("Invalid database path: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| ServiceError::Configuration(format!("Failed to open database: {}", e)))?;

    *DB_POOL.lock().unwrap() = Some(pool.clone());

    let dependency_checker = Arc::new(SqliteDependencyChecker::new(pool.clone()));

    let hierarchy_service: Arc<dyn HierarchyService> = Arc::new(HierarchyServiceImpl::new(
        Arc::new(SqliteCountryRepository::new(pool.clone())),
        Arc::new(SqliteDistrictRepository::new(pool.clone())),
        Arc::new(SqliteCountyRepository::new(pool.clone())),
        Arc::new(SqliteSubCountyRepository::new(pool.clone())),
        Arc::new(SqliteParishRepository::new(pool.clone())),
        Arc::new(SqliteVillageRepository::new(pool.clone())),
        Arc::new(SqliteUrbanAreaRepository::new(pool.clone(), UrbanKind::Municipality)),
        Arc::new(SqliteUrbanAreaRepository::new(pool.clone(), UrbanKind::City)),
        dependency_checker.clone(),
    ));
    *HIERARCHY_SERVICE.lock().unwrap() = Some(hierarchy_service);

    let cluster_repo = Arc::new(SqliteClusterRepository::new(pool.clone()));
    let cluster_service: Arc<dyn ClusterService> = Arc::new(ClusterServiceImpl::new(
        pool.clone(),
        cluster_repo.clone(),
        dependency_checker.clone(),
    ));
    *CLUSTER_SERVICE.lock().unwrap() = Some(cluster_service);

    let project_repo = Arc::new(SqliteProjectRepository::new(pool.clone()));
    let project_service: Arc<dyn ProjectService> = Arc::new(ProjectServiceImpl::new(
        project_repo.clone(),
        dependency_checker.clone(),
    ));
    *PROJECT_SERVICE.lock().unwrap() = Some(project_service);

    let organization_service: Arc<dyn OrganizationService> = Arc::new(OrganizationServiceImpl::new(
        pool.clone(),
        Arc::new(SqliteOrganizationRepository::new(pool.clone())),
        cluster_repo,
        project_repo,
        dependency_checker,
    ));
    *ORGANIZATION_SERVICE.lock().unwrap() = Some(organization_service);

    let participant_service: Arc<dyn ParticipantService> = Arc::new(ParticipantServiceImpl::new(
        pool.clone(),
        Arc::new(SqliteParticipantRepository::new(pool)),
    ));
    *PARTICIPANT_SERVICE.lock().unwrap() = Some(participant_service);

    Ok(())
}

/// Get a reference to the SQLite connection pool
pub fn get_db_pool() -> ServiceResult<SqlitePool> {
    match DB_POOL.lock().unwrap().as_ref() {
        Some(pool) => Ok(pool.clone()),
        None => not_initialized(),
    }
}

pub fn get_hierarchy_service() -> ServiceResult<Arc<dyn HierarchyService>> {
    match HIERARCHY_SERVICE.lock().unwrap().as_ref() {
        Some(service) => Ok(service.clone()),
        None => not_initialized(),
    }
}

pub fn get_cluster_service() -> ServiceResult<Arc<dyn ClusterService>> {
    match CLUSTER_SERVICE.lock().unwrap().as_ref() {
        Some(service) => Ok(service.clone()),
        None => not_initialized(),
    }
}

pub fn get_organization_service() -> ServiceResult<Arc<dyn OrganizationService>> {
    match ORGANIZATION_SERVICE.lock().unwrap().as_ref() {
        Some(service) => Ok(service.clone()),
        None => not_initialized(),
    }
}

pub fn get_project_service() -> ServiceResult<Arc<dyn ProjectService>> {
    match PROJECT_SERVICE.lock().unwrap().as_ref() {
        Some(service) => Ok(service.clone()),
        None => not_initialized(),
    }
}

pub fn get_participant_service() -> ServiceResult<Arc<dyn ParticipantService>> {
    match PARTICIPANT_SERVICE.lock().unwrap().as_ref() {
        Some(service) => Ok(service.clone()),
        None => not_initialized(),
    }
}
