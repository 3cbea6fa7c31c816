pub mod codes;
pub mod types;
pub mod repository;
pub mod service;

pub use service::{HierarchyService, HierarchyServiceImpl};
