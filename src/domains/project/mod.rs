pub mod types;
pub mod repository;
pub mod service;

pub use service::{ProjectService, ProjectServiceImpl};
