pub mod types;
pub mod repository;
pub mod service;

pub use service::{ClusterService, ClusterServiceImpl};
