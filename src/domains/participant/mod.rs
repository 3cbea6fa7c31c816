pub mod types;
pub mod repository;
pub mod service;
pub mod import;

pub use service::{ParticipantService, ParticipantServiceImpl};
