pub mod repository;
pub mod dependency_checker;

pub use repository::{FindById, DeleteById};
pub use dependency_checker::{Dependency, DependencyChecker, SqliteDependencyChecker};
