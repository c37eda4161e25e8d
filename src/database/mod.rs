pub mod changeset;
pub mod manager;
pub mod models;
pub mod repository;
pub mod service;
pub mod views;

pub use changeset::{Changeset, Field};
pub use manager::{connect, health_check, migrate, DatabaseError};
pub use repository::{ListFilter, Repository};
