pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::Company;
pub use repository::{CompanyRepository, CompanyStore, RepositoryError};
