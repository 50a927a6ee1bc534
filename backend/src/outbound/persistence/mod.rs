//! PostgreSQL persistence adapters using Diesel.
//!
//! Concrete implementations of the repository and identity store ports,
//! backed by `diesel-async` with `bb8` pooling.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain records. No business rules live here.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Eager-loaded relations use batched follow-up queries.
//!
//! # Example
//!
//! ```ignore
//! use infusion_backend::outbound::persistence::{DbPool, DieselMedicineRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/infusion")).await?;
//! let medicines = DieselMedicineRepository::new(pool);
//! ```

mod diesel_disease_history_repository;
mod diesel_error_mapping;
mod diesel_identity_store;
mod diesel_medicine_repository;
mod diesel_metrics_repository;
mod diesel_treatment_repository;
mod diesel_user_info_repository;
mod migrations;
mod models;
mod password_hashing;
mod pool;
mod relation_loaders;
mod schema;

pub use diesel_disease_history_repository::DieselDiseaseHistoryRepository;
pub use diesel_identity_store::DieselIdentityStore;
pub use diesel_medicine_repository::DieselMedicineRepository;
pub use diesel_metrics_repository::DieselMetricsRepository;
pub use diesel_treatment_repository::DieselTreatmentRepository;
pub use diesel_user_info_repository::DieselUserInfoRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
