//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `UserStore`, `RoleStore`, `TokenIssuer`) are
//! implemented by outbound adapters. Driving ports (`*Service`) are
//! implemented in the domain and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod disease_history_repository;
mod disease_history_service;
mod identity_store;
mod includes;
mod medicine_repository;
mod medicine_service;
mod metrics_repository;
mod metrics_service;
mod repository_error;
mod token_issuer;
mod treatment_repository;
mod treatment_service;
mod user_info_repository;
mod user_info_service;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, CurrentUser};
#[cfg(test)]
pub use disease_history_repository::MockDiseaseHistoryRepository;
pub use disease_history_repository::{
    DiseaseHistoryFilter, DiseaseHistoryRelation, DiseaseHistoryRepository,
};
#[cfg(test)]
pub use disease_history_service::MockDiseaseHistoryService;
pub use disease_history_service::DiseaseHistoryService;
#[cfg(test)]
pub use identity_store::{MockRoleStore, MockUserStore};
pub use identity_store::{IdentityStoreError, RoleStore, UserStore};
pub use includes::Includes;
#[cfg(test)]
pub use medicine_repository::MockMedicineRepository;
pub use medicine_repository::{MedicineFilter, MedicineRepository};
#[cfg(test)]
pub use medicine_service::MockMedicineService;
pub use medicine_service::MedicineService;
#[cfg(test)]
pub use metrics_repository::MockMetricsRepository;
pub use metrics_repository::{MetricsFilter, MetricsRelation, MetricsRepository};
#[cfg(test)]
pub use metrics_service::MockMetricsService;
pub use metrics_service::MetricsService;
pub use repository_error::RepositoryError;
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenIssuer, TokenIssuerError};
#[cfg(test)]
pub use treatment_repository::MockTreatmentRepository;
pub use treatment_repository::{TreatmentFilter, TreatmentRelation, TreatmentRepository};
#[cfg(test)]
pub use treatment_service::MockTreatmentService;
pub use treatment_service::TreatmentService;
#[cfg(test)]
pub use user_info_repository::MockUserInfoRepository;
pub use user_info_repository::{UserInfoFilter, UserInfoRepository};
#[cfg(test)]
pub use user_info_service::MockUserInfoService;
pub use user_info_service::UserInfoService;
