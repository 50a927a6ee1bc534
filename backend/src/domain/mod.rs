//! Domain primitives, aggregates and services.
//!
//! Purpose: define the clinical records (medicines, profiles, disease
//! histories, treatments and metric readings), the identity model, and the
//! services that inbound adapters drive. Nothing here knows about HTTP or
//! SQL; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - entity records, validated drafts and loaded aggregates.
//! - `*ServiceImpl` types implementing the driving ports.
//! - IdentitySeeder: applies the identity registry at startup.

pub mod ports;

mod account_service;
mod app_user;
mod audit;
mod auth;
mod disease_history;
mod disease_history_service;
pub mod error;
mod identity_seeder;
mod ids;
mod medicine;
mod medicine_service;
mod metrics;
mod metrics_service;
mod roles;
mod service_errors;
#[cfg(test)]
pub(crate) mod test_support;
mod trace_id;
mod treatment;
mod treatment_service;
mod user_info;
mod user_info_service;
mod validation;

pub use self::account_service::AccountServiceImpl;
pub use self::app_user::{AppUser, NewAppUser, USER_NAME_MAX, UserName, UserNameValidationError};
pub use self::audit::{Actor, AuditStamp, SEED_ACTOR};
pub use self::auth::{
    BEARER_TOKEN_TYPE, GeneratedToken, LoginCredentials, LoginValidationError, TokenClaims,
    TokenPolicy,
};
pub use self::disease_history::{DiseaseHistory, DiseaseHistoryDetails, NewDiseaseHistory};
pub use self::disease_history_service::DiseaseHistoryServiceImpl;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity_seeder::{IdentitySeeder, IdentitySeedingError, SeedOutcome, SeedingResult};
pub use self::ids::{
    AppUserId, DiseaseHistoryId, MedicineId, MetricsId, RoleId, TreatmentId, UserInfoId,
};
pub use self::medicine::{MEDICINE_DESCRIPTION_MAX, MEDICINE_TITLE_MAX, Medicine, NewMedicine};
pub use self::medicine_service::MedicineServiceImpl;
pub use self::metrics::{METRIC_NAME_MAX, Metrics, MetricsDetails, NewMetrics};
pub use self::metrics_service::MetricsServiceImpl;
pub use self::roles::{Claim, Role, StoredRole, UnknownRoleError};
pub use self::trace_id::TraceId;
pub use self::treatment::{Dosing, NewTreatment, Treatment, TreatmentDetails};
pub use self::treatment_service::TreatmentServiceImpl;
pub use self::user_info::{UserInfo, UserInfoDraft};
pub use self::user_info_service::UserInfoServiceImpl;
pub use self::validation::{FieldViolation, ViolationKind};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use infusion_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
