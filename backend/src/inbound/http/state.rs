//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they stay testable with mocks or in-memory services.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, DiseaseHistoryService, MedicineService, MetricsService, TreatmentService,
    UserInfoService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub medicines: Arc<dyn MedicineService>,
    pub user_infos: Arc<dyn UserInfoService>,
    pub disease_histories: Arc<dyn DiseaseHistoryService>,
    pub treatments: Arc<dyn TreatmentService>,
    pub metrics: Arc<dyn MetricsService>,
}
