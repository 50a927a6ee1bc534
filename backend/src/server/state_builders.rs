//! Builders wiring Diesel adapters into the driving-port services.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{
    AccountServiceImpl, DiseaseHistoryServiceImpl, MedicineServiceImpl, MetricsServiceImpl,
    TokenPolicy, TreatmentServiceImpl, UserInfoServiceImpl,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselDiseaseHistoryRepository, DieselIdentityStore, DieselMedicineRepository,
    DieselMetricsRepository, DieselTreatmentRepository, DieselUserInfoRepository,
};
use crate::outbound::token::HmacTokenIssuer;

/// Collaborators shared by every service.
pub struct ServiceDependencies {
    pub pool: DbPool,
    pub tokens: Arc<HmacTokenIssuer>,
    pub policy: TokenPolicy,
    pub clock: Arc<dyn Clock>,
}

/// Build the HTTP state backed by PostgreSQL.
pub fn build_http_state(deps: ServiceDependencies) -> HttpState {
    let ServiceDependencies {
        pool,
        tokens,
        policy,
        clock,
    } = deps;

    let identity = Arc::new(DieselIdentityStore::new(pool.clone()));
    HttpState {
        accounts: Arc::new(AccountServiceImpl::new(
            identity,
            tokens,
            clock.clone(),
            policy,
        )),
        medicines: Arc::new(MedicineServiceImpl::new(
            Arc::new(DieselMedicineRepository::new(pool.clone())),
            clock.clone(),
        )),
        user_infos: Arc::new(UserInfoServiceImpl::new(
            Arc::new(DieselUserInfoRepository::new(pool.clone())),
            clock.clone(),
        )),
        disease_histories: Arc::new(DiseaseHistoryServiceImpl::new(
            Arc::new(DieselDiseaseHistoryRepository::new(pool.clone())),
            clock.clone(),
        )),
        treatments: Arc::new(TreatmentServiceImpl::new(
            Arc::new(DieselTreatmentRepository::new(pool.clone())),
            clock.clone(),
        )),
        metrics: Arc::new(MetricsServiceImpl::new(
            Arc::new(DieselMetricsRepository::new(pool)),
            clock,
        )),
    }
}
