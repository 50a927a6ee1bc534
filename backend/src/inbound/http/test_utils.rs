//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, web};

use crate::domain::ports::{
    MockAccountService, MockDiseaseHistoryService, MockMedicineService, MockMetricsService,
    MockTreatmentService, MockUserInfoService,
};
use crate::domain::{AppUserId, Error, Role, TokenClaims};

use super::state::HttpState;
use super::validation::{json_config, path_config};

/// Bearer token accepted by [`MockServices::signed_in`].
pub const TEST_TOKEN: &str = "test-token";

/// One mock per driving port; set expectations, then call [`Self::into_state`].
#[derive(Default)]
pub struct MockServices {
    pub accounts: MockAccountService,
    pub medicines: MockMedicineService,
    pub user_infos: MockUserInfoService,
    pub disease_histories: MockDiseaseHistoryService,
    pub treatments: MockTreatmentService,
    pub metrics: MockMetricsService,
}

impl MockServices {
    /// Accept [`TEST_TOKEN`] for `name` holding `roles`; reject anything else.
    pub fn signed_in(name: &str, roles: &[Role]) -> Self {
        let mut services = Self::default();
        let claims = claims(name, roles);
        services
            .accounts
            .expect_authenticate()
            .returning(move |token| {
                if token == TEST_TOKEN {
                    Ok(claims.clone())
                } else {
                    Err(Error::unauthorized("invalid token"))
                }
            });
        services
    }

    pub fn staff() -> Self {
        Self::signed_in("employee1@test.com", &[Role::MedicalEmployee])
    }

    pub fn patient() -> Self {
        Self::signed_in("patient1@test.com", &[Role::Patient])
    }

    /// Patient whose token subject is `owner`.
    pub fn patient_owning(owner: AppUserId) -> Self {
        let mut services = Self::default();
        let mut token = claims("patient1@test.com", &[Role::Patient]);
        token.sub = owner;
        services
            .accounts
            .expect_authenticate()
            .returning(move |_| Ok(token.clone()));
        services
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            accounts: Arc::new(self.accounts),
            medicines: Arc::new(self.medicines),
            user_infos: Arc::new(self.user_infos),
            disease_histories: Arc::new(self.disease_histories),
            treatments: Arc::new(self.treatments),
            metrics: Arc::new(self.metrics),
        }
    }
}

pub fn claims(name: &str, roles: &[Role]) -> TokenClaims {
    TokenClaims {
        sub: AppUserId::random(),
        name: name.to_owned(),
        roles: roles.to_vec(),
        iat: 0,
        exp: i64::MAX,
    }
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer() -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

/// App with the shared extractor configuration and one resource scope.
pub fn test_app(
    services: MockServices,
    configure: fn(&mut web::ServiceConfig),
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(services.into_state()))
        .app_data(json_config())
        .app_data(path_config())
        .configure(configure)
}
