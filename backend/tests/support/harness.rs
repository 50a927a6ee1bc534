//! Application wiring for the HTTP integration tests.

use std::path::Path;
use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use infusion_backend::domain::{
    AccountServiceImpl, DiseaseHistoryServiceImpl, IdentitySeeder, MedicineServiceImpl,
    MetricsServiceImpl, SeedOutcome, TokenPolicy, TreatmentServiceImpl, UserInfoServiceImpl,
};
use infusion_backend::inbound::http::health::HealthState;
use infusion_backend::inbound::http::state::HttpState;
use infusion_backend::outbound::token::HmacTokenIssuer;
use infusion_backend::seeding::load_registry;
use infusion_backend::server::AppDependencies;

use super::in_memory::InMemoryClinic;

pub const SEED_PASSWORD: &str = "Test123!";
pub const ADMIN: &str = "admin1@test.com";
pub const PATIENT: &str = "patient1@test.com";
pub const MED_EMPLOYEE: &str = "medEmployee1@test.com";

/// Apply the bundled identity registry to `store`.
pub async fn seed(store: &Arc<InMemoryClinic>) -> SeedOutcome {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/seed-data/identity.json");
    let registry = load_registry(&path).expect("bundled registry loads");
    IdentitySeeder::new(store.clone(), store.clone(), Arc::new(DefaultClock))
        .seed(&registry)
        .await
        .expect("seeding succeeds")
}

/// A store with the seed roles and accounts applied.
pub async fn seeded_store() -> Arc<InMemoryClinic> {
    let store = Arc::new(InMemoryClinic::new());
    seed(&store).await;
    store
}

/// Wire every service onto `store`, with a real HMAC token issuer.
pub fn dependencies(store: &Arc<InMemoryClinic>) -> AppDependencies {
    let clock = Arc::new(DefaultClock);
    let tokens = Arc::new(HmacTokenIssuer::new(
        Zeroizing::new(b"integration-test-secret".to_vec()),
        clock.clone(),
    ));
    let http_state = HttpState {
        accounts: Arc::new(AccountServiceImpl::new(
            store.clone(),
            tokens,
            clock.clone(),
            TokenPolicy::default(),
        )),
        medicines: Arc::new(MedicineServiceImpl::new(store.clone(), clock.clone())),
        user_infos: Arc::new(UserInfoServiceImpl::new(store.clone(), clock.clone())),
        disease_histories: Arc::new(DiseaseHistoryServiceImpl::new(store.clone(), clock.clone())),
        treatments: Arc::new(TreatmentServiceImpl::new(store.clone(), clock.clone())),
        metrics: Arc::new(MetricsServiceImpl::new(store.clone(), clock)),
    };
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
    }
}

/// Exchange seed credentials for a bearer token.
pub async fn sign_in<S, B>(app: &S, user_name: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/Account/GetToken")
        .set_json(json!({ "username": user_name, "password": SEED_PASSWORD }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, request).await;
    body["accessToken"]
        .as_str()
        .expect("token response carries an access token")
        .to_owned()
}

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Dispatch `request` and decode the JSON body, `Null` when empty.
pub async fn send<S, B>(app: &S, request: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}
