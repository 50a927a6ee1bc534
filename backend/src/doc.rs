//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every controller action, the health probes, the
//! shared error payload and the bearer token security scheme. The document
//! backs Swagger UI in debug builds and is exported by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, GeneratedToken, Role};
use crate::inbound::http::{
    account, disease_histories, health, medicines, metrics, treatments, user_infos,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.bearer_format = Some("JWT".to_owned());
        scheme.description = Some("Token issued by POST /api/Account/GetToken.".to_owned());
        components.add_security_scheme("BearerToken", SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Infusion backend API",
        description = "Clinical records: medicines, patient profiles, disease histories, treatments and metric readings."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        account::get_token,
        account::get_current_user,
        medicines::get_medicines,
        medicines::get_medicine_by_id,
        medicines::add_medicine,
        medicines::edit_medicine,
        medicines::delete_medicine,
        user_infos::get_user_info_by_id,
        user_infos::get_my_user_info,
        user_infos::edit_user_info,
        disease_histories::get_disease_histories,
        disease_histories::get_disease_history_by_id,
        disease_histories::get_disease_history_by_patient_id,
        disease_histories::get_my_disease_histories,
        disease_histories::add_disease_history,
        disease_histories::edit_disease_history,
        treatments::get_treatment_by_id,
        treatments::get_treatments_by_disease_history_id,
        treatments::add_treatment,
        treatments::edit_treatment,
        treatments::complete_treatment,
        metrics::get_metrics,
        metrics::get_metrics_by_id,
        metrics::get_metrics_from_disease_history,
        metrics::add_metrics,
        metrics::edit_metrics,
        health::ready,
        health::live,
    ),
    components(schemas(Error, ErrorCode, GeneratedToken, Role)),
    tags(
        (name = "Account", description = "Token issuance and the current caller"),
        (name = "Medicine", description = "Medicine catalogue"),
        (name = "UserInfo", description = "Patient and employee profiles"),
        (name = "DiseaseHistory", description = "Patient case records"),
        (name = "Treatment", description = "Administered medicines"),
        (name = "Metrics", description = "Numeric readings attached to a disease history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
