//! Metrics API handlers.
//!
//! ```text
//! GET  /api/Metrics/GetMetrics
//! GET  /api/Metrics/GetMetricsById/{id}
//! GET  /api/Metrics/GetMetricsFromDiseaseHistory/{id}
//! POST /api/Metrics/AddMetrics {"name":"Pulse","value":72,"diseaseHistoryId":1}
//! PUT  /api/Metrics/EditMetrics {"id":3,"name":"Pulse","value":75,"diseaseHistoryId":1}
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DiseaseHistoryId, Error, Metrics, MetricsId, NewMetrics};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_id, required, violation_error};

/// Metric reading as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricView {
    pub id: i32,
    #[schema(example = "Pulse")]
    pub name: String,
    #[schema(example = 72.0)]
    pub value: f64,
    pub disease_history_id: i32,
}

impl From<Metrics> for MetricView {
    fn from(value: Metrics) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            value: value.value,
            disease_history_id: value.disease_history_id.get(),
        }
    }
}

/// Envelope for metric listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricList {
    pub metrics: Vec<MetricView>,
}

impl MetricList {
    fn from_records(records: Vec<Metrics>) -> Self {
        Self {
            metrics: records.into_iter().map(MetricView::from).collect(),
        }
    }
}

/// Request body for `AddMetrics` and `EditMetrics`.
///
/// Every field is optional on the wire so absent values are reported as
/// `missing_field` rather than a generic parse failure. `id` is ignored when
/// adding.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditMetric {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub value: Option<f64>,
    pub disease_history_id: Option<i32>,
}

impl EditMetric {
    fn into_draft(self) -> Result<(Option<i32>, NewMetrics), Error> {
        let name = required(self.name, "name")?;
        let value = required(self.value, "value")?;
        let history = parse_id(
            required(self.disease_history_id, "diseaseHistoryId")?,
            DiseaseHistoryId::new,
        )?;
        let draft = NewMetrics::new(&name, value, history).map_err(violation_error)?;
        Ok((self.id, draft))
    }
}

/// List every metric reading.
#[utoipa::path(
    get,
    path = "/api/Metrics/GetMetrics",
    responses(
        (status = 200, description = "Metric readings", body = MetricList),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["Metrics"],
    operation_id = "getMetrics"
)]
#[get("/GetMetrics")]
pub async fn get_metrics(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<MetricList>> {
    let records = state.metrics.get_metrics().await?;
    Ok(web::Json(MetricList::from_records(records)))
}

/// Fetch one reading.
#[utoipa::path(
    get,
    path = "/api/Metrics/GetMetricsById/{id}",
    params(("id" = i32, Path, description = "Metric id")),
    responses(
        (status = 200, description = "Metric reading", body = MetricView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["Metrics"],
    operation_id = "getMetricsById"
)]
#[get("/GetMetricsById/{id}")]
pub async fn get_metrics_by_id(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MetricView>> {
    let id = parse_id(path.into_inner(), MetricsId::new)?;
    let record = state.metrics.get_metrics_by_id(id).await?;
    Ok(web::Json(record.into()))
}

/// List the readings of one disease history.
#[utoipa::path(
    get,
    path = "/api/Metrics/GetMetricsFromDiseaseHistory/{id}",
    params(("id" = i32, Path, description = "Disease history id")),
    responses(
        (status = 200, description = "Metric readings", body = MetricList),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["Metrics"],
    operation_id = "getMetricsFromDiseaseHistory"
)]
#[get("/GetMetricsFromDiseaseHistory/{id}")]
pub async fn get_metrics_from_disease_history(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MetricList>> {
    let history = parse_id(path.into_inner(), DiseaseHistoryId::new)?;
    let records = state.metrics.get_metrics_from_disease_history(history).await?;
    Ok(web::Json(MetricList::from_records(records)))
}

/// Record a new reading.
#[utoipa::path(
    post,
    path = "/api/Metrics/AddMetrics",
    request_body = EditMetric,
    responses(
        (status = 200, description = "Created reading", body = MetricView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["Metrics"],
    operation_id = "addMetrics"
)]
#[post("/AddMetrics")]
pub async fn add_metrics(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditMetric>,
) -> ApiResult<web::Json<MetricView>> {
    user.require_staff()?;
    let (_, draft) = payload.into_inner().into_draft()?;
    let created = state.metrics.add_metrics(draft, &user.actor()).await?;
    Ok(web::Json(created.into()))
}

/// Replace a reading.
#[utoipa::path(
    put,
    path = "/api/Metrics/EditMetrics",
    request_body = EditMetric,
    responses(
        (status = 200, description = "Updated reading", body = MetricView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["Metrics"],
    operation_id = "editMetrics"
)]
#[put("/EditMetrics")]
pub async fn edit_metrics(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditMetric>,
) -> ApiResult<web::Json<MetricView>> {
    user.require_staff()?;
    let (id, draft) = payload.into_inner().into_draft()?;
    let id = parse_id(required(id, "id")?, MetricsId::new)?;
    let updated = state.metrics.edit_metrics(id, draft, &user.actor()).await?;
    Ok(web::Json(updated.into()))
}

/// Register the `/api/Metrics` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/Metrics")
            .service(get_metrics)
            .service(get_metrics_by_id)
            .service(get_metrics_from_disease_history)
            .service(add_metrics)
            .service(edit_metrics),
    );
}

#[cfg(test)]
mod tests;
