//! Disease history API handlers.
//!
//! ```text
//! GET  /api/DiseaseHistory/GetDiseaseHistories
//! GET  /api/DiseaseHistory/GetDiseaseHistoryById/{id}
//! GET  /api/DiseaseHistory/GetDiseaseHistoryByPatientId/{id}
//! GET  /api/DiseaseHistory/GetMyDiseaseHistories
//! POST /api/DiseaseHistory/AddDiseaseHistory
//! PUT  /api/DiseaseHistory/EditDiseaseHistory
//! ```

use actix_web::{get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AppUserId, DiseaseHistory, DiseaseHistoryDetails, DiseaseHistoryId, Error, NewDiseaseHistory,
    UserInfoId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::metrics::MetricView;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::treatments::{PatientSummary, TreatmentView};
use crate::inbound::http::validation::{parse_id, required, violation_error};

/// Disease history as returned to clients.
///
/// Relation fields appear only when the service loaded them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseHistoryView {
    pub id: i32,
    pub patient_info_id: i32,
    pub title: String,
    pub notes: Option<String>,
    pub created_by: String,
    pub created: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatments: Option<Vec<TreatmentView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<MetricView>>,
}

impl From<DiseaseHistory> for DiseaseHistoryView {
    fn from(value: DiseaseHistory) -> Self {
        DiseaseHistoryDetails::bare(value).into()
    }
}

impl From<DiseaseHistoryDetails> for DiseaseHistoryView {
    fn from(value: DiseaseHistoryDetails) -> Self {
        let DiseaseHistoryDetails {
            disease_history: history,
            patient,
            treatments,
            metrics,
        } = value;
        Self {
            id: history.id.get(),
            patient_info_id: history.patient_info_id.get(),
            title: history.title,
            notes: history.notes,
            created_by: history.audit.created_by,
            created: history.audit.created,
            updated_by: history.audit.updated_by,
            updated: history.audit.updated,
            patient: patient.map(PatientSummary::from),
            treatments: treatments
                .map(|items| items.into_iter().map(TreatmentView::from).collect()),
            metrics: metrics.map(|items| items.into_iter().map(MetricView::from).collect()),
        }
    }
}

/// Envelope for disease history listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseHistoryList {
    pub disease_histories: Vec<DiseaseHistoryView>,
}

impl DiseaseHistoryList {
    fn from_details(records: Vec<DiseaseHistoryDetails>) -> Self {
        Self {
            disease_histories: records.into_iter().map(DiseaseHistoryView::from).collect(),
        }
    }
}

/// Request body for `AddDiseaseHistory` and `EditDiseaseHistory`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditDiseaseHistory {
    pub id: Option<i32>,
    pub patient_info_id: Option<i32>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

impl EditDiseaseHistory {
    fn into_draft(self) -> Result<(Option<i32>, NewDiseaseHistory), Error> {
        let patient = parse_id(
            required(self.patient_info_id, "patientInfoId")?,
            UserInfoId::new,
        )?;
        let title = required(self.title, "title")?;
        let draft = NewDiseaseHistory::new(patient, &title, self.notes.as_deref())
            .map_err(violation_error)?;
        Ok((self.id, draft))
    }
}

/// Account owning the history's patient profile, when loaded and linked.
fn patient_account(details: &DiseaseHistoryDetails) -> Option<AppUserId> {
    details
        .patient
        .as_ref()
        .and_then(|patient| patient.app_user_id)
}

/// Staff see every history; patients see their own.
#[utoipa::path(
    get,
    path = "/api/DiseaseHistory/GetDiseaseHistories",
    responses(
        (status = 200, description = "Disease histories", body = DiseaseHistoryList),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller holds no clinical role", body = Error)
    ),
    tags = ["DiseaseHistory"],
    operation_id = "getDiseaseHistories"
)]
#[get("/GetDiseaseHistories")]
pub async fn get_disease_histories(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<DiseaseHistoryList>> {
    let name = user.user_name();
    let records = if state.accounts.is_user_in_admin_role(name).await?
        || state.accounts.is_user_in_med_employee_role(name).await?
    {
        state.disease_histories.get_all_disease_histories().await?
    } else if state.accounts.is_user_in_patient_role(name).await? {
        state
            .disease_histories
            .get_disease_histories_by_username(name)
            .await?
    } else {
        return Err(Error::forbidden("caller holds no clinical role"));
    };
    Ok(web::Json(DiseaseHistoryList::from_details(records)))
}

/// Fetch one history with its patient.
#[utoipa::path(
    get,
    path = "/api/DiseaseHistory/GetDiseaseHistoryById/{id}",
    params(("id" = i32, Path, description = "Disease history id")),
    responses(
        (status = 200, description = "Disease history", body = DiseaseHistoryView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "History belongs to another patient", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["DiseaseHistory"],
    operation_id = "getDiseaseHistoryById"
)]
#[get("/GetDiseaseHistoryById/{id}")]
pub async fn get_disease_history_by_id(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DiseaseHistoryView>> {
    let id = parse_id(path.into_inner(), DiseaseHistoryId::new)?;
    let details = state.disease_histories.get_disease_history_by_id(id).await?;
    user.require_staff_or_owner(patient_account(&details))?;
    Ok(web::Json(details.into()))
}

/// Fetch the history of one patient profile.
#[utoipa::path(
    get,
    path = "/api/DiseaseHistory/GetDiseaseHistoryByPatientId/{id}",
    params(("id" = i32, Path, description = "Patient profile id")),
    responses(
        (status = 200, description = "Disease history", body = DiseaseHistoryView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "History belongs to another patient", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["DiseaseHistory"],
    operation_id = "getDiseaseHistoryByPatientId"
)]
#[get("/GetDiseaseHistoryByPatientId/{id}")]
pub async fn get_disease_history_by_patient_id(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<DiseaseHistoryView>> {
    let patient = parse_id(path.into_inner(), UserInfoId::new)?;
    let details = state
        .disease_histories
        .get_disease_history_by_patient_id(patient)
        .await?;
    user.require_staff_or_owner(patient_account(&details))?;
    Ok(web::Json(details.into()))
}

/// Histories belonging to the caller.
#[utoipa::path(
    get,
    path = "/api/DiseaseHistory/GetMyDiseaseHistories",
    responses(
        (status = 200, description = "Disease histories", body = DiseaseHistoryList),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["DiseaseHistory"],
    operation_id = "getMyDiseaseHistories"
)]
#[get("/GetMyDiseaseHistories")]
pub async fn get_my_disease_histories(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<DiseaseHistoryList>> {
    let records = state
        .disease_histories
        .get_disease_histories_by_username(user.user_name())
        .await?;
    Ok(web::Json(DiseaseHistoryList::from_details(records)))
}

/// Open a disease history for a patient.
#[utoipa::path(
    post,
    path = "/api/DiseaseHistory/AddDiseaseHistory",
    request_body = EditDiseaseHistory,
    responses(
        (status = 200, description = "Created history", body = DiseaseHistoryView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["DiseaseHistory"],
    operation_id = "addDiseaseHistory"
)]
#[post("/AddDiseaseHistory")]
pub async fn add_disease_history(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditDiseaseHistory>,
) -> ApiResult<web::Json<DiseaseHistoryView>> {
    user.require_staff()?;
    let (_, draft) = payload.into_inner().into_draft()?;
    let created = state
        .disease_histories
        .add_disease_history(draft, &user.actor())
        .await?;
    Ok(web::Json(created.into()))
}

/// Replace the title, notes and patient of a history.
#[utoipa::path(
    put,
    path = "/api/DiseaseHistory/EditDiseaseHistory",
    request_body = EditDiseaseHistory,
    responses(
        (status = 200, description = "Updated history", body = DiseaseHistoryView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["DiseaseHistory"],
    operation_id = "editDiseaseHistory"
)]
#[put("/EditDiseaseHistory")]
pub async fn edit_disease_history(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditDiseaseHistory>,
) -> ApiResult<web::Json<DiseaseHistoryView>> {
    user.require_staff()?;
    let (id, draft) = payload.into_inner().into_draft()?;
    let id = parse_id(required(id, "id")?, DiseaseHistoryId::new)?;
    let updated = state
        .disease_histories
        .update_disease_history(id, draft, &user.actor())
        .await?;
    Ok(web::Json(updated.into()))
}

/// Register the `/api/DiseaseHistory` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/DiseaseHistory")
            .service(get_disease_histories)
            .service(get_disease_history_by_id)
            .service(get_disease_history_by_patient_id)
            .service(get_my_disease_histories)
            .service(add_disease_history)
            .service(edit_disease_history),
    );
}
