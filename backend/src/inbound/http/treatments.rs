//! Treatment API handlers.
//!
//! ```text
//! GET  /api/Treatment/GetTreatmentById/{id}
//! GET  /api/Treatment/GetTreatmentsByDiseaseHistoryId/{id}
//! POST /api/Treatment/AddTreatment
//! PUT  /api/Treatment/EditTreatment
//! POST /api/Treatment/CompleteTreatment/{id}
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DiseaseHistoryId, Dosing, Error, Medicine, MedicineId, NewTreatment, Treatment,
    TreatmentDetails, TreatmentId, UserInfo,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_id, required, violation_error};

/// Medicine reference embedded in treatment views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicineSummary {
    pub id: i32,
    pub title: String,
}

impl From<Medicine> for MedicineSummary {
    fn from(value: Medicine) -> Self {
        Self {
            id: value.id.get(),
            title: value.title,
        }
    }
}

/// Patient reference embedded in treatment views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: i32,
    pub name: String,
}

impl From<UserInfo> for PatientSummary {
    fn from(value: UserInfo) -> Self {
        Self {
            id: value.id.get(),
            name: value.display_name(),
        }
    }
}

/// Treatment as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentView {
    pub treatment_id: i32,
    pub medicine_id: i32,
    pub disease_history_id: i32,
    pub diagnosis: String,
    pub medicine_weight: f64,
    pub solution_volume: f64,
    pub dosage: f64,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine: Option<MedicineSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummary>,
}

impl From<Treatment> for TreatmentView {
    fn from(value: Treatment) -> Self {
        TreatmentDetails::bare(value).into()
    }
}

impl From<TreatmentDetails> for TreatmentView {
    fn from(value: TreatmentDetails) -> Self {
        let TreatmentDetails {
            treatment,
            medicine,
            patient,
            ..
        } = value;
        Self {
            treatment_id: treatment.id.get(),
            medicine_id: treatment.medicine_id.get(),
            disease_history_id: treatment.disease_history_id.get(),
            diagnosis: treatment.diagnosis,
            medicine_weight: treatment.dosing.medicine_weight(),
            solution_volume: treatment.dosing.solution_volume(),
            dosage: treatment.dosing.dosage(),
            is_completed: treatment.is_completed,
            medicine: medicine.map(MedicineSummary::from),
            patient: patient.map(PatientSummary::from),
        }
    }
}

/// Envelope for treatment listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TreatmentList {
    pub treatments: Vec<TreatmentView>,
}

/// Request body for `AddTreatment` and `EditTreatment`.
///
/// `treatmentId` is required when editing and ignored when adding.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditTreatment {
    pub treatment_id: Option<i32>,
    pub medicine_id: Option<i32>,
    pub disease_history_id: Option<i32>,
    pub diagnosis: Option<String>,
    pub medicine_weight: Option<f64>,
    pub solution_volume: Option<f64>,
    pub dosage: Option<f64>,
}

impl EditTreatment {
    fn into_draft(self) -> Result<(Option<i32>, NewTreatment), Error> {
        let medicine = parse_id(required(self.medicine_id, "medicineId")?, MedicineId::new)?;
        let history = parse_id(
            required(self.disease_history_id, "diseaseHistoryId")?,
            DiseaseHistoryId::new,
        )?;
        let diagnosis = required(self.diagnosis, "diagnosis")?;
        let dosing = Dosing::new(
            required(self.medicine_weight, "medicineWeight")?,
            required(self.solution_volume, "solutionVolume")?,
            required(self.dosage, "dosage")?,
        )
        .map_err(violation_error)?;
        let draft =
            NewTreatment::new(medicine, history, &diagnosis, dosing).map_err(violation_error)?;
        Ok((self.treatment_id, draft))
    }
}

/// Fetch one treatment with its medicine.
#[utoipa::path(
    get,
    path = "/api/Treatment/GetTreatmentById/{id}",
    params(("id" = i32, Path, description = "Treatment id")),
    responses(
        (status = 200, description = "Treatment", body = TreatmentView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["Treatment"],
    operation_id = "getTreatmentById"
)]
#[get("/GetTreatmentById/{id}")]
pub async fn get_treatment_by_id(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<TreatmentView>> {
    let id = parse_id(path.into_inner(), TreatmentId::new)?;
    let details = state.treatments.get_treatment_by_id(id).await?;
    Ok(web::Json(details.into()))
}

/// List the treatments of one disease history with medicine and patient.
#[utoipa::path(
    get,
    path = "/api/Treatment/GetTreatmentsByDiseaseHistoryId/{id}",
    params(("id" = i32, Path, description = "Disease history id")),
    responses(
        (status = 200, description = "Treatments", body = TreatmentList),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["Treatment"],
    operation_id = "getTreatmentsByDiseaseHistoryId"
)]
#[get("/GetTreatmentsByDiseaseHistoryId/{id}")]
pub async fn get_treatments_by_disease_history_id(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<TreatmentList>> {
    let history = parse_id(path.into_inner(), DiseaseHistoryId::new)?;
    let treatments = state
        .treatments
        .get_treatments_by_disease_history_id(history)
        .await?
        .into_iter()
        .map(TreatmentView::from)
        .collect();
    Ok(web::Json(TreatmentList { treatments }))
}

/// Prescribe a treatment.
#[utoipa::path(
    post,
    path = "/api/Treatment/AddTreatment",
    request_body = EditTreatment,
    responses(
        (status = 200, description = "Created treatment", body = TreatmentView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["Treatment"],
    operation_id = "addTreatment"
)]
#[post("/AddTreatment")]
pub async fn add_treatment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditTreatment>,
) -> ApiResult<web::Json<TreatmentView>> {
    user.require_staff()?;
    let (_, draft) = payload.into_inner().into_draft()?;
    let created = state.treatments.add_treatment(draft, &user.actor()).await?;
    Ok(web::Json(created.into()))
}

/// Replace the editable fields of a treatment.
#[utoipa::path(
    put,
    path = "/api/Treatment/EditTreatment",
    request_body = EditTreatment,
    responses(
        (status = 200, description = "Updated treatment", body = TreatmentView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["Treatment"],
    operation_id = "editTreatment"
)]
#[put("/EditTreatment")]
pub async fn edit_treatment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditTreatment>,
) -> ApiResult<web::Json<TreatmentView>> {
    user.require_staff()?;
    let (id, draft) = payload.into_inner().into_draft()?;
    let id = parse_id(required(id, "treatmentId")?, TreatmentId::new)?;
    let updated = state
        .treatments
        .update_treatment(id, draft, &user.actor())
        .await?;
    Ok(web::Json(updated.into()))
}

/// Mark a treatment completed. Completing twice is a no-op.
#[utoipa::path(
    post,
    path = "/api/Treatment/CompleteTreatment/{id}",
    params(("id" = i32, Path, description = "Treatment id")),
    responses(
        (status = 200, description = "Completed treatment", body = TreatmentView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["Treatment"],
    operation_id = "completeTreatment"
)]
#[post("/CompleteTreatment/{id}")]
pub async fn complete_treatment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<TreatmentView>> {
    user.require_staff()?;
    let id = parse_id(path.into_inner(), TreatmentId::new)?;
    let completed = state.treatments.complete_treatment(id, &user.actor()).await?;
    Ok(web::Json(completed.into()))
}

/// Register the `/api/Treatment` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/Treatment")
            .service(get_treatment_by_id)
            .service(get_treatments_by_disease_history_id)
            .service(add_treatment)
            .service(edit_treatment)
            .service(complete_treatment),
    );
}
