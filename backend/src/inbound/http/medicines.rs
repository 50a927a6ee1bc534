//! Medicine catalogue handlers.
//!
//! ```text
//! GET    /api/Medicine/GetMedicines
//! GET    /api/Medicine/GetMedicineById/{id}
//! POST   /api/Medicine/AddMedicine {"title":"Saline","description":"0.9% NaCl"}
//! PUT    /api/Medicine/EditMedicine {"id":1,"title":"Saline"}
//! DELETE /api/Medicine/DeleteMedicine/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Medicine, MedicineId, NewMedicine};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_id, required, violation_error};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicineView {
    pub id: i32,
    #[schema(example = "Saline")]
    pub title: String,
    pub description: Option<String>,
}

impl From<Medicine> for MedicineView {
    fn from(value: Medicine) -> Self {
        Self {
            id: value.id.get(),
            title: value.title,
            description: value.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MedicineList {
    pub medicines: Vec<MedicineView>,
}

/// Request body for `AddMedicine` and `EditMedicine`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditMedicine {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl EditMedicine {
    fn into_draft(self) -> Result<(Option<i32>, NewMedicine), Error> {
        let title = required(self.title, "title")?;
        let draft =
            NewMedicine::new(&title, self.description.as_deref()).map_err(violation_error)?;
        Ok((self.id, draft))
    }
}

#[utoipa::path(
    get,
    path = "/api/Medicine/GetMedicines",
    responses(
        (status = 200, description = "Medicine catalogue", body = MedicineList),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["Medicine"],
    operation_id = "getMedicines"
)]
#[get("/GetMedicines")]
pub async fn get_medicines(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<MedicineList>> {
    let medicines = state
        .medicines
        .get_medicines()
        .await?
        .into_iter()
        .map(MedicineView::from)
        .collect();
    Ok(web::Json(MedicineList { medicines }))
}

#[utoipa::path(
    get,
    path = "/api/Medicine/GetMedicineById/{id}",
    params(("id" = i32, Path, description = "Medicine id")),
    responses(
        (status = 200, description = "Medicine", body = MedicineView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["Medicine"],
    operation_id = "getMedicineById"
)]
#[get("/GetMedicineById/{id}")]
pub async fn get_medicine_by_id(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MedicineView>> {
    let id = parse_id(path.into_inner(), MedicineId::new)?;
    let medicine = state.medicines.get_medicine_by_id(id).await?;
    Ok(web::Json(medicine.into()))
}

#[utoipa::path(
    post,
    path = "/api/Medicine/AddMedicine",
    request_body = EditMedicine,
    responses(
        (status = 200, description = "Created medicine", body = MedicineView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["Medicine"],
    operation_id = "addMedicine"
)]
#[post("/AddMedicine")]
pub async fn add_medicine(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditMedicine>,
) -> ApiResult<web::Json<MedicineView>> {
    user.require_staff()?;
    let (_, draft) = payload.into_inner().into_draft()?;
    let created = state.medicines.add_medicine(draft, &user.actor()).await?;
    Ok(web::Json(created.into()))
}

#[utoipa::path(
    put,
    path = "/api/Medicine/EditMedicine",
    request_body = EditMedicine,
    responses(
        (status = 200, description = "Updated medicine", body = MedicineView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["Medicine"],
    operation_id = "editMedicine"
)]
#[put("/EditMedicine")]
pub async fn edit_medicine(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditMedicine>,
) -> ApiResult<web::Json<MedicineView>> {
    user.require_staff()?;
    let (id, draft) = payload.into_inner().into_draft()?;
    let id = parse_id(required(id, "id")?, MedicineId::new)?;
    let updated = state
        .medicines
        .update_medicine(id, draft, &user.actor())
        .await?;
    Ok(web::Json(updated.into()))
}

/// Remove a medicine. Medicines still referenced by treatments are refused.
#[utoipa::path(
    delete,
    path = "/api/Medicine/DeleteMedicine/{id}",
    params(("id" = i32, Path, description = "Medicine id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id or medicine in use", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["Medicine"],
    operation_id = "deleteMedicine"
)]
#[delete("/DeleteMedicine/{id}")]
pub async fn delete_medicine(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    user.require_staff()?;
    let id = parse_id(path.into_inner(), MedicineId::new)?;
    state.medicines.delete_medicine(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the `/api/Medicine` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/Medicine")
            .service(get_medicines)
            .service(get_medicine_by_id)
            .service(add_medicine)
            .service(edit_medicine)
            .service(delete_medicine),
    );
}
