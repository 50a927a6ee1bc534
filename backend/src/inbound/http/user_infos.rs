//! Profile handlers.
//!
//! ```text
//! GET /api/UserInfo/GetUserInfoById/{id}
//! GET /api/UserInfo/GetMyUserInfo
//! PUT /api/UserInfo/EditUserInfo
//! ```
//!
//! Staff may read and edit any profile; everyone else only their own.

use actix_web::{get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, UserInfo, UserInfoDraft, UserInfoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_id, required, violation_error};

/// Profile as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoView {
    pub id: i32,
    pub app_user_id: Option<String>,
    pub email: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub weight: Option<f64>,
}

impl From<UserInfo> for UserInfoView {
    fn from(value: UserInfo) -> Self {
        let details = value.details;
        Self {
            id: value.id.get(),
            app_user_id: value.app_user_id.map(|id| id.to_string()),
            email: details.email,
            first_name: details.first_name,
            second_name: details.second_name,
            birth_date: details.birth_date,
            notes: details.notes,
            address_line1: details.address_line1,
            address_line2: details.address_line2,
            zip_code: details.zip_code,
            country: details.country,
            city: details.city,
            phone_number: details.phone_number,
            weight: details.weight,
        }
    }
}

/// Request body for `EditUserInfo`. Absent optional fields are cleared.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditUserInfo {
    pub id: Option<i32>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub weight: Option<f64>,
}

impl EditUserInfo {
    fn into_draft(self) -> Result<(UserInfoId, UserInfoDraft), Error> {
        let id = parse_id(required(self.id, "id")?, UserInfoId::new)?;
        let draft = UserInfoDraft {
            email: required(self.email, "email")?,
            first_name: self.first_name,
            second_name: self.second_name,
            birth_date: self.birth_date,
            notes: self.notes,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            zip_code: self.zip_code,
            country: self.country,
            city: self.city,
            phone_number: self.phone_number,
            weight: self.weight,
        }
        .validated()
        .map_err(violation_error)?;
        Ok((id, draft))
    }
}

#[utoipa::path(
    get,
    path = "/api/UserInfo/GetUserInfoById/{id}",
    params(("id" = i32, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile", body = UserInfoView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Profile belongs to someone else", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["UserInfo"],
    operation_id = "getUserInfoById"
)]
#[get("/GetUserInfoById/{id}")]
pub async fn get_user_info_by_id(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserInfoView>> {
    let id = parse_id(path.into_inner(), UserInfoId::new)?;
    let profile = state.user_infos.get_user_info_by_id(id).await?;
    user.require_staff_or_owner(profile.app_user_id)?;
    Ok(web::Json(profile.into()))
}

/// Profile of the caller.
#[utoipa::path(
    get,
    path = "/api/UserInfo/GetMyUserInfo",
    responses(
        (status = 200, description = "Profile", body = UserInfoView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Caller has no profile", body = Error)
    ),
    tags = ["UserInfo"],
    operation_id = "getMyUserInfo"
)]
#[get("/GetMyUserInfo")]
pub async fn get_my_user_info(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserInfoView>> {
    let profile = state
        .user_infos
        .get_user_info_by_app_user(user.claims().sub)
        .await?;
    Ok(web::Json(profile.into()))
}

#[utoipa::path(
    put,
    path = "/api/UserInfo/EditUserInfo",
    request_body = EditUserInfo,
    responses(
        (status = 200, description = "Updated profile", body = UserInfoView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Profile belongs to someone else", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["UserInfo"],
    operation_id = "editUserInfo"
)]
#[put("/EditUserInfo")]
pub async fn edit_user_info(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<EditUserInfo>,
) -> ApiResult<web::Json<UserInfoView>> {
    let (id, draft) = payload.into_inner().into_draft()?;
    if user.require_staff().is_err() {
        let existing = state.user_infos.get_user_info_by_id(id).await?;
        user.require_staff_or_owner(existing.app_user_id)?;
    }
    let updated = state
        .user_infos
        .update_user_info(id, draft, &user.actor())
        .await?;
    Ok(web::Json(updated.into()))
}

/// Register the `/api/UserInfo` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/UserInfo")
            .service(get_user_info_by_id)
            .service(get_my_user_info)
            .service(edit_user_info),
    );
}
