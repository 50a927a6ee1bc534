//! Account handlers: token issuance and the current caller.
//!
//! ```text
//! POST /api/Account/GetToken {"username":"admin1@test.com","password":"...","rememberMe":false}
//! GET  /api/Account/GetCurrentUser
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::CurrentUser;
use crate::domain::{Error, GeneratedToken, LoginCredentials, LoginValidationError, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Login request body for `GetToken`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenRequest {
    #[schema(example = "admin1@test.com")]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserView {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<CurrentUser> for CurrentUserView {
    fn from(value: CurrentUser) -> Self {
        Self {
            id: value.user.id.to_string(),
            user_name: value.user.user_name.to_string(),
            email: value.user.email,
            roles: value.roles,
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyUsername => ("username", "empty_value"),
        LoginValidationError::UsernameTooLong => ("username", "too_long"),
        LoginValidationError::EmptyPassword => ("password", "empty_value"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/Account/GetToken",
    request_body = GetTokenRequest,
    responses(
        (status = 200, description = "Issued token", body = GeneratedToken),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["Account"],
    operation_id = "getToken",
    security([])
)]
#[post("/GetToken")]
pub async fn get_token(
    state: web::Data<HttpState>,
    payload: web::Json<GetTokenRequest>,
) -> ApiResult<web::Json<GeneratedToken>> {
    let request = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&request.username, &request.password)
        .map_err(map_login_validation_error)?;
    let token = state
        .accounts
        .get_token(&credentials, request.remember_me)
        .await?;
    Ok(web::Json(token))
}

#[utoipa::path(
    get,
    path = "/api/Account/GetCurrentUser",
    responses(
        (status = 200, description = "Current user", body = CurrentUserView),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["Account"],
    operation_id = "getCurrentUser"
)]
#[get("/GetCurrentUser")]
pub async fn get_current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<CurrentUserView>> {
    let current = state.accounts.current_user(user.user_name()).await?;
    Ok(web::Json(current.into()))
}

/// Register the `/api/Account` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/Account")
            .service(get_token)
            .service(get_current_user),
    );
}
