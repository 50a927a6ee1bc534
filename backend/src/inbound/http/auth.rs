//! Bearer token authentication for HTTP handlers.
//!
//! [`AuthenticatedUser`] is an extractor: adding it to a handler signature
//! makes the route require `Authorization: Bearer <token>`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, AppUserId, Error, Role, TokenClaims, UserName};

use super::state::HttpState;

/// Caller identity established from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    claims: TokenClaims,
    user_name: UserName,
}

impl AuthenticatedUser {
    pub(crate) fn from_claims(claims: TokenClaims) -> Result<Self, Error> {
        let user_name = UserName::new(&claims.name)
            .map_err(|_| Error::unauthorized("token subject is not a valid user name"))?;
        Ok(Self { claims, user_name })
    }

    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    /// Audit actor for writes made by this caller.
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_name.as_str())
    }

    /// Require medical staff (MedicalEmployee or Administrator).
    pub fn require_staff(&self) -> Result<(), Error> {
        if self.claims.has_any_role(&Role::STAFF) {
            Ok(())
        } else {
            Err(Error::forbidden("medical staff role required"))
        }
    }

    /// Require medical staff, or that the caller is `owner`.
    ///
    /// Records with no owning account are staff-only.
    pub fn require_staff_or_owner(&self, owner: Option<AppUserId>) -> Result<(), Error> {
        if self.claims.has_any_role(&Role::STAFF) || owner == Some(self.claims.sub) {
            Ok(())
        } else {
            Err(Error::forbidden("record belongs to another patient"))
        }
    }
}

/// Token following a case-insensitive `Bearer` scheme.
fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("bearer token required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("bearer token required"))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(Error::unauthorized("bearer token required"));
    }
    Ok(token.to_owned())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state =
                state.ok_or_else(|| Error::internal("http state is not configured"))?;
            let claims = state.accounts.authenticate(&token).await?;
            Self::from_claims(claims)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppUserId, ErrorCode};
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn claims(roles: Vec<Role>) -> TokenClaims {
        TokenClaims {
            sub: AppUserId::random(),
            name: "patient1@test.com".to_owned(),
            roles,
            iat: 0,
            exp: 60,
        }
    }

    #[rstest]
    #[case("Bearer abc.def.ghi", "abc.def.ghi")]
    #[case("bearer   abc.def.ghi ", "abc.def.ghi")]
    fn bearer_tokens_are_extracted(#[case] header: &str, #[case] expected: &str) {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, header))
            .to_http_request();
        assert_eq!(bearer_token(&req).expect("token"), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic dXNlcjpwdw=="))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer   "))]
    fn other_headers_are_unauthorized(#[case] header: Option<&str>) {
        let mut req = TestRequest::default();
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let err = bearer_token(&req.to_http_request()).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(vec![Role::MedicalEmployee], true)]
    #[case(vec![Role::Administrator], true)]
    #[case(vec![Role::Patient], false)]
    #[case(vec![], false)]
    fn staff_requirement_follows_roles(#[case] roles: Vec<Role>, #[case] allowed: bool) {
        let user = AuthenticatedUser::from_claims(claims(roles)).expect("valid claims");
        assert_eq!(user.require_staff().is_ok(), allowed);
    }

    #[rstest]
    #[case(vec![Role::MedicalEmployee], false, true)]
    #[case(vec![Role::Administrator], false, true)]
    #[case(vec![Role::Patient], true, true)]
    #[case(vec![Role::Patient], false, false)]
    #[case(vec![], true, true)]
    fn owners_and_staff_pass_the_owner_check(
        #[case] roles: Vec<Role>,
        #[case] owns: bool,
        #[case] allowed: bool,
    ) {
        let user = AuthenticatedUser::from_claims(claims(roles)).expect("valid claims");
        let owner = if owns {
            Some(user.claims().sub)
        } else {
            Some(AppUserId::random())
        };
        assert_eq!(user.require_staff_or_owner(owner).is_ok(), allowed);
    }

    #[test]
    fn unowned_records_are_staff_only() {
        let patient =
            AuthenticatedUser::from_claims(claims(vec![Role::Patient])).expect("valid claims");
        let err = patient.require_staff_or_owner(None).expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn actor_is_the_user_name() {
        let user = AuthenticatedUser::from_claims(claims(vec![])).expect("valid claims");
        assert_eq!(user.actor().as_str(), "patient1@test.com");
    }
}
