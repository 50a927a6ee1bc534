//! Account service: token issuance and role membership checks.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};

use super::ports::{AccountService, CurrentUser, TokenIssuer, TokenIssuerError, UserStore};
use super::service_errors::map_identity_error;
use super::{
    Error, GeneratedToken, LoginCredentials, Role, TokenClaims, TokenPolicy, UserName,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`AccountService`] backed by a [`UserStore`] and a [`TokenIssuer`].
#[derive(Clone)]
pub struct AccountServiceImpl<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    policy: TokenPolicy,
}

impl<U, T> AccountServiceImpl<U, T> {
    pub fn new(users: Arc<U>, tokens: Arc<T>, clock: Arc<dyn Clock>, policy: TokenPolicy) -> Self {
        Self {
            users,
            tokens,
            clock,
            policy,
        }
    }
}

impl<U, T> AccountServiceImpl<U, T>
where
    U: UserStore,
    T: TokenIssuer,
{
    async fn is_user_in_role(&self, user_name: &UserName, role: Role) -> Result<bool, Error> {
        let Some(user) = self
            .users
            .find_by_user_name(user_name)
            .await
            .map_err(map_identity_error)?
        else {
            return Ok(false);
        };
        self.users
            .is_in_role(&user.id, role)
            .await
            .map_err(map_identity_error)
    }
}

#[async_trait]
impl<U, T> AccountService for AccountServiceImpl<U, T>
where
    U: UserStore,
    T: TokenIssuer,
{
    async fn get_token(
        &self,
        credentials: &LoginCredentials,
        remember_me: bool,
    ) -> Result<GeneratedToken, Error> {
        let Some(user) = self
            .users
            .find_by_user_name(credentials.username())
            .await
            .map_err(map_identity_error)?
        else {
            debug!(user_name = %credentials.username(), "login for unknown user");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let accepted = self
            .users
            .check_password(&user.id, credentials.password())
            .await
            .map_err(map_identity_error)?;
        if !accepted {
            debug!(user_id = %user.id, "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let roles = self
            .users
            .roles_of(&user.id)
            .await
            .map_err(map_identity_error)?;
        let lifetime = self.policy.lifetime_for(remember_me);
        let lifetime_secs = i64::try_from(lifetime.as_secs())
            .map_err(|_| Error::internal("token lifetime out of range"))?;
        let issued_at = self.clock.utc().timestamp();
        let claims = TokenClaims {
            sub: user.id,
            name: user.user_name.as_str().to_owned(),
            roles,
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime_secs),
        };

        let access_token = self
            .tokens
            .issue(&claims)
            .map_err(|err| Error::internal(format!("failed to issue token: {err}")))?;
        Ok(GeneratedToken::bearer(access_token, lifetime))
    }

    async fn authenticate(&self, access_token: &str) -> Result<TokenClaims, Error> {
        self.tokens.verify(access_token).map_err(|err| {
            if !matches!(err, TokenIssuerError::Expired) {
                warn!(error = %err, "rejected bearer token");
            }
            Error::unauthorized(format!("bearer token rejected: {err}"))
        })
    }

    async fn current_user(&self, user_name: &UserName) -> Result<CurrentUser, Error> {
        let user = self
            .users
            .find_by_user_name(user_name)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::unauthorized(format!("user {user_name} no longer exists")))?;
        let roles = self
            .users
            .roles_of(&user.id)
            .await
            .map_err(map_identity_error)?;
        Ok(CurrentUser { user, roles })
    }

    async fn is_user_in_admin_role(&self, user_name: &UserName) -> Result<bool, Error> {
        self.is_user_in_role(user_name, Role::Administrator).await
    }

    async fn is_user_in_patient_role(&self, user_name: &UserName) -> Result<bool, Error> {
        self.is_user_in_role(user_name, Role::Patient).await
    }

    async fn is_user_in_med_employee_role(&self, user_name: &UserName) -> Result<bool, Error> {
        self.is_user_in_role(user_name, Role::MedicalEmployee).await
    }
}
