//! Authentication primitives: login credentials and bearer token payloads.
//!
//! Inbound adapters parse raw strings into these types before calling the
//! account service, so the service only ever sees well-formed input.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::app_user::{UserName, UserNameValidationError};
use super::ids::AppUserId;
use super::roles::Role;

/// Token type literal returned to clients.
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username exceeded the accepted length.
    UsernameTooLong,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong => write!(f, "username is too long"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` is a valid [`UserName`].
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use infusion_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin1@test.com", "Test123!").unwrap();
/// assert_eq!(creds.username().as_str(), "admin1@test.com");
/// assert_eq!(creds.password(), "Test123!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: UserName,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = UserName::new(username).map_err(|err| match err {
            UserNameValidationError::Empty => LoginValidationError::EmptyUsername,
            UserNameValidationError::TooLong => LoginValidationError::UsernameTooLong,
        })?;

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &UserName {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Claims carried inside an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Authenticated user id.
    pub sub: AppUserId,
    /// Authenticated user name.
    pub name: String,
    /// Roles held when the token was issued.
    pub roles: Vec<Role>,
    /// Issue time, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry time, seconds since the Unix epoch.
    pub exp: i64,
}

impl TokenClaims {
    /// Whether the bearer holds any of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|held| roles.contains(held))
    }
}

/// Token response body returned by `GetToken`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedToken {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Lifetime in seconds.
    #[schema(example = 3600)]
    pub expires_in: u64,
}

impl GeneratedToken {
    pub fn bearer(access_token: String, lifetime: Duration) -> Self {
        Self {
            access_token,
            token_type: BEARER_TOKEN_TYPE.to_owned(),
            expires_in: lifetime.as_secs(),
        }
    }
}

/// Token lifetimes for ordinary and remember-me logins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub lifetime: Duration,
    pub remember_me_lifetime: Duration,
}

impl TokenPolicy {
    /// Lifetime applied to a login.
    pub fn lifetime_for(&self, remember_me: bool) -> Duration {
        if remember_me {
            self.remember_me_lifetime
        } else {
            self.lifetime
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_secs(60 * 60),
            remember_me_lifetime: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}
