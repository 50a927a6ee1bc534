//! Driving port for authentication and role checks.
//!
//! Inbound adapters use it to mint tokens, to turn a presented bearer token
//! into claims, and to ask whether a named user holds a role.

use async_trait::async_trait;

use crate::domain::{AppUser, Error, GeneratedToken, LoginCredentials, Role, TokenClaims, UserName};

/// A principal together with the roles it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub user: AppUser,
    pub roles: Vec<Role>,
}

/// Account use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Check credentials and mint a bearer token.
    ///
    /// Unknown users and wrong passwords both fail with `unauthorized`.
    async fn get_token(
        &self,
        credentials: &LoginCredentials,
        remember_me: bool,
    ) -> Result<GeneratedToken, Error>;

    /// Verify a presented bearer token.
    async fn authenticate(&self, access_token: &str) -> Result<TokenClaims, Error>;

    async fn current_user(&self, user_name: &UserName) -> Result<CurrentUser, Error>;

    /// `false` for unknown users.
    async fn is_user_in_admin_role(&self, user_name: &UserName) -> Result<bool, Error>;

    /// `false` for unknown users.
    async fn is_user_in_patient_role(&self, user_name: &UserName) -> Result<bool, Error>;

    /// `false` for unknown users.
    async fn is_user_in_med_employee_role(&self, user_name: &UserName) -> Result<bool, Error>;
}
