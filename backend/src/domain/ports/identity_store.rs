//! Driven ports for the identity store: principals, credentials and roles.
//!
//! The store owns password material. Domain code only ever hands it a
//! plaintext password to hash or check and never sees the stored digest.

use async_trait::async_trait;

use crate::domain::{AppUser, AppUserId, Claim, NewAppUser, Role, RoleId, StoredRole, UserName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity store adapters.
    pub enum IdentityStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "identity store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "identity store query failed: {message}",
        /// A uniquely named record already exists.
        Duplicate { message: String } => "identity record already exists: {message}",
        /// A referenced principal or role does not exist.
        Missing { message: String } => "identity record not found: {message}",
    }
}

/// Port for identity principals and their credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<AppUser>, IdentityStoreError>;

    async fn find_by_id(&self, id: &AppUserId) -> Result<Option<AppUser>, IdentityStoreError>;

    /// Whether any principal exists.
    async fn any_users(&self) -> Result<bool, IdentityStoreError>;

    /// Create the principal, its credentials and its linked profile together.
    ///
    /// Either all three are stored or none is.
    async fn create_user(
        &self,
        user: NewAppUser,
        password: &str,
    ) -> Result<AppUser, IdentityStoreError>;

    /// Compare `password` against the stored credentials.
    ///
    /// Returns `false` for a principal without credentials.
    async fn check_password(
        &self,
        id: &AppUserId,
        password: &str,
    ) -> Result<bool, IdentityStoreError>;

    /// Grant `role`. Granting a held role is a no-op.
    async fn add_to_role(&self, id: &AppUserId, role: Role) -> Result<(), IdentityStoreError>;

    async fn roles_of(&self, id: &AppUserId) -> Result<Vec<Role>, IdentityStoreError>;

    async fn is_in_role(&self, id: &AppUserId, role: Role) -> Result<bool, IdentityStoreError>;
}

/// Port for roles and the claims attached to them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Whether any role exists.
    async fn any_roles(&self) -> Result<bool, IdentityStoreError>;

    async fn create_role(&self, role: Role) -> Result<StoredRole, IdentityStoreError>;

    async fn find_role(&self, role: Role) -> Result<Option<StoredRole>, IdentityStoreError>;

    /// Whether any role has a claim attached.
    async fn any_role_claims(&self) -> Result<bool, IdentityStoreError>;

    async fn add_claim(&self, role_id: RoleId, claim: Claim) -> Result<(), IdentityStoreError>;

    /// Claims attached to `role`, in insertion order. Unknown roles have none.
    async fn claims_of(&self, role: Role) -> Result<Vec<Claim>, IdentityStoreError>;
}
