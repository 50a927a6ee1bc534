//! PostgreSQL-backed identity store implementing `UserStore` and `RoleStore`.
//!
//! Principals live in `app_users`, password material in `user_credentials`
//! and the linked profile in `user_infos`. Creating a principal writes all
//! three rows in one transaction.

use async_trait::async_trait;
use diesel::dsl::{Select, exists};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{IdentityStoreError, RoleStore, UserStore};
use crate::domain::{AppUser, AppUserId, Claim, NewAppUser, Role, RoleId, StoredRole, UserName};

use super::diesel_error_mapping::{map_identity_diesel_error, map_identity_pool_error};
use super::models::{
    AppUserRow, CredentialRow, NewAppUserRow, NewRoleClaimRow, NewUserInfoRow, RoleClaimRow,
    RoleRow, UserRoleRow,
};
use super::password_hashing::{hash_password, verify_password};
use super::pool::DbPool;
use super::schema::{app_users, role_claims, roles, user_credentials, user_infos, user_roles};

/// Diesel implementation of the identity store.
#[derive(Clone)]
pub struct DieselIdentityStore {
    pool: DbPool,
}

impl DieselIdentityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

// Keyed subqueries behind the seeding gates; `exists` needs a select query,
// not a bare table.
fn user_keys() -> Select<app_users::table, app_users::id> {
    app_users::table.select(app_users::id)
}

fn role_keys() -> Select<roles::table, roles::id> {
    roles::table.select(roles::id)
}

fn role_claim_keys() -> Select<role_claims::table, role_claims::id> {
    role_claims::table.select(role_claims::id)
}

fn to_domain_user(row: AppUserRow) -> Result<AppUser, IdentityStoreError> {
    let id = row.id;
    row.into_domain()
        .ok_or_else(|| IdentityStoreError::query(format!("stored user {id} has a blank name")))
}

/// Parse stored role names, skipping names outside the role set.
fn known_roles(names: Vec<String>) -> Vec<Role> {
    names
        .into_iter()
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                warn!(%err, "ignoring stored role outside the role set");
                None
            }
        })
        .collect()
}

#[async_trait]
impl UserStore for DieselIdentityStore {
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<AppUser>, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        let row: Option<AppUserRow> = app_users::table
            .filter(app_users::user_name.eq(user_name.as_str()))
            .select(AppUserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_identity_diesel_error)?;
        row.map(to_domain_user).transpose()
    }

    async fn find_by_id(&self, id: &AppUserId) -> Result<Option<AppUser>, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        let row: Option<AppUserRow> = app_users::table
            .find(*id.as_uuid())
            .select(AppUserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_identity_diesel_error)?;
        row.map(to_domain_user).transpose()
    }

    async fn any_users(&self) -> Result<bool, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        diesel::select(exists(user_keys()))
            .get_result(&mut conn)
            .await
            .map_err(map_identity_diesel_error)
    }

    async fn create_user(
        &self,
        user: NewAppUser,
        password: &str,
    ) -> Result<AppUser, IdentityStoreError> {
        let id = AppUserId::random();
        let digest = hash_password(password);
        let user = &user;
        let digest = &digest;
        // Checked out after the borrows above so the connection drops first.
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;

        let row: AppUserRow = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let stored: AppUserRow = diesel::insert_into(app_users::table)
                        .values(&NewAppUserRow {
                            id: *id.as_uuid(),
                            user_name: user.user_name.as_str(),
                            email: &user.email,
                            email_confirmed: user.email_confirmed,
                            created_by: &user.audit.created_by,
                            created: user.audit.created,
                        })
                        .returning(AppUserRow::as_returning())
                        .get_result(conn)
                        .await?;

                    diesel::insert_into(user_credentials::table)
                        .values(&CredentialRow {
                            user_id: *id.as_uuid(),
                            password_salt: digest.salt.clone(),
                            password_hash: digest.hash.clone(),
                        })
                        .execute(conn)
                        .await?;

                    diesel::insert_into(user_infos::table)
                        .values(&NewUserInfoRow::new(&user.profile, Some(id), &user.audit))
                        .execute(conn)
                        .await?;

                    Ok(stored)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_identity_diesel_error)?;
        to_domain_user(row)
    }

    async fn check_password(
        &self,
        id: &AppUserId,
        password: &str,
    ) -> Result<bool, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        let credentials: Option<CredentialRow> = user_credentials::table
            .find(*id.as_uuid())
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_identity_diesel_error)?;
        Ok(credentials.is_some_and(|stored| {
            verify_password(password, &stored.password_salt, &stored.password_hash)
        }))
    }

    async fn add_to_role(&self, id: &AppUserId, role: Role) -> Result<(), IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        let role_id: Option<uuid::Uuid> = roles::table
            .filter(roles::name.eq(role.as_str()))
            .select(roles::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_identity_diesel_error)?;
        let role_id = role_id.ok_or_else(|| IdentityStoreError::missing(role.as_str()))?;

        diesel::insert_into(user_roles::table)
            .values(&UserRoleRow {
                user_id: *id.as_uuid(),
                role_id,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_identity_diesel_error)?;
        Ok(())
    }

    async fn roles_of(&self, id: &AppUserId) -> Result<Vec<Role>, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        let names: Vec<String> = user_roles::table
            .inner_join(roles::table)
            .filter(user_roles::user_id.eq(*id.as_uuid()))
            .order(roles::name.asc())
            .select(roles::name)
            .load(&mut conn)
            .await
            .map_err(map_identity_diesel_error)?;
        Ok(known_roles(names))
    }

    async fn is_in_role(&self, id: &AppUserId, role: Role) -> Result<bool, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        diesel::select(exists(
            user_roles::table
                .inner_join(roles::table)
                .filter(user_roles::user_id.eq(*id.as_uuid()))
                .filter(roles::name.eq(role.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_identity_diesel_error)
    }
}

#[async_trait]
impl RoleStore for DieselIdentityStore {
    async fn any_roles(&self) -> Result<bool, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        diesel::select(exists(role_keys()))
            .get_result(&mut conn)
            .await
            .map_err(map_identity_diesel_error)
    }

    async fn create_role(&self, role: Role) -> Result<StoredRole, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        let row = RoleRow {
            id: *RoleId::random().as_uuid(),
            name: role.as_str().to_owned(),
        };
        diesel::insert_into(roles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_identity_diesel_error)?;
        Ok(StoredRole {
            id: RoleId::from_uuid(row.id),
            role,
        })
    }

    async fn find_role(&self, role: Role) -> Result<Option<StoredRole>, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        let row: Option<RoleRow> = roles::table
            .filter(roles::name.eq(role.as_str()))
            .select(RoleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_identity_diesel_error)?;
        Ok(row.and_then(RoleRow::into_domain))
    }

    async fn any_role_claims(&self) -> Result<bool, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        diesel::select(exists(role_claim_keys()))
            .get_result(&mut conn)
            .await
            .map_err(map_identity_diesel_error)
    }

    async fn add_claim(&self, role_id: RoleId, claim: Claim) -> Result<(), IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        diesel::insert_into(role_claims::table)
            .values(&NewRoleClaimRow {
                role_id: *role_id.as_uuid(),
                claim_type: &claim.claim_type,
                claim_value: &claim.value,
            })
            .execute(&mut conn)
            .await
            .map_err(map_identity_diesel_error)?;
        Ok(())
    }

    async fn claims_of(&self, role: Role) -> Result<Vec<Claim>, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_identity_pool_error)?;
        let rows: Vec<RoleClaimRow> = role_claims::table
            .inner_join(roles::table)
            .filter(roles::name.eq(role.as_str()))
            .order(role_claims::id.asc())
            .select(RoleClaimRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_identity_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| Claim::new(row.claim_type, row.claim_value))
            .collect())
    }
}
