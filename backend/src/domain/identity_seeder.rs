//! Identity seeding: roles, role claims and seed accounts.
//!
//! Converts the declarative identity registry into store calls. Each of the
//! three phases is gated on the store being empty for that concern, so the
//! seeder can run on every start without creating duplicates.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use mockable::Clock;
use seed_data::{IdentityRegistry, SeedAccount, SeedProfile};
use thiserror::Error;
use tracing::info;

use super::ports::{IdentityStoreError, RoleStore, UserStore};
use super::{
    Actor, AuditStamp, Claim, FieldViolation, NewAppUser, Role, UnknownRoleError, UserInfoDraft,
    UserName, UserNameValidationError,
};

/// Result of one seeding phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// The phase ran and wrote rows.
    Applied,
    /// The store already held data for this phase; nothing was written.
    AlreadySeeded,
}

/// Per-phase results of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    pub roles: SeedingResult,
    pub claims: SeedingResult,
    pub users: SeedingResult,
}

/// Errors raised while applying the identity registry.
#[derive(Debug, Error)]
pub enum IdentitySeedingError {
    /// The registry names a role the backend does not know.
    #[error("identity registry names an unsupported role: {0}")]
    UnknownRole(#[from] UnknownRoleError),
    /// Claims were requested for a role that is not stored.
    #[error("role {role} is missing from the role store")]
    MissingRole { role: Role },
    /// A seed account user name failed validation.
    #[error("seed account user name is invalid: {0}")]
    InvalidUserName(#[from] UserNameValidationError),
    /// A seed account profile failed validation.
    #[error("seed account {user_name} has an invalid profile: {source}")]
    InvalidProfile {
        user_name: String,
        #[source]
        source: FieldViolation,
    },
    /// The identity store failed.
    #[error("identity persistence failed: {0}")]
    Persistence(#[from] IdentityStoreError),
}

/// Applies an [`IdentityRegistry`] to the role and user stores.
#[derive(Clone)]
pub struct IdentitySeeder<R, U> {
    roles: Arc<R>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<R, U> IdentitySeeder<R, U> {
    pub fn new(roles: Arc<R>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            roles,
            users,
            clock,
        }
    }
}

impl<R, U> IdentitySeeder<R, U>
where
    R: RoleStore,
    U: UserStore,
{
    /// Run the three seeding phases in order.
    ///
    /// # Errors
    ///
    /// Returns [`IdentitySeedingError`] when the registry does not fit the
    /// backend's role set or a store call fails. Phases that completed before
    /// the failure stay applied.
    pub async fn seed(
        &self,
        registry: &IdentityRegistry,
    ) -> Result<SeedOutcome, IdentitySeedingError> {
        let roles = self.seed_roles(registry).await?;
        let claims = self.seed_claims(registry).await?;
        let users = self.seed_users(registry).await?;
        info!(?roles, ?claims, ?users, "identity seeding finished");
        Ok(SeedOutcome {
            roles,
            claims,
            users,
        })
    }

    async fn seed_roles(
        &self,
        registry: &IdentityRegistry,
    ) -> Result<SeedingResult, IdentitySeedingError> {
        if self.roles.any_roles().await? {
            return Ok(SeedingResult::AlreadySeeded);
        }
        for definition in registry.roles() {
            let role: Role = definition.name().parse()?;
            self.roles.create_role(role).await?;
        }
        info!(count = registry.roles().len(), "seeded roles");
        Ok(SeedingResult::Applied)
    }

    async fn seed_claims(
        &self,
        registry: &IdentityRegistry,
    ) -> Result<SeedingResult, IdentitySeedingError> {
        if self.roles.any_role_claims().await? {
            return Ok(SeedingResult::AlreadySeeded);
        }
        let mut count = 0_usize;
        for definition in registry.roles() {
            let role: Role = definition.name().parse()?;
            let stored = self
                .roles
                .find_role(role)
                .await?
                .ok_or(IdentitySeedingError::MissingRole { role })?;
            for claim in definition.claims() {
                self.roles
                    .add_claim(stored.id, Claim::new(claim.claim_type(), claim.value()))
                    .await?;
                count += 1;
            }
        }
        info!(count, "seeded role claims");
        Ok(SeedingResult::Applied)
    }

    async fn seed_users(
        &self,
        registry: &IdentityRegistry,
    ) -> Result<SeedingResult, IdentitySeedingError> {
        if self.users.any_users().await? {
            return Ok(SeedingResult::AlreadySeeded);
        }
        let actor = Actor::new(registry.created_by());
        for account in registry.accounts() {
            let role: Role = account.role().parse()?;
            let new_user = self.new_app_user(account, &actor)?;
            let user = self
                .users
                .create_user(new_user, registry.default_password())
                .await?;
            self.users.add_to_role(&user.id, role).await?;
            info!(user_name = %user.user_name, %role, "seeded account");
        }
        Ok(SeedingResult::Applied)
    }

    fn new_app_user(
        &self,
        account: &SeedAccount,
        actor: &Actor,
    ) -> Result<NewAppUser, IdentitySeedingError> {
        let now = self.clock.utc();
        let profile = profile_draft(account.email(), account.profile(), now)
            .validated()
            .map_err(|source| IdentitySeedingError::InvalidProfile {
                user_name: account.user_name().to_owned(),
                source,
            })?;
        Ok(NewAppUser {
            user_name: UserName::new(account.user_name())?,
            email: account.email().to_owned(),
            email_confirmed: true,
            profile,
            audit: AuditStamp::created(actor, self.clock.as_ref()),
        })
    }
}

fn profile_draft(email: &str, profile: &SeedProfile, now: DateTime<Utc>) -> UserInfoDraft {
    UserInfoDraft {
        email: email.to_owned(),
        first_name: profile.first_name.clone(),
        second_name: profile.second_name.clone(),
        birth_date: profile
            .age_years
            .and_then(|years| now.checked_sub_months(Months::new(years.saturating_mul(12)))),
        notes: profile.notes.clone(),
        address_line1: profile.address_line1.clone(),
        address_line2: profile.address_line2.clone(),
        zip_code: profile.zip_code.clone(),
        country: profile.country.clone(),
        city: profile.city.clone(),
        phone_number: profile.phone_number.clone(),
        weight: profile.weight,
    }
}

#[cfg(test)]
#[path = "identity_seeder_tests.rs"]
mod tests;
