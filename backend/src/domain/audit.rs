//! Audit stamps carried by every persisted record.

use chrono::{DateTime, Utc};
use mockable::Clock;

/// Actor recorded against seeded rows.
pub const SEED_ACTOR: &str = "Seed";

/// Who performed a write.
///
/// Normally the user name of the authenticated caller; startup seeding uses
/// [`SEED_ACTOR`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(String);

impl Actor {
    /// Wrap an actor name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The actor used by startup seeding.
    pub fn seed() -> Self {
        Self::new(SEED_ACTOR)
    }

    /// Actor name as recorded in audit columns.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Creation and last-update bookkeeping for a record.
///
/// The creation half is written once. Updates only ever replace
/// `updated_by`/`updated`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditStamp {
    /// Actor that created the record.
    pub created_by: String,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Actor behind the latest update, if any.
    pub updated_by: Option<String>,
    /// Time of the latest update, if any.
    pub updated: Option<DateTime<Utc>>,
}

impl AuditStamp {
    /// Stamp a record created now by `actor`.
    pub fn created(actor: &Actor, clock: &dyn Clock) -> Self {
        Self {
            created_by: actor.as_str().to_owned(),
            created: clock.utc(),
            updated_by: None,
            updated: None,
        }
    }

    /// Return a copy marked as updated now by `actor`.
    #[must_use]
    pub fn touched(&self, actor: &Actor, clock: &dyn Clock) -> Self {
        Self {
            created_by: self.created_by.clone(),
            created: self.created,
            updated_by: Some(actor.as_str().to_owned()),
            updated: Some(clock.utc()),
        }
    }
}
