//! Strongly typed entity identifiers.
//!
//! Clinical records use positive integer keys. Identity records use UUIDs so
//! they can be minted before the credential store assigns anything.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{FieldViolation, ViolationKind};

macro_rules! define_entity_id {
    ($(#[$outer:meta])* $name:ident, $field:literal) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Validate and wrap a raw key; zero and negative keys are rejected.
            pub fn new(value: i32) -> Result<Self, FieldViolation> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(FieldViolation::new($field, ViolationKind::InvalidId))
                }
            }

            /// Wrap a key read back from storage.
            pub(crate) const fn from_stored(value: i32) -> Self {
                Self(value)
            }

            /// Raw key value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a [`crate::domain::Medicine`].
    MedicineId,
    "medicineId"
);
define_entity_id!(
    /// Identifier of a [`crate::domain::UserInfo`] profile.
    UserInfoId,
    "userInfoId"
);
define_entity_id!(
    /// Identifier of a [`crate::domain::DiseaseHistory`].
    DiseaseHistoryId,
    "diseaseHistoryId"
);
define_entity_id!(
    /// Identifier of a [`crate::domain::Treatment`].
    TreatmentId,
    "treatmentId"
);
define_entity_id!(
    /// Identifier of a [`crate::domain::Metrics`] reading.
    MetricsId,
    "id"
);

/// Identifier of an [`crate::domain::AppUser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppUserId(Uuid);

impl AppUserId {
    /// Mint a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the inner UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AppUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AppUserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identifier of a stored role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Mint a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the inner UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}
