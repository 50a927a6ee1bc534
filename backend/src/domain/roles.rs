//! Roles and claims.
//!
//! The role set is closed. Claims are data: the catalogue is loaded from the
//! identity registry at seeding time and never interpreted by the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::RoleId;

/// A named authorization role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Administrator,
    Patient,
    MedicalEmployee,
}

impl Role {
    /// Every role, in seeding order.
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Patient, Role::MedicalEmployee];

    /// Roles allowed to change clinical records.
    pub const STAFF: [Role; 2] = [Role::MedicalEmployee, Role::Administrator];

    /// Stored role name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Patient => "Patient",
            Self::MedicalEmployee => "MedicalEmployee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored or configured role name is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRoleError(s.to_owned()))
    }
}

/// An authorization capability attached to a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// A role as held by the role store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredRole {
    pub id: RoleId,
    pub role: Role,
}
