//! Identity registry types and JSON parsing.
//!
//! The registry is the declarative role-to-claims table plus the list of
//! baseline accounts. Parsing resolves every cross reference up front so
//! consumers can iterate the registry without re-validating it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::account::{RawSeedAccount, SeedAccount};
use crate::error::RegistryError;
use crate::validation::{is_plausible_email, is_valid_user_name};

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// A named authorization capability from the claim catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDefinition {
    claim_type: String,
    value: String,
}

impl ClaimDefinition {
    /// Returns the human-readable claim type, for example
    /// `"View Donor Request List"`.
    #[must_use]
    pub fn claim_type(&self) -> &str {
        &self.claim_type
    }

    /// Returns the claim value stored alongside the type.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A role together with its resolved claim list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    name: String,
    claims: Vec<ClaimDefinition>,
}

impl RoleDefinition {
    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the claims attached to this role, in declaration order.
    #[must_use]
    pub fn claims(&self) -> &[ClaimDefinition] {
        &self.claims
    }
}

/// Parsed identity registry.
///
/// # Example
///
/// ```
/// use seed_data::IdentityRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "defaultPassword": "pw",
///     "createdBy": "Seed",
///     "claims": [],
///     "roles": [{"name": "Administrator", "claims": []}],
///     "accounts": []
/// }"#;
///
/// let registry = IdentityRegistry::from_json(json).expect("valid registry");
/// assert!(registry.find_role("Administrator").is_some());
/// assert!(registry.accounts().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityRegistry {
    version: u32,
    default_password: String,
    created_by: String,
    claims: Vec<ClaimDefinition>,
    roles: Vec<RoleDefinition>,
    accounts: Vec<SeedAccount>,
}

impl IdentityRegistry {
    /// Parses an identity registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed or missing required fields
    /// - The version is unsupported
    /// - A role or account references an undeclared claim or role
    /// - Any name is declared twice
    /// - An account user name or email is malformed
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawIdentityRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads an identity registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawIdentityRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }
        if raw.default_password.is_empty() {
            return Err(RegistryError::EmptyPassword);
        }
        if raw.created_by.trim().is_empty() {
            return Err(RegistryError::EmptyCreatedBy);
        }

        let claims = parse_claims(raw.claims)?;
        let roles = parse_roles(raw.roles, &claims)?;
        let accounts = parse_accounts(raw.accounts, &roles)?;

        Ok(Self {
            version: raw.version,
            default_password: raw.default_password,
            created_by: raw.created_by,
            claims,
            roles,
            accounts,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the password assigned to every seed account.
    #[must_use]
    pub fn default_password(&self) -> &str {
        &self.default_password
    }

    /// Returns the audit actor recorded against seeded rows.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Returns the full claim catalogue.
    #[must_use]
    pub fn claims(&self) -> &[ClaimDefinition] {
        &self.claims
    }

    /// Returns all role definitions.
    #[must_use]
    pub fn roles(&self) -> &[RoleDefinition] {
        &self.roles
    }

    /// Returns all seed accounts.
    #[must_use]
    pub fn accounts(&self) -> &[SeedAccount] {
        &self.accounts
    }

    /// Finds a role definition by name.
    #[must_use]
    pub fn find_role(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.iter().find(|role| role.name == name)
    }

    /// Returns the claims attached to the named role, if declared.
    #[must_use]
    pub fn claims_for_role(&self, name: &str) -> Option<&[ClaimDefinition]> {
        self.find_role(name).map(RoleDefinition::claims)
    }
}

fn parse_claims(raw: Vec<RawClaim>) -> Result<Vec<ClaimDefinition>, RegistryError> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|claim| {
            if !seen.insert(claim.claim_type.clone()) {
                return Err(RegistryError::DuplicateClaimType {
                    claim_type: claim.claim_type,
                });
            }
            Ok(ClaimDefinition {
                claim_type: claim.claim_type,
                value: claim.value,
            })
        })
        .collect()
}

fn parse_roles(
    raw: Vec<RawRole>,
    catalogue: &[ClaimDefinition],
) -> Result<Vec<RoleDefinition>, RegistryError> {
    if raw.is_empty() {
        return Err(RegistryError::EmptyRoles);
    }

    let mut seen_roles = HashSet::new();
    raw.into_iter()
        .map(|role| {
            if !seen_roles.insert(role.name.clone()) {
                return Err(RegistryError::DuplicateRole { name: role.name });
            }

            let mut seen_claims = HashSet::new();
            let claims = role
                .claims
                .into_iter()
                .map(|claim_type| {
                    if !seen_claims.insert(claim_type.clone()) {
                        return Err(RegistryError::DuplicateRoleClaim {
                            role: role.name.clone(),
                            claim_type,
                        });
                    }
                    catalogue
                        .iter()
                        .find(|claim| claim.claim_type == claim_type)
                        .cloned()
                        .ok_or_else(|| RegistryError::UnknownClaim {
                            role: role.name.clone(),
                            claim_type,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(RoleDefinition {
                name: role.name,
                claims,
            })
        })
        .collect()
}

fn parse_accounts(
    raw: Vec<RawSeedAccount>,
    roles: &[RoleDefinition],
) -> Result<Vec<SeedAccount>, RegistryError> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|account| {
            if !is_valid_user_name(&account.user_name) {
                return Err(RegistryError::InvalidUserName {
                    user_name: account.user_name,
                });
            }
            if !seen.insert(account.user_name.clone()) {
                return Err(RegistryError::DuplicateAccount {
                    user_name: account.user_name,
                });
            }
            if !is_plausible_email(&account.email) {
                return Err(RegistryError::InvalidEmail {
                    user_name: account.user_name,
                    email: account.email,
                });
            }
            if !roles.iter().any(|role| role.name == account.role) {
                return Err(RegistryError::UnknownRole {
                    user_name: account.user_name,
                    role: account.role,
                });
            }

            Ok(SeedAccount {
                user_name: account.user_name,
                email: account.email,
                role: account.role,
                profile: account.profile,
            })
        })
        .collect()
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawIdentityRegistry {
    version: u32,
    default_password: String,
    created_by: String,
    claims: Vec<RawClaim>,
    roles: Vec<RawRole>,
    #[serde(default)]
    accounts: Vec<RawSeedAccount>,
}

/// Raw JSON representation of a catalogue claim.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClaim {
    #[serde(rename = "type")]
    claim_type: String,
    value: String,
}

/// Raw JSON representation of a role.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRole {
    name: String,
    #[serde(default)]
    claims: Vec<String>,
}
