//! Error types for the seed-data crate.
//!
//! Registry parsing failures are semantic: each variant names the offending
//! entry so operators can fix the JSON without reading code.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing or validating an identity registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry declares no roles.
    #[error("registry contains no role definitions")]
    EmptyRoles,

    /// The default seed password is blank.
    #[error("default password must not be empty")]
    EmptyPassword,

    /// The audit actor recorded against seeded rows is blank.
    #[error("createdBy must not be empty")]
    EmptyCreatedBy,

    /// A claim type appears twice in the catalogue.
    #[error("claim '{claim_type}' is declared more than once")]
    DuplicateClaimType {
        /// The repeated claim type.
        claim_type: String,
    },

    /// A role name appears twice.
    #[error("role '{name}' is declared more than once")]
    DuplicateRole {
        /// The repeated role name.
        name: String,
    },

    /// A role references a claim missing from the catalogue.
    #[error("role '{role}' references unknown claim '{claim_type}'")]
    UnknownClaim {
        /// Role carrying the reference.
        role: String,
        /// Claim type that could not be resolved.
        claim_type: String,
    },

    /// A role lists the same claim more than once.
    #[error("role '{role}' lists claim '{claim_type}' more than once")]
    DuplicateRoleClaim {
        /// Role carrying the duplicate.
        role: String,
        /// The repeated claim type.
        claim_type: String,
    },

    /// An account references a role that is not declared.
    #[error("account '{user_name}' references unknown role '{role}'")]
    UnknownRole {
        /// Account user name.
        user_name: String,
        /// Role that could not be resolved.
        role: String,
    },

    /// Two accounts share a user name.
    #[error("account '{user_name}' is declared more than once")]
    DuplicateAccount {
        /// The repeated user name.
        user_name: String,
    },

    /// An account user name is blank or too long.
    #[error("account user name '{user_name}' is invalid")]
    InvalidUserName {
        /// The rejected user name.
        user_name: String,
    },

    /// An account email does not look like an address.
    #[error("account '{user_name}' has an invalid email '{email}'")]
    InvalidEmail {
        /// Account user name.
        user_name: String,
        /// The rejected email.
        email: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_io_formats_correctly() {
        let err = RegistryError::IoError {
            path: PathBuf::from("/tmp/identity.json"),
            message: "file not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read registry file at '/tmp/identity.json': file not found"
        );
    }

    #[test]
    fn unknown_claim_names_role_and_claim() {
        let err = RegistryError::UnknownClaim {
            role: "Patient".to_owned(),
            claim_type: "Add Clinic".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "role 'Patient' references unknown claim 'Add Clinic'"
        );
    }

    #[test]
    fn registry_error_version_formats_correctly() {
        let err = RegistryError::UnsupportedVersion {
            expected: 1,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "unsupported registry version: expected 1, found 3"
        );
    }
}
