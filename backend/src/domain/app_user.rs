//! Identity principals.
//!
//! An [`AppUser`] is a plain record. Credentials and role memberships live in
//! the identity store and are addressed by [`AppUserId`]; nothing here knows
//! how passwords are kept.

use std::fmt;

use super::audit::AuditStamp;
use super::ids::AppUserId;
use super::user_info::UserInfoDraft;

/// Maximum accepted user name length in characters.
pub const USER_NAME_MAX: usize = 256;

/// Validation errors for [`UserName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserNameValidationError {
    /// Blank once trimmed.
    #[error("user name must not be empty")]
    Empty,
    /// Longer than [`USER_NAME_MAX`].
    #[error("user name must be at most {USER_NAME_MAX} characters")]
    TooLong,
}

/// Login identifier; seeded accounts use their email address.
///
/// # Examples
/// ```
/// use infusion_backend::domain::UserName;
///
/// let name = UserName::new("  admin1@test.com ").unwrap();
/// assert_eq!(name.as_str(), "admin1@test.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Trim and validate a raw user name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserNameValidationError::Empty);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserNameValidationError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored identity principal.
#[derive(Debug, Clone, PartialEq)]
pub struct AppUser {
    pub id: AppUserId,
    pub user_name: UserName,
    pub email: String,
    pub email_confirmed: bool,
    pub audit: AuditStamp,
}

/// Everything needed to register a principal together with its profile.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppUser {
    pub user_name: UserName,
    pub email: String,
    pub email_confirmed: bool,
    pub profile: UserInfoDraft,
    pub audit: AuditStamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserNameValidationError::Empty)]
    #[case("   ", UserNameValidationError::Empty)]
    fn rejects_blank(#[case] raw: &str, #[case] expected: UserNameValidationError) {
        assert_eq!(UserName::new(raw), Err(expected));
    }

    #[test]
    fn rejects_overlong() {
        let raw = "a".repeat(USER_NAME_MAX + 1);
        assert_eq!(UserName::new(raw), Err(UserNameValidationError::TooLong));
    }
}
