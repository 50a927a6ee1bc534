//! Account field validation shared with the backend's user name rules.
//!
//! The backend accepts any trimmed, non-empty user name up to
//! [`USER_NAME_MAX`] characters. Seed accounts use email addresses as user
//! names, so the registry additionally checks that emails look plausible.

/// Maximum allowed length for a user name.
pub const USER_NAME_MAX: usize = 256;

/// Returns `true` if the user name is non-blank and within length limits.
#[must_use]
pub(crate) fn is_valid_user_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed == name && name.chars().count() <= USER_NAME_MAX
}

/// Performs a shallow shape check on an email address.
///
/// Accepts `local@domain.tld` where both parts are non-empty, the domain
/// contains a dot that is neither first nor last, and no whitespace appears.
///
/// # Examples
///
/// ```
/// use seed_data::is_plausible_email;
///
/// assert!(is_plausible_email("admin1@test.com"));
/// assert!(!is_plausible_email("admin1@test"));
/// assert!(!is_plausible_email("@test.com"));
/// assert!(!is_plausible_email("admin 1@test.com"));
/// ```
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}
