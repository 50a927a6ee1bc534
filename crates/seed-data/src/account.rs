//! Seed account definitions.

use serde::Deserialize;

/// An account created when the user store is empty.
///
/// The user name doubles as the login identifier. The profile carries the
/// optional demographic and contact data stored alongside the account.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedAccount {
    pub(crate) user_name: String,
    pub(crate) email: String,
    pub(crate) role: String,
    pub(crate) profile: SeedProfile,
}

impl SeedAccount {
    /// Returns the login user name.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns the account email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the name of the role the account joins.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the profile attached to the account.
    #[must_use]
    pub const fn profile(&self) -> &SeedProfile {
        &self.profile
    }
}

/// Profile data attached to a seed account.
///
/// Birth dates are expressed as an age in whole years so the registry stays
/// valid regardless of when seeding runs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedProfile {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub second_name: Option<String>,
    /// Age in years at seeding time.
    pub age_years: Option<u32>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// First address line.
    pub address_line1: Option<String>,
    /// Second address line.
    pub address_line2: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Body weight in kilograms.
    pub weight: Option<f64>,
}

/// Raw JSON representation of a seed account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawSeedAccount {
    pub(crate) user_name: String,
    pub(crate) email: String,
    pub(crate) role: String,
    #[serde(default)]
    pub(crate) profile: SeedProfile,
}
