//! Patient and employee profiles.
//!
//! A profile belongs to at most one [`crate::domain::AppUser`]. Patients are
//! addressed by their profile id in disease histories.

use chrono::{DateTime, Utc};

use super::audit::AuditStamp;
use super::ids::{AppUserId, UserInfoId};
use super::validation::{
    FieldViolation, ViolationKind, non_negative, optional_text, required_text,
};

const SHORT_TEXT_MAX: usize = 100;
const ADDRESS_MAX: usize = 200;
const NOTES_MAX: usize = 2000;

/// A stored profile.
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub id: UserInfoId,
    pub app_user_id: Option<AppUserId>,
    pub details: UserInfoDraft,
    pub audit: AuditStamp,
}

impl UserInfo {
    /// Display name built from first and second names, falling back to email.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [
            self.details.first_name.as_deref(),
            self.details.second_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            self.details.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// Editable profile fields.
///
/// Construct with struct syntax, then call [`UserInfoDraft::validated`]
/// before handing it to a service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserInfoDraft {
    pub email: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub weight: Option<f64>,
}

impl UserInfoDraft {
    /// Trim text fields, collapse blanks to `None`, and check bounds.
    pub fn validated(self) -> Result<Self, FieldViolation> {
        let email = required_text("email", &self.email, SHORT_TEXT_MAX * 2)?;
        if !email.contains('@') {
            return Err(FieldViolation::new("email", ViolationKind::InvalidFormat));
        }
        let short = |field: &'static str, value: Option<String>| {
            optional_text(field, value.as_deref(), SHORT_TEXT_MAX)
        };
        let address = |field: &'static str, value: Option<String>| {
            optional_text(field, value.as_deref(), ADDRESS_MAX)
        };

        Ok(Self {
            email,
            first_name: short("firstName", self.first_name)?,
            second_name: short("secondName", self.second_name)?,
            birth_date: self.birth_date,
            notes: optional_text("notes", self.notes.as_deref(), NOTES_MAX)?,
            address_line1: address("addressLine1", self.address_line1)?,
            address_line2: address("addressLine2", self.address_line2)?,
            zip_code: short("zipCode", self.zip_code)?,
            country: short("country", self.country)?,
            city: short("city", self.city)?,
            phone_number: short("phoneNumber", self.phone_number)?,
            weight: self
                .weight
                .map(|weight| non_negative("weight", weight))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft() -> UserInfoDraft {
        UserInfoDraft {
            email: " patient1@test.com ".to_owned(),
            first_name: Some("First name 1".to_owned()),
            city: Some("  ".to_owned()),
            ..UserInfoDraft::default()
        }
    }

    #[test]
    fn validated_trims_and_collapses() {
        let valid = draft().validated().expect("valid draft");
        assert_eq!(valid.email, "patient1@test.com");
        assert!(valid.city.is_none());
    }

    #[rstest]
    #[case(UserInfoDraft { email: "   ".to_owned(), ..UserInfoDraft::default() }, "email")]
    #[case(UserInfoDraft { weight: Some(-1.0), ..draft() }, "weight")]
    #[case(UserInfoDraft { zip_code: Some("9".repeat(101)), ..draft() }, "zipCode")]
    fn validated_rejects(#[case] input: UserInfoDraft, #[case] field: &str) {
        let err = input.validated().expect_err("invalid draft");
        assert_eq!(err.field(), field);
    }
}
