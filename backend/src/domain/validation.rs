//! Field-level validation shared by entity drafts.
//!
//! Drafts report the first offending field as a [`FieldViolation`]. Field
//! names use the wire spelling so inbound adapters can surface them as-is.

use std::fmt;

/// What went wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Required text was blank once trimmed.
    Empty,
    /// Text exceeded the maximum length in characters.
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// A numeric field was NaN or infinite.
    NotFinite,
    /// A numeric field was below zero.
    Negative,
    /// An identifier was zero or negative.
    InvalidId,
    /// Text did not have the expected shape.
    InvalidFormat,
}

impl ViolationKind {
    /// Stable machine-readable code for the violation.
    pub fn code(self) -> &'static str {
        match self {
            Self::Empty => "empty_value",
            Self::TooLong { .. } => "too_long",
            Self::NotFinite => "not_finite",
            Self::Negative => "negative_value",
            Self::InvalidId => "invalid_id",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

/// A rejected field together with the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    field: &'static str,
    kind: ViolationKind,
}

impl FieldViolation {
    /// Construct a violation for `field`.
    pub const fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self { field, kind }
    }

    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Reason the field was rejected.
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Empty => write!(f, "{} must not be empty", self.field),
            ViolationKind::TooLong { max } => {
                write!(f, "{} must be at most {max} characters", self.field)
            }
            ViolationKind::NotFinite => write!(f, "{} must be a finite number", self.field),
            ViolationKind::Negative => write!(f, "{} must not be negative", self.field),
            ViolationKind::InvalidId => write!(f, "{} must be a positive identifier", self.field),
            ViolationKind::InvalidFormat => write!(f, "{} is not well formed", self.field),
        }
    }
}

impl std::error::Error for FieldViolation {}

pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, FieldViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldViolation::new(field, ViolationKind::Empty));
    }
    if trimmed.chars().count() > max {
        return Err(FieldViolation::new(field, ViolationKind::TooLong { max }));
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldViolation> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => {
            Err(FieldViolation::new(field, ViolationKind::TooLong { max }))
        }
        Some(text) => Ok(Some(text.to_owned())),
    }
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, FieldViolation> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FieldViolation::new(field, ViolationKind::NotFinite))
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, FieldViolation> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(FieldViolation::new(field, ViolationKind::Negative));
    }
    Ok(value)
}
