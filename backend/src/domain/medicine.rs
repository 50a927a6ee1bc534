//! Medicine catalogue entries referenced by treatments.

use super::audit::AuditStamp;
use super::ids::MedicineId;
use super::validation::{FieldViolation, optional_text, required_text};

/// Maximum length of a medicine title.
pub const MEDICINE_TITLE_MAX: usize = 200;
/// Maximum length of a medicine description.
pub const MEDICINE_DESCRIPTION_MAX: usize = 2000;

/// A stored catalogue item.
#[derive(Debug, Clone, PartialEq)]
pub struct Medicine {
    pub id: MedicineId,
    pub title: String,
    pub description: Option<String>,
    pub audit: AuditStamp,
}

/// Validated medicine fields for creation or edit.
///
/// # Examples
/// ```
/// use infusion_backend::domain::NewMedicine;
///
/// let draft = NewMedicine::new("  Saline 0.9% ", Some("Isotonic")).unwrap();
/// assert_eq!(draft.title(), "Saline 0.9%");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedicine {
    title: String,
    description: Option<String>,
}

impl NewMedicine {
    /// Validate raw inputs. The title is required; a blank description is
    /// stored as absent.
    pub fn new(title: &str, description: Option<&str>) -> Result<Self, FieldViolation> {
        Ok(Self {
            title: required_text("title", title, MEDICINE_TITLE_MAX)?,
            description: optional_text("description", description, MEDICINE_DESCRIPTION_MAX)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Overwrite the editable fields of `medicine` with this draft.
    pub(crate) fn apply_to(self, medicine: &mut Medicine) {
        medicine.title = self.title;
        medicine.description = self.description;
    }
}
