//! Disease histories: a patient's ongoing medical case record.

use super::audit::AuditStamp;
use super::ids::{DiseaseHistoryId, UserInfoId};
use super::metrics::Metrics;
use super::treatment::Treatment;
use super::user_info::UserInfo;
use super::validation::{FieldViolation, optional_text, required_text};

const TITLE_MAX: usize = 200;
const NOTES_MAX: usize = 4000;

/// A stored case record owned by exactly one patient profile.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseHistory {
    pub id: DiseaseHistoryId,
    pub patient_info_id: UserInfoId,
    pub title: String,
    pub notes: Option<String>,
    pub audit: AuditStamp,
}

/// Validated disease history fields for creation or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiseaseHistory {
    patient_info_id: UserInfoId,
    title: String,
    notes: Option<String>,
}

impl NewDiseaseHistory {
    pub fn new(
        patient_info_id: UserInfoId,
        title: &str,
        notes: Option<&str>,
    ) -> Result<Self, FieldViolation> {
        Ok(Self {
            patient_info_id,
            title: required_text("title", title, TITLE_MAX)?,
            notes: optional_text("notes", notes, NOTES_MAX)?,
        })
    }

    pub fn patient_info_id(&self) -> UserInfoId {
        self.patient_info_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub(crate) fn apply_to(self, history: &mut DiseaseHistory) {
        history.patient_info_id = self.patient_info_id;
        history.title = self.title;
        history.notes = self.notes;
    }
}

/// A disease history with the relations requested by the caller.
///
/// A `None` slot means the relation was not requested, not that it is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseHistoryDetails {
    pub disease_history: DiseaseHistory,
    pub patient: Option<UserInfo>,
    pub treatments: Option<Vec<Treatment>>,
    pub metrics: Option<Vec<Metrics>>,
}

impl DiseaseHistoryDetails {
    /// Wrap a bare record with no relations loaded.
    pub fn bare(disease_history: DiseaseHistory) -> Self {
        Self {
            disease_history,
            patient: None,
            treatments: None,
            metrics: None,
        }
    }
}
