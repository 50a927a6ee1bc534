//! Treatments: an administered-medicine event within a disease history.

use super::audit::AuditStamp;
use super::disease_history::DiseaseHistory;
use super::ids::{DiseaseHistoryId, MedicineId, TreatmentId};
use super::medicine::Medicine;
use super::user_info::UserInfo;
use super::validation::{FieldViolation, non_negative, required_text};

const DIAGNOSIS_MAX: usize = 500;

/// Infusion quantities for a treatment.
///
/// ## Invariants
/// - every quantity is finite and not negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dosing {
    medicine_weight: f64,
    solution_volume: f64,
    dosage: f64,
}

impl Dosing {
    /// Validate raw quantities.
    ///
    /// # Examples
    /// ```
    /// use infusion_backend::domain::Dosing;
    ///
    /// assert!(Dosing::new(5.0, 250.0, 1.5).is_ok());
    /// assert!(Dosing::new(5.0, -1.0, 1.5).is_err());
    /// ```
    pub fn new(
        medicine_weight: f64,
        solution_volume: f64,
        dosage: f64,
    ) -> Result<Self, FieldViolation> {
        Ok(Self {
            medicine_weight: non_negative("medicineWeight", medicine_weight)?,
            solution_volume: non_negative("solutionVolume", solution_volume)?,
            dosage: non_negative("dosage", dosage)?,
        })
    }

    /// Wrap quantities read back from storage.
    pub(crate) const fn from_stored(medicine_weight: f64, solution_volume: f64, dosage: f64) -> Self {
        Self {
            medicine_weight,
            solution_volume,
            dosage,
        }
    }

    pub fn medicine_weight(&self) -> f64 {
        self.medicine_weight
    }

    pub fn solution_volume(&self) -> f64 {
        self.solution_volume
    }

    pub fn dosage(&self) -> f64 {
        self.dosage
    }
}

/// A stored treatment.
#[derive(Debug, Clone, PartialEq)]
pub struct Treatment {
    pub id: TreatmentId,
    pub medicine_id: MedicineId,
    pub disease_history_id: DiseaseHistoryId,
    pub diagnosis: String,
    pub dosing: Dosing,
    pub is_completed: bool,
    pub audit: AuditStamp,
}

impl Treatment {
    /// Mark the treatment completed.
    ///
    /// Returns `false` when it was already completed so callers can skip the
    /// write.
    pub fn complete(&mut self) -> bool {
        if self.is_completed {
            return false;
        }
        self.is_completed = true;
        true
    }
}

/// Validated treatment fields for creation or edit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTreatment {
    medicine_id: MedicineId,
    disease_history_id: DiseaseHistoryId,
    diagnosis: String,
    dosing: Dosing,
}

impl NewTreatment {
    pub fn new(
        medicine_id: MedicineId,
        disease_history_id: DiseaseHistoryId,
        diagnosis: &str,
        dosing: Dosing,
    ) -> Result<Self, FieldViolation> {
        Ok(Self {
            medicine_id,
            disease_history_id,
            diagnosis: required_text("diagnosis", diagnosis, DIAGNOSIS_MAX)?,
            dosing,
        })
    }

    pub fn medicine_id(&self) -> MedicineId {
        self.medicine_id
    }

    pub fn disease_history_id(&self) -> DiseaseHistoryId {
        self.disease_history_id
    }

    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    pub fn dosing(&self) -> Dosing {
        self.dosing
    }

    /// Overwrite the editable fields of `treatment`; completion is untouched.
    pub(crate) fn apply_to(self, treatment: &mut Treatment) {
        treatment.medicine_id = self.medicine_id;
        treatment.disease_history_id = self.disease_history_id;
        treatment.diagnosis = self.diagnosis;
        treatment.dosing = self.dosing;
    }
}

/// A treatment with the relations requested by the caller.
///
/// A `None` slot means the relation was not requested or the referenced row
/// has since disappeared.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentDetails {
    pub treatment: Treatment,
    pub medicine: Option<Medicine>,
    pub disease_history: Option<DiseaseHistory>,
    pub patient: Option<UserInfo>,
}

impl TreatmentDetails {
    /// Wrap a bare record with no relations loaded.
    pub fn bare(treatment: Treatment) -> Self {
        Self {
            treatment,
            medicine: None,
            disease_history: None,
            patient: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Actor, ViolationKind};
    use crate::domain::test_support::FixtureClock;
    use rstest::rstest;

    fn treatment(is_completed: bool) -> Treatment {
        Treatment {
            id: TreatmentId::from_stored(1),
            medicine_id: MedicineId::from_stored(2),
            disease_history_id: DiseaseHistoryId::from_stored(3),
            diagnosis: "Dehydration".to_owned(),
            dosing: Dosing::from_stored(1.0, 500.0, 2.0),
            is_completed,
            audit: AuditStamp::created(&Actor::seed(), &FixtureClock::at_hour(8)),
        }
    }

    #[rstest]
    #[case(false, true)]
    #[case(true, false)]
    fn complete_reports_whether_state_changed(#[case] initial: bool, #[case] changed: bool) {
        let mut subject = treatment(initial);
        assert_eq!(subject.complete(), changed);
        assert!(subject.is_completed);
    }

    #[rstest]
    #[case(f64::NAN, 1.0, 1.0, "medicineWeight", ViolationKind::NotFinite)]
    #[case(1.0, -2.0, 1.0, "solutionVolume", ViolationKind::Negative)]
    #[case(1.0, 1.0, f64::NEG_INFINITY, "dosage", ViolationKind::NotFinite)]
    fn dosing_rejects_bad_quantities(
        #[case] weight: f64,
        #[case] volume: f64,
        #[case] dosage: f64,
        #[case] field: &str,
        #[case] kind: ViolationKind,
    ) {
        let err = Dosing::new(weight, volume, dosage).expect_err("invalid dosing");
        assert_eq!(err.field(), field);
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn apply_to_keeps_completion_flag() {
        let mut subject = treatment(true);
        let draft = NewTreatment::new(
            MedicineId::from_stored(9),
            DiseaseHistoryId::from_stored(3),
            "Follow-up",
            Dosing::from_stored(0.5, 100.0, 1.0),
        )
        .expect("valid draft");
        draft.apply_to(&mut subject);
        assert!(subject.is_completed);
        assert_eq!(subject.medicine_id.get(), 9);
    }
}
