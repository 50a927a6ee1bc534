//! Driven port for treatments.

use async_trait::async_trait;

use crate::domain::{
    AuditStamp, DiseaseHistoryId, MedicineId, NewTreatment, Treatment, TreatmentDetails,
    TreatmentId,
};

use super::{Includes, RepositoryError};

/// Row selection for treatment reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreatmentFilter {
    All,
    Id(TreatmentId),
    /// Treatments recorded in this disease history.
    DiseaseHistory(DiseaseHistoryId),
    /// Treatments administering this medicine.
    Medicine(MedicineId),
}

/// Relations that can be loaded with a treatment.
///
/// `Patient` is reached through the disease history, so requesting it also
/// fills the disease history slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreatmentRelation {
    Medicine,
    DiseaseHistory,
    Patient,
}

/// Port for treatment storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TreatmentRepository: Send + Sync {
    async fn get_by_id(&self, id: TreatmentId) -> Result<Option<Treatment>, RepositoryError>;

    async fn get_all(
        &self,
        filter: TreatmentFilter,
        includes: Includes<TreatmentRelation>,
    ) -> Result<Vec<TreatmentDetails>, RepositoryError>;

    async fn get_single_by_filter(
        &self,
        filter: TreatmentFilter,
        includes: Includes<TreatmentRelation>,
    ) -> Result<Option<TreatmentDetails>, RepositoryError>;

    /// Insert a new, not yet completed treatment.
    async fn add(
        &self,
        treatment: NewTreatment,
        stamp: AuditStamp,
    ) -> Result<Treatment, RepositoryError>;

    /// Persist every editable column including the completion flag.
    async fn update(&self, treatment: &Treatment) -> Result<Option<Treatment>, RepositoryError>;

    async fn delete(&self, id: TreatmentId) -> Result<bool, RepositoryError>;
}
