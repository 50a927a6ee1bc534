//! Driven port for the medicine catalogue.

use async_trait::async_trait;

use crate::domain::{AuditStamp, Medicine, MedicineId, NewMedicine};

use super::RepositoryError;

/// Row selection for medicine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedicineFilter {
    /// Every catalogue entry.
    All,
    /// The entry with this id.
    Id(MedicineId),
    /// Entries whose title matches exactly.
    Title(String),
}

/// Port for medicine storage.
///
/// Medicines have no eager-loadable relations, so reads take only a filter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicineRepository: Send + Sync {
    async fn get_by_id(&self, id: MedicineId) -> Result<Option<Medicine>, RepositoryError>;

    /// Matching entries ordered by id.
    async fn get_all(&self, filter: MedicineFilter) -> Result<Vec<Medicine>, RepositoryError>;

    /// First matching entry by id order.
    async fn get_single_by_filter(
        &self,
        filter: MedicineFilter,
    ) -> Result<Option<Medicine>, RepositoryError>;

    async fn add(
        &self,
        medicine: NewMedicine,
        stamp: AuditStamp,
    ) -> Result<Medicine, RepositoryError>;

    /// Persist the editable columns and update stamp; `None` when no row matched.
    async fn update(&self, medicine: &Medicine) -> Result<Option<Medicine>, RepositoryError>;

    /// Returns `false` when no row matched.
    ///
    /// Deleting a medicine still referenced by a treatment fails with
    /// [`RepositoryError::Constraint`].
    async fn delete(&self, id: MedicineId) -> Result<bool, RepositoryError>;
}
