//! Driven port for disease histories.

use async_trait::async_trait;

use crate::domain::{
    AuditStamp, DiseaseHistory, DiseaseHistoryDetails, DiseaseHistoryId, NewDiseaseHistory,
    UserInfoId, UserName,
};

use super::{Includes, RepositoryError};

/// Row selection for disease history reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiseaseHistoryFilter {
    All,
    Id(DiseaseHistoryId),
    /// Histories owned by this patient profile.
    Patient(UserInfoId),
    /// Histories whose patient profile belongs to the named principal.
    PatientUserName(UserName),
}

/// Relations that can be loaded with a disease history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiseaseHistoryRelation {
    Patient,
    Treatments,
    Metrics,
}

/// Port for disease history storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiseaseHistoryRepository: Send + Sync {
    async fn get_by_id(
        &self,
        id: DiseaseHistoryId,
    ) -> Result<Option<DiseaseHistory>, RepositoryError>;

    /// Matching histories ordered by id, with the requested relations filled.
    async fn get_all(
        &self,
        filter: DiseaseHistoryFilter,
        includes: Includes<DiseaseHistoryRelation>,
    ) -> Result<Vec<DiseaseHistoryDetails>, RepositoryError>;

    /// First matching history by id order.
    async fn get_single_by_filter(
        &self,
        filter: DiseaseHistoryFilter,
        includes: Includes<DiseaseHistoryRelation>,
    ) -> Result<Option<DiseaseHistoryDetails>, RepositoryError>;

    async fn add(
        &self,
        history: NewDiseaseHistory,
        stamp: AuditStamp,
    ) -> Result<DiseaseHistory, RepositoryError>;

    async fn update(
        &self,
        history: &DiseaseHistory,
    ) -> Result<Option<DiseaseHistory>, RepositoryError>;

    async fn delete(&self, id: DiseaseHistoryId) -> Result<bool, RepositoryError>;
}
