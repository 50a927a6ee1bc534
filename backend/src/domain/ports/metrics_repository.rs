//! Driven port for metric readings.

use async_trait::async_trait;

use crate::domain::{AuditStamp, DiseaseHistoryId, Metrics, MetricsDetails, MetricsId, NewMetrics};

use super::{Includes, RepositoryError};

/// Row selection for metric reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsFilter {
    All,
    Id(MetricsId),
    DiseaseHistory(DiseaseHistoryId),
}

/// Relations that can be loaded with a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsRelation {
    DiseaseHistory,
}

/// Port for metric storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    async fn get_by_id(&self, id: MetricsId) -> Result<Option<Metrics>, RepositoryError>;

    async fn get_all(
        &self,
        filter: MetricsFilter,
        includes: Includes<MetricsRelation>,
    ) -> Result<Vec<MetricsDetails>, RepositoryError>;

    async fn get_single_by_filter(
        &self,
        filter: MetricsFilter,
        includes: Includes<MetricsRelation>,
    ) -> Result<Option<MetricsDetails>, RepositoryError>;

    async fn add(&self, metrics: NewMetrics, stamp: AuditStamp) -> Result<Metrics, RepositoryError>;

    async fn update(&self, metrics: &Metrics) -> Result<Option<Metrics>, RepositoryError>;

    async fn delete(&self, id: MetricsId) -> Result<bool, RepositoryError>;
}
