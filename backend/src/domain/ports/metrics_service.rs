//! Driving port for metric readings.

use async_trait::async_trait;

use crate::domain::{Actor, DiseaseHistoryId, Error, Metrics, MetricsId, NewMetrics};

/// Metric use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsService: Send + Sync {
    async fn get_metrics(&self) -> Result<Vec<Metrics>, Error>;

    async fn get_metrics_by_id(&self, id: MetricsId) -> Result<Metrics, Error>;

    async fn get_metrics_from_disease_history(
        &self,
        disease_history_id: DiseaseHistoryId,
    ) -> Result<Vec<Metrics>, Error>;

    async fn add_metrics(&self, metrics: NewMetrics, actor: &Actor) -> Result<Metrics, Error>;

    /// Replace name, value and history; the creation stamp is preserved.
    async fn edit_metrics(
        &self,
        id: MetricsId,
        metrics: NewMetrics,
        actor: &Actor,
    ) -> Result<Metrics, Error>;
}
