//! Metric readings service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use super::ports::{Includes, MetricsFilter, MetricsRepository, MetricsService};
use super::service_errors::{map_repository_error, not_found};
use super::{Actor, AuditStamp, DiseaseHistoryId, Error, Metrics, MetricsId, NewMetrics};

/// [`MetricsService`] backed by a [`MetricsRepository`].
#[derive(Clone)]
pub struct MetricsServiceImpl<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> MetricsServiceImpl<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> MetricsServiceImpl<R>
where
    R: MetricsRepository,
{
    async fn list(&self, filter: MetricsFilter) -> Result<Vec<Metrics>, Error> {
        let rows = self
            .repo
            .get_all(filter, Includes::none())
            .await
            .map_err(map_repository_error)?;
        Ok(rows.into_iter().map(|details| details.metrics).collect())
    }
}

#[async_trait]
impl<R> MetricsService for MetricsServiceImpl<R>
where
    R: MetricsRepository,
{
    async fn get_metrics(&self) -> Result<Vec<Metrics>, Error> {
        self.list(MetricsFilter::All).await
    }

    async fn get_metrics_by_id(&self, id: MetricsId) -> Result<Metrics, Error> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("metrics", id))
    }

    async fn get_metrics_from_disease_history(
        &self,
        disease_history_id: DiseaseHistoryId,
    ) -> Result<Vec<Metrics>, Error> {
        self.list(MetricsFilter::DiseaseHistory(disease_history_id))
            .await
    }

    async fn add_metrics(&self, metrics: NewMetrics, actor: &Actor) -> Result<Metrics, Error> {
        let stamp = AuditStamp::created(actor, self.clock.as_ref());
        self.repo
            .add(metrics, stamp)
            .await
            .map_err(map_repository_error)
    }

    async fn edit_metrics(
        &self,
        id: MetricsId,
        metrics: NewMetrics,
        actor: &Actor,
    ) -> Result<Metrics, Error> {
        let mut current = self.get_metrics_by_id(id).await?;
        metrics.apply_to(&mut current);
        current.audit = current.audit.touched(actor, self.clock.as_ref());
        self.repo
            .update(&current)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("metrics", id))
    }
}
