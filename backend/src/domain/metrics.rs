//! Metrics: named numeric observations attached to a disease history.

use super::audit::AuditStamp;
use super::disease_history::DiseaseHistory;
use super::ids::{DiseaseHistoryId, MetricsId};
use super::validation::{FieldViolation, finite, required_text};

/// Maximum length of a metric name.
pub const METRIC_NAME_MAX: usize = 100;

/// A stored reading such as a pulse or temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub id: MetricsId,
    pub name: String,
    pub value: f64,
    pub disease_history_id: DiseaseHistoryId,
    pub audit: AuditStamp,
}

/// Validated metric fields for creation or edit.
///
/// # Examples
/// ```
/// use infusion_backend::domain::{DiseaseHistoryId, NewMetrics};
///
/// let history = DiseaseHistoryId::new(4).unwrap();
/// let draft = NewMetrics::new(" Pulse ", 72.0, history).unwrap();
/// assert_eq!(draft.name(), "Pulse");
/// assert!(NewMetrics::new("Pulse", f64::NAN, history).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewMetrics {
    name: String,
    value: f64,
    disease_history_id: DiseaseHistoryId,
}

impl NewMetrics {
    pub fn new(
        name: &str,
        value: f64,
        disease_history_id: DiseaseHistoryId,
    ) -> Result<Self, FieldViolation> {
        Ok(Self {
            name: required_text("name", name, METRIC_NAME_MAX)?,
            value: finite("value", value)?,
            disease_history_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn disease_history_id(&self) -> DiseaseHistoryId {
        self.disease_history_id
    }

    pub(crate) fn apply_to(self, metrics: &mut Metrics) {
        metrics.name = self.name;
        metrics.value = self.value;
        metrics.disease_history_id = self.disease_history_id;
    }
}

/// A reading with its disease history, when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsDetails {
    pub metrics: Metrics,
    pub disease_history: Option<DiseaseHistory>,
}

impl MetricsDetails {
    /// Wrap a bare record with no relations loaded.
    pub fn bare(metrics: Metrics) -> Self {
        Self {
            metrics,
            disease_history: None,
        }
    }
}
