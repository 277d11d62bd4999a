//! Dashboard flows
//!
//! Ties the backend to the local pipeline: load the reference population,
//! derive the user's metrics, classify the user's point, and submit the
//! completed form for a population comparison.
//!
//! Loading and metric derivation never fail outright. When the backend is
//! unreachable or returns something unusable, the built-in sample data and
//! local derivation stand in, and the result records which source was used.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::{BackendApi, BackendClient, MockBackend};
use crate::classify::classify;
use crate::comparison::{compare, ComparisonRow};
use crate::error::Result;
use crate::metrics::{derive_metrics, MetricsConfig};
use crate::models::{
    DerivedMetrics, FinancialCategory, InitialData, PredictionRequest, RawFinancialInputs,
    StudentProfile,
};
use crate::summary::FinancialSummary;
use crate::validate::validate_submission;

/// Where a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Backend,
    Fallback,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Fallback => "fallback",
        }
    }
}

/// A value tagged with its source
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Loaded<T> {
    fn backend(value: T) -> Self {
        Self {
            value,
            source: DataSource::Backend,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            source: DataSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// The user's position on the plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Analysis {
    pub metrics: DerivedMetrics,
    pub category: FinancialCategory,
    pub summary: FinancialSummary,
    pub metrics_source: DataSource,
}

/// Dashboard state shared by the CLI commands
pub struct Dashboard<B = BackendClient> {
    backend: B,
    metrics: MetricsConfig,
}

impl<B: BackendApi> Dashboard<B> {
    pub fn new(backend: B, metrics: MetricsConfig) -> Self {
        Self { backend, metrics }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch boundaries and the reference population
    ///
    /// Falls back to the built-in sample when the request fails or the
    /// response is missing boundary lines, dataset points, or the original
    /// survey rows.
    pub async fn load_dataset(&self) -> Loaded<InitialData> {
        match self.backend.initial_data().await {
            Ok(data) if is_complete(&data) => {
                info!(
                    backend = self.backend.name(),
                    points = data.dataset_points.len(),
                    "Loaded dataset"
                );
                Loaded::backend(data)
            }
            Ok(data) => {
                warn!(
                    backend = self.backend.name(),
                    boundaries = data.boundary_coordinates.is_some(),
                    points = data.dataset_points.len(),
                    original = data.original_points.len(),
                    "Dataset is incomplete, using sample data"
                );
                Loaded::fallback(self.sample_dataset().await)
            }
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Failed to load dataset, using sample data"
                );
                Loaded::fallback(self.sample_dataset().await)
            }
        }
    }

    async fn sample_dataset(&self) -> InitialData {
        // The sample backend computes locally and cannot fail
        MockBackend::new(self.metrics)
            .initial_data()
            .await
            .unwrap_or_default()
    }

    /// Metrics from the backend, or derived locally when it is unavailable
    pub async fn metrics(&self, inputs: &RawFinancialInputs) -> Loaded<DerivedMetrics> {
        match self.backend.calculate_financial_metrics(inputs).await {
            Ok(metrics) => {
                debug!(backend = self.backend.name(), "Metrics from backend");
                Loaded::backend(metrics)
            }
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Metrics request failed, deriving locally"
                );
                Loaded::fallback(derive_metrics(inputs, &self.metrics))
            }
        }
    }

    /// Derive metrics and classify the user's point against the dataset's boundaries
    pub async fn analyze(&self, inputs: &RawFinancialInputs, data: &InitialData) -> Analysis {
        let metrics = self.metrics(inputs).await;
        let category = classify(
            metrics.value.user_point(),
            data.boundary_coordinates.as_ref(),
        );
        debug!(
            category = %category,
            x = metrics.value.user_point_x,
            y = metrics.value.user_point_y,
            "Classified user"
        );

        Analysis {
            metrics: metrics.value,
            category,
            summary: FinancialSummary::new(&metrics.value, category),
            metrics_source: metrics.source,
        }
    }

    /// Validate and submit the form, returning the comparison against the
    /// population averages
    ///
    /// Validation errors are returned before anything is sent.
    pub async fn submit(
        &self,
        profile: &StudentProfile,
        inputs: &RawFinancialInputs,
    ) -> Result<Vec<ComparisonRow>> {
        validate_submission(profile, inputs)?;

        let request = PredictionRequest {
            profile: profile.clone(),
            inputs: *inputs,
        };
        let averages = self.backend.predict_category(&request).await?;
        info!(
            backend = self.backend.name(),
            averages = averages.all_users_average.len(),
            "Submitted form"
        );

        Ok(compare(&averages, profile, inputs))
    }
}

fn is_complete(data: &InitialData) -> bool {
    data.boundary_coordinates.is_some()
        && !data.dataset_points.is_empty()
        && !data.original_points.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::Standing;
    use crate::error::Error;
    use crate::models::{BoundarySet, PopulationAverages, RawDatasetPoint};
    use async_trait::async_trait;

    /// Backend whose every request fails
    struct DownBackend;

    #[async_trait]
    impl BackendApi for DownBackend {
        async fn initial_data(&self) -> Result<InitialData> {
            Err(Error::InvalidData("down".into()))
        }

        async fn predict_category(&self, _: &PredictionRequest) -> Result<PopulationAverages> {
            Err(Error::InvalidData("down".into()))
        }

        async fn calculate_financial_metrics(
            &self,
            _: &RawFinancialInputs,
        ) -> Result<DerivedMetrics> {
            Err(Error::InvalidData("down".into()))
        }

        fn name(&self) -> &'static str {
            "down"
        }
    }

    /// Backend that answers without boundary lines
    struct NoBoundaries;

    #[async_trait]
    impl BackendApi for NoBoundaries {
        async fn initial_data(&self) -> Result<InitialData> {
            Ok(InitialData::default())
        }

        async fn predict_category(&self, _: &PredictionRequest) -> Result<PopulationAverages> {
            Ok(PopulationAverages::default())
        }

        async fn calculate_financial_metrics(
            &self,
            inputs: &RawFinancialInputs,
        ) -> Result<DerivedMetrics> {
            Ok(derive_metrics(inputs, &MetricsConfig::default()))
        }

        fn name(&self) -> &'static str {
            "no-boundaries"
        }
    }

    /// Backend that answers with boundaries but no population
    struct BoundariesOnly;

    #[async_trait]
    impl BackendApi for BoundariesOnly {
        async fn initial_data(&self) -> Result<InitialData> {
            let sample = MockBackend::new(MetricsConfig::default()).initial_data().await?;
            Ok(InitialData {
                boundary_coordinates: sample.boundary_coordinates,
                ..Default::default()
            })
        }

        async fn predict_category(&self, _: &PredictionRequest) -> Result<PopulationAverages> {
            Ok(PopulationAverages::default())
        }

        async fn calculate_financial_metrics(
            &self,
            inputs: &RawFinancialInputs,
        ) -> Result<DerivedMetrics> {
            Ok(derive_metrics(inputs, &MetricsConfig::default()))
        }

        fn name(&self) -> &'static str {
            "boundaries-only"
        }
    }

    fn profile() -> StudentProfile {
        StudentProfile {
            age: 21,
            gender: "Female".into(),
            year_in_school: "Junior".into(),
            major: "Economics".into(),
            preferred_payment_method: "Cash".into(),
        }
    }

    #[tokio::test]
    async fn test_mock_backend_round() {
        let dashboard = Dashboard::new(
            BackendClient::mock(MetricsConfig::default()),
            MetricsConfig::default(),
        );

        let data = dashboard.load_dataset().await;
        assert_eq!(data.source, DataSource::Backend);
        assert_eq!(data.value.dataset_points.len(), 10);

        let analysis = dashboard.analyze(&RawFinancialInputs::default(), &data.value).await;
        assert_eq!(analysis.metrics_source, DataSource::Backend);
        assert_eq!(analysis.metrics.monthly_income, 2250.0);
        assert_eq!(analysis.metrics.monthly_spending, 9570.0);
        assert_eq!(analysis.category, FinancialCategory::Overspender);
        assert!(!analysis.summary.category_mismatch());
    }

    #[tokio::test]
    async fn test_failures_fall_back() {
        let dashboard = Dashboard::new(DownBackend, MetricsConfig::default());

        let data = dashboard.load_dataset().await;
        assert!(data.is_fallback());
        assert!(data.value.boundary_coordinates.is_some());
        assert_eq!(data.value.dataset_points.len(), 10);

        let metrics = dashboard.metrics(&RawFinancialInputs::default()).await;
        assert!(metrics.is_fallback());
        assert_eq!(metrics.value.budget_margin, 2250.0 - 9570.0);
    }

    #[tokio::test]
    async fn test_missing_boundaries_fall_back() {
        let dashboard = Dashboard::new(NoBoundaries, MetricsConfig::default());
        let data = dashboard.load_dataset().await;
        assert!(data.is_fallback());
        assert!(data.value.boundary_coordinates.is_some());
    }

    #[tokio::test]
    async fn test_missing_population_falls_back() {
        let dashboard = Dashboard::new(BoundariesOnly, MetricsConfig::default());
        let data = dashboard.load_dataset().await;
        assert!(data.is_fallback());
        assert_eq!(data.value.dataset_points.len(), 10);
        assert_eq!(data.value.original_points.len(), 10);
    }

    #[test]
    fn test_is_complete() {
        let full = InitialData {
            boundary_coordinates: Some(BoundarySet::default()),
            dataset_points: vec![RawDatasetPoint("Saver".into(), 0.0, 0.0)],
            original_points: vec![serde_json::Map::new()],
        };
        assert!(is_complete(&full));

        let no_original = InitialData {
            original_points: vec![],
            ..full.clone()
        };
        assert!(!is_complete(&no_original));

        let no_points = InitialData {
            dataset_points: vec![],
            ..full
        };
        assert!(!is_complete(&no_points));
        assert!(!is_complete(&InitialData::default()));
    }

    #[tokio::test]
    async fn test_analyze_without_boundaries_is_balanced() {
        let dashboard = Dashboard::new(NoBoundaries, MetricsConfig::default());
        let analysis = dashboard
            .analyze(&RawFinancialInputs::default(), &InitialData::default())
            .await;
        assert_eq!(analysis.category, FinancialCategory::Balanced);
    }

    #[tokio::test]
    async fn test_analyze_uses_given_boundaries() {
        let dashboard = Dashboard::new(NoBoundaries, MetricsConfig::default());
        // Every point with y < x + 1e6 is below this line
        let data = InitialData {
            boundary_coordinates: Some(BoundarySet {
                saver_balanced: vec![(0.0, 1e6).into(), (1.0, 1e6 + 1.0).into()],
                balanced_overspender: vec![],
            }),
            ..Default::default()
        };
        let analysis = dashboard.analyze(&RawFinancialInputs::default(), &data).await;
        assert_eq!(analysis.category, FinancialCategory::Saver);
        assert!(analysis.summary.category_mismatch());
    }

    #[tokio::test]
    async fn test_submit_validates_first() {
        let dashboard = Dashboard::new(DownBackend, MetricsConfig::default());
        let mut bad = profile();
        bad.major = String::new();

        // Validation fails before the (down) backend is reached
        match dashboard.submit(&bad, &RawFinancialInputs::default()).await {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "major");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        // Valid input reaches the backend and surfaces its error
        assert!(matches!(
            dashboard.submit(&profile(), &RawFinancialInputs::default()).await,
            Err(Error::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_compares() {
        let dashboard = Dashboard::new(
            BackendClient::mock(MetricsConfig::default()),
            MetricsConfig::default(),
        );
        let rows = dashboard
            .submit(&profile(), &RawFinancialInputs::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 13);
        let income = rows.iter().find(|r| r.key == "monthly_income").unwrap();
        assert_eq!(income.user, 1000.0);
        assert_eq!(income.average, 1450.0);
    }

    #[tokio::test]
    async fn test_submit_compares_profile_age() {
        let dashboard = Dashboard::new(
            BackendClient::mock(MetricsConfig::default()),
            MetricsConfig::default(),
        );
        let rows = dashboard
            .submit(&profile(), &RawFinancialInputs::default())
            .await
            .unwrap();

        let age = rows.iter().find(|r| r.key == "age").unwrap();
        assert_eq!(age.user, 21.0);
        assert!((age.average - 20.7).abs() < 1e-9);
        assert_eq!(age.standing, Standing::Higher);
    }
}
