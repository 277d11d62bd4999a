//! Mock backend for offline use and testing
//!
//! Serves a small built-in sample population (or one loaded from CSV) and
//! computes everything locally. Responses are deterministic.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::fields::InputField;
use crate::metrics::{derive_metrics, MetricsConfig};
use crate::models::{
    BoundarySet, DerivedMetrics, InitialData, Point, PopulationAverages, PredictionRequest,
    RawDatasetPoint, RawFinancialInputs, StudentProfile,
};
use crate::population::{averages, dataset_points, StudentRecord};

use super::BackendApi;

/// Sample students: (age, gender, year, major, payment, amounts in `InputField::ALL` order)
const SAMPLE: [(u32, &str, &str, &str, &str, [f64; 12]); 10] = [
    (21, "Female", "Junior", "Economics", "Credit/Debit Card",
     [2400.0, 2000.0, 2000.0, 200.0, 700.0, 250.0, 80.0, 60.0, 40.0, 30.0, 40.0, 30.0]),
    (19, "Male", "Sophomore", "Biology", "Cash",
     [1800.0, 1200.0, 2400.0, 160.0, 650.0, 220.0, 60.0, 50.0, 40.0, 25.0, 30.0, 25.0]),
    (22, "Non-binary", "Senior", "Psychology", "Mobile Payment App",
     [1500.0, 1000.0, 2800.0, 200.0, 700.0, 250.0, 90.0, 80.0, 50.0, 40.0, 40.0, 40.0]),
    (20, "Female", "Sophomore", "Engineering", "Credit/Debit Card",
     [1200.0, 800.0, 3200.0, 240.0, 750.0, 280.0, 100.0, 120.0, 60.0, 60.0, 50.0, 60.0]),
    (18, "Male", "Freshman", "Computer Science", "Mobile Payment App",
     [900.0, 400.0, 4000.0, 300.0, 800.0, 300.0, 120.0, 150.0, 70.0, 80.0, 60.0, 80.0]),
    (24, "Female", "Senior", "Computer Science", "Cash",
     [2100.0, 1600.0, 1600.0, 120.0, 600.0, 200.0, 50.0, 40.0, 30.0, 20.0, 30.0, 20.0]),
    (21, "Male", "Junior", "Others", "Credit/Debit Card",
     [1300.0, 1400.0, 3000.0, 200.0, 680.0, 240.0, 70.0, 90.0, 45.0, 35.0, 45.0, 35.0]),
    (19, "Non-binary", "Freshman", "Engineering", "Mobile Payment App",
     [700.0, 600.0, 5200.0, 360.0, 900.0, 320.0, 140.0, 180.0, 80.0, 100.0, 70.0, 90.0]),
    (23, "Female", "Senior", "Biology", "Credit/Debit Card",
     [1600.0, 2400.0, 3600.0, 240.0, 720.0, 260.0, 90.0, 70.0, 50.0, 30.0, 40.0, 30.0]),
    (20, "Male", "Sophomore", "Psychology", "Cash",
     [1000.0, 500.0, 4400.0, 280.0, 820.0, 300.0, 110.0, 140.0, 60.0, 70.0, 60.0, 70.0]),
];

/// The built-in sample population
pub fn sample_population() -> Vec<StudentRecord> {
    SAMPLE
        .iter()
        .map(|(age, gender, year, major, payment, amounts)| {
            let inputs = InputField::ALL
                .iter()
                .zip(amounts)
                .fold(RawFinancialInputs::default(), |inputs, (&field, &value)| {
                    inputs.with(field, value)
                });
            StudentRecord {
                profile: StudentProfile {
                    age: *age,
                    gender: gender.to_string(),
                    year_in_school: year.to_string(),
                    major: major.to_string(),
                    preferred_payment_method: payment.to_string(),
                },
                inputs,
            }
        })
        .collect()
}

/// Boundary lines in (budget margin, monthly spending) space
///
/// Stored as closed polygons the way the backend sends them; only the first
/// two vertices of each matter for classification.
pub fn sample_boundaries() -> BoundarySet {
    BoundarySet {
        saver_balanced: vec![
            Point::new(-500.0, 0.0),
            Point::new(1500.0, 4000.0),
            Point::new(3000.0, 4000.0),
            Point::new(-500.0, 0.0),
        ],
        balanced_overspender: vec![
            Point::new(-2000.0, 0.0),
            Point::new(0.0, 4000.0),
            Point::new(-4000.0, 4000.0),
            Point::new(-2000.0, 0.0),
        ],
    }
}

/// Mock analytics backend
#[derive(Clone)]
pub struct MockBackend {
    metrics: MetricsConfig,
    records: Arc<Vec<StudentRecord>>,
    boundaries: BoundarySet,
}

impl MockBackend {
    /// Mock backend over the built-in sample population
    pub fn new(metrics: MetricsConfig) -> Self {
        Self {
            metrics,
            records: Arc::new(sample_population()),
            boundaries: sample_boundaries(),
        }
    }

    /// Replace the population (e.g. with a survey CSV)
    pub fn with_population(mut self, records: Vec<StudentRecord>) -> Self {
        self.records = Arc::new(records);
        self
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn initial_data(&self) -> Result<InitialData> {
        let points = dataset_points(&self.records, Some(&self.boundaries), &self.metrics);

        let mut data = InitialData {
            boundary_coordinates: Some(self.boundaries.clone()),
            ..Default::default()
        };
        for point in points {
            data.dataset_points
                .push(RawDatasetPoint(point.label, point.x, point.y));
            data.original_points.push(point.details.unwrap_or_default());
        }
        Ok(data)
    }

    async fn predict_category(&self, _request: &PredictionRequest) -> Result<PopulationAverages> {
        Ok(averages(&self.records))
    }

    async fn calculate_financial_metrics(
        &self,
        inputs: &RawFinancialInputs,
    ) -> Result<DerivedMetrics> {
        Ok(derive_metrics(inputs, &self.metrics))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FinancialCategory;

    fn request() -> PredictionRequest {
        PredictionRequest {
            profile: StudentProfile {
                age: 20,
                gender: "Female".into(),
                year_in_school: "Junior".into(),
                major: "Economics".into(),
                preferred_payment_method: "Cash".into(),
            },
            inputs: RawFinancialInputs::default(),
        }
    }

    #[tokio::test]
    async fn test_initial_data_covers_all_categories() {
        let backend = MockBackend::new(MetricsConfig::default());
        let data = backend.initial_data().await.unwrap();

        assert!(data.boundary_coordinates.is_some());
        assert_eq!(data.dataset_points.len(), 10);
        assert_eq!(data.original_points.len(), 10);

        let points = data.points();
        let count = |c: FinancialCategory| {
            points
                .iter()
                .filter(|p| p.category() == Some(c))
                .count()
        };
        assert_eq!(count(FinancialCategory::Saver), 2);
        assert_eq!(count(FinancialCategory::Balanced), 4);
        assert_eq!(count(FinancialCategory::Overspender), 4);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let backend = MockBackend::new(MetricsConfig::default());
        assert_eq!(
            backend.initial_data().await.unwrap(),
            backend.initial_data().await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_metrics_are_local() {
        let backend = MockBackend::new(MetricsConfig::default());
        let inputs = RawFinancialInputs::default();
        let metrics = backend.calculate_financial_metrics(&inputs).await.unwrap();
        assert_eq!(metrics, derive_metrics(&inputs, &MetricsConfig::default()));
    }

    #[tokio::test]
    async fn test_averages_follow_population() {
        let backend = MockBackend::new(MetricsConfig::default());
        let avg = backend.predict_category(&request()).await.unwrap();
        assert_eq!(avg.all_users_average["age"], 20.7);
        assert_eq!(avg.all_users_average["monthly_income"], 14500.0 / 10.0);

        let single = backend.with_population(sample_population()[..1].to_vec());
        let avg = single.predict_category(&request()).await.unwrap();
        assert_eq!(avg.all_users_average["monthly_income"], 2400.0);
    }
}
