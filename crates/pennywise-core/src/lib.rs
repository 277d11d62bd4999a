//! Pennywise Core Library
//!
//! Shared functionality for the Pennywise student finance dashboard:
//! - Input field catalogue and reporting periods
//! - Monthly metric derivation (income, spending, budget margin, savings rate)
//! - Saver / balanced / overspender classification against boundary lines
//! - Form validation and population comparison
//! - Reference population CSV import
//! - Analytics backend clients (HTTP and built-in mock)
//! - Configuration layering

pub mod backend;
pub mod classify;
pub mod comparison;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fields;
pub mod metrics;
pub mod models;
pub mod population;
pub mod summary;
pub mod validate;

/// Test utilities including mock analytics backend server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use backend::{BackendApi, BackendClient, HttpBackend, MockBackend};
pub use classify::{classify, classify_points, is_below, RelabelReport};
pub use comparison::{compare, ComparisonRow, Standing};
pub use config::{BackendConfig, BackendKind, Config, ConfigSource};
pub use dashboard::{Analysis, Dashboard, DataSource, Loaded};
pub use error::{Error, Result};
pub use fields::{InputField, InputGroup, ReportingPeriod, SliderRange};
pub use metrics::{derive_metrics, MetricsConfig};
pub use models::{
    BoundarySet, DatasetPoint, DerivedMetrics, FinancialCategory, InitialData, Point,
    PopulationAverages, PredictionRequest, RawFinancialInputs, StudentProfile,
};
pub use population::{parse_population, StudentRecord};
pub use summary::FinancialSummary;
pub use validate::{validate_submission, FieldError};
