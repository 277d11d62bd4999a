//! Analytics backend clients
//!
//! The backend owns the reference population, the boundary lines, and the
//! population averages. This module provides a backend-agnostic interface to
//! it.
//!
//! # Architecture
//!
//! - `BackendApi` trait: the three endpoints the dashboard consumes
//! - `BackendClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Implementations: `HttpBackend` (reqwest), `MockBackend` (built-in sample data)
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! let backend = BackendClient::from_config(&config)?;
//! let data = backend.initial_data().await?;
//! ```

mod http;
mod mock;

pub use http::HttpBackend;
pub use mock::{sample_boundaries, sample_population, MockBackend};

use async_trait::async_trait;

use crate::config::{BackendKind, Config};
use crate::error::Result;
use crate::metrics::MetricsConfig;
use crate::models::{
    DerivedMetrics, InitialData, PopulationAverages, PredictionRequest, RawFinancialInputs,
};

/// Trait defining the endpoints of the analytics backend
///
/// Implementations must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Boundary lines and the reference population (`/initial_data`)
    async fn initial_data(&self) -> Result<InitialData>;

    /// Submit a completed form and receive population averages (`/predict_category`)
    async fn predict_category(&self, request: &PredictionRequest) -> Result<PopulationAverages>;

    /// Derived metrics computed server-side (`/calculate_financial_metrics`)
    async fn calculate_financial_metrics(
        &self,
        inputs: &RawFinancialInputs,
    ) -> Result<DerivedMetrics>;

    /// Short name for logs and CLI output
    fn name(&self) -> &'static str;
}

/// Concrete backend client
#[derive(Clone)]
pub enum BackendClient {
    /// Remote analytics backend over HTTP
    Http(HttpBackend),
    /// Built-in sample data, computed locally
    Mock(MockBackend),
}

impl BackendClient {
    /// Build the client selected by configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.backend.kind {
            BackendKind::Http => Ok(BackendClient::Http(HttpBackend::new(
                &config.backend.url,
                config.backend.timeout,
            )?)),
            BackendKind::Mock => Ok(BackendClient::Mock(MockBackend::new(config.metrics))),
        }
    }

    /// Create a mock backend
    pub fn mock(metrics: MetricsConfig) -> Self {
        BackendClient::Mock(MockBackend::new(metrics))
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn initial_data(&self) -> Result<InitialData> {
        match self {
            BackendClient::Http(b) => b.initial_data().await,
            BackendClient::Mock(b) => b.initial_data().await,
        }
    }

    async fn predict_category(&self, request: &PredictionRequest) -> Result<PopulationAverages> {
        match self {
            BackendClient::Http(b) => b.predict_category(request).await,
            BackendClient::Mock(b) => b.predict_category(request).await,
        }
    }

    async fn calculate_financial_metrics(
        &self,
        inputs: &RawFinancialInputs,
    ) -> Result<DerivedMetrics> {
        match self {
            BackendClient::Http(b) => b.calculate_financial_metrics(inputs).await,
            BackendClient::Mock(b) => b.calculate_financial_metrics(inputs).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            BackendClient::Http(b) => b.name(),
            BackendClient::Mock(b) => b.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_kind() {
        let mut config = Config::default();
        assert_eq!(BackendClient::from_config(&config).unwrap().name(), "http");

        config.backend.kind = BackendKind::Mock;
        assert_eq!(BackendClient::from_config(&config).unwrap().name(), "mock");
    }
}
