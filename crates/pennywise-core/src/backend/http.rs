//! HTTP backend implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;
use crate::models::{
    DerivedMetrics, InitialData, PopulationAverages, PredictionRequest, RawFinancialInputs,
};

use super::BackendApi;

/// Client for the analytics backend's JSON API
///
/// Every endpoint is a POST. Non-2xx responses become `Error::Http`; there is
/// no retry, callers decide how to fall back.
#[derive(Clone)]
pub struct HttpBackend {
    http_client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let response = response.error_for_status()?;
        let body = response.text().await?;
        debug!(endpoint, bytes = body.len(), "Backend response");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn initial_data(&self) -> Result<InitialData> {
        let response = self
            .http_client
            .post(self.url("initial_data"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        self.read_json("initial_data", response).await
    }

    async fn predict_category(&self, request: &PredictionRequest) -> Result<PopulationAverages> {
        let response = self
            .http_client
            .post(self.url("predict_category"))
            .json(request)
            .send()
            .await?;

        self.read_json("predict_category", response).await
    }

    async fn calculate_financial_metrics(
        &self,
        inputs: &RawFinancialInputs,
    ) -> Result<DerivedMetrics> {
        let response = self
            .http_client
            .post(self.url("calculate_financial_metrics"))
            .json(inputs)
            .send()
            .await?;

        self.read_json("calculate_financial_metrics", response).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let backend = HttpBackend::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(
            backend.url("initial_data"),
            "http://localhost:8000/initial_data"
        );
    }
}
