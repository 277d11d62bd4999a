//! Test utilities for pennywise-core
//!
//! This module provides a mock analytics backend server that speaks the real
//! HTTP API, for integration tests and for development without the Python
//! service running.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::backend::{BackendApi, MockBackend};
use crate::metrics::{derive_metrics, MetricsConfig};
use crate::models::RawFinancialInputs;
use crate::population::{averages, StudentRecord};

/// How the mock server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    /// Serve the sample population
    Healthy,
    /// Every endpoint returns 500
    Failing,
    /// `/initial_data` omits `boundary_coordinates`
    NoBoundaries,
    /// Every endpoint returns 200 with a body that is not JSON
    Malformed,
}

struct ServerState {
    backend: MockBackend,
    metrics: MetricsConfig,
    mode: ServerMode,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ServerState {
    fn record(&self, endpoint: &str, body: Value) {
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body));
    }

    fn short_circuit(&self) -> Option<Response> {
        match self.mode {
            ServerMode::Failing => Some(
                (StatusCode::INTERNAL_SERVER_ERROR, "analytics backend failure").into_response(),
            ),
            ServerMode::Malformed => Some((StatusCode::OK, "<html>oops</html>").into_response()),
            ServerMode::Healthy | ServerMode::NoBoundaries => None,
        }
    }
}

/// Mock analytics backend server for testing and development
pub struct MockBackendServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    state: Arc<ServerState>,
}

impl MockBackendServer {
    /// Start a healthy server on an available port
    pub async fn start() -> Self {
        Self::start_with(ServerMode::Healthy, None).await
    }

    /// Start a server in the given mode, optionally over a custom population
    pub async fn start_with(mode: ServerMode, population: Option<Vec<StudentRecord>>) -> Self {
        let metrics = MetricsConfig::default();
        let mut backend = MockBackend::new(metrics);
        if let Some(records) = population {
            backend = backend.with_population(records);
        }

        let state = Arc::new(ServerState {
            backend,
            metrics,
            mode,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/initial_data", post(handle_initial_data))
            .route("/predict_category", post(handle_predict_category))
            .route(
                "/calculate_financial_metrics",
                post(handle_calculate_financial_metrics),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            state,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, as (endpoint, JSON body)
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockBackendServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_initial_data(State(state): State<Arc<ServerState>>) -> Response {
    state.record("initial_data", Value::Null);
    if let Some(response) = state.short_circuit() {
        return response;
    }

    let mut data = match state.backend.initial_data().await {
        Ok(data) => data,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };
    if state.mode == ServerMode::NoBoundaries {
        data.boundary_coordinates = None;
    }

    Json(data).into_response()
}

async fn handle_predict_category(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Response {
    state.record("predict_category", body);
    if let Some(response) = state.short_circuit() {
        return response;
    }

    // The real service echoes a prediction alongside the averages
    let mut response = serde_json::to_value(averages(state.backend.records())).unwrap();
    response["prediction"] = Value::String("balanced".to_string());
    Json(response).into_response()
}

async fn handle_calculate_financial_metrics(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Response {
    state.record("calculate_financial_metrics", body.clone());
    if let Some(response) = state.short_circuit() {
        return response;
    }

    match serde_json::from_value::<RawFinancialInputs>(body) {
        Ok(inputs) => Json(derive_metrics(&inputs, &state.metrics)).into_response(),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    }
}
