//! HTTP API: form page, JSON actions, health checks and Prometheus metrics

use crate::ui;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use eta_core::{
    analyzer::{AnalysisDomain, Analyzer},
    dispatch::{render_decision_card, ReportDispatcher},
    error::EtaError,
    health::{components, ComponentStatus, HealthRegistry},
    models::DecisionRecord,
    observability::EtaMetrics,
    predictor::EtaPredictor,
};
use prometheus::{Encoder, TextEncoder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: EtaMetrics,
    pub predictor: Arc<EtaPredictor>,
    pub analyzer: Analyzer,
    pub dispatcher: Arc<ReportDispatcher>,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: EtaMetrics,
        predictor: Arc<EtaPredictor>,
        analyzer: Analyzer,
        dispatcher: Arc<ReportDispatcher>,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            predictor,
            analyzer,
            dispatcher,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Shown in the form only; not validated or stored
    #[serde(default)]
    pub email: Option<String>,
    pub age: f32,
    pub rating: f32,
    pub distance: f32,
    pub order_type: String,
    pub vehicle_type: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub eta_minutes: f64,
    pub display: String,
    pub model_version: String,
    pub card_html: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub domain: AnalysisDomain,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub domain: AnalysisDomain,
    pub record: DecisionRecord,
    pub card_html: String,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub delivered: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Error body for failed actions
#[derive(Debug)]
pub enum ApiError {
    /// The action itself failed
    Action(EtaError),
    /// The request body could not be decoded
    InvalidBody { status: StatusCode, message: String },
}

impl From<EtaError> for ApiError {
    fn from(err: EtaError) -> Self {
        Self::Action(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, code) = match self {
            ApiError::Action(err) => {
                let status = match err {
                    EtaError::InvalidCategory { .. } => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string(), err.kind())
            }
            ApiError::InvalidBody { status, message } => (status, message, "invalid_request"),
        };
        (status, Json(json!({ "error": error, "code": code }))).into_response()
    }
}

/// Decode an optional JSON body
///
/// An empty body or a literal `null` means "not supplied"; anything else
/// must decode or the request is rejected.
fn optional_body<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice::<Option<T>>(body).map_err(|e| {
        warn!(error = %e, "Rejected request body");
        ApiError::InvalidBody {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid request body: {}", e),
        }
    })
}

async fn index() -> Html<String> {
    Html(ui::render_index())
}

/// Run the regressor on one form submission
async fn predict(
    State(state): State<Arc<AppState>>,
    req: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(req) = req.inspect_err(|e| warn!(error = %e, "Rejected predict body"))?;

    let result = state.predictor.predict(
        req.age,
        req.rating,
        req.distance,
        &req.order_type,
        &req.vehicle_type,
    );
    let estimate = match result {
        Ok(estimate) => {
            state.health_registry.record_success(components::PREDICTOR).await;
            estimate
        }
        Err(e @ EtaError::InvalidCategory { .. }) => {
            warn!(error = %e, "Prediction rejected");
            return Err(e.into());
        }
        Err(e) => {
            state
                .health_registry
                .record_unhealthy(components::PREDICTOR, e.to_string())
                .await;
            return Err(e.into());
        }
    };

    Ok(Json(PredictResponse {
        eta_minutes: estimate.minutes,
        display: estimate.display(),
        card_html: estimate.render_card(),
        model_version: estimate.model_version,
    }))
}

/// Ask the generative model for a decision; failures come back as an ERROR record
async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let domain = optional_body::<AnalyzeRequest>(&body)?
        .unwrap_or_default()
        .domain;
    let record = state
        .analyzer
        .with_template(domain.template())
        .analyze_or_degrade(&domain.summary())
        .await;

    if record.is_error() {
        state
            .health_registry
            .record_degraded(components::ANALYZER, record.reason.clone())
            .await;
    } else {
        state.health_registry.record_success(components::ANALYZER).await;
    }

    Ok(Json(AnalyzeResponse {
        domain,
        card_html: render_decision_card(&record),
        record,
    }))
}

/// Email a decision report, analysing first when no record is posted
async fn email(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<EmailResponse>, ApiError> {
    let record = optional_body::<DecisionRecord>(&body)?;
    let outcome = state.dispatcher.dispatch(record).await;

    if outcome.is_delivered() {
        state.health_registry.record_success(components::DISPATCHER).await;
    } else {
        state
            .health_registry
            .record_degraded(components::DISPATCHER, outcome.to_string())
            .await;
    }

    Ok(Json(EmailResponse {
        delivered: outcome.is_delivered(),
        id: outcome.delivery_id().map(str::to_string),
        message: outcome.to_string(),
    }))
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/predict", post(predict))
        .route("/api/analyze", post(analyze))
        .route("/api/email", post(email))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting ETA service");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
