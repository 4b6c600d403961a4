//! Observability infrastructure
//!
//! Provides:
//! - Prometheus metrics (prediction latency, analysis latency and outcomes,
//!   email delivery outcomes, model version)
//! - Structured JSON logging with tracing

use crate::models::{DecisionRecord, PredictionInput};
use crate::predictor::EtaEstimate;
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for local inference latency (in seconds)
const INFERENCE_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Histogram buckets for remote analysis calls (in seconds)
const REMOTE_BUCKETS: &[f64] = &[0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 15.0, 30.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EtaMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct EtaMetricsInner {
    prediction_latency_seconds: Histogram,
    analysis_latency_seconds: Histogram,
    model_version_info: GaugeVec,
    predictions_generated: IntCounter,
    prediction_errors: IntCounter,
    analyses_completed: IntCounter,
    analysis_failures: IntCounterVec,
    emails_sent: IntCounter,
    email_failures: IntCounter,
}

impl EtaMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "eta_prediction_latency_seconds",
                "Time spent encoding features and running ETA inference",
                INFERENCE_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            analysis_latency_seconds: register_histogram!(
                "eta_analysis_latency_seconds",
                "Time spent calling the generative model for a decision",
                REMOTE_BUCKETS.to_vec()
            )
            .expect("Failed to register analysis_latency_seconds"),

            model_version_info: register_gauge_vec!(
                "eta_model_version_info",
                "Information about the currently loaded ETA model",
                &["version"]
            )
            .expect("Failed to register model_version_info"),

            predictions_generated: register_int_counter!(
                "eta_predictions_generated_total",
                "Total number of ETA predictions generated"
            )
            .expect("Failed to register predictions_generated"),

            prediction_errors: register_int_counter!(
                "eta_prediction_errors_total",
                "Total number of failed ETA predictions"
            )
            .expect("Failed to register prediction_errors"),

            analyses_completed: register_int_counter!(
                "eta_analyses_completed_total",
                "Total number of decision records parsed from the generative model"
            )
            .expect("Failed to register analyses_completed"),

            analysis_failures: register_int_counter_vec!(
                "eta_analysis_failures_total",
                "Total number of failed analyses by error kind",
                &["kind"]
            )
            .expect("Failed to register analysis_failures"),

            emails_sent: register_int_counter!(
                "eta_emails_sent_total",
                "Total number of decision reports accepted by the email provider"
            )
            .expect("Failed to register emails_sent"),

            email_failures: register_int_counter!(
                "eta_email_failures_total",
                "Total number of decision reports that could not be sent"
            )
            .expect("Failed to register email_failures"),
        }
    }
}

/// Metrics handle for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct EtaMetrics {
    _private: (),
}

impl Default for EtaMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EtaMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EtaMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EtaMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn observe_analysis_latency(&self, duration_secs: f64) {
        self.inner().analysis_latency_seconds.observe(duration_secs);
    }

    /// Update model version info
    pub fn set_model_version(&self, version: &str) {
        self.inner().model_version_info.reset();
        self.inner()
            .model_version_info
            .with_label_values(&[version])
            .set(1.0);
    }

    pub fn inc_predictions_generated(&self) {
        self.inner().predictions_generated.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors.inc();
    }

    pub fn inc_analyses_completed(&self) {
        self.inner().analyses_completed.inc();
    }

    pub fn inc_analysis_failures(&self, kind: &str) {
        self.inner().analysis_failures.with_label_values(&[kind]).inc();
    }

    pub fn inc_emails_sent(&self) {
        self.inner().emails_sent.inc();
    }

    pub fn inc_email_failures(&self) {
        self.inner().email_failures.inc();
    }
}

/// Structured logger for significant events
///
/// Provides consistent JSON-formatted logging for predictions, analyses
/// and email dispatches.
#[derive(Clone)]
pub struct StructuredLogger {
    component: String,
}

impl StructuredLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Log a prediction generation event
    pub fn log_prediction(&self, input: &PredictionInput, estimate: &EtaEstimate) {
        info!(
            event = "prediction_generated",
            component = %self.component,
            partner_age = input.partner_age,
            partner_rating = input.partner_rating,
            distance_km = input.distance_km,
            order_type = %input.order_type,
            vehicle_type = %input.vehicle_type,
            eta_minutes = estimate.minutes,
            model_version = %estimate.model_version,
            "Generated ETA prediction"
        );
    }

    /// Log a parsed decision record
    pub fn log_analysis(&self, model_id: &str, record: &DecisionRecord, elapsed_ms: u128) {
        info!(
            event = "analysis_completed",
            component = %self.component,
            model_id = %model_id,
            status = %record.status,
            elapsed_ms = elapsed_ms,
            "Decision analysis completed"
        );
    }

    /// Log an analysis replaced by a synthetic ERROR record
    pub fn log_analysis_degraded(&self, model_id: &str, kind: &str, error: &str) {
        warn!(
            event = "analysis_degraded",
            component = %self.component,
            model_id = %model_id,
            kind = %kind,
            error = %error,
            "Decision analysis failed, substituting ERROR record"
        );
    }

    /// Log an email accepted by the provider
    pub fn log_dispatch(&self, delivery_id: &str, status: &str, recipients: usize) {
        info!(
            event = "email_dispatched",
            component = %self.component,
            delivery_id = %delivery_id,
            status = %status,
            recipients = recipients,
            "Decision report emailed"
        );
    }

    /// Log an email that could not be sent
    pub fn log_dispatch_failed(&self, kind: &str, error: &str) {
        warn!(
            event = "email_failed",
            component = %self.component,
            kind = %kind,
            error = %error,
            "Decision report email failed"
        );
    }

    pub fn log_model_loaded(&self, path: &str, model_version: &str) {
        info!(
            event = "model_loaded",
            component = %self.component,
            path = %path,
            model_version = %model_version,
            "ETA model loaded"
        );
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_version: &str) {
        info!(
            event = "service_started",
            component = %self.component,
            service_version = %version,
            model_version = %model_version,
            "ETA service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            component = %self.component,
            reason = %reason,
            "ETA service shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        // The Prometheus registry is global; repeated handles share one instance.
        let metrics = EtaMetrics::new();
        let again = EtaMetrics::new();

        metrics.observe_prediction_latency(0.001);
        metrics.observe_analysis_latency(1.2);
        metrics.set_model_version("sha256:abc");
        metrics.inc_predictions_generated();
        again.inc_analysis_failures("transport");
        again.inc_emails_sent();
        again.inc_email_failures();
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("analyzer");
        assert_eq!(logger.component, "analyzer");
    }
}
