//! ETA service - delivery time prediction and AI decision reports
//!
//! Serves the prediction form, the analyze / email actions and the
//! health and metrics endpoints.

use anyhow::{Context, Result};
use eta_core::{
    analyzer::{Analyzer, GeminiClient, PromptTemplate},
    dispatch::{ReportDispatcher, ResendClient, DISPATCH_TIMEOUT},
    health::{components, HealthRegistry},
    models::SignalSummary,
    observability::{EtaMetrics, StructuredLogger},
    predictor::EtaPredictor,
};
use eta_service::{api, config::ServiceConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn key_state(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "missing"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting eta-service");

    let config = ServiceConfig::load()?;
    let logger = StructuredLogger::new("eta-service");

    // Without the model there is nothing to serve
    let predictor = EtaPredictor::from_artifact(&config.artifact_config()).with_context(|| {
        format!(
            "Failed to load model artifact from {}",
            config.model_path.display()
        )
    })?;

    let gemini = GeminiClient::new(config.analyzer_config())?;
    let resend = ResendClient::new(
        &config.resend_endpoint,
        config.resend_api_key.clone(),
        DISPATCH_TIMEOUT,
    )?;
    info!(
        gemini_model = %config.gemini_model,
        gemini_api_key = key_state(gemini.is_configured()),
        resend_api_key = key_state(resend.is_configured()),
        sender = %config.resend_from_email,
        "Service configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::PREDICTOR).await;
    health_registry
        .register_keyed(components::ANALYZER, "GEMINI_API_KEY", gemini.is_configured())
        .await;
    health_registry
        .register_keyed(components::DISPATCHER, "RESEND_API_KEY", resend.is_configured())
        .await;

    let metrics = EtaMetrics::new();
    logger.log_startup(SERVICE_VERSION, predictor.model_version());

    let analyzer = Analyzer::new(Arc::new(gemini), PromptTemplate::delivery());
    let dispatcher = ReportDispatcher::new(
        Arc::new(resend),
        analyzer.clone(),
        SignalSummary::delivery_performance(),
        config.dispatch_config(),
    );

    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        metrics,
        Arc::new(predictor),
        analyzer,
        Arc::new(dispatcher),
    ));

    health_registry.set_ready(true).await;

    let server = tokio::spawn(api::serve(config.port, app_state));

    tokio::select! {
        result = server => {
            match result {
                Ok(Ok(())) => logger.log_shutdown("server exited"),
                Ok(Err(e)) => {
                    error!(error = %e, "Server failed");
                    return Err(e);
                }
                Err(e) => return Err(e).context("Server task panicked"),
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
