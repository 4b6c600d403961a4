//! Core library for delivery ETA prediction and AI decision reports
//!
//! This crate provides the core functionality for:
//! - Feature encoding and ONNX-based ETA prediction
//! - Prompting a generative model and decoding its decision record
//! - Rendering and emailing decision reports
//! - Health checks and observability

pub mod analyzer;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use analyzer::{AnalysisDomain, Analyzer, AnalyzerConfig, GeminiClient, PromptTemplate};
pub use dispatch::{DispatchConfig, DispatchOutcome, ReportDispatcher, ResendClient};
pub use error::{EtaError, Result};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{EtaMetrics, StructuredLogger};
pub use predictor::{EtaEstimate, EtaPredictor, ModelArtifactConfig};
