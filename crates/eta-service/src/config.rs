//! Service configuration

use anyhow::{Context, Result};
use eta_core::analyzer::{AnalyzerConfig, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
use eta_core::dispatch::{DispatchConfig, DEFAULT_RECIPIENT, DEFAULT_RESEND_ENDPOINT, DEFAULT_SENDER};
use eta_core::predictor::ModelArtifactConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Secrets read from their conventional unprefixed variables
const SECRET_VARS: [(&str, &str); 3] = [
    ("gemini_api_key", "GEMINI_API_KEY"),
    ("resend_api_key", "RESEND_API_KEY"),
    ("resend_from_email", "RESEND_FROM_EMAIL"),
];

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP port for the UI, actions, health and metrics
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Ordered training column names
    #[serde(default = "default_features_path")]
    pub features_path: PathBuf,

    #[serde(default)]
    pub model_sha256: Option<String>,

    #[serde(default = "default_gemini_endpoint")]
    pub gemini_endpoint: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_analyzer_timeout")]
    pub analyzer_timeout_secs: u64,

    #[serde(default = "default_resend_endpoint")]
    pub resend_endpoint: String,

    #[serde(default = "default_email_recipient")]
    pub email_recipient: String,

    #[serde(default)]
    pub gemini_api_key: Option<String>,

    #[serde(default)]
    pub resend_api_key: Option<String>,

    #[serde(default = "default_sender")]
    pub resend_from_email: String,
}

fn default_port() -> u16 {
    7860
}

fn default_model_path() -> PathBuf {
    PathBuf::from("delivery_time_model.onnx")
}

fn default_features_path() -> PathBuf {
    PathBuf::from("model_features.json")
}

fn default_gemini_endpoint() -> String {
    DEFAULT_GEMINI_ENDPOINT.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_analyzer_timeout() -> u64 {
    15
}

fn default_resend_endpoint() -> String {
    DEFAULT_RESEND_ENDPOINT.to_string()
}

fn default_email_recipient() -> String {
    DEFAULT_RECIPIENT.to_string()
}

fn default_sender() -> String {
    DEFAULT_SENDER.to_string()
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map
    ///
    /// `ETA_*` variables map onto fields by name; the API keys and sender
    /// address also come from their unprefixed names and take precedence.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ETA")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

        for (key, var) in SECRET_VARS {
            let value = vars.get(var).filter(|v| !v.trim().is_empty()).cloned();
            builder = builder.set_override_option(key, value)?;
        }

        let config = builder.build().context("Failed to read configuration")?;
        config
            .try_deserialize()
            .context("Invalid service configuration")
    }

    pub fn artifact_config(&self) -> ModelArtifactConfig {
        ModelArtifactConfig {
            model_path: self.model_path.clone(),
            features_path: self.features_path.clone(),
            expected_sha256: self.model_sha256.clone(),
        }
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            endpoint: self.gemini_endpoint.clone(),
            model_id: self.gemini_model.clone(),
            api_key: self.gemini_api_key.clone(),
            timeout: Duration::from_secs(self.analyzer_timeout_secs),
        }
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            sender: self.resend_from_email.clone(),
            recipient: self.email_recipient.clone(),
            ..DispatchConfig::default()
        }
    }
}
