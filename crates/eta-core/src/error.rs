//! Error taxonomy shared by every component

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EtaError>;

#[derive(Debug, Error)]
pub enum EtaError {
    /// Category label outside the fixed enumerated set
    #[error("invalid {field}: '{value}'")]
    InvalidCategory { field: &'static str, value: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("empty response from the generative model")]
    EmptyModelResponse,

    #[error("model output is not a valid decision record ({detail}); raw output: {raw}")]
    MalformedModelOutput { raw: String, detail: String },

    #[error("missing configuration: {0}")]
    ConfigurationMissing(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to load model artifact: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl EtaError {
    /// Short machine-readable label used in metrics and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            EtaError::InvalidCategory { .. } => "invalid_category",
            EtaError::Transport(_) | EtaError::ProviderStatus { .. } => "transport",
            EtaError::EmptyModelResponse => "empty_model_response",
            EtaError::MalformedModelOutput { .. } => "malformed_model_output",
            EtaError::ConfigurationMissing(_) => "configuration_missing",
            EtaError::InvalidConfiguration(_) => "invalid_configuration",
            EtaError::ModelLoad(_) => "model_load",
            EtaError::Inference(_) => "inference",
        }
    }

    /// True for network and HTTP status failures
    pub fn is_transport(&self) -> bool {
        self.kind() == "transport"
    }
}
