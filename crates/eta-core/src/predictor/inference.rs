//! ONNX Runtime inference using tract
//!
//! Loads the exported delivery-time regressor and runs single-row
//! inference on encoded feature rows.

use super::features::{FeatureRow, NUM_FEATURES};
use super::RegressionModel;
use crate::error::{EtaError, Result};
use anyhow::Context;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, info, warn};

/// Maximum inference latency before warning (5ms target)
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Where the model artifact lives on disk
#[derive(Debug, Clone)]
pub struct ModelArtifactConfig {
    /// Serialized regressor (.onnx)
    pub model_path: PathBuf,
    /// JSON array with the ordered training column names
    pub features_path: PathBuf,
    /// Optional hex SHA-256 the model bytes must match
    pub expected_sha256: Option<String>,
}

impl Default for ModelArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("delivery_time_model.onnx"),
            features_path: PathBuf::from("model_features.json"),
            expected_sha256: None,
        }
    }
}

/// ONNX-based regressor using tract for lightweight inference
pub struct OnnxModel {
    model: TractModel,
    model_version: String,
    inference_count: AtomicU64,
    slow_inference_count: AtomicU64,
}

impl OnnxModel {
    /// Create a model from ONNX bytes
    pub fn new(model_bytes: &[u8]) -> Result<Self> {
        let model = Self::load_model(model_bytes)
            .map_err(|e| EtaError::ModelLoad(format!("{:#}", e)))?;
        let checksum = compute_checksum(model_bytes);
        Ok(Self {
            model,
            model_version: format!("sha256:{}", &checksum[..12]),
            inference_count: AtomicU64::new(0),
            slow_inference_count: AtomicU64::new(0),
        })
    }

    /// Read the model file, verifying its checksum when one is configured
    pub fn from_file(path: &Path, expected_sha256: Option<&str>) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| EtaError::ModelLoad(format!("cannot read {}: {}", path.display(), e)))?;

        if let Some(expected) = expected_sha256 {
            let computed = compute_checksum(&bytes);
            if !computed.eq_ignore_ascii_case(expected.trim()) {
                return Err(EtaError::ModelLoad(format!(
                    "checksum mismatch: expected {}, got {}",
                    expected, computed
                )));
            }
            debug!(checksum = %computed, "Model checksum validated");
        }

        let model = Self::new(&bytes)?;
        info!(
            path = %path.display(),
            size = bytes.len(),
            version = %model.model_version,
            "Loaded ONNX model"
        );
        Ok(model)
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8]) -> anyhow::Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    fn row_to_tensor(row: &FeatureRow) -> anyhow::Result<Tensor> {
        Tensor::from_shape(&[1, NUM_FEATURES], row.as_slice())
    }

    fn run(&self, row: &FeatureRow) -> anyhow::Result<f64> {
        let input = Self::row_to_tensor(row)?;
        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("No output from model")?;
        let output = output.cast_to::<f32>()?;
        let value = output
            .to_array_view::<f32>()?
            .iter()
            .next()
            .copied()
            .context("Model output is empty")?;
        Ok(f64::from(value))
    }

    /// Get inference statistics
    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            total_inferences: self.inference_count.load(Ordering::Relaxed),
            slow_inferences: self.slow_inference_count.load(Ordering::Relaxed),
        }
    }
}

impl RegressionModel for OnnxModel {
    fn predict_row(&self, row: &FeatureRow) -> Result<f64> {
        let start = Instant::now();

        let minutes = self
            .run(row)
            .map_err(|e| EtaError::Inference(format!("{:#}", e)))?;

        let elapsed = start.elapsed();
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        if elapsed.as_millis() > MAX_INFERENCE_MS {
            self.slow_inference_count.fetch_add(1, Ordering::Relaxed);
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Ok(minutes)
    }

    fn model_version(&self) -> &str {
        &self.model_version
    }
}

/// Inference statistics
#[derive(Debug, Clone)]
pub struct InferenceStats {
    pub total_inferences: u64,
    pub slow_inferences: u64,
}

/// Read the ordered feature-name list shipped next to the model
pub fn read_feature_names(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EtaError::ModelLoad(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content).map_err(|e| {
        EtaError::ModelLoad(format!(
            "{} is not a JSON array of feature names: {}",
            path.display(),
            e
        ))
    })
}

/// Compute the hex SHA-256 of a byte slice
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
