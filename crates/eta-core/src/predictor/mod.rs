//! ETA prediction engine

mod features;
mod inference;
mod output;

pub use features::{FeatureEncoder, FeatureRow, FEATURE_NAMES, NUM_FEATURES};
pub use inference::{
    compute_checksum, read_feature_names, InferenceStats, ModelArtifactConfig, OnnxModel,
};
pub use output::EtaEstimate;

use crate::error::Result;
use crate::models::PredictionInput;
use crate::observability::{EtaMetrics, StructuredLogger};
use std::time::Instant;

/// Trait for regression model implementations
pub trait RegressionModel: Send + Sync {
    /// Predict delivery minutes for one encoded row
    fn predict_row(&self, row: &FeatureRow) -> Result<f64>;

    /// Get current model version
    fn model_version(&self) -> &str;
}

/// Encoder plus loaded model, shared read-only for the process lifetime
pub struct EtaPredictor {
    model: Box<dyn RegressionModel>,
    encoder: FeatureEncoder,
    metrics: EtaMetrics,
    logger: StructuredLogger,
}

impl EtaPredictor {
    pub fn new(model: Box<dyn RegressionModel>, encoder: FeatureEncoder) -> Self {
        Self {
            model,
            encoder,
            metrics: EtaMetrics::new(),
            logger: StructuredLogger::new("predictor"),
        }
    }

    /// Load the ONNX model and its feature list from disk
    pub fn from_artifact(config: &ModelArtifactConfig) -> Result<Self> {
        let names = read_feature_names(&config.features_path)?;
        let encoder = FeatureEncoder::from_feature_names(names)?;
        let model = OnnxModel::from_file(&config.model_path, config.expected_sha256.as_deref())?;

        let predictor = Self::new(Box::new(model), encoder);
        predictor.metrics.set_model_version(predictor.model_version());
        predictor
            .logger
            .log_model_loaded(&config.model_path.display().to_string(), predictor.model_version());
        Ok(predictor)
    }

    pub fn model_version(&self) -> &str {
        self.model.model_version()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Predict from raw form values
    ///
    /// Unknown `order_type` / `vehicle_type` labels fail with
    /// `EtaError::InvalidCategory`.
    pub fn predict(
        &self,
        age: f32,
        rating: f32,
        distance: f32,
        order_type: &str,
        vehicle_type: &str,
    ) -> Result<EtaEstimate> {
        let input = PredictionInput::from_labels(age, rating, distance, order_type, vehicle_type)
            .inspect_err(|_| self.metrics.inc_prediction_errors())?;
        self.predict_input(&input)
    }

    /// Predict from an already validated input
    pub fn predict_input(&self, input: &PredictionInput) -> Result<EtaEstimate> {
        let start = Instant::now();
        let row = self.encoder.encode(input);

        let minutes = self
            .model
            .predict_row(&row)
            .inspect_err(|_| self.metrics.inc_prediction_errors())?;

        self.metrics
            .observe_prediction_latency(start.elapsed().as_secs_f64());
        self.metrics.inc_predictions_generated();

        let estimate = EtaEstimate::new(minutes, self.model_version());
        self.logger.log_prediction(input, &estimate);
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtaError;
    use crate::models::{OrderType, VehicleType};
    use std::sync::{Arc, Mutex};

    /// Records every row it receives and answers with a linear formula
    struct RecordingModel {
        rows: Arc<Mutex<Vec<FeatureRow>>>,
    }

    impl RegressionModel for RecordingModel {
        fn predict_row(&self, row: &FeatureRow) -> Result<f64> {
            self.rows.lock().unwrap().push(*row);
            let r = row.0;
            Ok(10.0 + 0.2 * f64::from(r[0]) - 2.0 * f64::from(r[1]) + 1.5 * f64::from(r[2]))
        }

        fn model_version(&self) -> &str {
            "test"
        }
    }

    /// Always answers with a fixed value
    struct ConstantModel(f64);

    impl RegressionModel for ConstantModel {
        fn predict_row(&self, _row: &FeatureRow) -> Result<f64> {
            Ok(self.0)
        }

        fn model_version(&self) -> &str {
            "constant"
        }
    }

    fn recording_predictor() -> (EtaPredictor, Arc<Mutex<Vec<FeatureRow>>>) {
        let rows = Arc::new(Mutex::new(Vec::new()));
        let model = RecordingModel { rows: rows.clone() };
        (EtaPredictor::new(Box::new(model), FeatureEncoder::new()), rows)
    }

    #[test]
    fn test_reference_row_reaches_model_in_order() {
        let (predictor, rows) = recording_predictor();
        predictor.predict(30.0, 4.5, 5.0, "Meal", "Motorcycle").unwrap();

        let rows = rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, [30.0, 4.5, 5.0, 2.0, 2.0]);
    }

    #[test]
    fn test_all_valid_pairs_finite() {
        let (predictor, _rows) = recording_predictor();
        for order in OrderType::ALL {
            for vehicle in VehicleType::ALL {
                let eta = predictor
                    .predict(30.0, 4.5, 5.0, order.label(), vehicle.label())
                    .unwrap();
                assert!(eta.minutes.is_finite());
                assert_eq!(eta.model_version, "test");
            }
        }
    }

    #[test]
    fn test_invalid_category_fails_before_model() {
        let (predictor, rows) = recording_predictor();

        let err = predictor.predict(30.0, 4.5, 5.0, "Pizza", "Motorcycle").unwrap_err();
        assert!(matches!(err, EtaError::InvalidCategory { field: "order_type", .. }));

        let err = predictor.predict(30.0, 4.5, 5.0, "Meal", "Hovercraft").unwrap_err();
        assert!(matches!(err, EtaError::InvalidCategory { field: "vehicle_type", .. }));

        assert!(rows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_absurd_prediction_not_clamped() {
        let predictor = EtaPredictor::new(Box::new(ConstantModel(-12.5)), FeatureEncoder::new());
        let eta = predictor.predict(30.0, 4.5, 5.0, "Snack", "Bicycle").unwrap();
        assert_eq!(eta.minutes, -12.5);

        let predictor = EtaPredictor::new(Box::new(ConstantModel(9_999.0)), FeatureEncoder::new());
        let eta = predictor.predict(30.0, 4.5, 5.0, "Snack", "Bicycle").unwrap();
        assert_eq!(eta.display(), "9999.0 mins");
    }

    #[test]
    fn test_from_artifact_missing_files() {
        let config = ModelArtifactConfig {
            model_path: "/nonexistent/model.onnx".into(),
            features_path: "/nonexistent/features.json".into(),
            expected_sha256: None,
        };
        let err = EtaPredictor::from_artifact(&config).err().unwrap();
        assert_eq!(err.kind(), "model_load");
    }
}
