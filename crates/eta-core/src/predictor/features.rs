//! Feature encoding for ETA inference
//!
//! Maps a typed `PredictionInput` onto the single-row feature layout the
//! regression model was trained with. The column order is shared with the
//! model artifact; a reordering here silently changes predictions.

use crate::error::{EtaError, Result};
use crate::models::PredictionInput;
use tracing::warn;

/// Number of input features expected by the model
pub const NUM_FEATURES: usize = 5;

/// Training column names, in model input order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "Delivery_person_Age",
    "Delivery_person_Ratings",
    "distance",
    "Type_of_order",
    "Type_of_vehicle",
];

/// One row of model input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow(pub [f32; NUM_FEATURES]);

impl FeatureRow {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Encodes prediction inputs into model feature rows
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    feature_names: Vec<String>,
}

impl FeatureEncoder {
    pub fn new() -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Create an encoder for the feature list shipped with a model artifact
    ///
    /// The list must have exactly `NUM_FEATURES` entries. Names that differ
    /// from `FEATURE_NAMES` are accepted with a warning, since only the
    /// positions reach the model.
    pub fn from_feature_names(names: Vec<String>) -> Result<Self> {
        if names.len() != NUM_FEATURES {
            return Err(EtaError::ModelLoad(format!(
                "feature list has {} entries, expected {}",
                names.len(),
                NUM_FEATURES
            )));
        }

        for (idx, (actual, expected)) in names.iter().zip(FEATURE_NAMES.iter()).enumerate() {
            if actual != expected {
                warn!(
                    position = idx,
                    artifact = %actual,
                    expected = %expected,
                    "Feature name differs from training layout"
                );
            }
        }

        Ok(Self { feature_names: names })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Build the model row: age, rating, distance, order code, vehicle code
    pub fn encode(&self, input: &PredictionInput) -> FeatureRow {
        FeatureRow([
            input.partner_age,
            input.partner_rating,
            input.distance_km,
            f32::from(input.order_type.code()),
            f32::from(input.vehicle_type.code()),
        ])
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}
