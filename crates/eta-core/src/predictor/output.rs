//! Prediction output formatting
//!
//! The estimate is passed through exactly as the model produced it; no
//! clamping to a plausible range is applied.

use serde::{Deserialize, Serialize};

/// Predicted delivery time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaEstimate {
    pub minutes: f64,
    pub model_version: String,
    pub generated_at: i64,
}

impl EtaEstimate {
    pub fn new(minutes: f64, model_version: &str) -> Self {
        Self {
            minutes,
            model_version: model_version.to_string(),
            generated_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Display form with one decimal place, e.g. "27.3 mins"
    pub fn display(&self) -> String {
        format!("{:.1} mins", self.minutes)
    }

    /// HTML result card shown under the prediction form
    pub fn render_card(&self) -> String {
        format!(
            r#"<div style="background: linear-gradient(135deg, #667eea, #764ba2); padding: 30px; border-radius: 24px; color: white; box-shadow: 0 20px 50px rgba(102,126,234,0.45);">
    <div style="font-size:14px; opacity:0.85;">Estimated Delivery Time</div>
    <div style="font-size:56px; font-weight:900; margin:10px 0;">{}</div>
    <div style="background: rgba(255,255,255,0.15); padding: 14px; border-radius: 14px; font-size:15px; margin-top:15px;">
        Higher-rated delivery partners and shorter distances reduce delivery time.
    </div>
</div>"#,
            self.display()
        )
    }
}
