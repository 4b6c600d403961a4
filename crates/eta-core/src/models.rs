//! Core data models shared by the predictor, analyzer and dispatcher

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EtaError;

/// Type of food order, encoded the way the trained model expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderType {
    Buffet,
    Drinks,
    Meal,
    Snack,
}

impl OrderType {
    /// All order types in code order
    pub const ALL: [OrderType; 4] = [
        OrderType::Buffet,
        OrderType::Drinks,
        OrderType::Meal,
        OrderType::Snack,
    ];

    /// Integer code used during model training
    pub fn code(&self) -> u8 {
        match self {
            OrderType::Buffet => 0,
            OrderType::Drinks => 1,
            OrderType::Meal => 2,
            OrderType::Snack => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderType::Buffet => "Buffet",
            OrderType::Drinks => "Drinks",
            OrderType::Meal => "Meal",
            OrderType::Snack => "Snack",
        }
    }
}

impl FromStr for OrderType {
    type Err = EtaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderType::ALL
            .into_iter()
            .find(|o| o.label() == s)
            .ok_or_else(|| EtaError::InvalidCategory {
                field: "order_type",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for OrderType {
    type Error = EtaError;

    fn try_from(value: String) -> Result<Self, EtaError> {
        value.parse()
    }
}

impl From<OrderType> for String {
    fn from(value: OrderType) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Vehicle used by the delivery partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VehicleType {
    Bicycle,
    ElectricScooter,
    Motorcycle,
    Scooter,
}

impl VehicleType {
    /// All vehicle types in code order
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Bicycle,
        VehicleType::ElectricScooter,
        VehicleType::Motorcycle,
        VehicleType::Scooter,
    ];

    /// Integer code used during model training
    pub fn code(&self) -> u8 {
        match self {
            VehicleType::Bicycle => 0,
            VehicleType::ElectricScooter => 1,
            VehicleType::Motorcycle => 2,
            VehicleType::Scooter => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Bicycle => "Bicycle",
            VehicleType::ElectricScooter => "Electric Scooter",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Scooter => "Scooter",
        }
    }
}

impl FromStr for VehicleType {
    type Err = EtaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleType::ALL
            .into_iter()
            .find(|v| v.label() == s)
            .ok_or_else(|| EtaError::InvalidCategory {
                field: "vehicle_type",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for VehicleType {
    type Error = EtaError;

    fn try_from(value: String) -> Result<Self, EtaError> {
        value.parse()
    }
}

impl From<VehicleType> for String {
    fn from(value: VehicleType) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Delivery attributes collected from the prediction form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Delivery partner age, expected 18-60
    pub partner_age: f32,
    /// Delivery partner rating, expected 1.0-5.0
    pub partner_rating: f32,
    /// Distance in kilometres
    pub distance_km: f32,
    pub order_type: OrderType,
    pub vehicle_type: VehicleType,
}

impl PredictionInput {
    /// Build an input from raw form values, validating the category labels
    pub fn from_labels(
        partner_age: f32,
        partner_rating: f32,
        distance_km: f32,
        order_type: &str,
        vehicle_type: &str,
    ) -> Result<Self, EtaError> {
        Ok(Self {
            partner_age,
            partner_rating,
            distance_km,
            order_type: order_type.parse()?,
            vehicle_type: vehicle_type.parse()?,
        })
    }
}

/// Classification returned by the decision analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DecisionStatus {
    Good,
    Warning,
    Critical,
    Error,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Good => "GOOD",
            DecisionStatus::Warning => "WARNING",
            DecisionStatus::Critical => "CRITICAL",
            DecisionStatus::Error => "ERROR",
        }
    }
}

impl FromStr for DecisionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GOOD" => Ok(DecisionStatus::Good),
            "WARNING" => Ok(DecisionStatus::Warning),
            "CRITICAL" => Ok(DecisionStatus::Critical),
            "ERROR" => Ok(DecisionStatus::Error),
            other => Err(format!("unknown decision status '{}'", other)),
        }
    }
}

impl TryFrom<String> for DecisionStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<DecisionStatus> for String {
    fn from(value: DecisionStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four-field outcome of one analysis call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub status: DecisionStatus,
    pub reason: String,
    pub immediate_action: String,
    pub long_term_recommendation: String,
}

impl DecisionRecord {
    /// Locally synthesized record standing in for a failed analysis
    pub fn synthetic_error(reason: impl Into<String>) -> Self {
        Self {
            status: DecisionStatus::Error,
            reason: reason.into(),
            immediate_action: "Check the analyzer API key and network connectivity, then run the analysis again.".to_string(),
            long_term_recommendation: "Review the decision assistant configuration before relying on automated reports.".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == DecisionStatus::Error
    }
}

/// Precomputed business metrics fed to the remote model as context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub context: String,
    /// Named signals, kept in insertion order
    pub signals: Map<String, Value>,
}

impl SignalSummary {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            signals: Map::new(),
        }
    }

    /// Add a named signal
    pub fn with_signal(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.signals.insert(name.into(), value.into());
        self
    }

    /// Food delivery performance figures
    pub fn delivery_performance() -> Self {
        Self::new("Food delivery service performance evaluation")
            .with_signal("total_deliveries", 1000)
            .with_signal("avg_delivery_time", 27.3)
            .with_signal("delayed_deliveries_percentage", 8.2)
            .with_signal("top_performer_rating", 4.8)
            .with_signal("avg_partner_rating", 4.3)
            .with_signal("longest_distance_avg", 12.5)
    }

    /// Student performance figures for the academic risk report
    pub fn academic_risk() -> Self {
        Self::new("Student academic performance evaluation")
            .with_signal("average_score", 67.71)
            .with_signal("at_risk_percentage", 12.4)
            .with_signal("weakest_subject", "math")
    }
}

/// A single outbound email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDispatch {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}
