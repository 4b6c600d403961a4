//! Prompt templates for the decision analyzer

use crate::models::SignalSummary;
use serde::{Deserialize, Serialize};

/// Fixed instruction template, parameterised per business domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Opening line describing the assistant's role
    pub role: String,
    /// Numbered task lines; the first one must ask for the status class
    pub tasks: [String; 4],
}

impl PromptTemplate {
    pub fn new(role: impl Into<String>, tasks: [&str; 4]) -> Self {
        Self {
            role: role.into(),
            tasks: tasks.map(str::to_string),
        }
    }

    /// Food delivery performance review
    pub fn delivery() -> Self {
        Self::new(
            "You are a senior AI decision assistant for a food delivery company.",
            [
                "Classify overall delivery performance as GOOD / WARNING / CRITICAL",
                "Explain the decision in simple business language",
                "Suggest ONE immediate action to improve delivery times",
                "Suggest ONE long-term strategy to optimize the delivery network",
            ],
        )
    }

    /// Academic risk review
    pub fn academic() -> Self {
        Self::new(
            "You are a senior AI decision assistant for a school leadership team.",
            [
                "Classify overall academic risk as GOOD / WARNING / CRITICAL",
                "Explain the decision in simple language for educators",
                "Suggest ONE immediate intervention for at-risk students",
                "Suggest ONE long-term strategy to improve academic outcomes",
            ],
        )
    }

    /// Interpolate a signal summary into the template
    pub fn render(&self, summary: &SignalSummary) -> String {
        let signals = serde_json::to_string_pretty(&summary.signals)
            .unwrap_or_else(|_| "{}".to_string());

        let tasks: String = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| format!("{}. {}\n", i + 1, task))
            .collect();

        format!(
            r#"{role}

Context:
{context}

Computed Signals:
{signals}

Your task:
{tasks}
Return STRICT JSON ONLY:
{{
  "status": "",
  "reason": "",
  "immediate_action": "",
  "long_term_recommendation": ""
}}
"#,
            role = self.role,
            context = summary.context,
            signals = signals,
            tasks = tasks,
        )
    }
}

/// Business domains with a built-in template and signal summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDomain {
    #[default]
    Delivery,
    Academic,
}

impl AnalysisDomain {
    pub fn template(&self) -> PromptTemplate {
        match self {
            AnalysisDomain::Delivery => PromptTemplate::delivery(),
            AnalysisDomain::Academic => PromptTemplate::academic(),
        }
    }

    pub fn summary(&self) -> SignalSummary {
        match self {
            AnalysisDomain::Delivery => SignalSummary::delivery_performance(),
            AnalysisDomain::Academic => SignalSummary::academic_risk(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisDomain::Delivery => "delivery",
            AnalysisDomain::Academic => "academic",
        }
    }
}
