//! Decision analyzer
//!
//! Builds a prompt from a signal summary, sends it to a generative model
//! and decodes the answer into a `DecisionRecord`. There is a single call
//! per analysis with no retry.

mod client;
mod extract;
mod prompt;

pub use client::{
    AnalyzerConfig, GeminiClient, GenerativeModel, ANALYZER_TIMEOUT, DEFAULT_GEMINI_ENDPOINT,
    DEFAULT_GEMINI_MODEL,
};
pub use extract::{extract_json_payload, parse_decision};
pub use prompt::{AnalysisDomain, PromptTemplate};

use crate::error::{EtaError, Result};
use crate::models::{DecisionRecord, SignalSummary};
use crate::observability::{EtaMetrics, StructuredLogger};
use std::sync::Arc;
use std::time::Instant;

/// Prompt template bound to a generative model
#[derive(Clone)]
pub struct Analyzer {
    model: Arc<dyn GenerativeModel>,
    template: PromptTemplate,
    metrics: EtaMetrics,
    logger: StructuredLogger,
}

impl Analyzer {
    pub fn new(model: Arc<dyn GenerativeModel>, template: PromptTemplate) -> Self {
        Self {
            model,
            template,
            metrics: EtaMetrics::new(),
            logger: StructuredLogger::new("analyzer"),
        }
    }

    /// Same model, different prompt template
    pub fn with_template(&self, template: PromptTemplate) -> Self {
        Self {
            template,
            ..self.clone()
        }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Run one analysis, propagating every failure to the caller
    pub async fn analyze(&self, summary: &SignalSummary) -> Result<DecisionRecord> {
        let start = Instant::now();
        let prompt = self.template.render(summary);

        let result = match self.model.generate(&prompt).await {
            Ok(text) => parse_decision(&text),
            Err(e) => Err(e),
        };
        self.metrics
            .observe_analysis_latency(start.elapsed().as_secs_f64());

        let record = result.inspect_err(|e| self.metrics.inc_analysis_failures(e.kind()))?;
        self.metrics.inc_analyses_completed();
        self.logger
            .log_analysis(self.model_id(), &record, start.elapsed().as_millis());
        Ok(record)
    }

    /// Run one analysis, substituting an ERROR record for any failure
    ///
    /// Callers that display the result or act on it use this so that a
    /// failed remote call never reaches the end user as a raw error.
    pub async fn analyze_or_degrade(&self, summary: &SignalSummary) -> DecisionRecord {
        match self.analyze(summary).await {
            Ok(record) => record,
            Err(e) => {
                self.logger
                    .log_analysis_degraded(self.model_id(), e.kind(), &e.to_string());
                DecisionRecord::synthetic_error(degraded_reason(&e))
            }
        }
    }
}

/// Human-readable explanation placed in a synthetic ERROR record
pub fn degraded_reason(err: &EtaError) -> String {
    match err {
        EtaError::ConfigurationMissing(key) => {
            format!("AI analysis is not configured: {} is missing.", key)
        }
        EtaError::Transport(e) if e.is_timeout() => {
            "AI analysis timed out waiting for the generative model.".to_string()
        }
        EtaError::Transport(_) => "AI analysis failed: the generative model could not be reached.".to_string(),
        EtaError::ProviderStatus { status, .. } => {
            format!("AI analysis failed: the generative model returned HTTP {}.", status)
        }
        EtaError::EmptyModelResponse => {
            "AI analysis failed: the generative model returned an empty response.".to_string()
        }
        EtaError::MalformedModelOutput { .. } => {
            "AI analysis failed: the generative model's answer was not a valid decision record.".to_string()
        }
        other => format!("AI analysis failed: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DecisionStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns canned output and records the prompts it was sent
    struct ScriptedModel {
        reply: Mutex<Option<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn replying(reply: Result<String>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(EtaError::EmptyModelResponse))
        }

        fn model_id(&self) -> &str {
            "scripted"
        }
    }

    const RECORD: &str = r#"{"status":"CRITICAL","reason":"late","immediate_action":"add riders","long_term_recommendation":"new hubs"}"#;

    #[tokio::test]
    async fn test_analyze_parses_fenced_output() {
        let model = ScriptedModel::replying(Ok(format!("```json\n{}\n```", RECORD)));
        let analyzer = Analyzer::new(model.clone(), PromptTemplate::delivery());

        let record = analyzer
            .analyze(&SignalSummary::delivery_performance())
            .await
            .unwrap();

        assert_eq!(record.status, DecisionStatus::Critical);
        assert_eq!(record.immediate_action, "add riders");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Food delivery service performance evaluation"));
    }

    #[tokio::test]
    async fn test_analyze_propagates_errors() {
        let model = ScriptedModel::replying(Ok(String::new()));
        let analyzer = Analyzer::new(model, PromptTemplate::delivery());
        let err = analyzer
            .analyze(&SignalSummary::delivery_performance())
            .await
            .unwrap_err();
        assert!(matches!(err, EtaError::EmptyModelResponse));

        let model = ScriptedModel::replying(Ok("not json at all".to_string()));
        let analyzer = Analyzer::new(model, PromptTemplate::delivery());
        let err = analyzer
            .analyze(&SignalSummary::delivery_performance())
            .await
            .unwrap_err();
        assert!(matches!(err, EtaError::MalformedModelOutput { ref raw, .. } if raw == "not json at all"));
    }

    #[tokio::test]
    async fn test_degrade_substitutes_error_record() {
        let model = ScriptedModel::replying(Err(EtaError::ConfigurationMissing("GEMINI_API_KEY")));
        let analyzer = Analyzer::new(model, PromptTemplate::delivery());

        let record = analyzer
            .analyze_or_degrade(&SignalSummary::delivery_performance())
            .await;

        assert_eq!(record.status, DecisionStatus::Error);
        assert!(record.reason.contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_degrade_passes_success_through() {
        let model = ScriptedModel::replying(Ok(RECORD.to_string()));
        let analyzer = Analyzer::new(model, PromptTemplate::delivery());
        let record = analyzer
            .analyze_or_degrade(&SignalSummary::delivery_performance())
            .await;
        assert_eq!(record.status, DecisionStatus::Critical);
    }

    #[tokio::test]
    async fn test_with_template_shares_model() {
        let model = ScriptedModel::replying(Ok(RECORD.to_string()));
        let delivery = Analyzer::new(model.clone(), PromptTemplate::delivery());
        let academic = delivery.with_template(PromptTemplate::academic());

        academic
            .analyze(&SignalSummary::academic_risk())
            .await
            .unwrap();
        assert!(model.prompts.lock().unwrap()[0].contains("school leadership"));
        assert_eq!(academic.model_id(), "scripted");
    }

    #[test]
    fn test_degraded_reasons() {
        let reason = degraded_reason(&EtaError::ProviderStatus {
            status: 500,
            body: String::new(),
        });
        assert!(reason.contains("HTTP 500"));

        let reason = degraded_reason(&EtaError::MalformedModelOutput {
            raw: "x".to_string(),
            detail: "y".to_string(),
        });
        assert!(reason.contains("not a valid decision record"));
    }
}
