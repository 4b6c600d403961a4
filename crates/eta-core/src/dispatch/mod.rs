//! Report dispatcher
//!
//! Renders a decision record into an HTML email and hands it to the email
//! provider. Every failure is absorbed into a `DispatchOutcome`; nothing
//! is raised to the caller.

mod client;
mod template;

pub use client::{EmailProvider, ResendClient, DEFAULT_RESEND_ENDPOINT, DISPATCH_TIMEOUT};
pub use template::{escape_html, render_decision_card, render_email_html, status_color};

use crate::analyzer::Analyzer;
use crate::models::{DecisionRecord, EmailDispatch, SignalSummary};
use crate::observability::{EtaMetrics, StructuredLogger};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sender address used when none is configured
pub const DEFAULT_SENDER: &str = "onboarding@resend.dev";

/// Display name shown in the From header
pub const SENDER_NAME: &str = "AI Decision System";

/// Fixed recipient of decision reports
pub const DEFAULT_RECIPIENT: &str = "delivery-ops@example.com";

pub const DEFAULT_SUBJECT: &str = "AI Decision Report – Action Required";

/// Configuration for report emails
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            sender: DEFAULT_SENDER.to_string(),
            recipient: DEFAULT_RECIPIENT.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }
}

/// Result of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Delivered { id: String },
    Failed { message: String },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }

    pub fn delivery_id(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Delivered { id } => Some(id),
            DispatchOutcome::Failed { .. } => None,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Delivered { id } => write!(f, "Email sent successfully! ID: {}", id),
            DispatchOutcome::Failed { message } => write!(f, "Failed to send email: {}", message),
        }
    }
}

/// Sends decision reports, analysing first when no record is supplied
pub struct ReportDispatcher {
    provider: Arc<dyn EmailProvider>,
    analyzer: Analyzer,
    summary: SignalSummary,
    config: DispatchConfig,
    metrics: EtaMetrics,
    logger: StructuredLogger,
}

impl ReportDispatcher {
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        analyzer: Analyzer,
        summary: SignalSummary,
        config: DispatchConfig,
    ) -> Self {
        Self {
            provider,
            analyzer,
            summary,
            config,
            metrics: EtaMetrics::new(),
            logger: StructuredLogger::new("dispatcher"),
        }
    }

    /// Build the outbound email for a record
    pub fn compose(&self, record: &DecisionRecord) -> EmailDispatch {
        EmailDispatch {
            from: format!("{} <{}>", SENDER_NAME, self.config.sender),
            to: vec![self.config.recipient.clone()],
            subject: self.config.subject.clone(),
            html: render_email_html(record),
        }
    }

    /// Email a decision report
    pub async fn dispatch(&self, record: Option<DecisionRecord>) -> DispatchOutcome {
        let record = match record {
            Some(record) => record,
            None => self.analyzer.analyze_or_degrade(&self.summary).await,
        };

        let email = self.compose(&record);
        match self.provider.send(&email).await {
            Ok(id) => {
                self.metrics.inc_emails_sent();
                self.logger
                    .log_dispatch(&id, record.status.as_str(), email.to.len());
                DispatchOutcome::Delivered { id }
            }
            Err(e) => {
                self.metrics.inc_email_failures();
                self.logger.log_dispatch_failed(e.kind(), &e.to_string());
                DispatchOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{GenerativeModel, PromptTemplate};
    use crate::error::{EtaError, Result};
    use crate::models::DecisionStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FailingModel;

    #[async_trait]
    impl GenerativeModel for FailingModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(EtaError::ProviderStatus {
                status: 503,
                body: "overloaded".to_string(),
            })
        }

        fn model_id(&self) -> &str {
            "failing"
        }
    }

    /// Captures sent emails and answers with a fixed id
    #[derive(Default)]
    struct CapturingProvider {
        sent: Mutex<Vec<EmailDispatch>>,
    }

    #[async_trait]
    impl EmailProvider for CapturingProvider {
        async fn send(&self, email: &EmailDispatch) -> Result<String> {
            self.sent.lock().unwrap().push(email.clone());
            Ok("email-123".to_string())
        }
    }

    struct RejectingProvider;

    #[async_trait]
    impl EmailProvider for RejectingProvider {
        async fn send(&self, _email: &EmailDispatch) -> Result<String> {
            Err(EtaError::ConfigurationMissing("RESEND_API_KEY"))
        }
    }

    fn dispatcher(provider: Arc<dyn EmailProvider>) -> ReportDispatcher {
        let analyzer = Analyzer::new(Arc::new(FailingModel), PromptTemplate::delivery());
        ReportDispatcher::new(
            provider,
            analyzer,
            SignalSummary::delivery_performance(),
            DispatchConfig::default(),
        )
    }

    fn warning_record() -> DecisionRecord {
        DecisionRecord {
            status: DecisionStatus::Warning,
            reason: "r".to_string(),
            immediate_action: "a".to_string(),
            long_term_recommendation: "b".to_string(),
        }
    }

    #[tokio::test]
    async fn test_supplied_record_is_sent() {
        let provider = Arc::new(CapturingProvider::default());
        let outcome = dispatcher(provider.clone()).dispatch(Some(warning_record())).await;

        assert_eq!(outcome.delivery_id(), Some("email-123"));
        assert_eq!(outcome.to_string(), "Email sent successfully! ID: email-123");

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "AI Decision System <onboarding@resend.dev>");
        assert_eq!(sent[0].to, vec![DEFAULT_RECIPIENT.to_string()]);
        assert!(sent[0].html.contains("Status: WARNING"));
    }

    #[tokio::test]
    async fn test_missing_record_with_failing_analyzer_sends_error_report() {
        let provider = Arc::new(CapturingProvider::default());
        let outcome = dispatcher(provider.clone()).dispatch(None).await;

        assert!(outcome.is_delivered());
        let sent = provider.sent.lock().unwrap();
        assert!(sent[0].html.contains("Status: ERROR"));
        assert!(sent[0].html.contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_message() {
        let outcome = dispatcher(Arc::new(RejectingProvider)).dispatch(None).await;

        assert!(!outcome.is_delivered());
        let message = outcome.to_string();
        assert!(message.starts_with("Failed to send email:"));
        assert!(message.contains("RESEND_API_KEY"));
    }

    #[tokio::test]
    async fn test_unreachable_analyzer_and_provider_still_returns_message() {
        use crate::analyzer::{AnalyzerConfig, GeminiClient};
        use std::time::Duration;

        let gemini = GeminiClient::new(AnalyzerConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            api_key: Some("test-key".to_string()),
            timeout: Duration::from_secs(2),
            ..AnalyzerConfig::default()
        })
        .unwrap();
        let resend =
            ResendClient::new("http://127.0.0.1:9", Some("re_test".to_string()), Duration::from_secs(2))
                .unwrap();
        let dispatcher = ReportDispatcher::new(
            Arc::new(resend),
            Analyzer::new(Arc::new(gemini), PromptTemplate::delivery()),
            SignalSummary::delivery_performance(),
            DispatchConfig::default(),
        );

        let outcome = dispatcher.dispatch(None).await;
        assert!(!outcome.is_delivered());
        assert!(outcome.to_string().starts_with("Failed to send email:"));
    }

    #[test]
    fn test_custom_sender() {
        let analyzer = Analyzer::new(Arc::new(FailingModel), PromptTemplate::delivery());
        let dispatcher = ReportDispatcher::new(
            Arc::new(RejectingProvider),
            analyzer,
            SignalSummary::delivery_performance(),
            DispatchConfig {
                sender: "reports@fastfood.example".to_string(),
                ..DispatchConfig::default()
            },
        );
        let email = dispatcher.compose(&warning_record());
        assert_eq!(email.from, "AI Decision System <reports@fastfood.example>");
        assert_eq!(email.subject, DEFAULT_SUBJECT);
    }
}
