//! HTTP client for the transactional email API

use crate::error::{EtaError, Result};
use crate::models::EmailDispatch;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_RESEND_ENDPOINT: &str = "https://api.resend.com";

/// Request timeout for the email API
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Email delivery provider
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Hand one email to the provider and return its delivery id
    async fn send(&self, email: &EmailDispatch) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Client for the Resend `POST /emails` API
pub struct ResendClient {
    client: Client,
    emails_url: Url,
    api_key: Option<String>,
}

impl ResendClient {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let base = Url::parse(endpoint).map_err(|e| {
            EtaError::InvalidConfiguration(format!("email endpoint '{}': {}", endpoint, e))
        })?;
        let emails_url = Url::parse(&format!("{}/emails", base.as_str().trim_end_matches('/')))
            .map_err(|e| EtaError::InvalidConfiguration(format!("email endpoint: {}", e)))?;

        Ok(Self {
            client,
            emails_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl EmailProvider for ResendClient {
    async fn send(&self, email: &EmailDispatch) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EtaError::ConfigurationMissing("RESEND_API_KEY"))?;

        debug!(to = ?email.to, subject = %email.subject, "Sending email");

        let response = self
            .client
            .post(self.emails_url.clone())
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EtaError::ProviderStatus { status, body });
        }

        let sent: SendEmailResponse = response.json().await?;
        Ok(sent.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn email() -> EmailDispatch {
        EmailDispatch {
            from: "AI Decision System <onboarding@resend.dev>".to_string(),
            to: vec!["ops@example.com".to_string()],
            subject: "Report".to_string(),
            html: "<p>hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_returns_delivery_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer re_test")
            .match_body(Matcher::Json(json!({
                "from": "AI Decision System <onboarding@resend.dev>",
                "to": ["ops@example.com"],
                "subject": "Report",
                "html": "<p>hi</p>"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"49a3999c-0ce1-4ea6-ab68-afcd6dc2e794"}"#)
            .create_async()
            .await;

        let client =
            ResendClient::new(&server.url(), Some("re_test".to_string()), Duration::from_secs(2))
                .unwrap();
        let id = client.send(&email()).await.unwrap();

        assert_eq!(id, "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/emails")
            .with_status(401)
            .with_body(r#"{"message":"API key is invalid"}"#)
            .create_async()
            .await;

        let client =
            ResendClient::new(&server.url(), Some("bad".to_string()), Duration::from_secs(2))
                .unwrap();
        let err = client.send(&email()).await.unwrap_err();
        assert!(matches!(err, EtaError::ProviderStatus { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let client = ResendClient::new(DEFAULT_RESEND_ENDPOINT, None, Duration::from_secs(2)).unwrap();
        assert!(!client.is_configured());
        let err = client.send(&email()).await.unwrap_err();
        assert!(matches!(err, EtaError::ConfigurationMissing("RESEND_API_KEY")));
    }
}
