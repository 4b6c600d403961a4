//! Component health for the ETA service
//!
//! The predictor, analyzer and dispatcher each carry a status that the
//! service updates after every action. `/healthz` reports the worst one and
//! `/readyz` combines it with the model-loaded flag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health of one component, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    /// Still answering, but with synthetic or failed results
    Degraded,
    /// Cannot serve requests
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    fn new(status: ComponentStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Body of `/healthz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: BTreeMap<String, ComponentHealth>,
}

/// Body of `/readyz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const PREDICTOR: &str = "predictor";
    pub const ANALYZER: &str = "analyzer";
    pub const DISPATCHER: &str = "dispatcher";

    pub const ALL: [&str; 3] = [PREDICTOR, ANALYZER, DISPATCHER];
}

/// Shared, cloneable view of component health
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<BTreeMap<String, ComponentHealth>>>,
    model_loaded: Arc<RwLock<bool>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn put(&self, name: &str, status: ComponentStatus, message: Option<String>) {
        self.components
            .write()
            .await
            .insert(name.to_string(), ComponentHealth::new(status, message));
    }

    /// Register a component as healthy
    pub async fn register(&self, name: &str) {
        self.put(name, ComponentStatus::Healthy, None).await;
    }

    /// Register a component that depends on an API key
    ///
    /// Without the key the component starts degraded; its first use will
    /// fail with a configuration error.
    pub async fn register_keyed(&self, name: &str, key_name: &str, configured: bool) {
        if configured {
            self.register(name).await;
        } else {
            self.put(
                name,
                ComponentStatus::Degraded,
                Some(format!("{} is not set", key_name)),
            )
            .await;
        }
    }

    /// The component's last action succeeded
    pub async fn record_success(&self, name: &str) {
        self.put(name, ComponentStatus::Healthy, None).await;
    }

    /// The component's last action failed but it keeps answering
    pub async fn record_degraded(&self, name: &str, message: impl Into<String>) {
        self.put(name, ComponentStatus::Degraded, Some(message.into()))
            .await;
    }

    /// The component's last action failed and it cannot serve
    pub async fn record_unhealthy(&self, name: &str, message: impl Into<String>) {
        self.put(name, ComponentStatus::Unhealthy, Some(message.into()))
            .await;
    }

    /// Flag the model artifact as loaded
    pub async fn set_ready(&self, ready: bool) {
        *self.model_loaded.write().await = ready;
    }

    pub async fn health(&self) -> HealthResponse {
        let components = self.components.read().await.clone();
        let status = components
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(ComponentStatus::Healthy);
        HealthResponse { status, components }
    }

    /// Missing keys and failed analyses leave the service ready; an
    /// unhealthy component does not.
    pub async fn readiness(&self) -> ReadinessResponse {
        let loaded = *self.model_loaded.read().await;
        let reason = match (loaded, self.health().await.status) {
            (false, _) => Some("Model artifact not loaded yet"),
            (true, ComponentStatus::Unhealthy) => Some("Critical component unhealthy"),
            (true, _) => None,
        };

        ReadinessResponse {
            ready: reason.is_none(),
            reason: reason.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn registry_with_all() -> HealthRegistry {
        let registry = HealthRegistry::new();
        for name in components::ALL {
            registry.register(name).await;
        }
        registry
    }

    #[tokio::test]
    async fn test_empty_registry_is_healthy() {
        let health = HealthRegistry::new().health().await;
        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components.is_empty());
    }

    #[tokio::test]
    async fn test_worst_component_wins() {
        let registry = registry_with_all().await;
        registry
            .record_degraded(components::ANALYZER, "upstream returned 503")
            .await;
        assert_eq!(registry.health().await.status, ComponentStatus::Degraded);

        registry
            .record_unhealthy(components::PREDICTOR, "inference failed")
            .await;
        assert_eq!(registry.health().await.status, ComponentStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_success_clears_failure() {
        let registry = registry_with_all().await;
        registry
            .record_degraded(components::DISPATCHER, "Failed to send email")
            .await;
        registry.record_success(components::DISPATCHER).await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components[components::DISPATCHER].message.is_none());
    }

    #[tokio::test]
    async fn test_register_keyed() {
        let registry = HealthRegistry::new();
        registry
            .register_keyed(components::ANALYZER, "GEMINI_API_KEY", true)
            .await;
        registry
            .register_keyed(components::DISPATCHER, "RESEND_API_KEY", false)
            .await;

        let health = registry.health().await;
        assert_eq!(
            health.components[components::ANALYZER].status,
            ComponentStatus::Healthy
        );
        assert_eq!(
            health.components[components::DISPATCHER].message.as_deref(),
            Some("RESEND_API_KEY is not set")
        );
        assert_eq!(health.status, ComponentStatus::Degraded);
    }

    #[tokio::test]
    async fn test_readiness_waits_for_model() {
        let registry = registry_with_all().await;
        let readiness = registry.readiness().await;
        assert!(!readiness.ready);
        assert_eq!(
            readiness.reason.as_deref(),
            Some("Model artifact not loaded yet")
        );

        registry.set_ready(true).await;
        assert!(registry.readiness().await.ready);
    }

    #[tokio::test]
    async fn test_readiness_tolerates_degraded_but_not_unhealthy() {
        let registry = registry_with_all().await;
        registry.set_ready(true).await;

        registry
            .record_degraded(components::ANALYZER, "GEMINI_API_KEY is not set")
            .await;
        assert!(registry.readiness().await.ready);

        registry
            .record_unhealthy(components::PREDICTOR, "inference failed")
            .await;
        let readiness = registry.readiness().await;
        assert!(!readiness.ready);
        assert_eq!(
            readiness.reason.as_deref(),
            Some("Critical component unhealthy")
        );
    }
}
