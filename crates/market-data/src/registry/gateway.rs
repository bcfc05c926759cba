//! Credential-injecting gateway over the configured providers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{GatewayRequest, ProviderId};
use crate::provider::alpha_vantage::AlphaVantageProvider;
use crate::provider::finnhub::FinnhubProvider;
use crate::provider::{MarketDataProvider, DEFAULT_TIMEOUT};

/// Anything that can turn a [`GatewayRequest`] into a raw provider document.
#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn fetch(&self, request: &GatewayRequest) -> Result<Value, MarketDataError>;
}

/// Credentials and endpoints for the gateway.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub alpha_vantage_key: Option<String>,
    pub finnhub_key: Option<String>,
    pub alpha_vantage_base_url: Option<String>,
    pub finnhub_base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_key: None,
            finnhub_key: None,
            alpha_vantage_base_url: None,
            finnhub_base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Routes requests to the provider they name.
///
/// Providers without a credential are simply not registered; a request for
/// one fails with [`MarketDataError::MissingCredential`] before any network
/// call.
#[derive(Default)]
pub struct ProviderGateway {
    providers: HashMap<ProviderId, Arc<dyn MarketDataProvider>>,
}

impl ProviderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut gateway = Self::new();

        if let Some(key) = non_blank(&config.alpha_vantage_key) {
            let mut provider = AlphaVantageProvider::new(key).with_timeout(config.timeout);
            if let Some(url) = &config.alpha_vantage_base_url {
                provider = provider.with_base_url(url.clone());
            }
            gateway = gateway.with_provider(Arc::new(provider));
        }

        if let Some(key) = non_blank(&config.finnhub_key) {
            let mut provider = FinnhubProvider::new(key).with_timeout(config.timeout);
            if let Some(url) = &config.finnhub_base_url {
                provider = provider.with_base_url(url.clone());
            }
            gateway = gateway.with_provider(Arc::new(provider));
        }

        gateway
    }

    /// Register a provider, replacing any previous one with the same id.
    pub fn with_provider(mut self, provider: Arc<dyn MarketDataProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    pub fn is_configured(&self, provider: ProviderId) -> bool {
        self.providers.contains_key(&provider)
    }

    fn provider(&self, id: ProviderId) -> Result<&Arc<dyn MarketDataProvider>, MarketDataError> {
        self.providers
            .get(&id)
            .ok_or_else(|| MarketDataError::MissingCredential {
                provider: id.to_string(),
                env_var: id.credential_env(),
            })
    }
}

#[async_trait]
impl DataGateway for ProviderGateway {
    async fn fetch(&self, request: &GatewayRequest) -> Result<Value, MarketDataError> {
        let provider = self.provider(request.provider)?;
        debug!(
            "Gateway fetch: {} {} ({:?})",
            request.provider, request.endpoint, request.intent
        );
        provider.fetch_raw(&request.endpoint, &request.params).await
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use serde_json::json;

    struct StaticProvider(ProviderId);

    #[async_trait]
    impl MarketDataProvider for StaticProvider {
        fn id(&self) -> ProviderId {
            self.0
        }

        async fn fetch_raw(
            &self,
            endpoint: &str,
            params: &BTreeMap<String, String>,
        ) -> Result<Value, MarketDataError> {
            Ok(json!({ "endpoint": endpoint, "params": params }))
        }
    }

    #[tokio::test]
    async fn test_missing_credential_before_network() {
        let gateway = ProviderGateway::from_config(&GatewayConfig {
            alpha_vantage_key: Some("   ".to_string()),
            ..GatewayConfig::default()
        });
        assert!(!gateway.is_configured(ProviderId::AlphaVantage));

        let request = GatewayRequest::new(ProviderId::AlphaVantage, "TIME_SERIES_DAILY");
        let err = gateway.fetch(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing ALPHA_VANTAGE_API_KEY");

        let request = GatewayRequest::new(ProviderId::Finnhub, "/quote");
        let err = gateway.fetch(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing FINNHUB_API_KEY");
    }

    #[tokio::test]
    async fn test_routes_to_named_provider() {
        let gateway = ProviderGateway::new()
            .with_provider(Arc::new(StaticProvider(ProviderId::Finnhub)));
        let request = GatewayRequest::new(ProviderId::Finnhub, "/quote").with_param("symbol", "AAPL");

        let doc = gateway.fetch(&request).await.unwrap();
        assert_eq!(doc, json!({ "endpoint": "/quote", "params": { "symbol": "AAPL" } }));
    }

    #[test]
    fn test_from_config_registers_keyed_providers() {
        let gateway = ProviderGateway::from_config(&GatewayConfig {
            alpha_vantage_key: Some("demo".to_string()),
            finnhub_key: Some("token".to_string()),
            ..GatewayConfig::default()
        });
        assert!(gateway.is_configured(ProviderId::AlphaVantage));
        assert!(gateway.is_configured(ProviderId::Finnhub));
    }
}
