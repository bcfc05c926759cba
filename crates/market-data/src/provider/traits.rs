//! Market data provider trait definitions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::ProviderId;

/// Trait for upstream market data providers.
///
/// A provider owns its credential and forwards a raw request upstream. It
/// does not interpret the response: the body comes back as JSON exactly as
/// the provider sent it, and normalization happens later.
///
/// # Example
///
/// ```ignore
/// use std::collections::BTreeMap;
/// use finboard_market_data::provider::MarketDataProvider;
/// use finboard_market_data::FinnhubProvider;
///
/// let provider = FinnhubProvider::new("token".to_string());
/// let mut params = BTreeMap::new();
/// params.insert("symbol".to_string(), "AAPL".to_string());
/// let doc = provider.fetch_raw("/quote", &params).await?;
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Which provider this is.
    fn id(&self) -> ProviderId;

    /// Forward `endpoint` with `params` upstream and return the decoded body.
    ///
    /// # Returns
    ///
    /// The provider JSON verbatim. A body that is not JSON is wrapped as
    /// `{"raw": text}`. An HTTP 429 yields [`MarketDataError::RateLimited`];
    /// other upstream statuses pass the body through unchanged.
    async fn fetch_raw(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Value, MarketDataError>;
}
