use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use finboard_market_data::{DataGateway, GatewayRequest, MarketDataError};
use serde_json::{json, Value};

/// Gateway double counting upstream calls.
#[derive(Default)]
pub(crate) struct CountingGateway {
    calls: AtomicUsize,
    delay: Duration,
    failure: Option<MarketDataError>,
}

impl CountingGateway {
    pub(crate) fn delayed(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub(crate) fn failing(error: MarketDataError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataGateway for CountingGateway {
    async fn fetch(&self, request: &GatewayRequest) -> Result<Value, MarketDataError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(json!({ "endpoint": request.endpoint, "call": call })),
        }
    }
}
