//! Collapses identical gateway requests into one upstream fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use finboard_market_data::{DataGateway, GatewayRequest, MarketDataError};
use futures::future::{AbortHandle, Abortable, BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use serde_json::Value;

/// Window during which identical requests share a fetch.
pub const DEFAULT_DEDUPE_WINDOW: Duration = Duration::from_millis(5_000);

pub type FetchResult = Result<Value, MarketDataError>;
pub type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct InFlight {
    started: Instant,
    fetch: SharedFetch,
}

/// Gateway wrapper sharing one fetch between identical requests.
///
/// Requests with the same [`GatewayRequest::dedupe_key`] issued within
/// `window` of the first one all resolve to that first fetch's outcome,
/// including a failure. Each waiter can be dropped or aborted on its own;
/// the shared fetch keeps running for the others.
pub struct DedupingGateway {
    inner: Arc<dyn DataGateway>,
    window: Duration,
    in_flight: Mutex<HashMap<String, InFlight>>,
}

impl DedupingGateway {
    pub fn new(inner: Arc<dyn DataGateway>, window: Duration) -> Self {
        Self {
            inner,
            window,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, InFlight>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| {
            warn!("In-flight request map was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// The fetch for `request`, joining an identical one still inside the
    /// window or starting a new one.
    pub fn shared_fetch(&self, request: &GatewayRequest) -> SharedFetch {
        let key = request.dedupe_key();
        let now = Instant::now();
        let mut in_flight = self.lock_in_flight();

        in_flight.retain(|_, entry| now.duration_since(entry.started) < self.window);

        if let Some(entry) = in_flight.get(&key) {
            debug!("Joining in-flight request {}", key);
            return entry.fetch.clone();
        }

        let inner = Arc::clone(&self.inner);
        let owned = request.clone();
        let fetch = async move { inner.fetch(&owned).await }.boxed().shared();

        in_flight.insert(
            key,
            InFlight {
                started: now,
                fetch: fetch.clone(),
            },
        );
        fetch
    }

    /// A waiter for `request` plus the handle that aborts only that waiter.
    ///
    /// An aborted waiter resolves to `Err(Aborted)` and never sees the
    /// fetch outcome.
    pub fn fetch_cancelable(&self, request: &GatewayRequest) -> (Abortable<SharedFetch>, AbortHandle) {
        let (handle, registration) = AbortHandle::new_pair();
        (Abortable::new(self.shared_fetch(request), registration), handle)
    }
}

#[async_trait]
impl DataGateway for DedupingGateway {
    async fn fetch(&self, request: &GatewayRequest) -> FetchResult {
        self.shared_fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::test_support::CountingGateway;
    use finboard_market_data::{ProviderId, RequestIntent};
    use serde_json::json;

    fn quote_request() -> GatewayRequest {
        GatewayRequest::new(ProviderId::Finnhub, "/quote").with_param("symbol", "AAPL")
    }

    #[tokio::test]
    async fn test_identical_requests_share_one_fetch() {
        let upstream = Arc::new(CountingGateway::delayed(Duration::from_millis(20)));
        let gateway = DedupingGateway::new(upstream.clone(), DEFAULT_DEDUPE_WINDOW);

        let (first, second) = (quote_request(), quote_request());
        let (a, b) = tokio::join!(gateway.fetch(&first), gateway.fetch(&second));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(upstream.calls(), 1);

        // Completed fetches are still shared inside the window.
        gateway.fetch(&quote_request()).await.unwrap();
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_new_fetch_after_window() {
        let upstream = Arc::new(CountingGateway::default());
        let gateway = DedupingGateway::new(upstream.clone(), Duration::from_millis(50));

        gateway.fetch(&quote_request()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        gateway.fetch(&quote_request()).await.unwrap();
        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test]
    async fn test_different_requests_are_not_shared() {
        let upstream = Arc::new(CountingGateway::default());
        let gateway = DedupingGateway::new(upstream.clone(), DEFAULT_DEDUPE_WINDOW);

        gateway.fetch(&quote_request()).await.unwrap();
        gateway
            .fetch(&quote_request().with_param("symbol", "MSFT"))
            .await
            .unwrap();
        gateway
            .fetch(&quote_request().with_intent(RequestIntent::Preview))
            .await
            .unwrap();
        assert_eq!(upstream.calls(), 3);
    }

    #[tokio::test]
    async fn test_errors_are_shared_within_window() {
        let upstream = Arc::new(CountingGateway::failing(MarketDataError::RateLimited {
            provider: "finnhub".to_string(),
        }));
        let gateway = DedupingGateway::new(upstream.clone(), DEFAULT_DEDUPE_WINDOW);

        assert!(gateway.fetch(&quote_request()).await.unwrap_err().is_rate_limited());
        assert!(gateway.fetch(&quote_request()).await.unwrap_err().is_rate_limited());
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_aborting_one_waiter_keeps_the_others() {
        let upstream = Arc::new(CountingGateway::delayed(Duration::from_millis(30)));
        let gateway = DedupingGateway::new(upstream.clone(), DEFAULT_DEDUPE_WINDOW);

        let (first, first_handle) = gateway.fetch_cancelable(&quote_request());
        let (second, _second_handle) = gateway.fetch_cancelable(&quote_request());
        first_handle.abort();

        let (first, second) = tokio::join!(first, second);
        assert!(first.is_err());
        let doc = second.expect("second waiter not aborted").unwrap();
        assert_eq!(doc["endpoint"], json!("/quote"));
        assert_eq!(upstream.calls(), 1);
    }
}
