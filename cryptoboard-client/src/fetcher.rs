//! Cache-first fetching of API payloads.

use std::sync::Arc;

use cryptoboard_core::{Clock, FetchError, FetchOutcome, FetchRequest};
use cryptoboard_storage::{CacheStats, ExpiringCache, KeyValueStore};
use futures_util::future::join_all;
use serde_json::Value;

use crate::transport::Transport;

/// Resolves a [`FetchRequest`] from the cache or, on a miss, the network.
///
/// Failures never escape as errors: every network, status or parse problem
/// becomes [`FetchOutcome::Failure`]. Nothing is retried and nothing is
/// cached unless the response was a 2xx with a JSON body.
///
/// Concurrent fetches of the same key are not coalesced. Both may miss and
/// hit the network; the last write to the cache wins.
pub struct Fetcher<S, C> {
    transport: Arc<dyn Transport>,
    cache: Arc<ExpiringCache<S, C>>,
}

impl<S, C> Clone for Fetcher<S, C> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: KeyValueStore, C: Clock> Fetcher<S, C> {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<ExpiringCache<S, C>>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &Arc<ExpiringCache<S, C>> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        let key = request.cache_key();

        match self.cache.get(key) {
            Ok(Some(data)) => {
                tracing::debug!(cache_key = key, "served from cache");
                return FetchOutcome::Success(data);
            }
            Ok(None) => {}
            Err(e) => {
                // An unreadable cache behaves like an empty one.
                tracing::warn!(cache_key = key, error = %e, "cache read failed");
            }
        }

        match self.fetch_remote(request).await {
            Ok(data) => {
                if let Err(e) = self.cache.set(key, &data) {
                    tracing::warn!(cache_key = key, error = %e, "cache write failed");
                }
                FetchOutcome::Success(data)
            }
            Err(err) => {
                tracing::warn!(
                    cache_key = key,
                    url = request.url(),
                    kind = err.kind(),
                    error = %err,
                    "fetch failed"
                );
                FetchOutcome::Failure(err.to_string())
            }
        }
    }

    /// Fetch several requests concurrently and wait for all of them.
    ///
    /// Outcomes are returned in request order.
    pub async fn fetch_all(&self, requests: &[FetchRequest]) -> Vec<FetchOutcome> {
        join_all(requests.iter().map(|request| self.fetch(request))).await
    }

    async fn fetch_remote(&self, request: &FetchRequest) -> Result<Value, FetchError> {
        let url = request.url();
        tracing::debug!(cache_key = request.cache_key(), url, "cache miss, requesting");

        let response = self
            .transport
            .get(url)
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| FetchError::Parse {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpResponse, TransportError};
    use async_trait::async_trait;
    use cryptoboard_core::SystemClock;
    use cryptoboard_storage::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedTransport {
        response: Result<HttpResponse, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().map_err(TransportError::Connection)
        }
    }

    fn fetcher(response: Result<HttpResponse, String>) -> (Fetcher<MemoryStore, SystemClock>, Arc<FixedTransport>) {
        let transport = Arc::new(FixedTransport {
            response,
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(ExpiringCache::new(MemoryStore::new(), SystemClock));
        (Fetcher::new(transport.clone(), cache), transport)
    }

    fn request() -> FetchRequest {
        FetchRequest::new("https://api.test/global", "Global_Data", ["global-stats"])
    }

    #[tokio::test]
    async fn test_success_is_cached() {
        let (fetcher, transport) = fetcher(Ok(HttpResponse::new(200, "{\"data\":{}}")));
        let outcome = fetcher.fetch(&request()).await;
        assert_eq!(outcome, FetchOutcome::Success(json!({"data": {}})));
        assert_eq!(fetcher.cache().get("Global_Data").unwrap(), Some(json!({"data": {}})));

        fetcher.fetch(&request()).await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_parse_failure_is_not_cached() {
        let (fetcher, _transport) = fetcher(Ok(HttpResponse::new(200, "<html>")));
        let outcome = fetcher.fetch(&request()).await;
        assert!(outcome.is_failure());
        assert!(outcome.reason().unwrap_or_default().starts_with("malformed response body"));
        assert_eq!(fetcher.cache().get("Global_Data").unwrap(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_cached() {
        let (fetcher, _transport) = fetcher(Err("connection refused".into()));
        let outcome = fetcher.fetch(&request()).await;
        assert!(outcome.is_failure());
        assert_eq!(fetcher.cache_stats().writes, 0);
    }
}
