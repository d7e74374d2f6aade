// Source trait for device metrics
use crate::domain::metrics::FetchResult;
use async_trait::async_trait;

#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch one snapshot from the configured endpoint.
    ///
    /// Every failure is folded into the returned `FetchError`; implementations
    /// must not panic and must resolve each call from its own response only.
    async fn fetch_snapshot(&self) -> FetchResult;
}
