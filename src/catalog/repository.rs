use async_trait::async_trait;

use super::error::Fetched;
use super::types::{CatalogPayload, DetailRecord};

/// A source of catalog data.
///
/// Each call makes exactly one outbound request and never caches or retries.
/// Every failure mode comes back as `Err(ErrorInfo)`; implementations must not
/// panic on bad input from the network. Implementations hold no mutable
/// shared state, so independent calls may run concurrently.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Returns the name of the repository (for logs).
    fn name(&self) -> &str;

    /// Searches titles matching `query`. Callers never pass an empty query.
    /// "No matches" is `Ok` with an empty payload.
    async fn search_catalog(&self, api_key: &str, query: &str) -> Fetched<CatalogPayload>;

    /// Fetches the full record for an id previously returned by a search.
    async fn fetch_detail(&self, api_key: &str, id: &str) -> Fetched<DetailRecord>;
}
