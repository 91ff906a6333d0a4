//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use reparagym_client::{ProductPage, StoreClient};
use reparagym_query::QueryCache;
use reparagym_storefront::SiteConfig;

/// Cache holding product listings, keyed by listing query.
pub type CatalogCache = QueryCache<ProductPage>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Coordinator for every store read and write.
    pub cache: CatalogCache,
    pub client: StoreClient,
    pub site: Arc<SiteConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(cache: CatalogCache, client: StoreClient, site: SiteConfig) -> Self {
        Self {
            cache,
            client,
            site: Arc::new(site),
            start_time: Instant::now(),
        }
    }
}

impl FromRef<AppState> for Arc<SiteConfig> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.site)
    }
}

impl FromRef<AppState> for CatalogCache {
    fn from_ref(state: &AppState) -> Self {
        state.cache.clone()
    }
}
