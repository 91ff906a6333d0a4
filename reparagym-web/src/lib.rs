//! Reparagym Web - Storefront Server
//!
//! Axum server that renders the storefront pages. Every read of the store
//! API goes through a single process-wide [`QueryCache`], so concurrent
//! visitors of the same listing share one upstream request and stale
//! listings are served while they refresh.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use reparagym_client::StoreClient;
use reparagym_query::QueryCache;
use reparagym_storefront::SiteConfig;

pub use config::WebConfig;
pub use error::{ErrorCode, WebError, WebResult};
pub use routes::create_router;
pub use state::{AppState, CatalogCache};
pub use telemetry::{init_tracing, LogFormat};

/// Construct the shared state described by `config`.
pub fn build_state(config: &WebConfig, site: SiteConfig) -> WebResult<AppState> {
    let client = StoreClient::new(&config.store)?;
    let cache = QueryCache::new(config.query.clone());
    Ok(AppState::new(cache, client, site))
}
