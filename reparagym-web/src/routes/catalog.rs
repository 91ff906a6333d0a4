//! Category listings served through the query cache.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use reparagym_client::{ProductFetcher, ProductQuery};
use reparagym_query::QueryState;
use reparagym_storefront::{render_catalog, CatalogView, Category};
use serde::Deserialize;
use tracing::debug;

use crate::error::{WebError, WebResult};
use crate::routes::pages::not_found_page;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    /// 1-based page number.
    pub page: Option<u32>,
}

/// GET /productos/:category - Product listing for one category
///
/// A cached listing is rendered immediately even when stale; the refresh
/// runs in the background. A listing with nothing to show, including one
/// retrying after a failure, waits for the store API.
pub async fn catalog(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(params): Query<CatalogParams>,
) -> WebResult<Response> {
    let Some(category) = Category::find(&handle) else {
        return Ok(not_found_page(&state.site)?.into_response());
    };

    let query = ProductQuery::category(category.handle).page(params.page.unwrap_or(1).max(1));
    let fetcher = ProductFetcher::new(state.client.clone(), query);
    let mut observer = state.cache.observe(fetcher.fingerprint(), fetcher);

    let mut current = observer.current();
    if current.value().is_none() && current.is_fetching() {
        if let Err(error) = observer.settled().await {
            debug!(fingerprint = %observer.fingerprint(), %error, "Listing failed to load");
        }
        current = observer.current();
    }

    let status = listing_status(&current);
    let html = render_catalog(&state.site, category, &CatalogView::from_state(&current))?;
    Ok((status, Html(html)).into_response())
}

/// A failure with nothing to show takes the status of the failure;
/// anything with products renders as 200.
fn listing_status<V>(state: &QueryState<V>) -> StatusCode {
    match state {
        QueryState::Error {
            error,
            previous: None,
            ..
        } => WebError::from(error.clone()).status_code(),
        _ => StatusCode::OK,
    }
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/productos/:category", get(catalog))
}
