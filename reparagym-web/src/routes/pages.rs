//! Static pages: landing page and the HTML 404.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use reparagym_storefront::{render_home, render_not_found, SiteConfig};

use crate::error::WebResult;
use crate::state::AppState;

/// GET / - Landing page
pub async fn home(State(site): State<Arc<SiteConfig>>) -> WebResult<Html<String>> {
    Ok(Html(render_home(&site)?))
}

/// Fallback for every unknown path.
pub async fn not_found(State(site): State<Arc<SiteConfig>>) -> WebResult<(StatusCode, Html<String>)> {
    not_found_page(&site)
}

pub(crate) fn not_found_page(site: &SiteConfig) -> WebResult<(StatusCode, Html<String>)> {
    Ok((StatusCode::NOT_FOUND, Html(render_not_found(site)?)))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/", get(home))
}
