//! HTTP Routes
//!
//! - `/` landing page
//! - `/productos/:category` cached category listings
//! - `/whatsapp` chat redirect
//! - `/contacto` contact form (JSON)
//! - `/health/*` probes
//!
//! Unknown paths render the HTML 404 page.

pub mod catalog;
pub mod contact;
pub mod health;
pub mod pages;
pub mod whatsapp;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;
use crate::state::AppState;

/// Preflight cache lifetime sent to browsers.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Build the complete application router.
pub fn create_router(state: AppState, config: &WebConfig) -> Router {
    Router::new()
        .merge(pages::create_router())
        .merge(catalog::create_router())
        .merge(whatsapp::create_router())
        .merge(contact::create_router())
        .nest("/health", health::create_router())
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
        .with_state(state)
}

fn build_cors_layer(config: &WebConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(CORS_MAX_AGE);

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", config.cors_origins);
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}
