use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use reparagym_storefront::{whatsapp::DEFAULT_MESSAGE, whatsapp_link, SiteConfig};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WhatsAppParams {
    /// Prefilled chat text; the default greeting when absent.
    pub mensaje: Option<String>,
}

/// GET /whatsapp - Redirect to a wa.me chat with the store's number
pub async fn whatsapp(
    State(site): State<Arc<SiteConfig>>,
    Query(params): Query<WhatsAppParams>,
) -> Redirect {
    let message = params.mensaje.as_deref().unwrap_or(DEFAULT_MESSAGE);
    Redirect::to(&whatsapp_link(&site.whatsapp_number, message))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/whatsapp", get(whatsapp))
}
