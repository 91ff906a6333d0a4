//! Contact form submission.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use reparagym_client::{ContactReceipt, ContactRequest};
use tracing::info;

use crate::error::WebResult;
use crate::state::AppState;

/// POST /contacto - Forward a contact form to the store API
///
/// Validated locally first; the store call is a mutation, attempted once.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> WebResult<(StatusCode, Json<ContactReceipt>)> {
    request.validate()?;

    let client = state.client.clone();
    let receipt = state
        .cache
        .mutate(|| async move { client.submit_contact(&request).await })
        .await?;

    info!(receipt_id = ?receipt.id, "Contact form submitted");
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/contacto", post(submit_contact))
}
