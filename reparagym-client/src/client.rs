//! REST client for the store API.

use std::time::Instant;

use reparagym_core::{ConfigError, FetchError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::types::{ContactReceipt, ContactRequest, ProductPage, ProductQuery, StoreErrorBody};

/// Header carrying the storefront's publishable key.
pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// Upper bound on how much of an unstructured error body is kept.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    config: StoreConfig,
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(build_default_headers(config)?)
            .build()
            .map_err(|e| ConfigError::invalid("http_client", "reqwest", e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// `GET /store/products`
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, FetchError> {
        let url = self.config.url("/store/products");
        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(transport_error)?;
        debug!(
            url = %url,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Listed products"
        );
        parse_response(response).await
    }

    /// Submit the contact form to the configured contact path.
    pub async fn submit_contact(&self, request: &ContactRequest) -> Result<ContactReceipt, FetchError> {
        let url = self.config.url(&self.config.contact_path);
        let response = self.post_json(&url, request).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ContactReceipt::default());
        }
        decode(&body)
    }

    async fn post_json<B>(&self, url: &str, body: &B) -> Result<reqwest::Response, FetchError>
    where
        B: Serialize + ?Sized,
    {
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)
    }
}

fn build_default_headers(config: &StoreConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = &config.publishable_key {
        headers.insert(
            HeaderName::from_static(PUBLISHABLE_KEY_HEADER),
            HeaderValue::from_str(key)
                .map_err(|e| ConfigError::invalid("publishable_key", "<redacted>", e.to_string()))?,
        );
    }
    Ok(headers)
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;
    if status.is_success() {
        decode(&body)
    } else {
        Err(status_error(status, &body))
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Store API returned an unreadable payload");
        FetchError::decode(e.to_string())
    })
}

fn status_error(status: reqwest::StatusCode, body: &[u8]) -> FetchError {
    let message = match serde_json::from_slice::<StoreErrorBody>(body) {
        Ok(StoreErrorBody {
            kind: Some(kind),
            message,
        }) => format!("{kind}: {message}"),
        Ok(StoreErrorBody { kind: None, message }) => message,
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text.chars().take(MAX_ERROR_BODY).collect()
            }
        }
    };
    FetchError::status(status.as_u16(), message)
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::transport(format!("request timed out: {err}"))
    } else {
        FetchError::transport(err.to_string())
    }
}
