//! Reparagym Client - Store API Access
//!
//! Thin HTTP layer over the commerce backend. Every call returns
//! `Result<_, FetchError>` so the query cache can classify failures:
//! non-2xx responses carry their status, connection problems are transport
//! errors and unreadable payloads are decode errors.

pub mod client;
pub mod config;
pub mod fetcher;
pub mod types;

pub use client::{StoreClient, PUBLISHABLE_KEY_HEADER};
pub use config::StoreConfig;
pub use fetcher::ProductFetcher;
pub use types::{
    ContactReceipt, ContactRequest, ContactValidationError, Product, ProductPage, ProductQuery,
    ProductVariant, VariantPrice, DEFAULT_PAGE_SIZE,
};
