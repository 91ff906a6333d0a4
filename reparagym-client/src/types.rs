//! Request and response payloads of the store API.

use reparagym_core::Fingerprint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default catalog page size.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page size the store API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// PRODUCTS
// ============================================================================

/// Calculated price of a variant, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPrice {
    pub calculated_amount: i64,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub calculated_price: Option<VariantPrice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Lowest calculated price across variants.
    pub fn lowest_price(&self) -> Option<&VariantPrice> {
        self.variants
            .iter()
            .filter_map(|variant| variant.calculated_price.as_ref())
            .min_by_key(|price| price.calculated_amount)
    }
}

/// One page of `GET /store/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub count: u64,
    pub offset: u32,
    pub limit: u32,
}

impl ProductPage {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether products remain beyond this page.
    pub fn has_more(&self) -> bool {
        u64::from(self.offset) + (self.products.len() as u64) < self.count
    }
}

/// Filter and pagination for a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Category filter, sent as `category_id[]`.
    pub category: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl ProductQuery {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Query for the 1-based `page` at the current page size.
    pub fn page(self, page: u32) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(self.limit);
        self.with_offset(offset)
    }

    /// Cache key, e.g. `products?category=cardio&limit=12&offset=0`.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::builder("products")
            .param_opt("category", self.category.as_deref())
            .param("limit", self.limit)
            .param("offset", self.offset)
            .build()
    }

    /// Query string pairs in the store API's format.
    pub(crate) fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(category) = &self.category {
            pairs.push(("category_id[]", category.clone()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

// ============================================================================
// CONTACT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

impl ContactRequest {
    pub const MAX_MESSAGE_LEN: usize = 2_000;

    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::MissingField { field: "name" });
        }
        if self.email.trim().is_empty() {
            return Err(ContactValidationError::MissingField { field: "email" });
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ContactValidationError::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            return Err(ContactValidationError::MissingField { field: "message" });
        }
        if self.message.chars().count() > Self::MAX_MESSAGE_LEN {
            return Err(ContactValidationError::TooLong {
                field: "message",
                max: Self::MAX_MESSAGE_LEN,
            });
        }
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Acknowledgement of a contact submission. Backends that answer with an
/// empty body produce the default receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by the store API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoreErrorBody {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub message: String,
}
