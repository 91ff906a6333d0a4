//! View models derived from query cache state.

use reparagym_client::{Product, ProductPage};
use reparagym_core::QueryError;
use reparagym_query::QueryState;
use serde::Serialize;

/// One product tile in a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub title: String,
    pub handle: String,
    pub subtitle: Option<String>,
    pub thumbnail: Option<String>,
    pub price_label: Option<String>,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            handle: product.handle.clone(),
            subtitle: product.subtitle.clone(),
            thumbnail: product.thumbnail.clone(),
            price_label: product
                .lowest_price()
                .map(|price| format_price(price.calculated_amount, &price.currency_code)),
        }
    }
}

/// What the catalog page shows for a category.
///
/// Data and error are independent: a failed refresh of a previously loaded
/// listing shows the old products together with the error notice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub products: Vec<ProductCard>,
    pub total: u64,
    pub has_more: bool,
    /// Products shown are past their freshness window.
    pub is_stale: bool,
    /// A refresh is running in the background.
    pub is_refreshing: bool,
    /// Nothing has loaded yet.
    pub is_loading: bool,
    pub error: Option<String>,
}

impl CatalogView {
    pub fn loaded(page: &ProductPage) -> Self {
        Self {
            products: page.products.iter().map(ProductCard::from).collect(),
            total: page.count,
            has_more: page.has_more(),
            ..Self::default()
        }
    }

    pub fn failed(error: &QueryError) -> Self {
        Self {
            error: Some(error_message(error)),
            ..Self::default()
        }
    }

    pub fn from_state(state: &QueryState<ProductPage>) -> Self {
        match state {
            QueryState::Pending => Self {
                is_loading: true,
                ..Self::default()
            },
            QueryState::Success {
                value,
                is_stale,
                is_fetching,
            } => Self {
                is_stale: *is_stale,
                is_refreshing: *is_fetching,
                ..Self::loaded(value)
            },
            QueryState::Error {
                error,
                previous,
                is_fetching,
            } => {
                let mut view = previous.as_ref().map(Self::loaded).unwrap_or_default();
                view.is_stale = previous.is_some();
                view.is_refreshing = *is_fetching;
                view.error = Some(error_message(error));
                view
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Visitor-facing text for a failed listing.
fn error_message(error: &QueryError) -> String {
    match error.status_code() {
        Some(404) => "No encontramos productos para esta categoría.".to_string(),
        Some(429) => "Demasiadas solicitudes. Intenta de nuevo en unos segundos.".to_string(),
        _ => "El catálogo no está disponible en este momento. Intenta de nuevo más tarde.".to_string(),
    }
}

/// `$1,250 MXN`
pub fn format_price(amount: i64, currency_code: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}${grouped} {}", currency_code.to_uppercase())
}
