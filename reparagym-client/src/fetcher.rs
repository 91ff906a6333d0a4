//! Adapters from store API calls to query cache fetch functions.

use async_trait::async_trait;
use reparagym_core::{FetchError, Fingerprint};
use reparagym_query::QueryFetcher;

use crate::client::StoreClient;
use crate::types::{ProductPage, ProductQuery};

/// Fetch function for one product listing.
#[derive(Debug, Clone)]
pub struct ProductFetcher {
    client: StoreClient,
    query: ProductQuery,
}

impl ProductFetcher {
    pub fn new(client: StoreClient, query: ProductQuery) -> Self {
        Self { client, query }
    }

    /// Cache key the listing is stored under.
    pub fn fingerprint(&self) -> Fingerprint {
        self.query.fingerprint()
    }

    pub fn query(&self) -> &ProductQuery {
        &self.query
    }
}

#[async_trait]
impl QueryFetcher<ProductPage> for ProductFetcher {
    async fn fetch(&self) -> Result<ProductPage, FetchError> {
        self.client.list_products(&self.query).await
    }
}
