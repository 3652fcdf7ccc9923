//! # Products API
//!
//! Catalog ("item master") endpoints.
//!
//! ## Mutation Flow
//! ```text
//! add / update / delete
//!      │
//!      ├── normalise + validate (nethra-core)   ← no request if invalid
//!      │
//!      ├── POST/PATCH to the backend
//!      │
//!      └── GET /api/get_items                   ← fresh list returned
//! ```
//!
//! Mutations return the refreshed catalog so callers never show a stale list.

use std::time::Instant;

use nethra_core::catalog::filter_products;
use nethra_core::validation::validate_new_product;
use nethra_core::{NewProduct, Product, ProductId};
use reqwest::Method;
use tracing::{debug, info};

use crate::client::{ApiClient, ListEnvelope};
use crate::endpoints;
use crate::error::ClientResult;

/// Catalog endpoints. Obtain via [`ApiClient::products`].
pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        ProductsApi { client }
    }

    /// Fetches the full catalog.
    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        let start = Instant::now();

        let request = self.client.request(Method::GET, endpoints::GET_ITEMS)?;
        let products = self
            .client
            .fetch::<ListEnvelope<Product>>(request)
            .await?
            .into_vec();

        info!(
            count = products.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched products"
        );
        Ok(products)
    }

    /// Fetches the catalog and filters it by name.
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Product>> {
        let products = self.list().await?;
        let hits: Vec<Product> = filter_products(&products, query)
            .into_iter()
            .cloned()
            .collect();
        debug!(query = %query, hits = hits.len(), "Product search");
        Ok(hits)
    }

    /// Adds a product, then returns the refreshed catalog.
    pub async fn add(&self, product: NewProduct) -> ClientResult<Vec<Product>> {
        let product = product.normalized();
        validate_new_product(&product)?;

        let request = self
            .client
            .request(Method::POST, endpoints::ADD_ITEM)?
            .json(&product);
        self.client.acknowledge(request, "Add product").await?;

        info!(name = %product.name_english, price = %product.price, "Product added");
        self.list().await
    }

    /// Replaces a product's fields, then returns the refreshed catalog.
    pub async fn update(&self, id: ProductId, product: NewProduct) -> ClientResult<Vec<Product>> {
        let product = product.normalized();
        validate_new_product(&product)?;

        let request = self
            .client
            .request(Method::PATCH, &endpoints::update_item(id))?
            .json(&product);
        self.client.acknowledge(request, "Update product").await?;

        info!(id = %id, name = %product.name_english, "Product updated");
        self.list().await
    }

    /// Deletes a product, then returns the refreshed catalog.
    pub async fn delete(&self, id: ProductId) -> ClientResult<Vec<Product>> {
        let request = self
            .client
            .request(Method::PATCH, &endpoints::delete_item(id))?;
        self.client.acknowledge(request, "Delete product").await?;

        info!(id = %id, "Product deleted");
        self.list().await
    }
}
