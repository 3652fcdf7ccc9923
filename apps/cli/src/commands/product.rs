//! # Product Commands
//!
//! The item master: list, search, add, update and delete catalog products.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Item Master Mutation                                 │
//! │                                                                         │
//! │  nethra items add --name முறுக்கு --english Murukku --price 50          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NewProduct::normalized()  (trim, weight defaults to 500g)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_new_product ──── invalid ───► error toast, nothing sent      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST /api/items/addItem ─ failure ───► "Failed to add product"        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GET /api/get_items (fresh list) ──────► "Product added successfully!" │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use nethra_api::ApiClient;
use nethra_core::{catalog, Money, NewProduct, Product, ProductId};
use tracing::{debug, info};

use crate::error::{CommandError, CommandResult, OrFailed};
use crate::state::ToastChannel;

/// Field changes for `items update`. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub name_english: Option<String>,
    pub weight: Option<String>,
    pub price: Option<Money>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.name_english.is_none()
            && self.weight.is_none()
            && self.price.is_none()
    }

    /// The full product body: current values with the changes laid over.
    pub fn apply(self, current: &Product) -> NewProduct {
        let mut product = NewProduct::from(current);
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(name_english) = self.name_english {
            product.name_english = name_english;
        }
        if let Some(weight) = self.weight {
            product.weight = weight;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        product
    }
}

/// Fetches the whole catalog.
pub async fn list_products(client: &ApiClient) -> CommandResult<Vec<Product>> {
    let start = Instant::now();
    debug!("list_products command");

    let products = client
        .products()
        .list()
        .await
        .or_failed("Failed to load products")?;

    info!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Products loaded"
    );
    Ok(products)
}

/// Products whose English or Tamil name contains `query`.
pub async fn search_products(client: &ApiClient, query: &str) -> CommandResult<Vec<Product>> {
    debug!(query = %query, "search_products command");
    client
        .products()
        .search(query)
        .await
        .or_failed("Failed to load products")
}

pub async fn add_product(
    client: &ApiClient,
    toasts: &ToastChannel,
    product: NewProduct,
) -> CommandResult<Vec<Product>> {
    debug!(name_english = %product.name_english, "add_product command");

    let products = client
        .products()
        .add(product)
        .await
        .or_failed("Failed to add product")?;

    toasts.success("Product added successfully! ✨");
    Ok(products)
}

/// Merges `changes` into the stored product and saves it.
///
/// The current values come from a catalog fetch, as the edit form is
/// prefilled from the listing.
pub async fn update_product(
    client: &ApiClient,
    toasts: &ToastChannel,
    id: ProductId,
    changes: ProductChanges,
) -> CommandResult<Vec<Product>> {
    debug!(%id, "update_product command");

    if changes.is_empty() {
        return Err(CommandError::validation("Nothing to update"));
    }

    let products = list_products(client).await?;
    let current = catalog::find_product(&products, id)
        .ok_or_else(|| CommandError::not_found("Product", id))?;
    let product = changes.apply(current);

    let products = client
        .products()
        .update(id, product)
        .await
        .or_failed("Failed to update product")?;

    toasts.success("Product updated successfully! 🎉");
    Ok(products)
}

pub async fn delete_product(
    client: &ApiClient,
    toasts: &ToastChannel,
    id: ProductId,
) -> CommandResult<Vec<Product>> {
    debug!(%id, "delete_product command");

    let products = client
        .products()
        .delete(id)
        .await
        .or_failed("Failed to delete product")?;

    toasts.success("Product deleted successfully!");
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn murukku() -> Product {
        Product {
            id: ProductId::new(1),
            name: "முறுக்கு".into(),
            name_english: "Murukku".into(),
            weight: "250g".into(),
            price: Money::from_rupees(50),
        }
    }

    #[test]
    fn test_changes_overlay_current_values() {
        let changes = ProductChanges {
            price: Some(Money::from_rupees(55)),
            ..Default::default()
        };
        assert!(!changes.is_empty());

        let body = changes.apply(&murukku());
        assert_eq!(body.name, "முறுக்கு");
        assert_eq!(body.name_english, "Murukku");
        assert_eq!(body.weight, "250g");
        assert_eq!(body.price, Money::from_rupees(55));
    }

    #[test]
    fn test_empty_changes() {
        assert!(ProductChanges::default().is_empty());
        let body = ProductChanges::default().apply(&murukku());
        assert_eq!(body, NewProduct::from(&murukku()));
    }
}
