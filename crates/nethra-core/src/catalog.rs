//! Product catalog search.
//!
//! The item master screen filters the fetched list locally: a product
//! matches when its English name contains the query (case-insensitive) or
//! its Tamil name contains it.

use crate::types::{Product, ProductId};
use crate::validation::validate_search_query;

/// Returns the products matching `query`, in catalog order.
///
/// An empty query matches everything.
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = validate_search_query(query);
    if query.is_empty() {
        return products.iter().collect();
    }

    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|p| p.name_english.to_lowercase().contains(&needle) || p.name.contains(&query))
        .collect()
}

pub fn find_product(products: &[Product], id: ProductId) -> Option<&Product> {
    products.iter().find(|p| p.id == id)
}

/// Resolves a product by id or by exact (case-insensitive) English name.
///
/// Used by the CLI where `--item 3` and `--item murukku` are both accepted.
pub fn resolve_product<'a>(products: &'a [Product], key: &str) -> Option<&'a Product> {
    let key = key.trim();
    if let Ok(id) = key.parse::<ProductId>() {
        if let Some(p) = find_product(products, id) {
            return Some(p);
        }
    }
    products
        .iter()
        .find(|p| p.name_english.eq_ignore_ascii_case(key) || p.name == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: ProductId::new(1),
                name: "முறுக்கு".into(),
                name_english: "Murukku".into(),
                weight: "500g".into(),
                price: Money::from_rupees(50),
            },
            Product {
                id: ProductId::new(2),
                name: "அதிரசம்".into(),
                name_english: "Adhirasam".into(),
                weight: "250g".into(),
                price: Money::from_rupees(30),
            },
            Product {
                id: ProductId::new(3),
                name: "கை முறுக்கு".into(),
                name_english: "Kai Murukku".into(),
                weight: "500g".into(),
                price: Money::from_rupees(70),
            },
        ]
    }

    #[test]
    fn test_filter_by_english_name_ignores_case() {
        let products = catalog();
        let hits = filter_products(&products, "MURUKKU");
        let ids: Vec<i64> = hits.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_filter_by_tamil_name() {
        let products = catalog();
        let hits = filter_products(&products, "அதிரசம்");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name_english, "Adhirasam");
    }

    #[test]
    fn test_empty_query_matches_all() {
        let products = catalog();
        assert_eq!(filter_products(&products, "  ").len(), 3);
        assert!(filter_products(&products, "laddu").is_empty());
    }

    #[test]
    fn test_resolve_product() {
        let products = catalog();
        assert_eq!(resolve_product(&products, "2").unwrap().name_english, "Adhirasam");
        assert_eq!(resolve_product(&products, "kai murukku").unwrap().id.get(), 3);
        assert!(resolve_product(&products, "99").is_none());
    }
}
