//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use mock_backend::MockBackend;
use nethra_api::{ApiClient, ClientConfig};
use nethra_core::{Money, NewProduct};

/// Client pointed at a mock backend, no token.
pub fn client_for(backend: &MockBackend) -> ApiClient {
    ApiClient::new(ClientConfig::new(backend.base_url())).expect("client should build")
}

/// Client pointed at a mock backend with a bearer token.
pub fn client_with_token(backend: &MockBackend, token: &str) -> ApiClient {
    let config = ClientConfig::new(backend.base_url()).with_token(Some(token.to_string()));
    ApiClient::new(config).expect("client should build")
}

/// Seeds the two products every bill test uses: Murukku ₹50 and Adhirasam ₹30.
pub async fn seed_catalog(backend: &MockBackend) {
    backend.seed_product("முறுக்கு", "Murukku", "500g", 50).await;
    backend.seed_product("அதிரசம்", "Adhirasam", "250g", 30).await;
}

pub fn new_product(name: &str, name_english: &str, rupees: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        name_english: name_english.to_string(),
        weight: String::new(),
        price: Money::from_rupees(rupees),
    }
}
