//! # nethra-core: Pure Business Logic for Nethra Billing
//!
//! This crate holds the billing rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Nethra Billing Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    `nethra` CLI (apps/cli)                      │   │
//! │  │    items ──► bill create ──► bills list/show/edit ──► pdf       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ nethra-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ BillDraft │  │   rules   │  │   │
//! │  │   │   Bill    │  │  (paise)  │  │ DraftLine │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 nethra-api (HTTP client layer)                  │   │
//! │  │          billing backend endpoints, PDF download/share          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire records (Product, Bill, Buyer, request bodies)
//! - [`money`] - Money type with integer arithmetic (paise, no floats)
//! - [`draft`] - The bill form: lines, totals, request building
//! - [`validation`] - Submission rules
//! - [`invoice`] - Invoice date normalisation and fallback numbers
//! - [`catalog`] - Product search
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use nethra_core::{BillDraft, Money, Product, ProductId};
//!
//! let murukku = Product {
//!     id: ProductId::new(1),
//!     name: "முறுக்கு".into(),
//!     name_english: "Murukku".into(),
//!     weight: "500g".into(),
//!     price: Money::from_rupees(50),
//! };
//!
//! let mut draft = BillDraft::new("INV-0001", "15/01/2025");
//! draft.add_product(&murukku, 2).unwrap();
//! assert_eq!(draft.total().to_string(), "₹100.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod draft;
pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{BillDraft, BillTotals, DraftLine, LineId, LineProduct, MAX_QUANTITY, MAX_UNIT_PRICE};
pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Weight used when the product form leaves it blank.
pub const DEFAULT_PRODUCT_WEIGHT: &str = "500g";

/// Length of an Indian mobile number.
pub const PHONE_DIGITS: usize = 10;

/// Prefix of client-generated invoice numbers.
pub const INVOICE_PREFIX: &str = "INV";
