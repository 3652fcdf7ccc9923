//! # nethra-api: Billing Backend Client
//!
//! HTTP access to the billing backend plus the local file work that follows
//! PDF generation.
//!
//! ## Modules
//!
//! - [`client`] - `ApiClient`, configuration, shared request plumbing
//! - [`endpoints`] - exact backend paths
//! - [`products`] - catalog list/add/update/delete
//! - [`bills`] - bill history, create, update, invoice numbers, PDF generation
//! - [`pdf`] - PDF download, share/print hand-off, delayed temp cleanup
//! - [`error`] - `ClientError`
//!
//! ## Example
//! ```rust,no_run
//! use nethra_api::{ApiClient, ClientConfig};
//!
//! # async fn demo() -> nethra_api::ClientResult<()> {
//! let client = ApiClient::new(ClientConfig::new("http://localhost:5000"))?;
//! for bill in client.bills().list().await? {
//!     println!("{} {}", bill.invoice_number, bill.total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bills;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod pdf;
pub mod products;

pub use bills::{BillsApi, CreatedBill};
pub use client::{ApiClient, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use pdf::{CleanupQueue, PdfFiles, PdfLink, Shared};
pub use products::ProductsApi;
