//! # Commands Module
//!
//! One module per billing screen.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── product.rs  ◄─── Item master: list, search, add, update, delete
//! ├── bill.rs     ◄─── Create bill
//! ├── history.rs  ◄─── Bill history, details, edit
//! └── pdf.rs      ◄─── Generate, download, open, share, print
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  clap parses `nethra bills edit 12 --qty 2=3`                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  lib::dispatch builds the inputs and calls                             │
//! │  history::edit_bill(&client, &toasts, id, edits)                       │
//! │         │                       ▲                                       │
//! │         │ (HTTP via nethra-api) │ success toast                        │
//! │         ▼                       │                                       │
//! │  Result<Bill, CommandError> ────┴──► output::bill_details → stdout     │
//! │                                 └──► error toast → stderr              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take only the state they use (`&ApiClient`, `&ToastChannel`,
//! `&PdfSettings`, `&mut CleanupQueue`) and return plain data; printing is
//! left to [`crate::output`].

pub mod bill;
pub mod history;
pub mod pdf;
pub mod product;
