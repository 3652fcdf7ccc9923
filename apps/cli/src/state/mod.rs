//! # State Module
//!
//! Long-lived values shared by every command in one run.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┬──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  AppConfig   │  │ ToastChannel │  │  CleanupQueue    │              │
//! │  │              │  │              │  │  (nethra-api)    │              │
//! │  │  api / pdf / │  │  broadcast   │  │  delayed temp    │              │
//! │  │  business    │  │  → stderr    │  │  PDF removal     │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  Commands take only the pieces they use, by reference.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod toast;

pub use config::{ApiSettings, AppConfig, BusinessInfo, PdfSettings, CONFIG_FILE_NAME};
pub use toast::{spawn_stderr_renderer, Toast, ToastChannel, ToastKind, DEFAULT_TOAST_DURATION};
