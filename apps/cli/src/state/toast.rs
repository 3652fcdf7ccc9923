//! # Toast Channel
//!
//! Transient status messages published by commands and rendered on stderr.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Toast Broadcast                                 │
//! │                                                                         │
//! │  commands::product ──┐                                                  │
//! │  commands::bill ─────┤   toasts.success("Product added successfully!")  │
//! │  commands::history ──┼──────────────────────┐                           │
//! │  commands::pdf ──────┘                      ▼                           │
//! │                              ┌───────────────────────────────┐          │
//! │                              │ tokio::sync::broadcast<Toast> │          │
//! │                              └───────┬───────────────┬───────┘          │
//! │                                      ▼               ▼                  │
//! │                              stderr renderer    test receivers          │
//! │                                                                         │
//! │  • Any number of subscribers, each sees every toast                    │
//! │  • Dropping a receiver unsubscribes it                                 │
//! │  • Publishing with nobody listening is not an error                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long a toast stays up unless the publisher says otherwise.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Toasts buffered per receiver before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
            ToastKind::Warning => "!",
            ToastKind::Info => "i",
        }
    }
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub duration: Duration,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Toast {
            kind,
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Single-line terminal rendering.
    pub fn render(&self) -> String {
        format!("{} {}", self.kind.icon(), self.message)
    }
}

/// Multi-subscriber toast publisher. Clones share the same channel.
#[derive(Debug, Clone)]
pub struct ToastChannel {
    sender: broadcast::Sender<Toast>,
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        ToastChannel { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    /// Publishes a toast to every current subscriber.
    pub fn show(&self, toast: Toast) {
        debug!(kind = ?toast.kind, message = %toast.message, "Toast");
        // No receivers is fine.
        let _ = self.sender.send(toast);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(Toast::new(ToastKind::Success, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(Toast::new(ToastKind::Error, message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(Toast::new(ToastKind::Warning, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(Toast::new(ToastKind::Info, message));
    }

    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Prints toasts to stderr until every [`ToastChannel`] clone is dropped.
///
/// Toasts still buffered when the channel closes are printed before the
/// task ends, so awaiting the handle flushes them.
pub fn spawn_stderr_renderer(mut receiver: broadcast::Receiver<Toast>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(toast) => {
                    let mut stderr = std::io::stderr().lock();
                    let _ = writeln!(stderr, "{}", toast.render());
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Toast renderer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
