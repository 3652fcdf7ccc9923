//! # PDF Files
//!
//! Everything after the server has rendered an invoice PDF.
//!
//! ## Hand-off Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         generate_pdf(bill) → URL                        │
//! │                                   │                                     │
//! │        ┌──────────────────────────┼──────────────────────────┐          │
//! │        ▼                          ▼                          ▼          │
//! │   DOWNLOAD                     SHARE                       PRINT        │
//! │   download dir                 cache dir                   cache dir    │
//! │   Invoice_<no>.pdf             Invoice_<no>.pdf            Invoice_...  │
//! │   (kept, optionally            share command               print cmd    │
//! │    opened)                     (or path + message)         (`lp`)       │
//! │                                     │                          │        │
//! │                                     ▼                          ▼        │
//! │                               delete after 5s           delete after 3s │
//! │                                                                         │
//! │  Deletion runs on a CleanupQueue task; callers await `wait()` before   │
//! │  the process exits.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Command Templates
//! Opener, print and share commands are plain strings split on whitespace.
//! `{file}` is replaced by the PDF path and `{message}` by the share message.
//! Without a `{file}` placeholder the path is appended as the last argument.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use nethra_core::Bill;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::{join_url, ApiClient};
use crate::error::{ClientError, ClientResult};

/// Delay before a shared temp file is removed.
pub const SHARE_CLEANUP_DELAY: Duration = Duration::from_secs(5);

/// Delay before a printed temp file is removed.
pub const PRINT_CLEANUP_DELAY: Duration = Duration::from_secs(3);

// =============================================================================
// URL + Naming
// =============================================================================

/// `pdf_url` as the server sends it: a string or `{ "url": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PdfLink {
    Plain(String),
    Object { url: String },
}

impl PdfLink {
    pub fn as_str(&self) -> &str {
        match self {
            PdfLink::Plain(url) => url,
            PdfLink::Object { url } => url,
        }
    }
}

/// Makes a server-provided PDF link absolute.
///
/// ```rust
/// use nethra_api::pdf::resolve_pdf_url;
/// use url::Url;
///
/// let base = Url::parse("http://10.0.2.2:5000/").unwrap();
/// assert_eq!(
///     resolve_pdf_url(&base, "uploads/INV-1.pdf").unwrap().as_str(),
///     "http://10.0.2.2:5000/uploads/INV-1.pdf"
/// );
/// assert_eq!(
///     resolve_pdf_url(&base, "https://cdn.example.in/a.pdf").unwrap().as_str(),
///     "https://cdn.example.in/a.pdf"
/// );
/// ```
pub fn resolve_pdf_url(base: &Url, link: &str) -> ClientResult<Url> {
    let link = link.trim();
    if link.is_empty() {
        return Err(ClientError::InvalidUrl("empty PDF URL".to_string()));
    }

    if link.starts_with("http://") || link.starts_with("https://") {
        Ok(Url::parse(link)?)
    } else {
        join_url(base, link)
    }
}

/// `Invoice_<invoice number>.pdf`, with path separators made safe.
pub fn pdf_file_name(invoice_number: &str) -> String {
    let safe: String = invoice_number
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("Invoice_{}.pdf", safe)
}

/// Text that accompanies a shared invoice.
pub fn share_message(bill: &Bill) -> String {
    format!("Invoice {} - {}", bill.invoice_number, bill.buyer.name)
}

/// Platform file opener.
pub fn default_open_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Platform print command, if the platform has a standard one.
pub fn default_print_command() -> Option<&'static str> {
    if cfg!(unix) {
        Some("lp")
    } else {
        None
    }
}

// =============================================================================
// Launching
// =============================================================================

/// Runs a command template against a file and waits for it to exit.
pub async fn launch(template: &str, file: &Path, message: &str) -> ClientResult<()> {
    let launch_error = |reason: String| ClientError::Launch {
        command: template.to_string(),
        reason,
    };

    let file_arg = file.to_string_lossy();
    let mut has_file = false;
    let mut parts: Vec<String> = Vec::new();
    for token in template.split_whitespace() {
        if token.contains("{file}") {
            has_file = true;
        }
        parts.push(
            token
                .replace("{file}", &file_arg)
                .replace("{message}", message),
        );
    }
    if !has_file {
        parts.push(file_arg.to_string());
    }

    let (program, args) = parts
        .split_first()
        .ok_or_else(|| launch_error("empty command".to_string()))?;
    debug!(program = %program, args = ?args, "Launching");

    let status = tokio::process::Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|e| launch_error(e.to_string()))?;

    if !status.success() {
        return Err(launch_error(format!("exited with {}", status)));
    }
    Ok(())
}

// =============================================================================
// Cleanup Queue
// =============================================================================

/// Delayed deletion of temporary PDF files.
///
/// Each scheduled removal is an independent task; the caller does not wait
/// for it unless it calls [`CleanupQueue::wait`].
#[derive(Debug, Default)]
pub struct CleanupQueue {
    tasks: JoinSet<()>,
}

impl CleanupQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `path` after `delay`. A file that is already gone is fine.
    pub fn schedule(&mut self, path: PathBuf, delay: Duration) {
        debug!(path = %path.display(), delay_ms = delay.as_millis() as u64, "Cleanup scheduled");
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Temp PDF removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Cleanup error"),
            }
        });
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every scheduled removal to finish.
    pub async fn wait(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Cleanup task failed");
            }
        }
    }
}

// =============================================================================
// PDF Files
// =============================================================================

/// Result of a share request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shared {
    /// The share command ran; the temp file is scheduled for removal.
    Launched(PathBuf),

    /// No share command configured. The file is left in place for the user.
    Manual { path: PathBuf, message: String },
}

/// PDF download and hand-off. Obtain via [`ApiClient::pdfs`].
pub struct PdfFiles<'a> {
    client: &'a ApiClient,
}

impl<'a> PdfFiles<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        PdfFiles { client }
    }

    /// Streams `url` into `dir/file_name` and returns the full path.
    ///
    /// A partially written file is removed on failure.
    pub async fn download(&self, url: &Url, dir: &Path, file_name: &str) -> ClientResult<PathBuf> {
        let start = Instant::now();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);

        match self.stream_to(url, &path).await {
            Ok(bytes) => {
                info!(
                    path = %path.display(),
                    bytes,
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "PDF downloaded"
                );
                Ok(path)
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&path).await;
                Err(e)
            }
        }
    }

    async fn stream_to(&self, url: &Url, path: &Path) -> ClientResult<u64> {
        debug!(url = %url, "Downloading PDF");
        let mut response = self
            .client
            .http()
            .get(url.clone())
            .timeout(self.client.pdf_timeout())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }

    /// Downloads a bill's PDF into `dir` as `Invoice_<no>.pdf`.
    pub async fn save_invoice(&self, url: &Url, bill: &Bill, dir: &Path) -> ClientResult<PathBuf> {
        self.download(url, dir, &pdf_file_name(&bill.invoice_number))
            .await
    }

    /// Downloads to `cache_dir` and hands the file to the share command.
    pub async fn share(
        &self,
        url: &Url,
        bill: &Bill,
        cache_dir: &Path,
        share_command: Option<&str>,
        cleanup: &mut CleanupQueue,
        cleanup_delay: Duration,
    ) -> ClientResult<Shared> {
        let path = self.save_invoice(url, bill, cache_dir).await?;
        let message = share_message(bill);

        match share_command.filter(|c| !c.trim().is_empty()) {
            Some(command) => {
                let result = launch(command, &path, &message).await;
                cleanup.schedule(path.clone(), cleanup_delay);
                result?;
                info!(invoice_number = %bill.invoice_number, "PDF shared");
                Ok(Shared::Launched(path))
            }
            None => Ok(Shared::Manual { path, message }),
        }
    }

    /// Downloads to `cache_dir` and sends the file to the printer.
    pub async fn print(
        &self,
        url: &Url,
        bill: &Bill,
        cache_dir: &Path,
        print_command: &str,
        cleanup: &mut CleanupQueue,
        cleanup_delay: Duration,
    ) -> ClientResult<PathBuf> {
        let path = self.save_invoice(url, bill, cache_dir).await?;
        let result = launch(print_command, &path, "").await;
        cleanup.schedule(path.clone(), cleanup_delay);
        result?;
        info!(invoice_number = %bill.invoice_number, "Print job sent");
        Ok(path)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
