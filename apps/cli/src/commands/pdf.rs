//! # PDF Commands
//!
//! Server-side invoice generation and what happens to the file afterwards.
//!
//! ## Actions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  nethra pdf 12 [--download] [--open] [--share] [--print]               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find bill 12 ─► POST /api/bills/generate-pdf ─► pdf_url               │
//! │                                                    │                    │
//! │       ┌──────────────────┬─────────────────────────┼──────────────┐    │
//! │       ▼                  ▼                         ▼              ▼    │
//! │   --download          --open                   --share         --print │
//! │   Downloads/          download +               cache dir,      cache   │
//! │   Invoice_<no>.pdf    platform opener          share command   dir, lp │
//! │   (kept)              (kept)                   (removed 5 s)   (3 s)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without an action flag the command only generates and reports the URL.

use std::path::{Path, PathBuf};
use std::time::Instant;

use nethra_api::pdf::launch;
use nethra_api::{ApiClient, CleanupQueue, Shared};
use nethra_core::{Bill, BillId};
use tracing::{debug, info, warn};
use url::Url;

use crate::commands::history::show_bill;
use crate::error::{CommandError, CommandResult, ErrorCode, OrFailed};
use crate::state::{PdfSettings, ToastChannel};

/// Which hand-offs to perform after generating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdfActions {
    pub download: bool,
    pub open: bool,
    pub share: bool,
    pub print: bool,
}

/// Where the PDF ended up.
#[derive(Debug, Clone)]
pub struct PdfReport {
    pub url: Url,
    pub downloaded: Option<PathBuf>,
    pub opened: bool,
    pub shared: Option<Shared>,
    pub printed: Option<PathBuf>,
}

pub async fn generate_pdf(
    client: &ApiClient,
    toasts: &ToastChannel,
    bill: &Bill,
) -> CommandResult<Url> {
    let start = Instant::now();
    debug!(invoice_number = %bill.invoice_number, "generate_pdf command");

    let url = client
        .bills()
        .generate_pdf(bill)
        .await
        .or_failed("Failed to generate PDF")?;

    info!(
        url = %url,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "PDF generated"
    );
    toasts.success("PDF generated successfully!");
    Ok(url)
}

pub async fn download_pdf(
    client: &ApiClient,
    toasts: &ToastChannel,
    url: &Url,
    bill: &Bill,
    dir: &Path,
) -> CommandResult<PathBuf> {
    toasts.info("Download started...");

    let path = client
        .pdfs()
        .save_invoice(url, bill, dir)
        .await
        .or_failed("Failed to download PDF")?;

    toasts.success("PDF downloaded successfully!");
    Ok(path)
}

pub async fn open_pdf(path: &Path, open_command: &str) -> CommandResult<()> {
    debug!(path = %path.display(), command = %open_command, "open_pdf command");
    launch(open_command, path, "")
        .await
        .or_failed("Failed to open PDF")
}

/// Shares through the configured command, or leaves the file for the user.
pub async fn share_pdf(
    client: &ApiClient,
    toasts: &ToastChannel,
    url: &Url,
    bill: &Bill,
    settings: &PdfSettings,
    cleanup: &mut CleanupQueue,
) -> CommandResult<Shared> {
    let shared = client
        .pdfs()
        .share(
            url,
            bill,
            &settings.cache_dir(),
            settings.share_command(),
            cleanup,
            settings.share_cleanup_delay(),
        )
        .await
        .or_failed("Failed to share PDF")?;

    if let Shared::Manual { path, .. } = &shared {
        toasts.info(format!("PDF ready to share: {}", path.display()));
    }
    Ok(shared)
}

pub async fn print_pdf(
    client: &ApiClient,
    toasts: &ToastChannel,
    url: &Url,
    bill: &Bill,
    settings: &PdfSettings,
    cleanup: &mut CleanupQueue,
) -> CommandResult<PathBuf> {
    let Some(command) = settings.print_command() else {
        warn!("No print command configured");
        return Err(CommandError::new(ErrorCode::Local, "Failed to print PDF"));
    };

    let path = client
        .pdfs()
        .print(
            url,
            bill,
            &settings.cache_dir(),
            &command,
            cleanup,
            settings.print_cleanup_delay(),
        )
        .await
        .or_failed("Failed to print PDF")?;

    toasts.success("Print job sent successfully!");
    Ok(path)
}

/// Generates the PDF for bill `id` and performs the requested actions.
///
/// A failed action stops the rest; whatever already happened stays done.
pub async fn run_pdf(
    client: &ApiClient,
    toasts: &ToastChannel,
    settings: &PdfSettings,
    cleanup: &mut CleanupQueue,
    id: BillId,
    actions: PdfActions,
) -> CommandResult<PdfReport> {
    debug!(%id, ?actions, "pdf command");

    let bill = show_bill(client, id).await?;
    let url = generate_pdf(client, toasts, &bill).await?;
    let mut report = PdfReport {
        url: url.clone(),
        downloaded: None,
        opened: false,
        shared: None,
        printed: None,
    };

    if actions.download || actions.open {
        let path = download_pdf(client, toasts, &url, &bill, &settings.download_dir()).await?;
        if actions.open {
            open_pdf(&path, &settings.open_command()).await?;
            report.opened = true;
        }
        report.downloaded = Some(path);
    }

    if actions.share {
        report.shared = Some(share_pdf(client, toasts, &url, &bill, settings, cleanup).await?);
    }

    if actions.print {
        report.printed = Some(print_pdf(client, toasts, &url, &bill, settings, cleanup).await?);
    }

    Ok(report)
}
