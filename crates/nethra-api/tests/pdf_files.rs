//! PDF download and hand-off against the mock backend.

mod common;

use std::time::Duration;

use common::client_for;
use common::mock_backend::{MockBackend, PDF_BYTES};
use nethra_api::{CleanupQueue, ClientError, Shared};
use nethra_core::BillId;
use tempfile::TempDir;

async fn generated(backend: &MockBackend) -> (nethra_api::ApiClient, nethra_core::Bill, url::Url) {
    let id = backend.seed_bill("INV-0007", "Ravi").await;
    let client = client_for(backend);
    let bill = client.bills().find(BillId::new(id)).await.unwrap();
    let url = client.bills().generate_pdf(&bill).await.unwrap();
    (client, bill, url)
}

#[tokio::test]
async fn download_writes_invoice_file() {
    let backend = MockBackend::start().await;
    let (client, bill, url) = generated(&backend).await;
    let dir = TempDir::new().unwrap();
    let downloads = dir.path().join("Downloads");

    let path = client
        .pdfs()
        .save_invoice(&url, &bill, &downloads)
        .await
        .unwrap();

    assert_eq!(path, downloads.join("Invoice_INV-0007.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), PDF_BYTES);
}

#[tokio::test]
async fn failed_download_leaves_no_file() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    let dir = TempDir::new().unwrap();
    let url = url::Url::parse(&format!("http://{}/uploads/missing.pdf", backend.addr)).unwrap();

    let err = client
        .pdfs()
        .download(&url, dir.path(), "Invoice_X.pdf")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 404, .. }));
    assert!(!dir.path().join("Invoice_X.pdf").exists());
}

#[tokio::test]
async fn share_without_command_keeps_file_and_reports_message() {
    let backend = MockBackend::start().await;
    let (client, bill, url) = generated(&backend).await;
    let cache = TempDir::new().unwrap();
    let mut cleanup = CleanupQueue::new();

    let shared = client
        .pdfs()
        .share(&url, &bill, cache.path(), None, &mut cleanup, Duration::from_millis(10))
        .await
        .unwrap();

    match shared {
        Shared::Manual { path, message } => {
            assert!(path.exists());
            assert_eq!(message, "Invoice INV-0007 - Ravi");
        }
        other => panic!("expected manual share, got {other:?}"),
    }
    assert_eq!(cleanup.pending(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn share_with_command_cleans_up_after_delay() {
    let backend = MockBackend::start().await;
    let (client, bill, url) = generated(&backend).await;
    let cache = TempDir::new().unwrap();
    let mut cleanup = CleanupQueue::new();

    let shared = client
        .pdfs()
        .share(
            &url,
            &bill,
            cache.path(),
            Some("test -s {file}"),
            &mut cleanup,
            Duration::from_millis(30),
        )
        .await
        .unwrap();

    let path = match shared {
        Shared::Launched(path) => path,
        other => panic!("expected launched share, got {other:?}"),
    };
    assert!(path.exists());
    assert_eq!(cleanup.pending(), 1);

    cleanup.wait().await;
    assert!(!path.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn print_failure_still_schedules_cleanup() {
    let backend = MockBackend::start().await;
    let (client, bill, url) = generated(&backend).await;
    let cache = TempDir::new().unwrap();
    let mut cleanup = CleanupQueue::new();

    let err = client
        .pdfs()
        .print(&url, &bill, cache.path(), "false", &mut cleanup, Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Launch { .. }));

    cleanup.wait().await;
    assert!(!cache.path().join("Invoice_INV-0007.pdf").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn print_sends_file_to_command() {
    let backend = MockBackend::start().await;
    let (client, bill, url) = generated(&backend).await;
    let cache = TempDir::new().unwrap();
    let mut cleanup = CleanupQueue::new();

    let path = client
        .pdfs()
        .print(&url, &bill, cache.path(), "test -f", &mut cleanup, Duration::from_millis(10))
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "Invoice_INV-0007.pdf");
    cleanup.wait().await;
    assert!(!path.exists());
}
