//! # Bills API
//!
//! Bill history, creation, editing, invoice numbering and PDF generation.
//!
//! ## Screen → Endpoint Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Create bill     GET  /api/bills/next-invoice   next_invoice_number()  │
//! │                  POST /api/bills/create         create()               │
//! │                                                                         │
//! │  Bill history    GET  /api/bills/all            list()                 │
//! │  Bill details    GET  /api/bills/:id            get() / find()         │
//! │  Edit bill       PATCH /api/bills/update/:id    update()               │
//! │                                                                         │
//! │  PDF viewer      POST /api/bills/generate-pdf   generate_pdf()         │
//! │                  GET  /api/bills/:id/pdf        stored_pdf()           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `create` and `update` validate the draft first; an invalid draft never
//! produces a request.

use std::time::Instant;

use chrono::NaiveDate;
use nethra_core::invoice::fallback_invoice_number;
use nethra_core::{Bill, BillDraft, BillId};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::{decode, success_body, ApiClient, ItemEnvelope, ListEnvelope};
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::pdf::{resolve_pdf_url, PdfLink};

// =============================================================================
// Response Types
// =============================================================================

/// What the server reports after creating a bill.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedBill {
    pub bill_id: BillId,
    pub invoice_number: String,

    #[serde(default)]
    pub buyer_id: Option<i64>,

    #[serde(default)]
    pub pdf_url: Option<PdfLink>,

    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateBillResponse {
    #[serde(default = "default_true")]
    success: bool,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    data: Option<CreatedBill>,
}

/// `{ "success": bool, ... }` where a missing flag means failure.
#[derive(Debug, Deserialize)]
struct Outcome {
    #[serde(default)]
    success: bool,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    pdf_url: Option<PdfLink>,
}

impl Outcome {
    fn require_success(self, action: &str) -> ClientResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::Rejected(
                self.message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("{} failed", action)),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct NextInvoice {
    invoice_number: String,
}

#[derive(Debug, Deserialize)]
struct StoredPdf {
    #[serde(default)]
    pdf_url: Option<PdfLink>,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Bills API
// =============================================================================

/// Bill endpoints. Obtain via [`ApiClient::bills`].
pub struct BillsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BillsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        BillsApi { client }
    }

    /// Fetches every stored bill.
    pub async fn list(&self) -> ClientResult<Vec<Bill>> {
        let start = Instant::now();

        let request = self.client.request(Method::GET, endpoints::BILLS_ALL)?;
        let bills = self
            .client
            .fetch::<ListEnvelope<Bill>>(request)
            .await?
            .into_vec();

        info!(
            count = bills.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched bills"
        );
        Ok(bills)
    }

    /// Fetches one bill by id.
    pub async fn get(&self, id: BillId) -> ClientResult<Bill> {
        let request = self.client.request(Method::GET, &endpoints::bill(id))?;
        let bill = self.client.fetch::<ItemEnvelope<Bill>>(request).await?;
        Ok(bill.into_inner())
    }

    /// Finds a bill by id.
    ///
    /// Uses the single-bill endpoint, and falls back to scanning the full
    /// list when the server does not offer it.
    pub async fn find(&self, id: BillId) -> ClientResult<Bill> {
        match self.get(id).await {
            Ok(bill) => Ok(bill),
            Err(e) if e.is_not_found() || matches!(e, ClientError::MalformedResponse(_)) => {
                debug!(id = %id, error = %e, "Single-bill lookup failed, scanning list");
                self.list()
                    .await?
                    .into_iter()
                    .find(|b| b.id == id)
                    .ok_or(ClientError::BillNotFound(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Asks the server for the next invoice number.
    pub async fn next_invoice_number(&self) -> ClientResult<String> {
        let request = self.client.request(Method::GET, endpoints::NEXT_INVOICE)?;
        let next: NextInvoice = self.client.fetch(request).await?;
        debug!(invoice_number = %next.invoice_number, "Next invoice number");
        Ok(next.invoice_number)
    }

    /// Next invoice number, or a client-side `INVnnnnnn` when the server
    /// cannot be reached.
    pub async fn next_invoice_number_or_fallback(&self, now_millis: i64) -> String {
        match self.next_invoice_number().await {
            Ok(number) if !number.trim().is_empty() => number,
            Ok(_) => fallback_invoice_number(now_millis),
            Err(e) => {
                warn!(error = %e, "Next invoice number unavailable, using fallback");
                fallback_invoice_number(now_millis)
            }
        }
    }

    /// Validates and submits a new bill.
    pub async fn create(&self, draft: &BillDraft, today: NaiveDate) -> ClientResult<CreatedBill> {
        draft.validate_for_create()?;

        let start = Instant::now();
        let body = draft.to_create_request(today);
        debug!(
            invoice_number = %body.invoice_number,
            items = body.bill_items.len(),
            total = %body.total,
            "Creating bill"
        );

        let request = self
            .client
            .request(Method::POST, endpoints::CREATE_BILL)?
            .json(&body);
        let response: CreateBillResponse = self.client.fetch(request).await?;

        if !response.success {
            return Err(ClientError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "Create bill failed".to_string()),
            ));
        }
        let created = response.data.ok_or_else(|| {
            ClientError::MalformedResponse("create bill response has no data".to_string())
        })?;

        info!(
            bill_id = %created.bill_id,
            invoice_number = %created.invoice_number,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Bill created"
        );
        Ok(created)
    }

    /// Validates and saves an edited bill.
    ///
    /// Returns the bill as it was sent, with recomputed amounts.
    pub async fn update(&self, original: &Bill, draft: &BillDraft) -> ClientResult<Bill> {
        draft.validate_for_update()?;

        let body = draft.to_update(original);
        let request = self
            .client
            .request(Method::PATCH, &endpoints::update_bill(original.id))?
            .json(&body);
        let outcome: Outcome = self.client.fetch(request).await?;
        outcome.require_success("Update bill")?;

        info!(id = %original.id, total = %body.total, "Bill updated");
        Ok(draft.to_bill(original))
    }

    /// Asks the server to render a PDF for `bill` and returns its absolute URL.
    ///
    /// Uses the longer PDF timeout.
    pub async fn generate_pdf(&self, bill: &Bill) -> ClientResult<Url> {
        let start = Instant::now();

        let request = self
            .client
            .request(Method::POST, endpoints::GENERATE_PDF)?
            .timeout(self.client.pdf_timeout())
            .json(bill);
        let response = request.send().await?;
        let body = success_body(response).await?;
        let outcome: Outcome = decode::<Outcome>(&body)?.require_success("PDF generation")?;

        let link = outcome.pdf_url.ok_or_else(|| {
            ClientError::MalformedResponse("PDF response has no pdf_url".to_string())
        })?;
        let url = resolve_pdf_url(self.client.base_url(), link.as_str())?;

        info!(
            id = %bill.id,
            url = %url,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "PDF generated"
        );
        Ok(url)
    }

    /// URL of a PDF the server generated earlier, if it has one.
    pub async fn stored_pdf(&self, id: BillId) -> ClientResult<Option<Url>> {
        let request = self.client.request(Method::GET, &endpoints::bill_pdf(id))?;
        let stored: StoredPdf = self.client.fetch(request).await?;
        stored
            .pdf_url
            .map(|link| resolve_pdf_url(self.client.base_url(), link.as_str()))
            .transpose()
    }
}
