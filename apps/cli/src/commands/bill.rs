//! # Bill Creation Command
//!
//! Builds a [`BillDraft`] from command line item specs and submits it.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    nethra bill create                                   │
//! │                                                                         │
//! │  --buyer Ravi --item murukku:2 --item adhirasam:1                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  no --item at all? ───────────► "Add at least one item to the bill"    │
//! │       │                         (no request sent)                       │
//! │       ▼                                                                 │
//! │  GET /api/get_items ──► resolve each KEY (id / English / Tamil name)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  --invoice-no given? ── no ──► GET /api/bills/next-invoice             │
//! │       │                        (INVxxxxxx if the server fails)         │
//! │       ▼                                                                 │
//! │  BillDraft: 2 × ₹50 + 1 × ₹30 = ₹130                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate ─► POST /api/bills/create ─► "Invoice … created successfully!"│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;
use std::time::Instant;

use chrono::NaiveDate;
use nethra_api::{ApiClient, CreatedBill};
use nethra_core::invoice::form_date;
use nethra_core::{catalog, BillDraft, BillTotals, Buyer, LineId, Money, Product};
use tracing::{debug, info};

use crate::commands::product::list_products;
use crate::error::{CommandError, CommandResult, OrFailed};
use crate::state::ToastChannel;

// =============================================================================
// Line Specs
// =============================================================================

/// `KEY:QTY[:PRICE]` from the command line.
///
/// `KEY` is a product id, English name or Tamil name. `PRICE` overrides the
/// catalog price for this bill only.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub key: String,
    pub quantity: i64,
    pub price: Option<Money>,
}

impl FromStr for LineSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let key = parts.next().unwrap_or_default().trim();
        if key.is_empty() {
            return Err(format!("expected KEY:QTY[:PRICE], got '{}'", s));
        }

        let quantity = match parts.next() {
            Some(qty) => qty
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid quantity in '{}'", s))?,
            None => 1,
        };

        let price = parts
            .next()
            .map(|p| p.parse::<Money>().map_err(|e| e.to_string()))
            .transpose()?;

        Ok(LineSpec {
            key: key.to_string(),
            quantity,
            price,
        })
    }
}

/// Fills one draft line from a spec.
pub(crate) fn apply_spec(
    draft: &mut BillDraft,
    products: &[Product],
    spec: &LineSpec,
) -> CommandResult<LineId> {
    let product = catalog::resolve_product(products, &spec.key)
        .ok_or_else(|| CommandError::not_found("Product", &spec.key))?;

    let id = draft.add_product(product, spec.quantity)?;
    if let Some(price) = spec.price {
        draft.set_unit_price(id, price)?;
    }
    Ok(id)
}

// =============================================================================
// Create
// =============================================================================

/// Everything `nethra bill create` collects.
#[derive(Debug, Clone, Default)]
pub struct NewBill {
    pub buyer: Buyer,
    pub lines: Vec<LineSpec>,
    pub invoice_number: Option<String>,

    /// `DD/MM/YYYY` or `YYYY-MM-DD`. Defaults to today.
    pub invoice_date: Option<String>,
}

/// What the user gets back after a bill is saved.
#[derive(Debug, Clone)]
pub struct BillReceipt {
    pub created: CreatedBill,
    pub totals: BillTotals,
}

/// Builds the draft without touching the network.
pub fn build_draft(
    products: &[Product],
    invoice_number: &str,
    invoice_date: &str,
    buyer: Buyer,
    lines: &[LineSpec],
) -> CommandResult<BillDraft> {
    let mut draft = BillDraft::new(invoice_number, invoice_date);
    draft.buyer = buyer;
    for spec in lines {
        apply_spec(&mut draft, products, spec)?;
    }
    Ok(draft)
}

pub async fn create_bill(
    client: &ApiClient,
    toasts: &ToastChannel,
    request: NewBill,
    today: NaiveDate,
    now_millis: i64,
) -> CommandResult<BillReceipt> {
    let start = Instant::now();
    debug!(lines = request.lines.len(), "create_bill command");

    let invoice_date = request
        .invoice_date
        .clone()
        .unwrap_or_else(|| form_date(today));

    if request.lines.is_empty() {
        let mut draft = BillDraft::new(String::new(), invoice_date.clone());
        draft.buyer = request.buyer.clone();
        draft.validate_for_create()?;
    }

    let products = list_products(client).await?;

    let invoice_number = match request.invoice_number.filter(|n| !n.trim().is_empty()) {
        Some(number) => number,
        None => {
            client
                .bills()
                .next_invoice_number_or_fallback(now_millis)
                .await
        }
    };

    let draft = build_draft(
        &products,
        &invoice_number,
        &invoice_date,
        request.buyer,
        &request.lines,
    )?;
    let totals = draft.totals();

    let created = client
        .bills()
        .create(&draft, today)
        .await
        .or_failed("Failed to create bill")?;

    info!(
        bill_id = %created.bill_id,
        invoice_number = %created.invoice_number,
        total = %totals.total,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Bill created"
    );
    toasts.success(format!(
        "Invoice {} created successfully! Total: {}",
        created.invoice_number, totals.total
    ));

    Ok(BillReceipt { created, totals })
}
