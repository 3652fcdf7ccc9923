//! # Bill History Commands
//!
//! Listing, viewing and editing stored bills.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  nethra bills edit 12 --qty 2=3 --remove 1 --phone 9876543210          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find bill 12 (single-bill endpoint, list as fallback)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillDraft::from_bill ── line numbers resolved against the ORIGINAL    │
//! │       │                  order before anything is changed              │
//! │       ▼                                                                 │
//! │  quantities → prices → additions → removals                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate (name, phone, prices) ─► PATCH /api/bills/update/12          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;
use std::time::Instant;

use nethra_api::ApiClient;
use nethra_core::{Bill, BillDraft, BillId, LineId, Money, Product};
use tracing::{debug, info};

use crate::commands::bill::{apply_spec, LineSpec};
use crate::commands::product::list_products;
use crate::error::{CommandError, CommandResult, OrFailed};
use crate::state::ToastChannel;

/// `LINE=VALUE`, where `LINE` is the 1-based item number shown by
/// `bills show`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEdit<T> {
    pub line: usize,
    pub value: T,
}

impl<T> FromStr for LineEdit<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected LINE=VALUE, got '{}'", s))?;
        let line = line
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid item number in '{}'", s))?;
        let value = value.trim().parse::<T>().map_err(|e| e.to_string())?;
        Ok(LineEdit { line, value })
    }
}

/// Changes requested by `nethra bills edit`.
#[derive(Debug, Clone, Default)]
pub struct BillEdits {
    pub buyer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub quantities: Vec<LineEdit<i64>>,
    pub prices: Vec<LineEdit<Money>>,
    pub remove: Vec<usize>,
    pub add: Vec<LineSpec>,
}

// =============================================================================
// Listing
// =============================================================================

pub async fn list_bills(client: &ApiClient) -> CommandResult<Vec<Bill>> {
    let start = Instant::now();
    debug!("list_bills command");

    let bills = client.bills().list().await.or_failed("Failed to load bills")?;

    info!(
        count = bills.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Bills loaded"
    );
    Ok(bills)
}

pub async fn show_bill(client: &ApiClient, id: BillId) -> CommandResult<Bill> {
    debug!(%id, "show_bill command");
    client.bills().find(id).await.or_failed("Failed to load bill")
}

// =============================================================================
// Editing
// =============================================================================

fn line_id(draft: &BillDraft, line: usize) -> CommandResult<LineId> {
    line.checked_sub(1)
        .and_then(|index| draft.line_id_at(index))
        .ok_or_else(|| CommandError::validation(format!("Bill has no item {}", line)))
}

/// Applies `edits` to a draft loaded from a stored bill.
///
/// Item numbers refer to the bill as it was loaded, so `--remove 1 --qty 2=5`
/// changes the item that was second even though the first is removed.
pub fn apply_edits(
    draft: &mut BillDraft,
    products: &[Product],
    edits: &BillEdits,
) -> CommandResult<()> {
    if let Some(name) = &edits.buyer_name {
        draft.buyer.name = name.clone();
    }
    if let Some(phone) = &edits.phone {
        draft.buyer.phone = phone.clone();
    }
    if let Some(address) = &edits.address {
        draft.buyer.address = address.clone();
    }
    if let Some(number) = &edits.invoice_number {
        draft.invoice_number = number.clone();
    }
    if let Some(date) = &edits.invoice_date {
        draft.invoice_date = date.clone();
    }

    let quantities = edits
        .quantities
        .iter()
        .map(|e| line_id(draft, e.line).map(|id| (id, e.value)))
        .collect::<CommandResult<Vec<_>>>()?;
    let prices = edits
        .prices
        .iter()
        .map(|e| line_id(draft, e.line).map(|id| (id, e.value)))
        .collect::<CommandResult<Vec<_>>>()?;
    let mut remove = edits.remove.clone();
    remove.sort_unstable();
    remove.dedup();
    let removals = remove
        .into_iter()
        .map(|line| line_id(draft, line))
        .collect::<CommandResult<Vec<_>>>()?;

    for (id, qty) in quantities {
        draft.set_quantity(id, qty)?;
    }
    for (id, price) in prices {
        draft.set_unit_price(id, price)?;
    }
    // Added lines must exist before the originals are removed.
    for spec in &edits.add {
        apply_spec(draft, products, spec)?;
    }
    for id in removals {
        draft.remove_line(id)?;
    }
    Ok(())
}

pub async fn edit_bill(
    client: &ApiClient,
    toasts: &ToastChannel,
    id: BillId,
    edits: BillEdits,
) -> CommandResult<Bill> {
    let start = Instant::now();
    debug!(%id, "edit_bill command");

    let original = show_bill(client, id).await?;
    let products = if edits.add.is_empty() {
        Vec::new()
    } else {
        list_products(client).await?
    };

    let mut draft = BillDraft::from_bill(&original);
    apply_edits(&mut draft, &products, &edits)?;

    let updated = client
        .bills()
        .update(&original, &draft)
        .await
        .or_failed("Failed to update bill")?;

    info!(
        %id,
        total = %updated.total,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Bill updated"
    );
    toasts.success("Bill updated successfully!");
    Ok(updated)
}
