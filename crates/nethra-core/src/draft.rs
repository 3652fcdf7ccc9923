//! # Bill Draft
//!
//! The in-progress bill behind the "create bill" and "edit bill" forms.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bill Draft Operations                                │
//! │                                                                         │
//! │  User Action              Draft Method            State Change          │
//! │  ───────────              ────────────            ────────────          │
//! │                                                                         │
//! │  "Add item" ─────────────► add_line() ──────────► lines.push(empty)    │
//! │                                                                         │
//! │  Pick product ───────────► select_product() ────► product + price set  │
//! │                                                                         │
//! │  Change quantity ────────► set_quantity() ──────► line.quantity = n    │
//! │                                                                         │
//! │  Change price ───────────► set_unit_price() ────► line.unit_price = p  │
//! │                                                                         │
//! │  Remove ─────────────────► remove_line() ───────► lines.remove(i)      │
//! │                                                   (never the last one)  │
//! │                                                                         │
//! │  View totals ────────────► totals() ────────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Amounts Are Derived
//! A line stores only quantity and unit price. `amount()` is computed on
//! every read, so subtotal and total always equal Σ quantity × unit price
//! no matter which mutation happened last.
//!
//! ## Limits
//! Quantity is capped at [`MAX_QUANTITY`] and unit price at
//! [`MAX_UNIT_PRICE`]. Every line amount then fits in 10^14 paise, so sums
//! stay exact for any bill a shop counter can produce.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationErrors};
use crate::invoice::normalize_invoice_date;
use crate::money::Money;
use crate::types::{
    Bill, BillLine, Buyer, BuyerPayload, CreateBillItem, CreateBillRequest, Product, ProductId,
    UpdateBillRequest,
};
use crate::validation;

/// Largest quantity a single line accepts.
pub const MAX_QUANTITY: u32 = 100_000;

/// Largest unit price a line accepts (₹1,00,00,000).
pub const MAX_UNIT_PRICE: Money = Money::from_rupees(10_000_000);

// =============================================================================
// Line Identity
// =============================================================================

/// Local identifier of a draft line. Never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(Uuid);

impl LineId {
    fn new() -> Self {
        LineId(Uuid::new_v4())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Draft Line
// =============================================================================

/// Snapshot of the product a line refers to.
///
/// Names are frozen when the product is picked so the line keeps displaying
/// the same text even if the catalog changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineProduct {
    pub id: ProductId,
    pub name: String,
    pub name_english: String,
    pub weight: String,
}

impl From<&Product> for LineProduct {
    fn from(p: &Product) -> Self {
        LineProduct {
            id: p.id,
            name: p.name.clone(),
            name_english: p.name_english.clone(),
            weight: p.weight.clone(),
        }
    }
}

/// One row of the bill form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    id: LineId,
    product: Option<LineProduct>,
    quantity: u32,
    unit_price: Money,
}

impl DraftLine {
    /// An empty row: no product, quantity 1, price zero.
    fn empty() -> Self {
        DraftLine {
            id: LineId::new(),
            product: None,
            quantity: 1,
            unit_price: Money::zero(),
        }
    }

    #[inline]
    pub fn id(&self) -> LineId {
        self.id
    }

    #[inline]
    pub fn product(&self) -> Option<&LineProduct> {
        self.product.as_ref()
    }

    #[inline]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Line amount (quantity × unit price).
    #[inline]
    pub fn amount(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// True when no product has been picked yet.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.product.is_none()
    }

    fn to_bill_line(&self) -> Option<BillLine> {
        let product = self.product.as_ref()?;
        Some(BillLine {
            item_id: product.id,
            qty: self.quantity,
            price: self.unit_price,
            amount: self.amount(),
            item_name: Some(product.name.clone()).filter(|s| !s.is_empty()),
            name_english: Some(product.name_english.clone()).filter(|s| !s.is_empty()),
        })
    }
}

// =============================================================================
// Bill Draft
// =============================================================================

/// The bill being created or edited.
///
/// ## Invariants
/// - There is always at least one line (a fresh draft starts with one empty row)
/// - Quantity is always >= 1
/// - Unit price is never negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDraft {
    pub invoice_number: String,

    /// As entered: `DD/MM/YYYY`, `YYYY-MM-DD`, or the server's stored value.
    pub invoice_date: String,

    pub buyer: Buyer,

    lines: Vec<DraftLine>,
}

impl BillDraft {
    /// Starts a new bill with one empty line.
    pub fn new(invoice_number: impl Into<String>, invoice_date: impl Into<String>) -> Self {
        BillDraft {
            invoice_number: invoice_number.into(),
            invoice_date: invoice_date.into(),
            buyer: Buyer::default(),
            lines: vec![DraftLine::empty()],
        }
    }

    /// Loads a stored bill into a draft for editing.
    ///
    /// Lines keep the prices recorded on the bill, not today's catalog price.
    pub fn from_bill(bill: &Bill) -> Self {
        let mut lines: Vec<DraftLine> = bill
            .items
            .iter()
            .map(|item| DraftLine {
                id: LineId::new(),
                product: Some(LineProduct {
                    id: item.item_id,
                    name: item.item_name.clone().unwrap_or_default(),
                    name_english: item.name_english.clone().unwrap_or_default(),
                    weight: String::new(),
                }),
                quantity: item.qty.max(1),
                unit_price: if item.price.is_negative() {
                    Money::zero()
                } else {
                    item.price
                },
            })
            .collect();

        if lines.is_empty() {
            lines.push(DraftLine::empty());
        }

        BillDraft {
            invoice_number: bill.invoice_number.clone(),
            invoice_date: bill.invoice_date.clone(),
            buyer: bill.buyer.clone(),
            lines,
        }
    }

    // -------------------------------------------------------------------------
    // Line access
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&DraftLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Id of the line at a 0-based position.
    pub fn line_id_at(&self, index: usize) -> Option<LineId> {
        self.lines.get(index).map(|l| l.id)
    }

    fn line_mut(&mut self, id: LineId) -> CoreResult<&mut DraftLine> {
        self.lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(CoreError::LineNotFound(id))
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Appends an empty line and returns its id.
    pub fn add_line(&mut self) -> LineId {
        let line = DraftLine::empty();
        let id = line.id;
        self.lines.push(line);
        id
    }

    /// Adds a product with a quantity.
    ///
    /// Fills the first blank line if there is one, otherwise appends.
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<LineId> {
        check_unit_price(product.price)?;
        let id = match self.lines.iter().find(|l| l.is_blank()) {
            Some(blank) => blank.id,
            None => self.add_line(),
        };
        self.select_product(id, product)?;
        self.set_quantity(id, quantity)?;
        Ok(id)
    }

    /// Removes a line. The last remaining line cannot be removed.
    pub fn remove_line(&mut self, id: LineId) -> CoreResult<()> {
        let index = self
            .lines
            .iter()
            .position(|l| l.id == id)
            .ok_or(CoreError::LineNotFound(id))?;

        if self.lines.len() == 1 {
            return Err(CoreError::LastLine);
        }

        self.lines.remove(index);
        Ok(())
    }

    /// Points a line at a catalog product and takes over its price.
    pub fn select_product(&mut self, id: LineId, product: &Product) -> CoreResult<()> {
        check_unit_price(product.price)?;
        let line = self.line_mut(id)?;
        line.product = Some(LineProduct::from(product));
        line.unit_price = product.price;
        Ok(())
    }

    /// Sets a line's quantity. Anything below one or above
    /// [`MAX_QUANTITY`] is rejected.
    pub fn set_quantity(&mut self, id: LineId, quantity: i64) -> CoreResult<()> {
        if quantity > i64::from(MAX_QUANTITY) {
            return Err(CoreError::QuantityTooLarge(quantity));
        }
        let qty = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(CoreError::InvalidQuantity(quantity))?;
        self.line_mut(id)?.quantity = qty;
        Ok(())
    }

    /// Overrides a line's unit price. Negative prices and prices above
    /// [`MAX_UNIT_PRICE`] are rejected.
    pub fn set_unit_price(&mut self, id: LineId, price: Money) -> CoreResult<()> {
        check_unit_price(price)?;
        self.line_mut(id)?.unit_price = price;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Σ line amounts.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(DraftLine::amount).sum()
    }

    /// Equal to the subtotal: no tax or discount is modelled.
    pub fn total(&self) -> Money {
        self.subtotal()
    }

    pub fn totals(&self) -> BillTotals {
        BillTotals::from(self)
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Checks the rules for a new bill.
    pub fn validate_for_create(&self) -> Result<(), ValidationErrors> {
        validation::validate_new_bill(self)
    }

    /// Checks the rules for saving an edited bill.
    pub fn validate_for_update(&self) -> Result<(), ValidationErrors> {
        validation::validate_bill_update(self)
    }

    /// Builds the create-bill body.
    ///
    /// Blank lines are dropped and the invoice date is normalised to
    /// `YYYY-MM-DD` (falling back to `today`).
    pub fn to_create_request(&self, today: NaiveDate) -> CreateBillRequest {
        let bill_items = self
            .lines
            .iter()
            .filter_map(|l| {
                l.product.as_ref().map(|p| CreateBillItem {
                    item_id: p.id,
                    qty: l.quantity,
                    price: l.unit_price,
                    amount: l.amount(),
                })
            })
            .collect();

        CreateBillRequest {
            invoice_number: self.invoice_number.trim().to_string(),
            buyer: BuyerPayload::from(&self.buyer),
            invoice_date: normalize_invoice_date(&self.invoice_date, today),
            subtotal: self.subtotal(),
            total: self.total(),
            bill_items,
        }
    }

    /// Builds the update body for the bill this draft was loaded from.
    pub fn to_update(&self, original: &Bill) -> UpdateBillRequest {
        UpdateBillRequest {
            id: original.id,
            invoice_number: self.invoice_number.clone(),
            invoice_date: self.invoice_date.clone(),
            subtotal: self.subtotal(),
            total: self.total(),
            buyer: Buyer {
                name: self.buyer.name.trim().to_string(),
                phone: self.buyer.phone.trim().to_string(),
                address: self.buyer.address.trim().to_string(),
            },
            items: self.lines.iter().filter_map(DraftLine::to_bill_line).collect(),
        }
    }

    /// The draft as a full bill record (used for PDF generation after edits).
    pub fn to_bill(&self, original: &Bill) -> Bill {
        let update = self.to_update(original);
        Bill {
            id: update.id,
            invoice_number: update.invoice_number,
            invoice_date: update.invoice_date,
            subtotal: update.subtotal,
            total: update.total,
            buyer: update.buyer,
            items: update.items,
        }
    }
}

fn check_unit_price(price: Money) -> CoreResult<()> {
    if price.is_negative() {
        return Err(CoreError::NegativePrice(price));
    }
    if price > MAX_UNIT_PRICE {
        return Err(CoreError::PriceTooLarge(price));
    }
    Ok(())
}

/// Totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillTotals {
    pub line_count: usize,
    pub unit_count: u32,
    pub subtotal: Money,
    pub total: Money,
}

impl From<&BillDraft> for BillTotals {
    fn from(draft: &BillDraft) -> Self {
        BillTotals {
            line_count: draft.lines.iter().filter(|l| !l.is_blank()).count(),
            unit_count: draft
                .lines
                .iter()
                .filter(|l| !l.is_blank())
                .fold(0u32, |units, l| units.saturating_add(l.quantity)),
            subtotal: draft.subtotal(),
            total: draft.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
