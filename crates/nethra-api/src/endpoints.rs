//! Billing backend endpoint paths.
//!
//! Paths are relative to the server root (`base_url`), which is why they all
//! carry the `/api` prefix.

use nethra_core::{BillId, ProductId};

pub const GET_ITEMS: &str = "/api/get_items";
pub const ADD_ITEM: &str = "/api/items/addItem";

pub const BILLS_ALL: &str = "/api/bills/all";
pub const CREATE_BILL: &str = "/api/bills/create";
pub const NEXT_INVOICE: &str = "/api/bills/next-invoice";
pub const GENERATE_PDF: &str = "/api/bills/generate-pdf";

pub fn update_item(id: ProductId) -> String {
    format!("/api/item/update/{}", id)
}

/// Soft delete: the server expects a PATCH, not a DELETE.
pub fn delete_item(id: ProductId) -> String {
    format!("/api/item/delete/{}", id)
}

pub fn update_bill(id: BillId) -> String {
    format!("/api/bills/update/{}", id)
}

pub fn bill(id: BillId) -> String {
    format!("/api/bills/{}", id)
}

/// Previously generated PDF for a bill.
pub fn bill_pdf(id: BillId) -> String {
    format!("/api/bills/{}/pdf", id)
}
