//! Plain-text rendering of command results for stdout.

use std::fmt::Write;

use nethra_api::Shared;
use nethra_core::{Bill, Product};

use crate::commands::bill::BillReceipt;
use crate::commands::pdf::PdfReport;
use crate::state::AppConfig;

const RULE: &str = "────────────────────────────────────────────────────────────";

pub fn product_table(products: &[&Product], config: &AppConfig) -> String {
    if products.is_empty() {
        return "No products found\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<20} {:<20} {:<8} {:>10}",
        "ID", "NAME", "ENGLISH", "WEIGHT", "PRICE"
    );
    for p in products {
        let _ = writeln!(
            out,
            "{:>5}  {:<20} {:<20} {:<8} {:>10}",
            p.id.to_string(),
            p.name,
            p.name_english,
            p.weight,
            config.format_currency(p.price)
        );
    }
    out
}

pub fn bill_list(bills: &[Bill], config: &AppConfig) -> String {
    if bills.is_empty() {
        return "No bills yet\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<12} {:<10}  {:<20} {:>5} {:>12}",
        "ID", "INVOICE", "DATE", "BUYER", "QTY", "TOTAL"
    );
    for b in bills {
        let _ = writeln!(
            out,
            "{:>5}  {:<12} {:<10}  {:<20} {:>5} {:>12}",
            b.id.to_string(),
            b.invoice_number,
            b.date_only(),
            b.buyer.name,
            b.unit_count(),
            config.format_currency(b.total)
        );
    }
    out
}

/// Invoice-style view with the business header and numbered items.
pub fn bill_details(bill: &Bill, config: &AppConfig) -> String {
    let business = &config.business;
    let mut out = String::new();

    let _ = writeln!(out, "{}", business.name);
    for line in [&business.address, &business.phone, &business.email] {
        if !line.is_empty() {
            let _ = writeln!(out, "{}", line);
        }
    }
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Invoice: {}    Date: {}", bill.invoice_number, bill.date_only());
    let _ = writeln!(out, "Buyer:   {}", bill.buyer.name);
    if !bill.buyer.phone.is_empty() {
        let _ = writeln!(out, "Phone:   {}", bill.buyer.phone);
    }
    if !bill.buyer.address.is_empty() {
        let _ = writeln!(out, "Address: {}", bill.buyer.address);
    }
    let _ = writeln!(out, "{}", RULE);

    for (i, item) in bill.items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<28} {:>4} × {:>10} = {:>12}",
            i + 1,
            item.display_name(),
            item.qty,
            config.format_currency(item.price),
            config.format_currency(item.amount)
        );
    }

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{:<48} {:>12}", "Subtotal", config.format_currency(bill.subtotal));
    let _ = writeln!(out, "{:<48} {:>12}", "Total", config.format_currency(bill.total));
    out
}

pub fn created_bill(receipt: &BillReceipt, config: &AppConfig) -> String {
    let id = receipt.created.bill_id;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Invoice {} saved as bill {}",
        receipt.created.invoice_number, id
    );
    let _ = writeln!(
        out,
        "Items: {}  Units: {}  Total: {}",
        receipt.totals.line_count,
        receipt.totals.unit_count,
        config.format_currency(receipt.totals.total)
    );
    let _ = writeln!(out, "View it:  nethra bills show {}", id);
    let _ = writeln!(out, "PDF:      nethra pdf {} --download", id);
    out
}

pub fn pdf_report(report: &PdfReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "PDF: {}", report.url);
    if let Some(path) = &report.downloaded {
        let _ = writeln!(out, "Saved to {}", path.display());
    }
    if report.opened {
        let _ = writeln!(out, "Opened in viewer");
    }
    match &report.shared {
        Some(Shared::Launched(path)) => {
            let _ = writeln!(out, "Shared {}", path.display());
        }
        Some(Shared::Manual { path, message }) => {
            let _ = writeln!(out, "No share command configured. File: {}", path.display());
            let _ = writeln!(out, "Message: {}", message);
        }
        None => {}
    }
    if let Some(path) = &report.printed {
        let _ = writeln!(out, "Sent {} to printer", path.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nethra_core::{BillId, BillLine, Buyer, Money, ProductId};

    fn bill() -> Bill {
        Bill {
            id: BillId::new(4),
            invoice_number: "INV-0004".into(),
            invoice_date: "2025-01-15T00:00:00.000Z".into(),
            subtotal: Money::from_rupees(130),
            total: Money::from_rupees(130),
            buyer: Buyer {
                name: "Meena".into(),
                phone: "9876543210".into(),
                address: String::new(),
            },
            items: vec![
                BillLine {
                    item_id: ProductId::new(1),
                    qty: 2,
                    price: Money::from_rupees(50),
                    amount: Money::from_rupees(100),
                    item_name: Some("முறுக்கு".into()),
                    name_english: Some("Murukku".into()),
                },
                BillLine {
                    item_id: ProductId::new(2),
                    qty: 1,
                    price: Money::from_rupees(30),
                    amount: Money::from_rupees(30),
                    item_name: None,
                    name_english: None,
                },
            ],
        }
    }

    #[test]
    fn test_bill_details() {
        let text = bill_details(&bill(), &AppConfig::default());
        assert!(text.starts_with("Nethra Food Products\n"));
        assert!(text.contains("Invoice: INV-0004    Date: 2025-01-15"));
        assert!(text.contains("Phone:   9876543210"));
        assert!(!text.contains("Address:"));
        assert!(text.contains("  1. Murukku"));
        assert!(text.contains("  2. Item #2"));
        assert!(text.contains("₹130.00"));
    }

    #[test]
    fn test_bill_list() {
        let text = bill_list(&[bill()], &AppConfig::default());
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("INV-0004"));
        assert!(row.contains("Meena"));
        assert!(row.ends_with("₹130.00"));
        assert_eq!(bill_list(&[], &AppConfig::default()), "No bills yet\n");
    }

    #[test]
    fn test_product_table() {
        let p = Product {
            id: ProductId::new(9),
            name: "லட்டு".into(),
            name_english: "Laddu".into(),
            weight: "500g".into(),
            price: Money::from_paise(12050),
        };
        let text = product_table(&[&p], &AppConfig::default());
        assert!(text.lines().nth(1).unwrap().contains("Laddu"));
        assert!(text.contains("₹120.50"));
    }

    #[test]
    fn test_manual_share_report() {
        let report = PdfReport {
            url: url::Url::parse("http://localhost:5000/uploads/Invoice_INV-0004.pdf").unwrap(),
            downloaded: None,
            opened: false,
            shared: Some(Shared::Manual {
                path: "/tmp/Invoice_INV-0004.pdf".into(),
                message: "Invoice INV-0004 - Meena".into(),
            }),
            printed: None,
        };
        let text = pdf_report(&report);
        assert!(text.contains("Message: Invoice INV-0004 - Meena"));
        assert!(text.contains("/tmp/Invoice_INV-0004.pdf"));
    }
}
