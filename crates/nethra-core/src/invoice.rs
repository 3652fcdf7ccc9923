//! # Invoice Helpers
//!
//! Invoice numbers and dates as the bill form handles them.
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │  Form (user facing)      │      │  Backend (stored)        │
//! │  invoice_date: 15/01/2025│ ───► │  invoice_date: 2025-01-15│
//! │  invoice_no:   INV-0042  │      │  invoice_number: INV-0042│
//! └──────────────────────────┘      └──────────────────────────┘
//!
//! Server unreachable for next-invoice?  → INV + last 6 digits of epoch ms
//! ```

use chrono::NaiveDate;

use crate::INVOICE_PREFIX;

/// Normalises a form date to `YYYY-MM-DD`.
///
/// - Values containing `-` are assumed to already be in storage format and
///   pass through unchanged.
/// - `D/M/YYYY` and `DD/MM/YYYY` are reordered and zero-padded.
/// - Anything else (including impossible dates like `31/02/2025`) becomes
///   `today`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use nethra_core::invoice::normalize_invoice_date;
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// assert_eq!(normalize_invoice_date("5/1/2025", today), "2025-01-05");
/// assert_eq!(normalize_invoice_date("2025-01-05", today), "2025-01-05");
/// assert_eq!(normalize_invoice_date("yesterday", today), "2025-03-01");
/// ```
pub fn normalize_invoice_date(input: &str, today: NaiveDate) -> String {
    let input = input.trim();

    if input.contains('-') {
        return input.to_string();
    }

    let parts: Vec<&str> = input.split('/').map(str::trim).collect();
    if let [day, month, year] = parts.as_slice() {
        let parsed = (day.parse::<u32>(), month.parse::<u32>(), year.parse::<i32>());
        if let (Ok(d), Ok(m), Ok(y)) = parsed {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return date.format("%Y-%m-%d").to_string();
            }
        }
    }

    today.format("%Y-%m-%d").to_string()
}

/// Formats a date the way the bill form shows it (`DD/MM/YYYY`).
pub fn form_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Client-side invoice number used when the server cannot supply one.
///
/// `INV` followed by the last six digits of the epoch milliseconds.
///
/// ```rust
/// use nethra_core::invoice::fallback_invoice_number;
///
/// assert_eq!(fallback_invoice_number(1_736_912_345_678), "INV345678");
/// assert_eq!(fallback_invoice_number(1_700_000_000_042), "INV000042");
/// ```
pub fn fallback_invoice_number(epoch_millis: i64) -> String {
    format!("{}{:06}", INVOICE_PREFIX, epoch_millis.rem_euclid(1_000_000))
}

// =============================================================================
// Unit Tests
// =============================================================================
