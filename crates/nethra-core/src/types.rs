//! # Domain Types
//!
//! Records exchanged with the billing backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Bill       │   │     Buyer       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  name           │       │
//! │  │  name (Tamil)   │   │  invoice_number │   │  phone          │       │
//! │  │  name_english   │   │  invoice_date   │   │  address        │       │
//! │  │  weight         │   │  buyer ─────────┼──►└─────────────────┘       │
//! │  │  price          │   │  items ─────────┼──►┌─────────────────┐       │
//! │  └─────────────────┘   │  subtotal/total │   │    BillLine     │       │
//! │                        └─────────────────┘   │  item_id, qty   │       │
//! │                                              │  price, amount  │       │
//! │                                              └─────────────────┘       │
//! │                                                                         │
//! │  Request bodies: NewProduct, CreateBillRequest, UpdateBillRequest      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All records are owned by the backend. The client only holds transient
//! copies, so every type here is a plain serde struct matching the JSON the
//! server speaks.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::money::Money;
use crate::DEFAULT_PRODUCT_WEIGHT;

// =============================================================================
// Identifiers
// =============================================================================

/// Server-assigned numeric identifier.
///
/// The backend sends ids as JSON numbers, but some endpoints echo them back
/// as strings (`"12"`). Both are accepted; they always serialize as numbers.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            #[inline]
            pub const fn new(id: i64) -> Self {
                $name(id)
            }

            #[inline]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(NumericIdVisitor).map($name)
            }
        }
    };
}

struct NumericIdVisitor;

impl<'de> Visitor<'de> for NumericIdVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric id (number or numeric string)")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom("id out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.fract() == 0.0 && v.is_finite() {
            Ok(v as i64)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.trim()
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

numeric_id!(
    /// Identifier of a catalog product (`item_id` on bill lines).
    ProductId
);

numeric_id!(
    /// Identifier of a stored bill.
    BillId
);

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog ("item master").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Localized (Tamil) display name.
    pub name: String,

    /// English name, used for search and on PDFs.
    pub name_english: String,

    /// Pack descriptor such as `500g` or `1kg`.
    #[serde(default)]
    pub weight: String,

    /// Unit price.
    pub price: Money,
}

/// Body for adding or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub name_english: String,
    pub weight: String,
    pub price: Money,
}

impl NewProduct {
    /// Trims every text field and fills in the default weight.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.name_english = self.name_english.trim().to_string();
        self.weight = self.weight.trim().to_string();
        if self.weight.is_empty() {
            self.weight = DEFAULT_PRODUCT_WEIGHT.to_string();
        }
        self
    }
}

impl From<&Product> for NewProduct {
    fn from(p: &Product) -> Self {
        NewProduct {
            name: p.name.clone(),
            name_english: p.name_english.clone(),
            weight: p.weight.clone(),
            price: p.price,
        }
    }
}

// =============================================================================
// Buyer
// =============================================================================

/// The customer a bill is made out to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    #[serde(rename = "buyer_name", default)]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Buyer as sent when creating a bill: blank phone/address are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyerPayload {
    pub buyer_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl From<&Buyer> for BuyerPayload {
    fn from(b: &Buyer) -> Self {
        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        BuyerPayload {
            buyer_name: b.name.trim().to_string(),
            phone: non_blank(&b.phone),
            address: non_blank(&b.address),
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// One line of a stored bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    pub item_id: ProductId,
    pub qty: u32,
    pub price: Money,
    pub amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_english: Option<String>,
}

impl BillLine {
    /// Best available name for display.
    pub fn display_name(&self) -> String {
        match (&self.name_english, &self.item_name) {
            (Some(en), _) if !en.is_empty() => en.clone(),
            (_, Some(name)) if !name.is_empty() => name.clone(),
            _ => format!("Item #{}", self.item_id),
        }
    }
}

/// A bill as returned by `GET /api/bills/all`.
///
/// Also the body of the PDF generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub invoice_number: String,
    pub invoice_date: String,
    pub subtotal: Money,
    pub total: Money,

    #[serde(default)]
    pub buyer: Buyer,

    #[serde(default)]
    pub items: Vec<BillLine>,
}

impl Bill {
    /// Invoice date without any time-of-day suffix the database may add.
    ///
    /// `"2025-01-15T00:00:00.000Z"` → `"2025-01-15"`
    pub fn date_only(&self) -> &str {
        self.invoice_date
            .split_once('T')
            .map(|(d, _)| d)
            .unwrap_or(&self.invoice_date)
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |units, l| units.saturating_add(l.qty))
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// One line of a create-bill request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateBillItem {
    pub item_id: ProductId,
    pub qty: u32,
    pub price: Money,
    pub amount: Money,
}

/// Body of `POST /api/bills/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateBillRequest {
    pub invoice_number: String,
    pub buyer: BuyerPayload,

    /// Always `YYYY-MM-DD`.
    pub invoice_date: String,
    pub subtotal: Money,
    pub total: Money,
    pub bill_items: Vec<CreateBillItem>,
}

/// Body of `PATCH /api/bills/update/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateBillRequest {
    pub id: BillId,
    pub invoice_number: String,
    pub invoice_date: String,
    pub subtotal: Money,
    pub total: Money,
    pub buyer: Buyer,
    pub items: Vec<BillLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
