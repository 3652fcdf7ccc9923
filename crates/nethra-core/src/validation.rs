//! # Validation Module
//!
//! Input validation for bills and catalog products.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Draft mutations (draft.rs)                                   │
//! │  ├── quantity >= 1, price >= 0                                         │
//! │  └── at least one line kept                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submission checks (THIS MODULE)                              │
//! │  ├── buyer name / phone                                                │
//! │  ├── every line has a product, a price                                 │
//! │  └── ALL failures collected into one ValidationErrors                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Billing backend                                              │
//! │  └── whatever the server enforces (outside this repo)                  │
//! │                                                                         │
//! │  Nothing reaches the network until Layer 2 passes.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nethra_core::validation::{validate_phone, validate_quantity};
//!
//! assert!(validate_phone("9876543210").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::draft::BillDraft;
use crate::error::{ValidationError, ValidationErrors};
use crate::money::Money;
use crate::types::NewProduct;
use crate::PHONE_DIGITS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Requires a non-blank value.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a mobile number: exactly ten ASCII digits.
///
/// ## Example
/// ```rust
/// use nethra_core::validation::validate_phone;
///
/// assert!(validate_phone("9876543210").is_ok());
/// assert!(validate_phone(" 9876543210 ").is_ok());
/// assert!(validate_phone("98765").is_err());
/// assert!(validate_phone("98765 43210").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.len() != PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "Phone".to_string(),
            reason: format!("must be exactly {} digits", PHONE_DIGITS),
        });
    }

    Ok(())
}

/// Validates a quantity typed by the user.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "Quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a catalog price: must be greater than zero.
pub fn validate_product_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "Price".to_string(),
        });
    }
    Ok(())
}

/// Trims a search query. Empty is allowed and matches everything.
pub fn validate_search_query(query: &str) -> String {
    query.trim().to_string()
}

// =============================================================================
// Form Validators
// =============================================================================

/// Checks the "add product" / "update product" form.
///
/// ## Rules
/// - Tamil name and English name required
/// - Price > 0
/// - Weight may be blank (defaults to `500g` on normalisation)
pub fn validate_new_product(product: &NewProduct) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validate_required("Name", &product.name));
    errors.check(validate_required("English name", &product.name_english));
    errors.check(validate_product_price(product.price));
    errors.into_result()
}

/// Checks a new bill before it is sent.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Create Bill: Submit                                                    │
/// │                                                                         │
/// │  validate_new_bill(&draft) ← THIS FUNCTION                             │
/// │       │                                                                 │
/// │       ├── buyer name blank?         → "Buyer name is required"          │
/// │       ├── phone given, not 10 digits → "Phone has invalid format"       │
/// │       ├── no line has a product?    → "Add at least one item"           │
/// │       ├── some line has no product? → "Select a product ... item 2"     │
/// │       ├── total == 0?               → "Bill total must be > 0"          │
/// │       │                                                                 │
/// │       └── OK → POST /api/bills/create                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_new_bill(draft: &BillDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_required("Buyer name", &draft.buyer.name));
    if !draft.buyer.phone.trim().is_empty() {
        errors.check(validate_phone(&draft.buyer.phone));
    }

    if check_lines(draft, &mut errors) && !draft.total().is_positive() {
        errors.push(ValidationError::MustBePositive {
            field: "Bill total".to_string(),
        });
    }

    errors.into_result()
}

/// Checks an edited bill before it is saved.
///
/// ## Rules
/// - Buyer name required
/// - Phone required, exactly 10 digits
/// - Every line has a product and a non-zero price
pub fn validate_bill_update(draft: &BillDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_required("Buyer name", &draft.buyer.name));
    if draft.buyer.phone.trim().is_empty() {
        errors.push(ValidationError::Required {
            field: "Phone".to_string(),
        });
    } else {
        errors.check(validate_phone(&draft.buyer.phone));
    }

    check_lines(draft, &mut errors);

    let unpriced: Vec<usize> = draft
        .lines()
        .iter()
        .enumerate()
        .filter(|(_, l)| l.unit_price().is_zero())
        .map(|(i, _)| i + 1)
        .collect();
    if !unpriced.is_empty() {
        errors.push(ValidationError::MissingPrice { lines: unpriced });
    }

    errors.into_result()
}

/// Records product-selection problems. Returns true when at least one line
/// has a product.
fn check_lines(draft: &BillDraft, errors: &mut ValidationErrors) -> bool {
    let lines = draft.lines();

    if lines.iter().all(|l| l.is_blank()) {
        errors.push(ValidationError::NoItems);
        return false;
    }

    let incomplete: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.is_blank() || l.quantity() < 1)
        .map(|(i, _)| i + 1)
        .collect();
    if !incomplete.is_empty() {
        errors.push(ValidationError::IncompleteLines { lines: incomplete });
    }

    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductId};

    fn product(id: i64, rupees: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: "முறுக்கு".into(),
            name_english: "Murukku".into(),
            weight: "500g".into(),
            price: Money::from_rupees(rupees),
        }
    }

    fn valid_draft() -> BillDraft {
        let mut draft = BillDraft::new("INV-1", "15/01/2025");
        draft.buyer.name = "Ravi".into();
        draft.add_product(&product(1, 50), 2).unwrap();
        draft
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("987654321").is_err());
        assert!(validate_phone("98765432101").is_err());
        assert!(validate_phone("98765abcde").is_err());
        assert!(validate_phone("+919876543").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(250).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_new_bill_valid() {
        assert!(validate_new_bill(&valid_draft()).is_ok());
    }

    #[test]
    fn test_new_bill_without_selected_product_is_rejected() {
        let mut draft = BillDraft::new("INV-1", "");
        draft.buyer.name = "Ravi".into();

        let errors = validate_new_bill(&draft).unwrap_err();
        assert_eq!(errors.errors(), &[ValidationError::NoItems]);
    }

    #[test]
    fn test_new_bill_collects_every_failure() {
        let mut draft = valid_draft();
        draft.buyer.name = "  ".into();
        draft.buyer.phone = "12345".into();
        draft.add_line();

        let errors = validate_new_bill(&draft).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .errors()
            .contains(&ValidationError::IncompleteLines { lines: vec![2] }));
        assert!(errors.to_string().starts_with("Buyer name is required; "));
    }

    #[test]
    fn test_new_bill_zero_total_rejected() {
        let mut draft = BillDraft::new("INV-1", "");
        draft.buyer.name = "Ravi".into();
        draft.add_product(&product(1, 0), 1).unwrap();

        let errors = validate_new_bill(&draft).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ValidationError::MustBePositive {
                field: "Bill total".into()
            }]
        );
    }

    #[test]
    fn test_new_bill_phone_optional() {
        let mut draft = valid_draft();
        draft.buyer.phone = "".into();
        assert!(validate_new_bill(&draft).is_ok());
    }

    #[test]
    fn test_bill_update_requires_phone_and_prices() {
        let mut draft = valid_draft();
        assert!(validate_bill_update(&draft).is_err());

        draft.buyer.phone = "9876543210".into();
        assert!(validate_bill_update(&draft).is_ok());

        let id = draft.line_id_at(0).unwrap();
        draft.set_unit_price(id, Money::zero()).unwrap();
        let errors = validate_bill_update(&draft).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ValidationError::MissingPrice { lines: vec![1] }]
        );
    }

    #[test]
    fn test_new_product_form() {
        let ok = NewProduct {
            name: "லட்டு".into(),
            name_english: "Laddu".into(),
            weight: "".into(),
            price: Money::from_rupees(120),
        };
        assert!(validate_new_product(&ok).is_ok());

        let bad = NewProduct {
            name: "".into(),
            name_english: " ".into(),
            weight: "".into(),
            price: Money::zero(),
        };
        assert_eq!(validate_new_product(&bad).unwrap_err().len(), 3);
    }
}
