//! # Error Types
//!
//! Domain-specific error types for nethra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nethra-core errors (this file)                                        │
//! │  ├── CoreError         - Bill draft manipulation errors                │
//! │  ├── ValidationError   - One failed field/rule                         │
//! │  └── ValidationErrors  - Every failure for one submission              │
//! │                                                                         │
//! │  nethra-api errors (separate crate)                                    │
//! │  └── ClientError       - HTTP / file / launcher failures               │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CommandError      - What the user sees (one message)              │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationErrors → ClientError → CommandError │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use thiserror::Error;

use crate::draft::LineId;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while editing a [`BillDraft`](crate::draft::BillDraft).
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line with this id exists in the draft.
    #[error("Bill line not found: {0}")]
    LineNotFound(LineId),

    /// Attempted to remove the only remaining line.
    ///
    /// ## When This Occurs
    /// ```text
    /// Draft lines: [ Murukku × 2 ]
    ///      │
    ///      ▼
    /// remove_line(murukku)
    ///      │
    ///      ▼
    /// LastLine → "Bill must have at least one item"
    /// ```
    #[error("Bill must have at least one item")]
    LastLine,

    /// Quantity below one was entered.
    #[error("Quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),

    /// A negative unit price was entered.
    #[error("Price cannot be negative (got {0})")]
    NegativePrice(crate::money::Money),

    /// Quantity above the per-line cap.
    #[error("Quantity cannot exceed {max} (got {0})", max = crate::draft::MAX_QUANTITY)]
    QuantityTooLarge(i64),

    /// Unit price above the per-line cap.
    #[error("Price cannot exceed {max} (got {0})", max = crate::draft::MAX_UNIT_PRICE)]
    PriceTooLarge(crate::money::Money),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Invalid format (e.g., phone number, amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Lines without a selected product or with a quantity below one.
    ///
    /// Line numbers are 1-based, as the user sees them.
    #[error("Select a product and enter a valid quantity for item {}", join_lines(.lines))]
    IncompleteLines { lines: Vec<usize> },

    /// Lines with a zero unit price.
    #[error("All items must have a price (item {})", join_lines(.lines))]
    MissingPrice { lines: Vec<usize> },

    /// The bill has no line with a selected product.
    #[error("Add at least one item to the bill")]
    NoItems,
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Aggregated Validation Errors
// =============================================================================

/// Every validation failure for a single submission.
///
/// Displays as one message, so a form can show a single toast:
///
/// ```rust
/// use nethra_core::error::{ValidationError, ValidationErrors};
///
/// let mut errors = ValidationErrors::new();
/// errors.push(ValidationError::Required { field: "Buyer name".into() });
/// errors.push(ValidationError::NoItems);
/// assert_eq!(
///     errors.to_string(),
///     "Buyer name is required; Add at least one item to the bill"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Records the error side of a single-field check.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.0.push(e);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        ValidationErrors(vec![e])
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Buyer name".to_string(),
        };
        assert_eq!(err.to_string(), "Buyer name is required");

        let err = ValidationError::IncompleteLines { lines: vec![1, 3] };
        assert_eq!(
            err.to_string(),
            "Select a product and enter a valid quantity for item 1, 3"
        );

        let err = ValidationError::MissingPrice { lines: vec![2] };
        assert_eq!(err.to_string(), "All items must have a price (item 2)");
    }

    #[test]
    fn test_core_error_messages() {
        assert_eq!(
            CoreError::LastLine.to_string(),
            "Bill must have at least one item"
        );
        assert_eq!(
            CoreError::InvalidQuantity(0).to_string(),
            "Quantity must be at least 1 (got 0)"
        );
    }

    #[test]
    fn test_aggregate_into_result() {
        let errors = ValidationErrors::new();
        assert!(errors.into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.check(Ok(()));
        errors.check(Err(ValidationError::NoItems));
        assert_eq!(errors.len(), 1);
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Add at least one item to the bill");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
