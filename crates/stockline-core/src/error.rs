//! # Error Types
//!
//! Domain-specific error types for stockline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockline-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations (abort, no mutation)  │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── CartWarning      - User-facing cart notices (not exceptional)     │
//! │                                                                         │
//! │  stockline-client errors (separate crate)                              │
//! │  └── ClientError      - Network, server and decode failures            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → user message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant leaves the state it was raised from untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Committing the sale would drive stock below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (cart: 5 × COKE)
    ///      │
    ///      ▼
    /// Commit: catalog now has 3 (another register sold 2)
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "COKE", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 COKE in stock", catalog unchanged
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The sale is not in a phase that allows the operation.
    #[error("Cannot {operation} while sale is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` names the offending input, including its row for list inputs
/// (`products[2].name`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same product twice in one order).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
}

// =============================================================================
// Cart Warning
// =============================================================================

/// A cart action the register declined.
///
/// These are shown to the cashier and the cart stays as it was. They are
/// returned as values, never raised as panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartWarning {
    #[error("This item is out of stock")]
    OutOfStock { item_id: String },

    #[error("Cannot add more of this item - not enough in stock")]
    NotEnoughStock {
        item_id: String,
        available: i64,
        in_cart: i64,
    },

    /// `set_line_quantity` asked for more than is available.
    #[error("Cannot add more of this item - not enough in stock")]
    CapacityExceeded {
        item_id: String,
        available: i64,
        requested: i64,
    },

    /// The item id is not in the catalog (deleted since the grid loaded).
    #[error("This item is no longer in the catalog")]
    UnknownItem(String),

    #[error("Cart line {0} does not exist")]
    LineNotFound(usize),

    #[error("Cart cannot have more than {max} items")]
    CartFull { max: usize },

    /// The cart is frozen while a checkout is pending.
    #[error("Finish or cancel the current checkout first")]
    CheckoutPending,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
