//! # Stock Status Rule
//!
//! Maps a quantity to the label shown next to every item.
//!
//! ```text
//!   quantity:   0      1 ........ 9     10 ..........
//!   status:    OUT    └── LOW ────┘     └── IN ──────
//! ```
//!
//! The same rule is applied when decoding backend records, when items are
//! written to the catalog and when a sale is committed. There is no second
//! threshold anywhere in the workspace.

use crate::error::ValidationError;
use crate::types::StockStatus;
use crate::LOW_STOCK_THRESHOLD;

/// Derives the stock status for a quantity that is known to be valid.
///
/// Negative quantities are clamped to `OutOfStock`; use
/// [`try_derive_status`] on unchecked input.
///
/// ```rust
/// use stockline_core::{derive_status, StockStatus};
///
/// assert_eq!(derive_status(0), StockStatus::OutOfStock);
/// assert_eq!(derive_status(9), StockStatus::LowStock);
/// assert_eq!(derive_status(10), StockStatus::InStock);
/// ```
pub fn derive_status(quantity: i64) -> StockStatus {
    if quantity <= 0 {
        StockStatus::OutOfStock
    } else if quantity < LOW_STOCK_THRESHOLD {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Derives the stock status, rejecting negative quantities.
pub fn try_derive_status(quantity: i64) -> Result<StockStatus, ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }
    Ok(derive_status(quantity))
}
