//! # POS Engine
//!
//! The cart and checkout state machine for one register.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  add_to_cart  ┌──────────┐  checkout   ┌──────────┐          │
//! │   │ Idle │──────────────►│ Building │────────────►│ Checkout │          │
//! │   └──────┘               └──────────┘◄────────────└────┬─────┘          │
//! │      ▲                        ▲      cancel_checkout   │ commit         │
//! │      │ new_sale / cancel      │ add_to_cart            ▼                │
//! │      └────────────────────────┴─────────────────── ┌───────────┐        │
//! │                                                    │ Committed │        │
//! │                                                    └───────────┘        │
//! │                                                                         │
//! │   The cart is frozen while a checkout is pending.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart edits that the register declines come back as [`CartWarning`]
//! values. Checkout and commit fail with [`CoreError`] and leave both the
//! engine and the catalog exactly as they were.
//!
//! The clock is an argument to [`PosEngine::checkout`]; nothing in here
//! reads the system time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::catalog::CatalogStore;
use crate::error::{CartWarning, CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    CustomerInfo, InventoryItem, PaymentMethod, Receipt, ReceiptLine, SaleReport, TaxRate,
};
use crate::{MAX_CART_LINES, RECEIPT_PREFIX};

// =============================================================================
// Sale Phase
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SalePhase {
    #[default]
    Idle,
    Building,
    Checkout,
    Committed,
}

impl SalePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalePhase::Idle => "idle",
            SalePhase::Building => "building",
            SalePhase::Checkout => "checkout",
            SalePhase::Committed => "committed",
        }
    }
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cart Line & Totals
// =============================================================================

/// One product in the cart.
///
/// `item` is the snapshot taken when the line was last added to, so the
/// cashier sees the price they rang up even if the catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item: InventoryItem,
    /// Always at least 1; a line at 0 is removed.
    pub quantity: i64,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.item.price.multiply_quantity(self.quantity)
    }
}

/// Cart totals, recomputed from the lines on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of distinct lines.
    pub item_count: usize,
    /// Units across all lines.
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// POS Engine
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct PosEngine {
    lines: Vec<CartLine>,
    phase: SalePhase,
    tax_rate: TaxRate,
    /// Receipt built by `checkout`, consumed by `commit`.
    pending: Option<Receipt>,
    /// Millisecond stamp of the last receipt number handed out.
    last_receipt_ms: i64,
}

impl PosEngine {
    /// An empty engine charging the register's sales tax.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        PosEngine {
            tax_rate,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> SalePhase {
        self.phase
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// The receipt awaiting commit, if a checkout is pending.
    pub fn pending_receipt(&self) -> Option<&Receipt> {
        self.pending.as_ref()
    }

    // =========================================================================
    // Cart Editing
    // =========================================================================

    /// Adds one unit of `item`. Returns the index of the affected line.
    ///
    /// ## Stock Check
    /// ```text
    /// item.quantity == 0            → OutOfStock
    /// in_cart >= item.quantity      → NotEnoughStock
    /// otherwise                     → new line (qty 1) or qty + 1
    /// ```
    pub fn add_to_cart(&mut self, item: &InventoryItem) -> Result<usize, CartWarning> {
        self.ensure_editable()?;

        if item.quantity <= 0 {
            return Err(CartWarning::OutOfStock {
                item_id: item.id.clone(),
            });
        }

        let existing = self.lines.iter().position(|l| l.item.id == item.id);

        if let Some(idx) = existing {
            let in_cart = self.lines[idx].quantity;
            if in_cart >= item.quantity {
                return Err(CartWarning::NotEnoughStock {
                    item_id: item.id.clone(),
                    available: item.quantity,
                    in_cart,
                });
            }
        } else if self.lines.len() >= MAX_CART_LINES {
            return Err(CartWarning::CartFull {
                max: MAX_CART_LINES,
            });
        }

        if self.phase == SalePhase::Committed {
            self.reset();
        }
        self.phase = SalePhase::Building;

        match existing {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity += 1;
                line.item = item.clone();
                Ok(idx)
            }
            None => {
                self.lines.push(CartLine {
                    item: item.clone(),
                    quantity: 1,
                });
                Ok(self.lines.len() - 1)
            }
        }
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn set_line_quantity(&mut self, index: usize, quantity: i64) -> Result<(), CartWarning> {
        self.ensure_editable()?;

        if index >= self.lines.len() {
            return Err(CartWarning::LineNotFound(index));
        }

        if quantity <= 0 {
            self.lines.remove(index);
            return Ok(());
        }

        let line = &mut self.lines[index];
        if quantity > line.item.quantity {
            return Err(CartWarning::CapacityExceeded {
                item_id: line.item.id.clone(),
                available: line.item.quantity,
                requested: quantity,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    pub fn remove_line(&mut self, index: usize) -> Result<CartLine, CartWarning> {
        self.ensure_editable()?;

        if index >= self.lines.len() {
            return Err(CartWarning::LineNotFound(index));
        }
        Ok(self.lines.remove(index))
    }

    fn ensure_editable(&self) -> Result<(), CartWarning> {
        if self.phase == SalePhase::Checkout {
            return Err(CartWarning::CheckoutPending);
        }
        Ok(())
    }

    /// Subtotal, tax and total for the current lines.
    pub fn totals(&self) -> CartTotals {
        let subtotal: Money = self.lines.iter().map(CartLine::line_total).sum();
        let tax = subtotal.calculate_tax(self.tax_rate);

        CartTotals {
            item_count: self.lines.len(),
            total_quantity: self.lines.iter().map(|l| l.quantity).sum(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    // =========================================================================
    // Checkout & Commit
    // =========================================================================

    /// Freezes the cart and builds the receipt.
    pub fn checkout(
        &mut self,
        payment_method: PaymentMethod,
        customer: CustomerInfo,
        now: DateTime<Utc>,
    ) -> CoreResult<&Receipt> {
        if self.phase == SalePhase::Checkout {
            return Err(self.invalid_phase("checkout"));
        }
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let totals = self.totals();
        let receipt = Receipt {
            id: self.next_receipt_id(now),
            date: now,
            lines: self
                .lines
                .iter()
                .map(|l| ReceiptLine {
                    item_id: l.item.id.clone(),
                    name: l.item.name.clone(),
                    category: l.item.category.clone(),
                    quantity: l.quantity,
                    unit_price: l.item.price,
                    line_total: l.line_total(),
                })
                .collect(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            payment_method,
            customer: customer.normalized(),
        };

        self.phase = SalePhase::Checkout;
        Ok(&*self.pending.insert(receipt))
    }

    /// Abandons the pending checkout and returns to editing the cart.
    pub fn cancel_checkout(&mut self) -> CoreResult<()> {
        if self.phase != SalePhase::Checkout {
            return Err(self.invalid_phase("cancel checkout"));
        }
        self.pending = None;
        self.phase = SalePhase::Building;
        Ok(())
    }

    /// Deducts the sold quantities from `catalog` and closes the sale.
    ///
    /// Stock is checked against the catalog's current quantities, not the
    /// snapshots in the cart. On any shortfall nothing is written.
    pub fn commit(
        &mut self,
        catalog: &mut CatalogStore,
        sale_by: i64,
    ) -> CoreResult<(Receipt, SaleReport)> {
        if self.phase != SalePhase::Checkout {
            return Err(self.invalid_phase("commit"));
        }
        let Some(receipt) = self.pending.take() else {
            return Err(self.invalid_phase("commit"));
        };

        let sold: Vec<(String, i64)> = receipt
            .lines
            .iter()
            .map(|l| (l.item_id.clone(), l.quantity))
            .collect();
        if let Err(err) = catalog.apply_sale(&sold) {
            self.pending = Some(receipt);
            return Err(err);
        }

        let report = SaleReport::from_receipt(&receipt, sale_by);
        self.lines.clear();
        self.phase = SalePhase::Committed;

        Ok((receipt, report))
    }

    /// Clears a finished (or abandoned) cart. Not allowed mid-checkout.
    pub fn new_sale(&mut self) -> CoreResult<()> {
        if self.phase == SalePhase::Checkout {
            return Err(self.invalid_phase("start a new sale"));
        }
        self.reset();
        Ok(())
    }

    /// Discards the cart and any pending checkout.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.lines.clear();
        self.pending = None;
        self.phase = SalePhase::Idle;
    }

    fn invalid_phase(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidPhase {
            operation,
            phase: self.phase.to_string(),
        }
    }

    /// `INV-` + the last six digits of a millisecond stamp that never
    /// repeats within this engine, even if the clock stalls or steps back.
    fn next_receipt_id(&mut self, now: DateTime<Utc>) -> String {
        let stamp = now.timestamp_millis().max(self.last_receipt_ms + 1);
        self.last_receipt_ms = stamp;
        format!("{}{:06}", RECEIPT_PREFIX, stamp.rem_euclid(1_000_000))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
