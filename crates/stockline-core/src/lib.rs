//! # stockline-core: Pure Business Logic for Stockline
//!
//! This crate holds the rules of the inventory / point-of-sale console as
//! pure functions and plain owned state. It performs no I/O; the REST
//! boundary lives in `stockline-client`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockline Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Browser Console (TypeScript)                    │   │
//! │  │   Inventory ──► POS Cart ──► Checkout ──► Receipt ──► Orders    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ts-rs bindings                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockline-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │ status  │ │ catalog │ │  cart   │ │  order  │ │  money  │  │   │
//! │  │   │ deriver │ │  store  │ │ engine  │ │  draft  │ │ TaxRate │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • CLOCK PASSED IN                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockline-client (REST boundary)                   │   │
//! │  │        typed decode, HttpBackend, PosSession, OrderDesk         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, Receipt, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`status`] - Quantity → stock status rule
//! - [`catalog`] - In-memory catalog store
//! - [`cart`] - Point-of-sale cart engine
//! - [`order`] - Purchase-order drafts and the supplier order book
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockline_core::money::Money;
//! use stockline_core::types::TaxRate;
//!
//! let subtotal = Money::from_cents(3000); // $30.00
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(800)); // 8%
//! assert_eq!(tax.cents(), 240);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLine, CartTotals, PosEngine, SalePhase};
pub use catalog::{CatalogFilter, CatalogStore, CatalogSummary, NewItem};
pub use error::{CartWarning, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{filter_orders, DraftProduct, OrderDraft, OrderPayload, OrderSummary};
pub use status::derive_status;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied at the register, in basis points (800 = 8%).
pub const SALES_TAX_BPS: u32 = 800;

/// Quantities strictly below this (and above zero) are "Low Stock".
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Category assigned to backend records that carry none.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Prefix of generated receipt numbers (`INV-123456`).
pub const RECEIPT_PREFIX: &str = "INV-";

/// Maximum distinct lines in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Largest stock level a single item may carry.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price accepted, in cents ($1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
