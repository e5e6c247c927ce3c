//! # Supplier Orders
//!
//! Purchase-order drafts and the read side of the supplier order book.
//!
//! ## New Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderDraft::new()          one blank row { name: "", quantity: 1 }     │
//! │       │                                                                 │
//! │       │ set_supplier_name / add_product / set_product_* / ...           │
//! │       ▼                                                                 │
//! │  OrderDraft::build()  ──► Err(ValidationError) ── nothing is sent       │
//! │       │                                                                 │
//! │       ▼ Ok(OrderPayload)                                                │
//! │  OrderDesk::submit  (stockline-client) ──► POST set-orders ──► refresh  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Order, OrderStatus};
use crate::validation::{
    validate_order_quantity, validate_required, validate_search_query, ValidationResult,
};

// =============================================================================
// Order Draft
// =============================================================================

/// One editable product row of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DraftProduct {
    pub name: String,
    pub quantity: i64,
}

impl Default for DraftProduct {
    fn default() -> Self {
        DraftProduct {
            name: String::new(),
            quantity: 1,
        }
    }
}

/// An in-progress purchase order.
///
/// Always holds at least one product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDraft {
    supplier_name: String,
    products: Vec<DraftProduct>,
    categories: Vec<String>,
    prices: Vec<Money>,
}

impl Default for OrderDraft {
    fn default() -> Self {
        OrderDraft {
            supplier_name: String::new(),
            products: vec![DraftProduct::default()],
            categories: Vec::new(),
            prices: Vec::new(),
        }
    }
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn products(&self) -> &[DraftProduct] {
        &self.products
    }

    pub fn set_supplier_name(&mut self, name: impl Into<String>) {
        self.supplier_name = name.into();
    }

    /// Appends a blank row and returns its index.
    pub fn add_product(&mut self) -> usize {
        self.products.push(DraftProduct::default());
        self.products.len() - 1
    }

    /// Removes a row. The last remaining row is never removed; returns
    /// whether anything was.
    pub fn remove_product(&mut self, index: usize) -> bool {
        if self.products.len() <= 1 || index >= self.products.len() {
            return false;
        }
        self.products.remove(index);
        true
    }

    pub fn set_product_name(&mut self, index: usize, name: impl Into<String>) -> ValidationResult<()> {
        self.row_mut(index)?.name = name.into();
        Ok(())
    }

    pub fn set_product_quantity(&mut self, index: usize, quantity: i64) -> ValidationResult<()> {
        self.row_mut(index)?.quantity = quantity;
        Ok(())
    }

    /// Categories passed through to the backend as-is.
    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    /// Prices passed through to the backend as-is.
    pub fn set_prices(&mut self, prices: Vec<Money>) {
        self.prices = prices;
    }

    fn row_mut(&mut self, index: usize) -> ValidationResult<&mut DraftProduct> {
        let max = self.products.len() as i64 - 1;
        self.products
            .get_mut(index)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "products".to_string(),
                min: 0,
                max,
            })
    }

    /// Validates the draft and produces the payload to submit.
    ///
    /// ## Rules
    /// - `supplier_name` non-empty after trimming
    /// - every `products[i].name` non-empty after trimming
    /// - every `products[i].quantity` > 0
    ///
    /// Rows are keyed by trimmed name. When two rows share a name, the later
    /// row's quantity replaces the earlier one.
    pub fn build(&self) -> ValidationResult<OrderPayload> {
        let supplier_name = validate_required("supplier_name", &self.supplier_name)?;

        if self.products.is_empty() {
            return Err(ValidationError::Required {
                field: "products".to_string(),
            });
        }

        let mut products = BTreeMap::new();
        for (i, row) in self.products.iter().enumerate() {
            let name = validate_required(&format!("products[{}].name", i), &row.name)?;
            validate_order_quantity(&format!("products[{}].quantity", i), row.quantity)?;

            products.insert(name, row.quantity);
        }

        Ok(OrderPayload {
            supplier_name,
            products,
            categories: self.categories.clone(),
            prices: self.prices.clone(),
        })
    }
}

/// A validated new order, ready for `POST set-orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderPayload {
    pub supplier_name: String,
    /// Product name → quantity ordered.
    pub products: BTreeMap<String, i64>,
    pub categories: Vec<String>,
    pub prices: Vec<Money>,
}

// =============================================================================
// Order Book Views
// =============================================================================

/// Orders whose id or supplier contains `search` (case-insensitive), and
/// whose status equals `status` when one is given.
pub fn filter_orders<'a>(
    orders: &'a [Order],
    search: &str,
    status: Option<OrderStatus>,
) -> ValidationResult<Vec<&'a Order>> {
    let needle = validate_search_query(search)?.to_lowercase();

    Ok(orders
        .iter()
        .filter(|o| {
            let matches_search = needle.is_empty()
                || o.order_id.to_string().contains(&needle)
                || o.supplier_name.to_lowercase().contains(&needle);
            let matches_status = status.map_or(true, |s| o.status == s);
            matches_search && matches_status
        })
        .collect())
}

/// Header figures for the orders page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders: usize,
    /// Units across every order.
    pub total_items: i64,
    pub pending: usize,
    pub delivered: usize,
}

impl OrderSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        OrderSummary {
            total_orders: orders.len(),
            total_items: orders.iter().map(Order::total_quantity).sum(),
            pending: count(OrderStatus::Pending),
            delivered: count(OrderStatus::Delivered),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
