//! # Domain Types
//!
//! Core domain types used throughout Stockline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryItem  │   │     Receipt     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, sku        │   │  id (INV-…)     │   │  order_id       │       │
//! │  │  quantity       │   │  lines          │   │  supplier_name  │       │
//! │  │  price (Money)  │   │  subtotal/tax   │   │  product_ids    │       │
//! │  │  status ◄─derived│  │  total          │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   StockStatus   │   │  PaymentMethod  │   │   OrderStatus   │       │
//! │  │  InStock        │   │  Cash           │   │  Pending        │       │
//! │  │  LowStock       │   │  Card           │   │  Processing     │       │
//! │  │  OutOfStock     │   └─────────────────┘   │  Shipped        │       │
//! │  └─────────────────┘                         │  Delivered      │       │
//! │                                              │  Cancelled      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The register's sales tax.
    #[inline]
    pub const fn sales() -> Self {
        TaxRate(crate::SALES_TAX_BPS)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::sales()
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Stock level label shown next to every item.
///
/// Always derived from the quantity; see [`crate::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StockStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in stock" | "in_stock" => Ok(StockStatus::InStock),
            "low stock" | "low_stock" => Ok(StockStatus::LowStock),
            "out of stock" | "out_of_stock" => Ok(StockStatus::OutOfStock),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown stock status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A product in the catalog.
///
/// `status` is kept consistent with `quantity` by the catalog store; build
/// items through [`InventoryItem::new`] or [`InventoryItem::with_quantity`]
/// rather than by struct literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub sku: String,
    /// Units on hand, never negative.
    pub quantity: i64,
    /// Unit price in cents.
    pub price: Money,
    pub status: StockStatus,
    pub description: String,
    pub image: Option<String>,
}

impl InventoryItem {
    /// Creates an item with its status derived from `quantity`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        sku: impl Into<String>,
        quantity: i64,
        price: Money,
    ) -> Self {
        InventoryItem {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            sku: sku.into(),
            quantity,
            price,
            status: crate::status::derive_status(quantity),
            description: String::new(),
            image: None,
        }
    }

    /// Copy of this item with a new quantity and re-derived status.
    pub fn with_quantity(&self, quantity: i64) -> Self {
        InventoryItem {
            quantity,
            status: crate::status::derive_status(quantity),
            ..self.clone()
        }
    }

    /// Quantity × unit price.
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    #[default]
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Optional customer contact captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerInfo {
    /// Drops blank fields so an untouched form yields `None`s.
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        CustomerInfo {
            name: keep(self.name),
            email: keep(self.email),
            phone: keep(self.phone),
        }
    }
}

/// A line on a receipt. Snapshot of the item at the moment of checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Immutable record of a completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// `INV-` followed by six digits.
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub customer: CustomerInfo,
}

impl Receipt {
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Sale Report
// =============================================================================

/// Summary of a committed sale for the sales-recording endpoint.
///
/// `products` is keyed by item CATEGORY, not by product name: the sales
/// analytics backend aggregates per category and reads this key as such.
/// Lines that share a category are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleReport {
    pub sale_by: i64,
    pub products: BTreeMap<String, i64>,
    pub categories: Vec<String>,
    /// Line totals, in receipt order.
    pub price: Vec<Money>,
}

impl SaleReport {
    pub fn from_receipt(receipt: &Receipt, sale_by: i64) -> Self {
        let mut products: BTreeMap<String, i64> = BTreeMap::new();
        let mut categories = Vec::new();

        for line in receipt.lines.iter().filter(|l| l.quantity > 0) {
            *products.entry(line.category.clone()).or_insert(0) += line.quantity;
            if !categories.contains(&line.category) {
                categories.push(line.category.clone());
            }
        }

        SaleReport {
            sale_by,
            products,
            categories,
            price: receipt.lines.iter().map(|l| l.line_total).collect(),
        }
    }
}

// =============================================================================
// Supplier Orders
// =============================================================================

/// Lifecycle of a purchase order placed with a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown order status '{}'", other),
            }),
        }
    }
}

/// A purchase order as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub supplier_name: String,
    /// Product names, parallel to `quantities`.
    pub product_ids: Vec<String>,
    pub quantities: Vec<i64>,
    pub prices: Vec<Money>,
    #[ts(as = "Option<String>")]
    pub order_date: Option<NaiveDateTime>,
    pub status: OrderStatus,
}

impl Order {
    /// Total units across all products.
    pub fn total_quantity(&self) -> i64 {
        self.quantities.iter().sum()
    }

    /// `(product, quantity)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (&str, i64)> {
        self.product_ids
            .iter()
            .map(String::as_str)
            .zip(self.quantities.iter().copied())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
