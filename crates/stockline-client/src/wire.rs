//! # Wire Format
//!
//! Typed request and response bodies for the inventory backend, and the
//! checked conversions between them and the core domain types.
//!
//! ## Decode Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  body ──► serde_json::Value array ──► per-record typed struct           │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                          range checks (quantity and price within caps,  │
//! │                          parallel arrays same length, known status)     │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                          InventoryItem / Order (status re-derived)      │
//! │                                                                         │
//! │  Any failure → ClientError::Decode naming the record, e.g.              │
//! │  "inventory[3].price: must be a finite, non-negative number"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices travel as decimal dollars. They become [`Money`] here and nowhere
//! else.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use stockline_core::{
    InventoryItem, Money, Order, OrderPayload, OrderStatus, SaleReport, DEFAULT_CATEGORY,
    MAX_PRICE_CENTS, MAX_STOCK_QUANTITY,
};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ObjectId {
    #[serde(rename = "$oid")]
    pub oid: String,
}

/// One element of `GET get_inventory`.
#[derive(Debug, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub item_name: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(default)]
    pub category: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

/// `GET getAll` on the analytics service.
#[derive(Debug, Deserialize)]
pub struct CategoryKeys {
    pub keys: Vec<String>,
}

/// `GET display-orders`.
#[derive(Debug, Deserialize)]
pub struct OrdersEnvelope {
    pub orders: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct OrderRecord {
    pub order_id: i64,
    pub supplier_name: String,
    pub product_id: Vec<String>,
    pub quantity_ordered: Vec<i64>,
    #[serde(default)]
    pub price: Vec<f64>,
    #[serde(default)]
    pub order_date: Option<NaiveDateTime>,
    pub status: String,
}

/// Body of a non-success response, when the backend sends one.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Requests
// =============================================================================

/// `POST set-orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrderBody<'a> {
    pub supplier_name: &'a str,
    pub products: &'a BTreeMap<String, i64>,
    pub categories: &'a [String],
    pub price: Vec<f64>,
}

impl<'a> From<&'a OrderPayload> for CreateOrderBody<'a> {
    fn from(p: &'a OrderPayload) -> Self {
        CreateOrderBody {
            supplier_name: &p.supplier_name,
            products: &p.products,
            categories: &p.categories,
            price: p.prices.iter().map(Money::to_decimal).collect(),
        }
    }
}

/// `PATCH status-change`.
#[derive(Debug, Serialize)]
pub struct StatusChangeBody<'a> {
    pub id: i64,
    pub status: &'a str,
}

/// `POST sale_set`.
#[derive(Debug, Serialize)]
pub struct SaleBody<'a> {
    pub sale_by: i64,
    pub products: &'a BTreeMap<String, i64>,
    pub categories: &'a [String],
    pub price: Vec<f64>,
}

impl<'a> From<&'a SaleReport> for SaleBody<'a> {
    fn from(r: &'a SaleReport) -> Self {
        SaleBody {
            sale_by: r.sale_by,
            products: &r.products,
            categories: &r.categories,
            price: r.price.iter().map(Money::to_decimal).collect(),
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

fn decode_record<T: DeserializeOwned>(value: serde_json::Value, context: &str) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|e| ClientError::decode(context, e.to_string()))
}

/// Decimal dollars to cents, capped at [`MAX_PRICE_CENTS`].
pub fn price_to_money(price: f64, context: &str) -> ClientResult<Money> {
    if !price.is_finite() || price < 0.0 {
        return Err(ClientError::decode(
            context,
            "must be a finite, non-negative number",
        ));
    }
    let cents = (price * 100.0).round();
    if cents > MAX_PRICE_CENTS as f64 {
        return Err(ClientError::decode(
            context,
            format!("exceeds the maximum price of {} cents", MAX_PRICE_CENTS),
        ));
    }
    Ok(Money::from_cents(cents as i64))
}

fn check_quantity(qty: i64, context: String) -> ClientResult<()> {
    if qty < 0 {
        return Err(ClientError::decode(context, "must not be negative"));
    }
    if qty > MAX_STOCK_QUANTITY {
        return Err(ClientError::decode(
            context,
            format!("exceeds the maximum quantity of {}", MAX_STOCK_QUANTITY),
        ));
    }
    Ok(())
}

/// Decodes the `get_inventory` body.
pub fn decode_inventory(body: &[u8]) -> ClientResult<Vec<InventoryItem>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_slice(body).map_err(|e| ClientError::decode("inventory", e.to_string()))?;

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let context = format!("inventory[{}]", i);
            let record: InventoryRecord = decode_record(value, &context)?;
            record.into_item(&context)
        })
        .collect()
}

impl InventoryRecord {
    pub fn into_item(self, context: &str) -> ClientResult<InventoryItem> {
        check_quantity(self.quantity, format!("{}.quantity", context))?;
        let price = price_to_money(self.price, &format!("{}.price", context))?;

        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(InventoryItem::new(
            self.id.oid,
            self.item_name,
            category,
            self.sku,
            self.quantity,
            price,
        ))
    }
}

/// Decodes the analytics `getAll` body into a sorted, de-duplicated list.
pub fn decode_categories(body: &[u8]) -> ClientResult<Vec<String>> {
    let keys: CategoryKeys =
        serde_json::from_slice(body).map_err(|e| ClientError::decode("categories", e.to_string()))?;

    let mut keys = keys.keys;
    keys.sort();
    keys.dedup();
    Ok(keys)
}

/// Decodes the `display-orders` body.
pub fn decode_orders(body: &[u8]) -> ClientResult<Vec<Order>> {
    let envelope: OrdersEnvelope =
        serde_json::from_slice(body).map_err(|e| ClientError::decode("orders", e.to_string()))?;

    envelope
        .orders
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let context = format!("orders[{}]", i);
            let record: OrderRecord = decode_record(value, &context)?;
            record.into_order(&context)
        })
        .collect()
}

impl OrderRecord {
    pub fn into_order(self, context: &str) -> ClientResult<Order> {
        if self.product_id.len() != self.quantity_ordered.len() {
            return Err(ClientError::decode(
                context,
                format!(
                    "{} products but {} quantities",
                    self.product_id.len(),
                    self.quantity_ordered.len()
                ),
            ));
        }
        // Orders created without prices carry an empty array.
        if !self.price.is_empty() && self.price.len() != self.product_id.len() {
            return Err(ClientError::decode(
                format!("{}.price", context),
                format!(
                    "{} prices for {} products",
                    self.price.len(),
                    self.product_id.len()
                ),
            ));
        }
        for (i, qty) in self.quantity_ordered.iter().enumerate() {
            check_quantity(*qty, format!("{}.quantity_ordered[{}]", context, i))?;
        }

        let prices = self
            .price
            .iter()
            .enumerate()
            .map(|(i, p)| price_to_money(*p, &format!("{}.price[{}]", context, i)))
            .collect::<ClientResult<Vec<_>>>()?;

        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|e: stockline_core::ValidationError| {
                ClientError::decode(format!("{}.status", context), e.to_string())
            })?;

        Ok(Order {
            order_id: self.order_id,
            supplier_name: self.supplier_name,
            product_ids: self.product_id,
            quantities: self.quantity_ordered,
            prices,
            order_date: self.order_date,
            status,
        })
    }
}

/// The server's `message`, or `fallback` when the body has none.
pub fn error_message(body: &[u8], fallback: &str) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
