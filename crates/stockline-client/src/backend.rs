//! # Backend Seam
//!
//! The operations the console needs from the inventory backend, as a
//! trait. [`crate::http::HttpBackend`] speaks REST; tests plug in an
//! in-memory implementation.

use async_trait::async_trait;

use stockline_core::{InventoryItem, Order, OrderPayload, OrderStatus, SaleReport};

use crate::error::ClientResult;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Every catalog item, status already derived.
    async fn fetch_inventory(&self) -> ClientResult<Vec<InventoryItem>>;

    /// Distinct category names known to the analytics service.
    async fn fetch_categories(&self) -> ClientResult<Vec<String>>;

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>>;

    async fn create_order(&self, payload: &OrderPayload) -> ClientResult<()>;

    async fn change_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()>;

    /// Records a committed sale for analytics.
    async fn record_sale(&self, report: &SaleReport) -> ClientResult<()>;
}
