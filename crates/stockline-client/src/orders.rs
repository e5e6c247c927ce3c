//! # Order Desk
//!
//! The supplier-orders page: the current order list, new orders and
//! status changes.

use std::sync::Arc;
use tracing::{info, warn};

use stockline_core::{filter_orders, Order, OrderDraft, OrderStatus, OrderSummary};

use crate::backend::Backend;
use crate::error::ClientResult;

pub struct OrderDesk<B: ?Sized> {
    backend: Arc<B>,
    orders: Vec<Order>,
}

impl<B: Backend + ?Sized> OrderDesk<B> {
    pub fn new(backend: Arc<B>) -> Self {
        OrderDesk {
            backend,
            orders: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.orders = self.backend.fetch_orders().await?;
        info!(orders = self.orders.len(), "Orders loaded");
        Ok(())
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Orders matching the search box and status dropdown.
    pub fn filtered(&self, search: &str, status: Option<OrderStatus>) -> ClientResult<Vec<&Order>> {
        Ok(filter_orders(&self.orders, search, status)?)
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_orders(&self.orders)
    }

    /// Validates and submits a new order, then reloads the list.
    ///
    /// An invalid draft is rejected before anything is sent. A failed
    /// reload after a successful submit is logged, not returned: the order
    /// exists either way.
    pub async fn submit(&mut self, draft: &OrderDraft) -> ClientResult<()> {
        let payload = draft.build()?;

        self.backend.create_order(&payload).await?;
        info!(
            supplier = %payload.supplier_name,
            products = payload.products.len(),
            "Order created"
        );

        if let Err(e) = self.load().await {
            warn!(error = %e, "Order created but the order list could not be refreshed");
        }
        Ok(())
    }

    /// Changes an order's status on the backend, then locally.
    pub async fn change_status(&mut self, order_id: i64, status: OrderStatus) -> ClientResult<()> {
        self.backend.change_order_status(order_id, status).await?;

        match self.orders.iter_mut().find(|o| o.order_id == order_id) {
            Some(order) => order.status = status,
            None => warn!(order_id, "Status changed for an order not in the local list"),
        }
        info!(order_id, status = %status, "Order status changed");
        Ok(())
    }
}
