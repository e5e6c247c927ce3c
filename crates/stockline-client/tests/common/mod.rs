//! In-memory `Backend` for the session and order desk tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use stockline_client::{Backend, ClientError, ClientResult};
use stockline_core::{InventoryItem, Money, Order, OrderPayload, OrderStatus, SaleReport};

#[derive(Default)]
pub struct FakeBackend {
    pub inventory: Mutex<Vec<InventoryItem>>,
    pub categories: Mutex<Option<Vec<String>>>,
    pub orders: Mutex<Vec<Order>>,
    pub created: Mutex<Vec<OrderPayload>>,
    pub status_changes: Mutex<Vec<(i64, OrderStatus)>>,
    pub sales: Mutex<Vec<SaleReport>>,
    /// Message returned by `create_order` / `record_sale` when set.
    pub fail_with: Mutex<Option<String>>,
    pub order_fetches: Mutex<usize>,
}

impl FakeBackend {
    pub fn with_inventory(items: Vec<InventoryItem>) -> Self {
        FakeBackend {
            inventory: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn fail_writes(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    fn scripted_failure(&self) -> ClientResult<()> {
        match self.fail_with.lock().unwrap().clone() {
            Some(message) => Err(ClientError::Server {
                status: 500,
                message,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_inventory(&self) -> ClientResult<Vec<InventoryItem>> {
        Ok(self.inventory.lock().unwrap().clone())
    }

    async fn fetch_categories(&self) -> ClientResult<Vec<String>> {
        self.categories
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::Server {
                status: 503,
                message: "analytics offline".to_string(),
            })
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        *self.order_fetches.lock().unwrap() += 1;
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn create_order(&self, payload: &OrderPayload) -> ClientResult<()> {
        self.scripted_failure()?;
        self.created.lock().unwrap().push(payload.clone());

        let mut orders = self.orders.lock().unwrap();
        let order_id = orders.len() as i64 + 1;
        orders.push(Order {
            order_id,
            supplier_name: payload.supplier_name.clone(),
            product_ids: payload.products.keys().cloned().collect(),
            quantities: payload.products.values().copied().collect(),
            prices: vec![],
            order_date: None,
            status: OrderStatus::Pending,
        });
        Ok(())
    }

    async fn change_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()> {
        self.status_changes.lock().unwrap().push((order_id, status));
        Ok(())
    }

    async fn record_sale(&self, report: &SaleReport) -> ClientResult<()> {
        self.scripted_failure()?;
        self.sales.lock().unwrap().push(report.clone());
        Ok(())
    }
}

pub fn item(id: &str, name: &str, category: &str, qty: i64, price_cents: i64) -> InventoryItem {
    InventoryItem::new(
        id,
        name,
        category,
        format!("SKU-{}", id),
        qty,
        Money::from_cents(price_cents),
    )
}
