//! # HTTP Backend
//!
//! [`Backend`] over the inventory REST API using `reqwest`.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  api base (default http://127.0.0.1:8080/api/)                          │
//! │    GET   get_inventory     → [InventoryRecord]                          │
//! │    GET   display-orders    → { orders: [OrderRecord] }                  │
//! │    POST  set-orders        ← CreateOrderBody                            │
//! │    PATCH status-change     ← { id, status }                             │
//! │    POST  sale_set          ← SaleBody                                   │
//! │                                                                         │
//! │  analytics base (default http://127.0.0.1:8000/)                        │
//! │    GET   getAll            → { keys: [string] }                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No request is retried. A failed call is reported once to the caller.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use stockline_core::{InventoryItem, Order, OrderPayload, OrderStatus, SaleReport};

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, CREATE_ORDER_FALLBACK};
use crate::wire::{self, CreateOrderBody, SaleBody, StatusChangeBody};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_base: Url,
    analytics_base: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(HttpBackend {
            client,
            api_base: config.api_base()?,
            analytics_base: config.analytics_base()?,
        })
    }

    fn endpoint(base: &Url, path: &str) -> ClientResult<Url> {
        base.join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}{}: {}", base, path, e)))
    }

    /// Sends the request and returns the body of a 2xx response. Anything
    /// else becomes `ClientError::Server` with the backend's `message`, or
    /// `fallback` when there is none.
    async fn send(&self, request: RequestBuilder, fallback: &str) -> ClientResult<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = wire::error_message(&body, fallback);
            warn!(status = status.as_u16(), message = %message, "Backend request failed");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }

    async fn get(&self, base: &Url, path: &str) -> ClientResult<Vec<u8>> {
        let url = Self::endpoint(base, path)?;
        debug!(%url, "GET");
        self.send(self.client.get(url), "Request failed").await
    }

    async fn send_json<T: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &T,
        fallback: &str,
    ) -> ClientResult<()> {
        let url = Self::endpoint(&self.api_base, path)?;
        debug!(%url, %method, "Sending");
        self.send(self.client.request(method, url).json(body), fallback)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_inventory(&self) -> ClientResult<Vec<InventoryItem>> {
        let body = self.get(&self.api_base, "get_inventory").await?;
        let items = wire::decode_inventory(&body)?;
        debug!(count = items.len(), "Inventory fetched");
        Ok(items)
    }

    async fn fetch_categories(&self) -> ClientResult<Vec<String>> {
        let body = self.get(&self.analytics_base, "getAll").await?;
        wire::decode_categories(&body)
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        let body = self.get(&self.api_base, "display-orders").await?;
        let orders = wire::decode_orders(&body)?;
        debug!(count = orders.len(), "Orders fetched");
        Ok(orders)
    }

    async fn create_order(&self, payload: &OrderPayload) -> ClientResult<()> {
        let body = CreateOrderBody::from(payload);
        self.send_json(Method::POST, "set-orders", &body, CREATE_ORDER_FALLBACK)
            .await
    }

    async fn change_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()> {
        let body = StatusChangeBody {
            id: order_id,
            status: status.as_str(),
        };
        self.send_json(Method::PATCH, "status-change", &body, "Failed to update order status")
            .await
    }

    async fn record_sale(&self, report: &SaleReport) -> ClientResult<()> {
        let body = SaleBody::from(report);
        self.send_json(Method::POST, "sale_set", &body, "Failed to record sale")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answers a single request with `status` and `body`. The handle yields
    /// the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}/api/", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn backend_at(base_url: String) -> HttpBackend {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url;
        HttpBackend::new(&config).unwrap()
    }

    fn payload() -> OrderPayload {
        OrderPayload {
            supplier_name: "Acme".to_string(),
            products: BTreeMap::from([("Cola".to_string(), 24)]),
            categories: vec![],
            prices: vec![],
        }
    }

    #[test]
    fn test_endpoints_join_under_base() {
        let backend = HttpBackend::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            HttpBackend::endpoint(&backend.api_base, "display-orders")
                .unwrap()
                .as_str(),
            "http://127.0.0.1:8080/api/display-orders"
        );
        assert_eq!(
            HttpBackend::endpoint(&backend.analytics_base, "getAll")
                .unwrap()
                .as_str(),
            "http://127.0.0.1:8000/getAll"
        );
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        assert!(HttpBackend::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_create_order_surfaces_server_message() {
        let (base, server) =
            serve_once("400 Bad Request", r#"{"message": "Supplier not found"}"#).await;
        let backend = backend_at(base);

        let err = backend.create_order(&payload()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Server { status: 400, ref message } if message == "Supplier not found"
        ));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/set-orders "));
        assert!(request.contains(r#""supplier_name":"Acme""#));
    }

    #[tokio::test]
    async fn test_create_order_falls_back_without_message() {
        let (base, server) = serve_once("500 Internal Server Error", "").await;
        let backend = backend_at(base);

        let err = backend.create_order(&payload()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Server { status: 500, ref message } if message == CREATE_ORDER_FALLBACK
        ));
        assert!(err.is_transient());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_inventory_decodes_success_body() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"_id": {"$oid": "a1"}, "item_name": "Cola", "SKU": "COLA-1", "quantity": 12, "price": 1.5}]"#,
        )
        .await;
        let backend = backend_at(base);

        let items = backend.fetch_inventory().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price.cents(), 150);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/get_inventory "));
    }
}
