//! # Stockline Console Entry Point
//!
//! Headless dashboard for the inventory backend.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockline Console                                │
//! │                                                                         │
//! │  main.rs ────► logging, config, backend                                 │
//! │     │                                                                   │
//! │     ├──► PosSession::load   (get_inventory, getAll)                     │
//! │     ├──► OrderDesk::load    (display-orders)                            │
//! │     └──► dashboard summary  (CatalogSummary, OrderSummary)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```text
//! stockline [CONFIG_PATH]
//! RUST_LOG=debug stockline
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stockline_client::{ClientConfig, HttpBackend, OrderDesk, PosSession};
use stockline_core::Money;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Stockline console v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ClientConfig::load_or_default(config_path);
    info!(api = %config.api.base_url, analytics = %config.api.analytics_url, "Using backend");

    let backend = Arc::new(HttpBackend::new(&config)?);

    let mut session = PosSession::new(Arc::clone(&backend), config.sale_by());
    if let Err(e) = session.load().await {
        error!(error = %e, "Failed to load inventory");
        return Err(e.into());
    }

    let mut desk = OrderDesk::new(backend);
    if let Err(e) = desk.load().await {
        warn!(error = %e, "Failed to load orders");
    }

    let symbol = config.session.currency_symbol.as_str();
    let catalog = session.catalog().summary();
    info!(
        items = catalog.item_count,
        units = catalog.total_units,
        stock_value = %format_money(symbol, catalog.stock_value),
        low_stock = catalog.low_stock_count,
        out_of_stock = catalog.out_of_stock_count,
        "Inventory summary"
    );

    for item in session.catalog().low_stock_items() {
        warn!(item = %item.name, sku = %item.sku, quantity = item.quantity, "Low stock");
    }

    let orders = desk.summary();
    info!(
        total = orders.total_orders,
        items = orders.total_items,
        pending = orders.pending,
        delivered = orders.delivered,
        "Order summary"
    );

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockline=trace` - Show trace for stockline crates only
/// - Default: INFO, with debug for stockline
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockline=debug,reqwest=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// `Money` with the configured currency symbol.
fn format_money(symbol: &str, amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!(
        "{}{}{}.{:02}",
        sign,
        symbol,
        amount.dollars().abs(),
        amount.cents_part()
    )
}
