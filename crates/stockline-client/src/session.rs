//! # POS Session
//!
//! One register: the loaded catalog, the cart engine, and the backend the
//! finished sales are reported to.
//!
//! ## Completing a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  checkout()          PosEngine::checkout(now)       receipt pending     │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  complete_sale()     PosEngine::commit(&mut catalog) ── Err ─► nothing  │
//! │      │                                                  changed         │
//! │      │ Ok                                                               │
//! │      ▼                                                                  │
//! │  tokio::spawn ──► Backend::record_sale ── Err ─► warn!, sale stands     │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  CompletedSale { receipt, report }   (caller may await `report`)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use stockline_core::{
    CartTotals, CartWarning, CatalogStore, CustomerInfo, PaymentMethod, PosEngine, Receipt,
};

use crate::backend::Backend;
use crate::error::ClientResult;

/// A committed sale.
#[derive(Debug)]
pub struct CompletedSale {
    pub receipt: Receipt,
    /// The background sale report. Dropping it does not cancel the report.
    pub report: JoinHandle<()>,
}

pub struct PosSession<B: ?Sized> {
    backend: Arc<B>,
    catalog: CatalogStore,
    categories: Vec<String>,
    engine: PosEngine,
    sale_by: i64,
}

impl<B: Backend + ?Sized + 'static> PosSession<B> {
    pub fn new(backend: Arc<B>, sale_by: i64) -> Self {
        PosSession {
            backend,
            catalog: CatalogStore::new(),
            categories: Vec::new(),
            engine: PosEngine::new(),
            sale_by,
        }
    }

    /// Replaces the catalog with the backend's inventory.
    ///
    /// Categories come from the analytics service; when it is unreachable
    /// the catalog's own categories are used.
    pub async fn load(&mut self) -> ClientResult<()> {
        let items = self.backend.fetch_inventory().await?;
        self.catalog = CatalogStore::from_items(items)?;

        self.categories = match self.backend.fetch_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                warn!(error = %e, "Category service unavailable, using catalog categories");
                self.catalog.categories()
            }
        };

        info!(
            items = self.catalog.len(),
            categories = self.categories.len(),
            "Catalog loaded"
        );
        Ok(())
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// For inventory edits (add / update / delete item).
    pub fn catalog_mut(&mut self) -> &mut CatalogStore {
        &mut self.catalog
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn engine(&self) -> &PosEngine {
        &self.engine
    }

    /// For cart edits by line index.
    pub fn engine_mut(&mut self) -> &mut PosEngine {
        &mut self.engine
    }

    pub fn totals(&self) -> CartTotals {
        self.engine.totals()
    }

    /// Adds one unit of the catalog item `item_id` to the cart.
    pub fn add_to_cart(&mut self, item_id: &str) -> Result<usize, CartWarning> {
        let item = self
            .catalog
            .get(item_id)
            .ok_or_else(|| CartWarning::UnknownItem(item_id.to_string()))?;

        let result = self.engine.add_to_cart(item);
        if let Err(ref warning) = result {
            debug!(item_id, %warning, "Add to cart declined");
        }
        result
    }

    /// Builds the receipt for the current cart, stamped with the current
    /// time.
    pub fn checkout(
        &mut self,
        payment_method: PaymentMethod,
        customer: CustomerInfo,
    ) -> ClientResult<Receipt> {
        let receipt = self
            .engine
            .checkout(payment_method, customer, Utc::now())?
            .clone();
        debug!(receipt = %receipt.id, total = %receipt.total, "Checkout started");
        Ok(receipt)
    }

    pub fn cancel_checkout(&mut self) -> ClientResult<()> {
        self.engine.cancel_checkout()?;
        Ok(())
    }

    /// Commits the pending checkout against the catalog and reports the sale
    /// in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn complete_sale(&mut self) -> ClientResult<CompletedSale> {
        let (receipt, report) = self.engine.commit(&mut self.catalog, self.sale_by)?;

        info!(
            receipt = %receipt.id,
            total = %receipt.total,
            items = receipt.item_count(),
            "Sale committed"
        );

        let backend = Arc::clone(&self.backend);
        let receipt_id = receipt.id.clone();
        let handle = tokio::spawn(async move {
            match backend.record_sale(&report).await {
                Ok(()) => debug!(receipt = %receipt_id, "Sale report recorded"),
                Err(e) => warn!(receipt = %receipt_id, error = %e, "Failed to record sale report"),
            }
        });

        Ok(CompletedSale {
            receipt,
            report: handle,
        })
    }

    /// Clears the committed (or abandoned) cart for the next customer.
    pub fn new_sale(&mut self) -> ClientResult<()> {
        self.engine.new_sale()?;
        Ok(())
    }
}
