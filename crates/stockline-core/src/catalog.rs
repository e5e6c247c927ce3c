//! # Catalog Store
//!
//! The in-memory list of inventory items for the current session.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  REST load ──► CatalogStore::from_items ──► (status re-derived)         │
//! │                     │                                                   │
//! │   add / edit / ─────┤                                                   │
//! │   delete            │                                                   │
//! │                     ▼                                                   │
//! │   PosEngine::commit ──► apply_sale (all-or-nothing) ──► statuses        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is an ordinary owned value. Whoever needs it gets it passed
//! in (`&CatalogStore` / `&mut CatalogStore`), so tests build isolated
//! instances and nothing is global.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::status::derive_status;
use crate::types::{InventoryItem, StockStatus};
use crate::validation::{
    validate_price, validate_required, validate_search_query, validate_sku,
    validate_stock_quantity,
};

// =============================================================================
// Inputs
// =============================================================================

/// Form data for a new catalog item. The store assigns the id and status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub sku: Option<String>,
    pub quantity: i64,
    pub price: Money,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
}

/// Search and filter criteria for the inventory and POS product grids.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilter {
    /// Case-insensitive match on name, category or SKU. Empty matches all.
    #[serde(default)]
    pub query: String,
    /// Exact category.
    pub category: Option<String>,
    pub status: Option<StockStatus>,
}

impl CatalogFilter {
    pub fn text(query: impl Into<String>) -> Self {
        CatalogFilter {
            query: query.into(),
            ..Default::default()
        }
    }

    fn matches(&self, item: &InventoryItem, needle: &str) -> bool {
        let matches_search = needle.is_empty()
            || item.name.to_lowercase().contains(needle)
            || item.category.to_lowercase().contains(needle)
            || item.sku.to_lowercase().contains(needle);

        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |c| item.category == c);

        let matches_status = self.status.map_or(true, |s| item.status == s);

        matches_search && matches_category && matches_status
    }
}

/// Dashboard figures for the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub item_count: usize,
    pub total_units: i64,
    pub stock_value: Money,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

// =============================================================================
// Catalog Store
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    items: Vec<InventoryItem>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loaded items.
    ///
    /// Statuses are re-derived. Out-of-range quantities or prices and
    /// duplicate ids are rejected.
    pub fn from_items(items: Vec<InventoryItem>) -> CoreResult<Self> {
        let mut store = CatalogStore::new();
        for item in items {
            validate_stock_quantity("quantity", item.quantity)?;
            validate_price("price", item.price)?;
            if store.get(&item.id).is_some() {
                return Err(ValidationError::Duplicate {
                    field: "id".to_string(),
                    value: item.id,
                }
                .into());
            }
            let status = derive_status(item.quantity);
            store.items.push(InventoryItem { status, ..item });
        }
        Ok(store)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Adds a new item and returns it.
    pub fn add_item(&mut self, new: NewItem) -> CoreResult<&InventoryItem> {
        let name = validate_required("name", &new.name)?;
        let category = validate_required("category", &new.category)?;
        validate_stock_quantity("quantity", new.quantity)?;
        validate_price("price", new.price)?;

        let sku = match new.sku.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => {
                validate_sku(s)?;
                s.to_string()
            }
            _ => String::new(),
        };

        let item = InventoryItem {
            description: new.description,
            image: new.image,
            ..InventoryItem::new(
                Uuid::new_v4().to_string(),
                name,
                category,
                sku,
                new.quantity,
                new.price,
            )
        };

        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Replaces an existing item. The stored status is derived from the
    /// new quantity, whatever the caller put in `status`.
    pub fn update_item(&mut self, item: InventoryItem) -> CoreResult<()> {
        validate_required("name", &item.name)?;
        validate_required("category", &item.category)?;
        validate_stock_quantity("quantity", item.quantity)?;
        validate_price("price", item.price)?;

        let slot = self
            .items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| CoreError::ProductNotFound(item.id.clone()))?;

        let status = derive_status(item.quantity);
        *slot = InventoryItem { status, ..item };
        Ok(())
    }

    /// Sets the quantity of one item and re-derives its status.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<&InventoryItem> {
        validate_stock_quantity("quantity", quantity)?;
        let slot = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        *slot = slot.with_quantity(quantity);
        Ok(&*slot)
    }

    pub fn delete_item(&mut self, id: &str) -> CoreResult<InventoryItem> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        Ok(self.items.remove(pos))
    }

    /// Deducts sold quantities.
    ///
    /// Every deduction is checked against the current stock before any is
    /// applied; on error the store is unchanged.
    pub fn apply_sale(&mut self, sold: &[(String, i64)]) -> CoreResult<()> {
        for (id, qty) in sold {
            let item = self
                .get(id)
                .ok_or_else(|| CoreError::ProductNotFound(id.clone()))?;
            // Lines for the same item are checked together.
            let requested: i64 = sold.iter().filter(|(i, _)| i == id).map(|(_, q)| q).sum();
            if *qty < 0 || item.quantity - requested < 0 {
                return Err(CoreError::InsufficientStock {
                    sku: if item.sku.is_empty() {
                        item.name.clone()
                    } else {
                        item.sku.clone()
                    },
                    available: item.quantity,
                    requested,
                });
            }
        }

        for (id, qty) in sold {
            if let Some(slot) = self.items.iter_mut().find(|i| &i.id == id) {
                *slot = slot.with_quantity(slot.quantity - qty);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    pub fn low_stock_items(&self) -> Vec<&InventoryItem> {
        self.with_status(StockStatus::LowStock)
    }

    pub fn out_of_stock_items(&self) -> Vec<&InventoryItem> {
        self.with_status(StockStatus::OutOfStock)
    }

    fn with_status(&self, status: StockStatus) -> Vec<&InventoryItem> {
        self.items.iter().filter(|i| i.status == status).collect()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|i| i.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn search(&self, filter: &CatalogFilter) -> CoreResult<Vec<&InventoryItem>> {
        let needle = validate_search_query(&filter.query)?.to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|i| filter.matches(i, &needle))
            .collect())
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            item_count: self.items.len(),
            total_units: self.items.iter().map(|i| i.quantity).sum(),
            stock_value: self.items.iter().map(InventoryItem::stock_value).sum(),
            low_stock_count: self.low_stock_items().len(),
            out_of_stock_count: self.out_of_stock_items().len(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_PRICE_CENTS, MAX_STOCK_QUANTITY};

    fn item(id: &str, name: &str, category: &str, qty: i64, price_cents: i64) -> InventoryItem {
        InventoryItem::new(
            id,
            name,
            category,
            format!("SKU-{}", id),
            qty,
            Money::from_cents(price_cents),
        )
    }

    fn sample_store() -> CatalogStore {
        CatalogStore::from_items(vec![
            item("1", "Cola", "Drinks", 24, 150),
            item("2", "Lemonade", "Drinks", 4, 200),
            item("3", "Crisps", "Snacks", 0, 100),
            item("4", "Pretzels", "Snacks", 10, 120),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_items_rederives_status() {
        let mut stale = item("1", "Cola", "Drinks", 3, 150);
        stale.status = StockStatus::InStock;

        let store = CatalogStore::from_items(vec![stale]).unwrap();
        assert_eq!(store.get("1").unwrap().status, StockStatus::LowStock);
    }

    #[test]
    fn test_from_items_rejects_bad_input() {
        let negative = InventoryItem {
            quantity: -2,
            ..item("1", "Cola", "Drinks", 0, 150)
        };
        assert!(CatalogStore::from_items(vec![negative]).is_err());

        let dupes = vec![item("1", "Cola", "Drinks", 1, 150), item("1", "Tea", "Drinks", 1, 150)];
        assert!(CatalogStore::from_items(dupes).is_err());
    }

    #[test]
    fn test_rejects_prices_and_quantities_past_the_caps() {
        let pricey = item("1", "Gold Bar", "Metals", 5, i64::MAX);
        assert!(matches!(
            CatalogStore::from_items(vec![pricey]),
            Err(CoreError::Validation(ValidationError::OutOfRange { ref field, .. })) if field == "price"
        ));

        let mut store = sample_store();
        let err = store
            .add_item(NewItem {
                name: "Gold Bar".to_string(),
                category: "Metals".to_string(),
                quantity: MAX_STOCK_QUANTITY + 1,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "quantity"
        ));

        let mut cola = store.get("1").unwrap().clone();
        cola.price = Money::from_cents(MAX_PRICE_CENTS + 1);
        assert!(store.update_item(cola).is_err());
        assert_eq!(store.get("1").unwrap().price, Money::from_cents(150));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_summary_at_the_caps_does_not_overflow() {
        let store = CatalogStore::from_items(vec![
            item("1", "Gold Bar", "Metals", MAX_STOCK_QUANTITY, MAX_PRICE_CENTS),
            item("2", "Platinum Bar", "Metals", MAX_STOCK_QUANTITY, MAX_PRICE_CENTS),
        ])
        .unwrap();

        let summary = store.summary();
        assert_eq!(
            summary.stock_value.cents(),
            2 * MAX_STOCK_QUANTITY * MAX_PRICE_CENTS
        );
    }

    #[test]
    fn test_add_item_assigns_id_and_status() {
        let mut store = CatalogStore::new();
        let added = store
            .add_item(NewItem {
                name: " Water ".to_string(),
                category: "Drinks".to_string(),
                sku: Some("WAT-1".to_string()),
                quantity: 5,
                price: Money::from_cents(90),
                ..Default::default()
            })
            .unwrap()
            .clone();

        assert_eq!(added.name, "Water");
        assert_eq!(added.status, StockStatus::LowStock);
        assert!(Uuid::parse_str(&added.id).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_item_validation() {
        let mut store = CatalogStore::new();
        let err = store
            .add_item(NewItem {
                name: "Water".to_string(),
                category: "".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { ref field }) if field == "category"
        ));

        let err = store
            .add_item(NewItem {
                name: "Water".to_string(),
                category: "Drinks".to_string(),
                price: Money::from_cents(-1),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_item_ignores_caller_status() {
        let mut store = sample_store();
        let mut cola = store.get("1").unwrap().clone();
        cola.quantity = 0;
        cola.status = StockStatus::InStock;

        store.update_item(cola).unwrap();
        assert_eq!(store.get("1").unwrap().status, StockStatus::OutOfStock);

        let mut blank = store.get("2").unwrap().clone();
        blank.category = "  ".to_string();
        assert!(matches!(
            store.update_item(blank),
            Err(CoreError::Validation(ValidationError::Required { ref field })) if field == "category"
        ));
        assert_eq!(store.get("2").unwrap().category, "Drinks");
        assert_eq!(store.categories(), vec!["Drinks", "Snacks"]);

        let ghost = item("99", "Ghost", "None", 1, 1);
        assert!(matches!(
            store.update_item(ghost),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_delete_item() {
        let mut store = sample_store();
        let removed = store.delete_item("3").unwrap();
        assert_eq!(removed.name, "Crisps");
        assert_eq!(store.len(), 3);
        assert!(store.delete_item("3").is_err());
    }

    #[test]
    fn test_low_and_out_of_stock_subsets() {
        let store = sample_store();
        let low: Vec<_> = store.low_stock_items().iter().map(|i| i.id.as_str()).collect();
        let out: Vec<_> = store.out_of_stock_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(low, vec!["2"]);
        assert_eq!(out, vec!["3"]);
    }

    #[test]
    fn test_categories_sorted_distinct() {
        assert_eq!(sample_store().categories(), vec!["Drinks", "Snacks"]);
    }

    #[test]
    fn test_search() {
        let store = sample_store();

        let hits = store.search(&CatalogFilter::text("LEMON")).unwrap();
        assert_eq!(hits.len(), 1);

        let hits = store.search(&CatalogFilter::text("sku-4")).unwrap();
        assert_eq!(hits[0].name, "Pretzels");

        let filter = CatalogFilter {
            query: String::new(),
            category: Some("Snacks".to_string()),
            status: Some(StockStatus::InStock),
        };
        let hits = store.search(&filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "4");

        assert_eq!(store.search(&CatalogFilter::default()).unwrap().len(), 4);
    }

    #[test]
    fn test_apply_sale_is_all_or_nothing() {
        let mut store = sample_store();

        let err = store
            .apply_sale(&[("1".to_string(), 2), ("2".to_string(), 5)])
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 4, requested: 5, .. }
        ));
        assert_eq!(store.get("1").unwrap().quantity, 24);

        store
            .apply_sale(&[("1".to_string(), 20), ("2".to_string(), 4)])
            .unwrap();
        assert_eq!(store.get("1").unwrap().status, StockStatus::LowStock);
        assert_eq!(store.get("2").unwrap().status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_summary() {
        let summary = sample_store().summary();
        assert_eq!(summary.item_count, 4);
        assert_eq!(summary.total_units, 38);
        // 24×1.50 + 4×2.00 + 0 + 10×1.20 = 56.00
        assert_eq!(summary.stock_value, Money::from_cents(5600));
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.out_of_stock_count, 1);
    }
}
