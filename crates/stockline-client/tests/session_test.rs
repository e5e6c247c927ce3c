mod common;

use std::sync::Arc;

use common::{item, FakeBackend};
use stockline_client::{ClientError, PosSession};
use stockline_core::{
    CartWarning, CoreError, CustomerInfo, Money, PaymentMethod, SalePhase, StockStatus,
};

fn session_with(items: Vec<stockline_core::InventoryItem>) -> (Arc<FakeBackend>, PosSession<FakeBackend>) {
    let backend = Arc::new(FakeBackend::with_inventory(items));
    let session = PosSession::new(Arc::clone(&backend), 7);
    (backend, session)
}

#[tokio::test]
async fn test_load_falls_back_to_catalog_categories() {
    let (_backend, mut session) = session_with(vec![
        item("1", "Widget", "Tools", 5, 1000),
        item("2", "Cola", "Drinks", 30, 150),
    ]);

    session.load().await.unwrap();

    assert_eq!(session.catalog().len(), 2);
    assert_eq!(session.categories(), &["Drinks".to_string(), "Tools".to_string()]);
}

#[tokio::test]
async fn test_load_uses_category_service() {
    let (backend, mut session) = session_with(vec![item("1", "Widget", "Tools", 5, 1000)]);
    *backend.categories.lock().unwrap() = Some(vec!["Garden".to_string(), "Tools".to_string()]);

    session.load().await.unwrap();
    assert_eq!(session.categories().len(), 2);
}

#[tokio::test]
async fn test_full_sale_reports_in_background() {
    let (backend, mut session) = session_with(vec![item("1", "Widget", "Tools", 5, 1000)]);
    session.load().await.unwrap();

    for _ in 0..3 {
        session.add_to_cart("1").unwrap();
    }
    let totals = session.totals();
    assert_eq!(totals.subtotal, Money::from_cents(3000));
    assert_eq!(totals.tax, Money::from_cents(240));
    assert_eq!(totals.total, Money::from_cents(3240));

    let receipt = session
        .checkout(PaymentMethod::Cash, CustomerInfo::default())
        .unwrap();
    assert!(receipt.id.starts_with("INV-"));

    let sale = session.complete_sale().unwrap();
    assert_eq!(sale.receipt.total, Money::from_cents(3240));
    sale.report.await.unwrap();

    let widget = session.catalog().get("1").unwrap();
    assert_eq!(widget.quantity, 2);
    assert_eq!(widget.status, StockStatus::LowStock);

    let sales = backend.sales.lock().unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].sale_by, 7);
    assert_eq!(sales[0].products.get("Tools"), Some(&3));
}

#[tokio::test]
async fn test_failed_sale_report_keeps_commit() {
    let (backend, mut session) = session_with(vec![item("1", "Widget", "Tools", 5, 1000)]);
    session.load().await.unwrap();
    backend.fail_writes("sales service down");

    for _ in 0..5 {
        session.add_to_cart("1").unwrap();
    }
    session
        .checkout(PaymentMethod::Card, CustomerInfo::default())
        .unwrap();
    let sale = session.complete_sale().unwrap();
    sale.report.await.unwrap();

    let widget = session.catalog().get("1").unwrap();
    assert_eq!(widget.quantity, 0);
    assert_eq!(widget.status, StockStatus::OutOfStock);
    assert!(backend.sales.lock().unwrap().is_empty());
    assert_eq!(session.engine().phase(), SalePhase::Committed);
}

#[tokio::test]
async fn test_add_to_cart_warnings() {
    let (_backend, mut session) = session_with(vec![
        item("1", "Widget", "Tools", 5, 1000),
        item("2", "Gizmo", "Tools", 0, 500),
    ]);
    session.load().await.unwrap();

    assert!(matches!(
        session.add_to_cart("2"),
        Err(CartWarning::OutOfStock { .. })
    ));
    assert!(matches!(
        session.add_to_cart("404"),
        Err(CartWarning::UnknownItem(_))
    ));

    for _ in 0..5 {
        session.add_to_cart("1").unwrap();
    }
    assert!(matches!(
        session.add_to_cart("1"),
        Err(CartWarning::NotEnoughStock { .. })
    ));
    assert_eq!(session.engine().lines()[0].quantity, 5);
}

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let (_backend, mut session) = session_with(vec![]);
    session.load().await.unwrap();

    let err = session
        .checkout(PaymentMethod::Cash, CustomerInfo::default())
        .unwrap_err();
    assert!(matches!(err, ClientError::Core(CoreError::EmptyCart)));
}

#[tokio::test]
async fn test_commit_with_stale_cart_changes_nothing() {
    let (backend, mut session) = session_with(vec![item("1", "Widget", "Tools", 5, 1000)]);
    session.load().await.unwrap();

    for _ in 0..4 {
        session.add_to_cart("1").unwrap();
    }
    session
        .checkout(PaymentMethod::Cash, CustomerInfo::default())
        .unwrap();

    // Another register sold three in the meantime.
    session.catalog_mut().set_quantity("1", 2).unwrap();

    let err = session.complete_sale().unwrap_err();
    assert!(matches!(
        err,
        ClientError::Core(CoreError::InsufficientStock { available: 2, requested: 4, .. })
    ));
    assert_eq!(session.catalog().get("1").unwrap().quantity, 2);
    assert!(backend.sales.lock().unwrap().is_empty());

    session.cancel_checkout().unwrap();
    assert_eq!(session.engine().phase(), SalePhase::Building);
}
