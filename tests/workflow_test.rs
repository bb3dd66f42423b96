mod common;

use assert_matches::assert_matches;
use common::{inventory, warehouse, TestBackend};
use serde_json::json;
use warehouse_dashboard::services::checkouts::{CheckoutDraft, CheckoutService, NOT_ENOUGH_STOCK};
use warehouse_dashboard::services::restocks::{RestockDraft, RestockService};
use warehouse_dashboard::services::suppliers::{SupplierDraft, SupplierService};
use warehouse_dashboard::services::warehouses::WarehouseService;
use warehouse_dashboard::services::View;
use warehouse_dashboard::ServiceError;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn supplier_draft() -> SupplierDraft {
    SupplierDraft {
        name: "Acme Freight".into(),
        contact_email: "orders@acme.io".into(),
        phone: "(303) 555-0199".into(),
        address: "12 Dock Rd".into(),
    }
}

#[tokio::test]
async fn duplicate_supplier_email_is_reported() {
    let backend = TestBackend::start().await;
    backend.fail("POST", "/suppliers/create_supplier", 409).await;

    let err = SupplierService::new(backend.backend())
        .create(supplier_draft())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
    assert_eq!(err.toast_message(), "Supplier with this email already exists.");
}

#[tokio::test]
async fn invalid_supplier_never_reaches_the_backend() {
    let backend = TestBackend::start().await;
    backend.accept("POST", "/suppliers/create_supplier", 0).await;

    let draft = SupplierDraft {
        phone: "555-CALL-NOW".into(),
        ..supplier_draft()
    };
    let err = SupplierService::new(backend.backend())
        .create(draft)
        .await
        .unwrap_err();
    assert_eq!(err.toast_message(), "Please enter a valid phone number.");
}

#[tokio::test]
async fn checkout_records_then_reduces_stock() {
    let backend = TestBackend::start().await;
    backend
        .get("/inventory/warehouse/3", json!([inventory(30, 7, 10, 2)]))
        .await;
    Mock::given(method("POST"))
        .and(path("/checkouts/create_checkout"))
        .and(body_json(json!({
            "warehouseId": 3,
            "productId": 7,
            "amount": 4,
            "email": "clerk@example.com",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/inventory/reduce"))
        .and(body_json(json!({ "warehouseId": 3, "productId": 7, "amount": 4 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend.server)
        .await;

    let draft = CheckoutDraft {
        warehouse_id: 3,
        product_id: 7,
        amount: "4".into(),
    };
    let outcome = CheckoutService::new(backend.backend())
        .create(draft, Some("clerk@example.com".into()))
        .await
        .unwrap();

    assert_eq!(outcome.message, "Checkout successful!");
    assert!(outcome.refresh.contains(&View::WarehouseInventory(3)));
}

#[tokio::test]
async fn checkout_beyond_stock_posts_nothing() {
    let backend = TestBackend::start().await;
    backend
        .get("/inventory/warehouse/3", json!([inventory(30, 7, 10, 2)]))
        .await;
    backend.accept("POST", "/checkouts/create_checkout", 0).await;
    backend.accept("PUT", "/inventory/reduce", 0).await;

    let draft = CheckoutDraft {
        warehouse_id: 3,
        product_id: 7,
        amount: "11".into(),
    };
    let err = CheckoutService::new(backend.backend())
        .create(draft, None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(ref msg) if msg == NOT_ENOUGH_STOCK);
}

#[tokio::test]
async fn failed_reduce_is_reported_after_checkout() {
    let backend = TestBackend::start().await;
    backend
        .get("/inventory/warehouse/3", json!([inventory(30, 7, 10, 2)]))
        .await;
    backend.accept("POST", "/checkouts/create_checkout", 1).await;
    backend.fail("PUT", "/inventory/reduce", 500).await;

    let draft = CheckoutDraft {
        warehouse_id: 3,
        product_id: 7,
        amount: "1".into(),
    };
    let err = CheckoutService::new(backend.backend())
        .create(draft, None)
        .await
        .unwrap_err();
    assert_eq!(err.toast_message(), "Failed to update inventory.");
}

#[tokio::test]
async fn restock_checks_every_warehouse_before_posting() {
    let backend = TestBackend::start().await;
    backend.get("/warehouses/1", warehouse(1, "Roomy", 100, 0)).await;
    backend.get("/inventory/warehouse/1", json!([])).await;
    backend.get("/warehouses/2", warehouse(2, "Full", 20, 20)).await;
    backend
        .get("/inventory/warehouse/2", json!([inventory(5, 7, 20, 0)]))
        .await;
    backend.accept("POST", "/restocks/create_restock", 0).await;

    let draft = RestockDraft {
        warehouse_ids: vec![1, 2],
        product_id: Some(7),
        amount: "5".into(),
    };
    let err = RestockService::new(backend.backend())
        .create(draft, Some("buyer@example.com".into()))
        .await
        .unwrap_err();
    assert_eq!(
        err.toast_message(),
        "This change will place the warehouse over capacity!"
    );
}

#[tokio::test]
async fn restock_posts_one_order_per_warehouse() {
    let backend = TestBackend::start().await;
    for id in [1, 2] {
        backend
            .get(&format!("/warehouses/{id}"), warehouse(id, "Roomy", 100, 0))
            .await;
        backend
            .get(&format!("/inventory/warehouse/{id}"), json!([]))
            .await;
    }
    backend.accept("POST", "/restocks/create_restock", 2).await;

    let draft = RestockDraft {
        warehouse_ids: vec![1, 2],
        product_id: Some(7),
        amount: "25".into(),
    };
    let outcome = RestockService::new(backend.backend())
        .create(draft, None)
        .await
        .unwrap();
    assert_eq!(outcome.message, "Restock order(s) created successfully!");
}

#[tokio::test]
async fn restock_without_selection_is_rejected() {
    let backend = TestBackend::start().await;
    let err = RestockService::new(backend.backend())
        .create(RestockDraft::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.toast_message(), "Please select a warehouse and a product.");
}

#[tokio::test]
async fn bulk_warehouse_delete_stops_on_failure() {
    let backend = TestBackend::start().await;
    backend
        .accept("DELETE", "/warehouses/delete_warehouse/1", 1)
        .await;
    backend
        .fail("DELETE", "/warehouses/delete_warehouse/2", 500)
        .await;

    let service = WarehouseService::new(backend.backend());
    let err = service.delete_many(&[1, 2]).await.unwrap_err();
    assert_eq!(err.toast_message(), "Error deleting warehouse(s).");

    let err = service.delete_many(&[]).await.unwrap_err();
    assert_eq!(
        err.toast_message(),
        "Please select at least one warehouse to delete."
    );
}

#[tokio::test]
async fn repeated_warehouse_gets_a_single_order() {
    let backend = TestBackend::start().await;
    backend.get("/warehouses/1", warehouse(1, "Main", 100, 90)).await;
    backend
        .get("/inventory/warehouse/1", json!([inventory(1, 7, 90, 0)]))
        .await;
    Mock::given(method("POST"))
        .and(path("/restocks/create_restock"))
        .and(body_json(json!({
            "warehouseId": 1,
            "productId": 7,
            "amount": 10,
            "orderedBy": null,
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend.server)
        .await;

    let draft = RestockDraft {
        warehouse_ids: vec![1, 1],
        product_id: Some(7),
        amount: "10".into(),
    };
    let outcome = RestockService::new(backend.backend())
        .create(draft, None)
        .await
        .unwrap();
    assert_eq!(outcome.message, "Restock created successfully!");
}

#[tokio::test]
async fn huge_restock_amount_is_over_capacity() {
    let backend = TestBackend::start().await;
    backend.get("/warehouses/1", warehouse(1, "Main", 100, 90)).await;
    backend
        .get("/inventory/warehouse/1", json!([inventory(1, 7, 90, 0)]))
        .await;
    backend.accept("POST", "/restocks/create_restock", 0).await;

    let draft = RestockDraft {
        warehouse_ids: vec![1],
        product_id: Some(7),
        amount: i64::MAX.to_string(),
    };
    let err = RestockService::new(backend.backend())
        .create(draft, None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::OverCapacity(_));
}
