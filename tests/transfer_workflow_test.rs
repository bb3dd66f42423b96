mod common;

use assert_matches::assert_matches;
use common::{inventory, warehouse, TestBackend};
use serde_json::json;
use warehouse_dashboard::models::InventoryRecord;
use warehouse_dashboard::services::transfers::{
    TransferState, TransferWorkflow, INSUFFICIENT_STOCK, OVER_CAPACITY,
};
use warehouse_dashboard::services::View;
use warehouse_dashboard::ServiceError;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

/// Warehouse 1 holds 5 units of product 7 in inventory record 10.
async fn three_warehouses(destination_capacity: i64) -> TestBackend {
    let backend = TestBackend::start().await;
    backend
        .get(
            "/warehouses",
            json!([
                warehouse(1, "Source", 100, 5),
                warehouse(2, "North", destination_capacity, 3),
                warehouse(3, "South", 100, 0),
            ]),
        )
        .await;
    backend
        .get(
            "/warehouses/2",
            warehouse(2, "North", destination_capacity, 3),
        )
        .await;
    backend
        .get("/inventory/warehouse/1", json!([inventory(10, 7, 5, 1)]))
        .await;
    backend
        .get("/inventory/warehouse/2", json!([inventory(20, 7, 3, 1)]))
        .await;
    backend.fail("GET", "/inventory/warehouse/3", 500).await;
    backend
}

fn source_record() -> InventoryRecord {
    serde_json::from_value(inventory(10, 7, 5, 1)).unwrap()
}

async fn opened(backend: &TestBackend) -> TransferWorkflow {
    let mut workflow = TransferWorkflow::new(backend.backend(), 1, source_record());
    workflow.open().await.unwrap();
    workflow
}

#[tokio::test]
async fn open_lists_other_warehouses_with_their_stock() {
    let backend = three_warehouses(100).await;
    let workflow = opened(&backend).await;

    assert_eq!(workflow.state(), TransferState::WarehousesLoaded);
    let candidates: Vec<(i64, i64)> = workflow
        .candidates()
        .iter()
        .map(|c| (c.warehouse.warehouse_id, c.quantity))
        .collect();
    assert_eq!(candidates, vec![(2, 3), (3, 0)]);
    assert_eq!(workflow.candidates()[0].label(), "North (3 in stock)");
}

#[tokio::test]
async fn source_warehouse_is_not_a_destination() {
    let backend = three_warehouses(100).await;
    let mut workflow = opened(&backend).await;

    assert_matches!(
        workflow.select_destination(1),
        Err(ServiceError::ValidationError(_))
    );
}

#[tokio::test]
async fn unparseable_amount_is_rejected_on_submit() {
    let backend = three_warehouses(100).await;
    let mut workflow = opened(&backend).await;

    workflow.enter_amount("two").unwrap();
    workflow.select_destination(2).unwrap();
    let err = workflow.submit().await.unwrap_err();
    assert_eq!(err.toast_message(), "Please enter a valid amount.");
    assert!(workflow.is_open());
}

#[tokio::test]
async fn over_capacity_closes_the_workflow() {
    let backend = three_warehouses(10).await;
    backend.accept("PUT", "/inventory/transfer/10/2", 0).await;
    let mut workflow = opened(&backend).await;

    workflow.enter_amount("8").unwrap();
    workflow.select_destination(2).unwrap();
    let err = workflow.submit().await.unwrap_err();

    assert_matches!(err, ServiceError::OverCapacity(ref msg) if msg == OVER_CAPACITY);
    assert_eq!(workflow.state(), TransferState::Closed);
    assert_matches!(workflow.enter_amount("1"), Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn insufficient_stock_keeps_the_workflow_open() {
    let backend = three_warehouses(100).await;
    backend.accept("PUT", "/inventory/transfer/10/2", 0).await;
    let mut workflow = opened(&backend).await;

    workflow.enter_amount("6").unwrap();
    workflow.select_destination(2).unwrap();
    let err = workflow.submit().await.unwrap_err();

    assert_matches!(err, ServiceError::InsufficientStock(ref msg) if msg == INSUFFICIENT_STOCK);
    assert_eq!(workflow.state(), TransferState::AmountEntered);
}

#[tokio::test]
async fn successful_transfer_sends_the_amount() {
    let backend = three_warehouses(100).await;
    Mock::given(method("PUT"))
        .and(path("/inventory/transfer/10/2"))
        .and(body_json(json!({ "amount": 5 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend.server)
        .await;
    let mut workflow = opened(&backend).await;

    workflow.enter_amount("5").unwrap();
    workflow.select_destination(2).unwrap();
    let outcome = workflow.submit().await.unwrap();

    assert_eq!(outcome.message, "Inventory transferred successfully!");
    assert!(outcome.refresh.contains(&View::WarehouseInventory(1)));
    assert!(outcome.refresh.contains(&View::LowStockCount));
    assert_eq!(workflow.state(), TransferState::Submitted);
}

#[tokio::test]
async fn rejected_transfer_is_reported_as_failure() {
    let backend = three_warehouses(100).await;
    backend.fail("PUT", "/inventory/transfer/10/2", 500).await;
    let mut workflow = opened(&backend).await;

    workflow.enter_amount("2").unwrap();
    workflow.select_destination(2).unwrap();
    let err = workflow.submit().await.unwrap_err();
    assert_eq!(err.toast_message(), "Error transferring inventory.");
}
