mod common;

use common::{inventory, warehouse, TestBackend};
use rstest::rstest;
use serde_json::json;
use warehouse_dashboard::services::stock::{
    check_if_in_stock, check_warehouse_capacity, product_total_quantity,
};

async fn warehouse_at_90_of_100() -> TestBackend {
    let backend = TestBackend::start().await;
    backend
        .get("/warehouses/1", warehouse(1, "Main", 100, 90))
        .await;
    backend
        .get(
            "/inventory/warehouse/1",
            json!([inventory(10, 7, 60, 5), inventory(11, 8, 30, 5)]),
        )
        .await;
    backend
}

#[rstest]
#[case(0, true)]
#[case(10, true)]
#[case(11, false)]
#[tokio::test]
async fn capacity_counts_every_record(#[case] additional: i64, #[case] fits: bool) {
    let backend = warehouse_at_90_of_100().await;
    assert_eq!(
        check_warehouse_capacity(backend.backend().as_ref(), 1, additional).await,
        fits
    );
}

#[tokio::test]
async fn capacity_check_fails_closed() {
    let backend = TestBackend::start().await;
    backend
        .get("/warehouses/1", warehouse(1, "Main", 100, 0))
        .await;
    backend.fail("GET", "/inventory/warehouse/1", 500).await;

    assert!(!check_warehouse_capacity(backend.backend().as_ref(), 1, 1).await);
}

#[tokio::test]
async fn capacity_sum_never_overflows() {
    let backend = warehouse_at_90_of_100().await;
    let api = backend.backend();
    assert!(!check_warehouse_capacity(api.as_ref(), 1, i64::MAX).await);
    assert!(!check_warehouse_capacity(api.as_ref(), 1, i64::MAX - 89).await);
}

#[tokio::test]
async fn capacity_check_fails_closed_on_warehouse_fetch() {
    let backend = TestBackend::start().await;
    backend.fail("GET", "/warehouses/1", 404).await;
    backend.get("/inventory/warehouse/1", json!([])).await;

    assert!(!check_warehouse_capacity(backend.backend().as_ref(), 1, 1).await);
}

#[rstest]
#[case(0, true)]
#[case(1, false)]
#[tokio::test]
async fn missing_capacity_counts_as_zero(#[case] additional: i64, #[case] fits: bool) {
    let backend = TestBackend::start().await;
    backend
        .get(
            "/warehouses/1",
            json!({ "warehouseId": 1, "name": "Unsized", "location": "Reno, NV", "capacity": null }),
        )
        .await;
    backend.get("/inventory/warehouse/1", json!([])).await;

    assert_eq!(
        check_warehouse_capacity(backend.backend().as_ref(), 1, additional).await,
        fits
    );
}

#[rstest]
#[case(7, 5, true)]
#[case(7, 6, false)]
#[case(99, 1, false)]
#[tokio::test]
async fn stock_check_looks_at_one_product(
    #[case] product_id: i64,
    #[case] required: i64,
    #[case] in_stock: bool,
) {
    let backend = TestBackend::start().await;
    backend
        .get(
            "/inventory/warehouse/2",
            json!([inventory(20, 7, 5, 1), inventory(21, 8, 500, 1)]),
        )
        .await;

    assert_eq!(
        check_if_in_stock(backend.backend().as_ref(), 2, product_id, required).await,
        in_stock
    );
}

#[tokio::test]
async fn stock_check_fails_closed() {
    let backend = TestBackend::start().await;
    backend.fail("GET", "/inventory/warehouse/2", 503).await;
    assert!(!check_if_in_stock(backend.backend().as_ref(), 2, 7, 0).await);
}

#[tokio::test]
async fn product_total_is_zero_when_unavailable() {
    let backend = TestBackend::start().await;
    backend
        .get(
            "/inventory/product/7",
            json!([inventory(1, 7, 5, 0), inventory(2, 7, 12, 0)]),
        )
        .await;
    backend.fail("GET", "/inventory/product/8", 500).await;

    let api = backend.backend();
    assert_eq!(product_total_quantity(api.as_ref(), 7).await, 17);
    assert_eq!(product_total_quantity(api.as_ref(), 8).await, 0);
}
