mod common;

use assert_matches::assert_matches;
use common::{inventory, product, warehouse, TestBackend};
use serde_json::json;
use warehouse_dashboard::dashboard::{views::LOAD_ERROR, Listing, Refreshed, Tab};
use warehouse_dashboard::models::LoginCredentials;
use warehouse_dashboard::services::View;
use warehouse_dashboard::ServiceError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials {
        email: "manager@example.com".into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn login_keeps_the_session_cookie() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=s3ss10n; Path=/"),
        )
        .mount(&backend.server)
        .await;
    backend
        .get(
            "/users/current-user",
            json!({ "userId": 4, "email": "manager@example.com", "firstName": "Dana" }),
        )
        .await;

    let mut dashboard = backend.dashboard();
    let user = dashboard.login(&credentials("hunter2")).await.unwrap();
    assert_eq!(user.email, "manager@example.com");
    assert_eq!(dashboard.user_email().as_deref(), Some("manager@example.com"));
    assert_eq!(
        backend.http.session_cookie().as_deref(),
        Some("JSESSIONID=s3ss10n")
    );
}

#[tokio::test]
async fn bad_password_is_reported_as_such() {
    let backend = TestBackend::start().await;
    backend.fail("POST", "/users/login", 401).await;

    let mut dashboard = backend.dashboard();
    let err = dashboard.login(&credentials("wrong")).await.unwrap_err();
    assert_matches!(err, ServiceError::Unauthorized(ref msg) if msg == "Invalid email or password.");
    assert!(dashboard.user().is_none());
}

#[tokio::test]
async fn no_session_means_not_logged_in() {
    let backend = TestBackend::start().await;
    backend.fail("GET", "/users/current-user", 401).await;

    let mut dashboard = backend.dashboard();
    assert_matches!(
        dashboard.require_login().await,
        Err(ServiceError::NotLoggedIn)
    );
}

#[tokio::test]
async fn summary_cards_fail_independently() {
    let backend = TestBackend::start().await;
    backend
        .get(
            "/inventory/below-minimum",
            json!([inventory(1, 7, 1, 5), inventory(2, 8, 0, 3)]),
        )
        .await;
    backend
        .get(
            "/warehouses",
            json!([
                warehouse(1, "Busy", 100, 95),
                warehouse(2, "Quiet", 100, 10),
                warehouse(3, "Unsized", 0, 40),
            ]),
        )
        .await;
    backend.fail("GET", "/inventory", 500).await;

    let summary = backend.dashboard().summary().await;
    assert_eq!(summary.low_stock_count, Some(2));
    assert_eq!(summary.warehouses_near_capacity, Some(1));
    assert_eq!(summary.total_quantity, None);
    assert_eq!(summary.total_value, None);
}

#[tokio::test]
async fn failed_tab_shows_load_error() {
    let backend = TestBackend::start().await;
    backend.fail("GET", "/warehouses", 500).await;
    backend.get("/suppliers", json!([])).await;

    let dashboard = backend.dashboard();
    assert_matches!(
        dashboard.open_tab(Tab::Warehouses).await,
        Listing::Failed(ref msg) if msg == LOAD_ERROR
    );
    assert_matches!(
        dashboard.open_tab(Tab::Suppliers).await,
        Listing::Empty("No suppliers found.")
    );
}

#[tokio::test]
async fn products_tab_sums_stock_per_product() {
    let backend = TestBackend::start().await;
    backend
        .get(
            "/products",
            json!([product(1, "Pallet Wrap", 19.99), product(2, "Tape", 3.5)]),
        )
        .await;
    backend
        .get(
            "/inventory/product/1",
            json!([inventory(1, 1, 1200, 0), inventory(2, 1, 300, 0)]),
        )
        .await;
    backend.fail("GET", "/inventory/product/2", 500).await;

    let listing = backend.dashboard().open_tab(Tab::Products).await;
    let table = listing.table().expect("products load");
    let total = table.column_index("Total Stock").unwrap();
    let cells: Vec<&str> = table
        .rows()
        .iter()
        .map(|row| row.cells[total].as_str())
        .collect();
    assert_eq!(cells, vec!["1,500", "0"]);
    assert_eq!(table.rows()[0].cells[0], "12345");
}

#[tokio::test]
async fn refresh_folds_summary_cards_together() {
    let backend = TestBackend::start().await;
    backend.get("/inventory/below-minimum", json!([])).await;
    backend.get("/warehouses", json!([])).await;
    backend.get("/inventory", json!([inventory(1, 7, 4, 0)])).await;
    backend
        .get("/inventory/warehouse/9", json!([inventory(1, 7, 4, 0)]))
        .await;

    let refreshed = backend
        .dashboard()
        .refresh(&[
            View::LowStockCount,
            View::Warehouses,
            View::TotalInventory,
            View::WarehouseInventory(9),
        ])
        .await;

    assert_eq!(refreshed.len(), 3);
    assert_matches!(&refreshed[0], Refreshed::Summary(s) if s.total_quantity == Some(4));
    assert_matches!(
        &refreshed[1],
        Refreshed::Listing { listing: Listing::Empty("No warehouses found."), .. }
    );
    assert_matches!(
        &refreshed[2],
        Refreshed::Listing { listing: Listing::Rows(_), .. }
    );
}
