#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use warehouse_dashboard::{
    dashboard::{notifications, Dashboard},
    AppConfig, HttpBackend, InventoryBackend,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mocked inventory backend plus a client pointed at it.
pub struct TestBackend {
    pub server: MockServer,
    pub http: HttpBackend,
}

impl TestBackend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let http = HttpBackend::with_timeout(&server.uri(), Duration::from_secs(5))
            .expect("mock server uri is a valid base url");
        Self { server, http }
    }

    pub fn backend(&self) -> Arc<dyn InventoryBackend> {
        Arc::new(self.http.clone())
    }

    /// A dashboard over this backend whose toasts are discarded.
    pub fn dashboard(&self) -> Dashboard {
        let (toasts, rx) = notifications::channel(64);
        tokio::spawn(notifications::process_toasts(rx, std::io::sink(), false));
        Dashboard::new(self.backend(), AppConfig::new(self.server.uri()), toasts)
    }

    pub async fn get(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn fail(&self, verb: &str, route: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answers `verb route` with 200 and asserts it is hit exactly `times` times.
    pub async fn accept(&self, verb: &str, route: &str, times: u64) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .expect(times)
            .mount(&self.server)
            .await;
    }
}

pub fn warehouse(id: i64, name: &str, capacity: i64, total_supply: i64) -> Value {
    json!({
        "warehouseId": id,
        "name": name,
        "location": "Denver, CO",
        "capacity": capacity,
        "totalSupply": total_supply,
    })
}

pub fn product(id: i64, name: &str, price: f64) -> Value {
    json!({
        "productId": id,
        "productName": name,
        "category": "Hardware",
        "price": price,
        "supplier": { "supplierId": 1, "name": "Acme" },
    })
}

pub fn inventory(id: i64, product_id: i64, quantity: i64, minimum_stock: i64) -> Value {
    json!({
        "inventoryId": id,
        "product": product(product_id, "Widget", 2.5),
        "quantity": quantity,
        "minimumStock": minimum_stock,
        "warehouseLocation": 4,
    })
}
