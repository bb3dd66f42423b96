use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::{BackendResult, InventoryBackend};
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{
    CheckoutRecord, InventoryRecord, LocationUpdate, LoginCredentials, NewCheckout, NewRestock,
    Product, ProductForm, ReduceInventoryRequest, RestockOrder, Supplier, SupplierForm,
    TransferRequest, User, Warehouse, WarehouseForm,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// reqwest-backed client for the inventory backend.
///
/// Requests carry the session cookie the same way the browser did with
/// `credentials: include`: a cookie jar shared by every call.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

impl HttpBackend {
    /// Build a backend using a reqwest client with the configured timeout.
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::with_timeout(&config.base_url, config.request_timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(timeout)
            .cookie_provider(cookies.clone())
            .build()
            .context("failed to construct reqwest client for inventory backend")?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
            cookies,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Restore a persisted `Cookie` header value (`NAME=value; NAME2=value2`).
    pub fn restore_session_cookie(&self, cookie_header: &str) {
        for pair in cookie_header.split(';') {
            let pair = pair.trim();
            if !pair.is_empty() {
                self.cookies.add_cookie_str(pair, &self.base_url);
            }
        }
    }

    /// Current `Cookie` header value for the backend, if any cookie was set.
    pub fn session_cookie(&self) -> Option<String> {
        self.cookies
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|value| !value.is_empty())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ServiceError> {
        let url = self.endpoint(path)?;
        let request_id = Uuid::new_v4().to_string();
        debug!(%method, %url, request_id = %request_id, "backend request");
        let mut builder = self.client.request(method, url);
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }
        Ok(builder)
    }

    /// Sends the request and converts any non-success status into a [`ServiceError`].
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ServiceError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, "backend request failed");
        Err(ServiceError::from_status(status, body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let response = self.execute(self.request(Method::GET, path)?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> BackendResult<()> {
        let builder = self
            .request(method, path)?
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.execute(builder).await?;
        Ok(())
    }

    async fn send_empty(&self, method: Method, path: &str) -> BackendResult<()> {
        self.execute(self.request(method, path)?).await?;
        Ok(())
    }
}

/// Ensures the base URL ends with `/` so that relative joins keep any path prefix.
fn normalize_base_url(raw: &str) -> Result<Url, ServiceError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Ok(Url::parse(&with_slash)?)
}

#[async_trait]
impl InventoryBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn current_user(&self) -> BackendResult<User> {
        self.get_json("users/current-user").await
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &LoginCredentials) -> BackendResult<()> {
        self.send_json(Method::POST, "users/login", credentials).await
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> BackendResult<()> {
        self.send_empty(Method::POST, "users/logout").await
    }

    #[instrument(skip(self))]
    async fn list_warehouses(&self) -> BackendResult<Vec<Warehouse>> {
        self.get_json("warehouses").await
    }

    #[instrument(skip(self))]
    async fn get_warehouse(&self, warehouse_id: i64) -> BackendResult<Warehouse> {
        self.get_json(&format!("warehouses/{}", warehouse_id)).await
    }

    #[instrument(skip(self))]
    async fn create_warehouse(&self, form: &WarehouseForm) -> BackendResult<()> {
        self.send_json(Method::POST, "warehouses/create_warehouse", form)
            .await
    }

    #[instrument(skip(self))]
    async fn edit_warehouse(&self, warehouse_id: i64, form: &WarehouseForm) -> BackendResult<()> {
        self.send_json(
            Method::PUT,
            &format!("warehouses/edit_warehouse/{}", warehouse_id),
            form,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_warehouse(&self, warehouse_id: i64) -> BackendResult<()> {
        self.send_empty(
            Method::DELETE,
            &format!("warehouses/delete_warehouse/{}", warehouse_id),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> BackendResult<Vec<Product>> {
        self.get_json("products").await
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product_id: i64) -> BackendResult<Product> {
        self.get_json(&format!("products/{}", product_id)).await
    }

    #[instrument(skip(self))]
    async fn create_product(&self, form: &ProductForm) -> BackendResult<()> {
        self.send_json(Method::POST, "products/create_product", form)
            .await
    }

    #[instrument(skip(self))]
    async fn edit_product(&self, product_id: i64, form: &ProductForm) -> BackendResult<()> {
        self.send_json(
            Method::PUT,
            &format!("products/edit_product/{}", product_id),
            form,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, product_id: i64) -> BackendResult<()> {
        self.send_empty(Method::DELETE, &format!("products/delete/{}", product_id))
            .await
    }

    #[instrument(skip(self))]
    async fn list_suppliers(&self) -> BackendResult<Vec<Supplier>> {
        self.get_json("suppliers").await
    }

    #[instrument(skip(self))]
    async fn create_supplier(&self, form: &SupplierForm) -> BackendResult<()> {
        self.send_json(Method::POST, "suppliers/create_supplier", form)
            .await
    }

    #[instrument(skip(self))]
    async fn edit_supplier(&self, supplier_id: i64, form: &SupplierForm) -> BackendResult<()> {
        self.send_json(
            Method::PUT,
            &format!("suppliers/edit_supplier/{}", supplier_id),
            form,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_supplier(&self, supplier_id: i64) -> BackendResult<()> {
        self.send_empty(Method::DELETE, &format!("suppliers/delete/{}", supplier_id))
            .await
    }

    #[instrument(skip(self))]
    async fn list_restocks(&self) -> BackendResult<Vec<RestockOrder>> {
        self.get_json("restocks").await
    }

    #[instrument(skip(self))]
    async fn create_restock(&self, restock: &NewRestock) -> BackendResult<()> {
        self.send_json(Method::POST, "restocks/create_restock", restock)
            .await
    }

    #[instrument(skip(self))]
    async fn list_checkouts(&self) -> BackendResult<Vec<CheckoutRecord>> {
        self.get_json("checkouts").await
    }

    #[instrument(skip(self))]
    async fn create_checkout(&self, checkout: &NewCheckout) -> BackendResult<()> {
        self.send_json(Method::POST, "checkouts/create_checkout", checkout)
            .await
    }

    #[instrument(skip(self))]
    async fn list_inventory(&self) -> BackendResult<Vec<InventoryRecord>> {
        self.get_json("inventory").await
    }

    #[instrument(skip(self))]
    async fn inventory_for_warehouse(
        &self,
        warehouse_id: i64,
    ) -> BackendResult<Vec<InventoryRecord>> {
        self.get_json(&format!("inventory/warehouse/{}", warehouse_id))
            .await
    }

    #[instrument(skip(self))]
    async fn inventory_for_product(&self, product_id: i64) -> BackendResult<Vec<InventoryRecord>> {
        self.get_json(&format!("inventory/product/{}", product_id))
            .await
    }

    #[instrument(skip(self))]
    async fn inventory_below_minimum(&self) -> BackendResult<Vec<InventoryRecord>> {
        self.get_json("inventory/below-minimum").await
    }

    #[instrument(skip(self))]
    async fn transfer_inventory(
        &self,
        inventory_id: i64,
        to_warehouse_id: i64,
        amount: i64,
    ) -> BackendResult<()> {
        self.send_json(
            Method::PUT,
            &format!("inventory/transfer/{}/{}", inventory_id, to_warehouse_id),
            &TransferRequest { amount },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn reduce_inventory(&self, request: &ReduceInventoryRequest) -> BackendResult<()> {
        self.send_json(Method::PUT, "inventory/reduce", request).await
    }

    #[instrument(skip(self))]
    async fn update_location_and_min_stock(
        &self,
        inventory_id: i64,
        update: &LocationUpdate,
    ) -> BackendResult<()> {
        self.send_json(
            Method::PUT,
            &format!("inventory/update_locationAndMinStock/{}", inventory_id),
            update,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_inventory(&self, inventory_id: i64) -> BackendResult<()> {
        self.send_empty(Method::DELETE, &format!("inventory/delete/{}", inventory_id))
            .await
    }
}
