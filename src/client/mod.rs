//! Backend access for the dashboard.
//!
//! [`InventoryBackend`] has one method per REST endpoint the dashboard calls.
//! [`HttpBackend`] is the real implementation. Checkers, workflows and views
//! only see the trait.

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::models::{
    CheckoutRecord, InventoryRecord, LocationUpdate, LoginCredentials, NewCheckout, NewRestock,
    Product, ProductForm, ReduceInventoryRequest, RestockOrder, Supplier, SupplierForm, User,
    Warehouse, WarehouseForm,
};

pub mod http;
pub mod session;

pub use http::HttpBackend;
pub use session::{SessionStore, StoredSession};

pub type BackendResult<T> = Result<T, ServiceError>;

#[async_trait]
pub trait InventoryBackend: Send + Sync {
    // Session
    async fn current_user(&self) -> BackendResult<User>;
    async fn login(&self, credentials: &LoginCredentials) -> BackendResult<()>;
    async fn logout(&self) -> BackendResult<()>;

    // Warehouses
    async fn list_warehouses(&self) -> BackendResult<Vec<Warehouse>>;
    async fn get_warehouse(&self, warehouse_id: i64) -> BackendResult<Warehouse>;
    async fn create_warehouse(&self, form: &WarehouseForm) -> BackendResult<()>;
    async fn edit_warehouse(&self, warehouse_id: i64, form: &WarehouseForm) -> BackendResult<()>;
    async fn delete_warehouse(&self, warehouse_id: i64) -> BackendResult<()>;

    // Products
    async fn list_products(&self) -> BackendResult<Vec<Product>>;
    async fn get_product(&self, product_id: i64) -> BackendResult<Product>;
    async fn create_product(&self, form: &ProductForm) -> BackendResult<()>;
    async fn edit_product(&self, product_id: i64, form: &ProductForm) -> BackendResult<()>;
    async fn delete_product(&self, product_id: i64) -> BackendResult<()>;

    // Suppliers
    async fn list_suppliers(&self) -> BackendResult<Vec<Supplier>>;
    async fn create_supplier(&self, form: &SupplierForm) -> BackendResult<()>;
    async fn edit_supplier(&self, supplier_id: i64, form: &SupplierForm) -> BackendResult<()>;
    async fn delete_supplier(&self, supplier_id: i64) -> BackendResult<()>;

    // Restocks and checkouts
    async fn list_restocks(&self) -> BackendResult<Vec<RestockOrder>>;
    async fn create_restock(&self, restock: &NewRestock) -> BackendResult<()>;
    async fn list_checkouts(&self) -> BackendResult<Vec<CheckoutRecord>>;
    async fn create_checkout(&self, checkout: &NewCheckout) -> BackendResult<()>;

    // Inventory
    async fn list_inventory(&self) -> BackendResult<Vec<InventoryRecord>>;
    async fn inventory_for_warehouse(&self, warehouse_id: i64)
        -> BackendResult<Vec<InventoryRecord>>;
    async fn inventory_for_product(&self, product_id: i64) -> BackendResult<Vec<InventoryRecord>>;
    async fn inventory_below_minimum(&self) -> BackendResult<Vec<InventoryRecord>>;
    async fn transfer_inventory(
        &self,
        inventory_id: i64,
        to_warehouse_id: i64,
        amount: i64,
    ) -> BackendResult<()>;
    async fn reduce_inventory(&self, request: &ReduceInventoryRequest) -> BackendResult<()>;
    async fn update_location_and_min_stock(
        &self,
        inventory_id: i64,
        update: &LocationUpdate,
    ) -> BackendResult<()>;
    async fn delete_inventory(&self, inventory_id: i64) -> BackendResult<()>;
}
