// Records exchanged with the inventory backend, camelCase on the wire.
pub mod checkout;
pub mod inventory;
pub mod product;
pub mod restock_order;
pub mod supplier;
pub mod user;
pub mod warehouse;

pub use checkout::{CheckoutRecord, NewCheckout};
pub use inventory::{InventoryRecord, LocationUpdate, ReduceInventoryRequest, TransferRequest};
pub use product::{Product, ProductForm, SKU_MULTIPLIER};
pub use restock_order::{NewRestock, RestockOrder};
pub use supplier::{Supplier, SupplierForm};
pub use user::{LoginCredentials, User};
pub use warehouse::{Warehouse, WarehouseForm};
