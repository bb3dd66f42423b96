use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// One product's stock in one warehouse. The warehouse is implied by the endpoint
/// the record was fetched from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryRecord {
    pub inventory_id: i64,
    pub product: Product,
    pub quantity: i64,
    pub minimum_stock: i64,
    pub warehouse_location: Option<i64>,
    pub last_updated: Option<NaiveDateTime>,
}

impl InventoryRecord {
    pub fn is_below_minimum(&self) -> bool {
        self.quantity < self.minimum_stock
    }

    /// Stock value of this record at the product's unit price.
    pub fn value(&self) -> Decimal {
        self.product.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Shelf section label, `Section 0` when unassigned.
    pub fn section_label(&self) -> String {
        format!("Section {}", self.warehouse_location.unwrap_or(0))
    }
}

/// Body for `PUT /inventory/transfer/{inventoryId}/{warehouseId}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub amount: i64,
}

/// Body for `PUT /inventory/reduce`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReduceInventoryRequest {
    pub warehouse_id: i64,
    pub product_id: i64,
    pub amount: i64,
}

/// Body for `PUT /inventory/update_locationAndMinStock/{id}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub warehouse_location: i64,
    pub minimum_stock: i64,
}
