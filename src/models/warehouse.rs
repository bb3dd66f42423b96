use serde::{Deserialize, Serialize};
use validator::Validate;

/// Warehouse as listed by `GET /warehouses`. `total_supply` is computed by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Warehouse {
    pub warehouse_id: i64,
    pub name: String,
    pub location: String,
    pub capacity: Option<i64>,
    pub total_supply: Option<i64>,
}

impl Warehouse {
    /// Capacity coerced to a number; a missing capacity counts as zero.
    pub fn capacity_or_zero(&self) -> i64 {
        self.capacity.unwrap_or(0)
    }

    pub fn total_supply_or_zero(&self) -> i64 {
        self.total_supply.unwrap_or(0)
    }
}

/// Body for `POST /warehouses/create_warehouse` and `PUT /warehouses/edit_warehouse/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1))]
    pub location: String,

    pub capacity: i64,
}
