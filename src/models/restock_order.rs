use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Product, Warehouse};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestockOrder {
    pub restock_id: i64,
    pub product: Option<Product>,
    pub warehouse: Option<Warehouse>,
    pub amount: i64,
    pub restock_date: Option<NaiveDateTime>,
    pub ordered_by: Option<String>,
}

/// Body for `POST /restocks/create_restock`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestock {
    pub warehouse_id: i64,
    pub product_id: i64,
    pub amount: i64,
    pub ordered_by: Option<String>,
}
