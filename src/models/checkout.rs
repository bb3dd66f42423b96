use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Product, Warehouse};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRecord {
    pub checkout_id: i64,
    pub product: Option<Product>,
    pub warehouse: Option<Warehouse>,
    pub amount: i64,
    pub checkout_date: Option<NaiveDateTime>,
    pub user_email: Option<String>,
}

/// Body for `POST /checkouts/create_checkout`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckout {
    pub warehouse_id: i64,
    pub product_id: i64,
    pub amount: i64,
    pub email: Option<String>,
}
