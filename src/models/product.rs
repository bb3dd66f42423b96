use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Supplier;

/// Multiplier the dashboard uses to turn a product id into its displayed SKU.
pub const SKU_MULTIPLIER: i64 = 12345;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub supplier: Option<Supplier>,
}

impl Product {
    pub fn sku(&self) -> i64 {
        self.product_id * SKU_MULTIPLIER
    }

    pub fn supplier_label(&self) -> String {
        self.supplier
            .as_ref()
            .map(Supplier::label)
            .unwrap_or_else(|| "Unknown Supplier".to_string())
    }

    pub fn category_or_na(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("N/A")
    }
}

/// Body for `POST /products/create_product` and `PUT /products/edit_product/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[validate(length(min = 1))]
    pub product_name: String,

    #[validate(length(min = 1))]
    pub category: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    pub supplier_id: Option<i64>,
}
