use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};
use validator::Validate;

use super::{Outcome, View};
use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{Product, ProductForm};

const FILL_ALL_FIELDS: &str = "Please fill out all fields.";
const DUPLICATE_NAME: &str = "Product with this name already exists.";

const PRODUCT_REFRESH: [View; 3] = [View::Products, View::Warehouses, View::TotalInventory];

#[derive(Clone, Debug, Default)]
pub struct ProductDraft {
    pub product_name: String,
    pub category: String,
    pub price: String,
    pub supplier_id: Option<i64>,
}

impl ProductDraft {
    /// A new product needs a name, a category and a positive price.
    pub fn into_new_form(self) -> Result<ProductForm, ServiceError> {
        let form = self.into_form()?;
        if form.price <= Decimal::ZERO {
            return Err(fill_all_fields());
        }
        Ok(form)
    }

    /// An edited product keeps the price as typed but must name a supplier.
    pub fn into_edit_form(self) -> Result<ProductForm, ServiceError> {
        let form = self.into_form()?;
        if form.supplier_id.is_none() {
            return Err(fill_all_fields());
        }
        Ok(form)
    }

    fn into_form(self) -> Result<ProductForm, ServiceError> {
        let product_name = self.product_name.trim();
        let category = self.category.trim();
        if product_name.is_empty() || category.is_empty() {
            return Err(fill_all_fields());
        }
        let price = Decimal::from_str(self.price.trim()).map_err(|_| fill_all_fields())?;

        let form = ProductForm {
            product_name: product_name.to_string(),
            category: category.to_string(),
            price,
            supplier_id: self.supplier_id,
        };
        form.validate()?;
        Ok(form)
    }
}

fn fill_all_fields() -> ServiceError {
    ServiceError::ValidationError(FILL_ALL_FIELDS.to_string())
}

#[derive(Clone)]
pub struct ProductService {
    backend: Arc<dyn InventoryBackend>,
}

impl ProductService {
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.backend.list_products().await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Outcome, ServiceError> {
        let form = draft.into_new_form()?;
        self.backend
            .create_product(&form)
            .await
            .map_err(|e| match e {
                ServiceError::Conflict(_) => ServiceError::Conflict(DUPLICATE_NAME.to_string()),
                other => other.action_failed("Failed to create product."),
            })?;
        info!(name = %form.product_name, "product created");
        Ok(Outcome::new("Product created successfully!", PRODUCT_REFRESH))
    }

    #[instrument(skip(self))]
    pub async fn edit(&self, product_id: i64, draft: ProductDraft) -> Result<Outcome, ServiceError> {
        let form = draft.into_edit_form()?;
        self.backend
            .edit_product(product_id, &form)
            .await
            .map_err(|e| e.action_failed("Failed to update product."))?;
        Ok(Outcome::new("Product updated successfully!", PRODUCT_REFRESH))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, product_id: i64) -> Result<Outcome, ServiceError> {
        self.backend
            .delete_product(product_id)
            .await
            .map_err(|e| e.action_failed("Failed to delete product."))?;
        Ok(Outcome::new("Product deleted successfully!", PRODUCT_REFRESH))
    }
}
