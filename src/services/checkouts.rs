use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::stock::check_if_in_stock;
use super::{parse_amount, Outcome, View};
use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{CheckoutRecord, NewCheckout, ReduceInventoryRequest};

pub const NOT_ENOUGH_STOCK: &str = "Not enough stock available.";

#[derive(Clone, Debug, Default)]
pub struct CheckoutDraft {
    pub warehouse_id: i64,
    pub product_id: i64,
    pub amount: String,
}

#[derive(Clone)]
pub struct CheckoutService {
    backend: Arc<dyn InventoryBackend>,
}

impl CheckoutService {
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<CheckoutRecord>, ServiceError> {
        self.backend.list_checkouts().await
    }

    /// Records the checkout and then takes the units out of the warehouse.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        draft: CheckoutDraft,
        email: Option<String>,
    ) -> Result<Outcome, ServiceError> {
        let amount = parse_amount(&draft.amount)?;

        if !check_if_in_stock(
            self.backend.as_ref(),
            draft.warehouse_id,
            draft.product_id,
            amount,
        )
        .await
        {
            warn!(
                warehouse_id = draft.warehouse_id,
                product_id = draft.product_id,
                amount,
                "checkout rejected: not enough stock"
            );
            return Err(ServiceError::InsufficientStock(NOT_ENOUGH_STOCK.to_string()));
        }

        let checkout = NewCheckout {
            warehouse_id: draft.warehouse_id,
            product_id: draft.product_id,
            amount,
            email,
        };
        self.backend
            .create_checkout(&checkout)
            .await
            .map_err(|e| e.action_failed("Checkout failed."))?;

        let reduce = ReduceInventoryRequest {
            warehouse_id: draft.warehouse_id,
            product_id: draft.product_id,
            amount,
        };
        self.backend
            .reduce_inventory(&reduce)
            .await
            .map_err(|e| e.action_failed("Failed to update inventory."))?;

        info!(
            warehouse_id = draft.warehouse_id,
            product_id = draft.product_id,
            amount,
            "checkout recorded"
        );
        Ok(Outcome::new(
            "Checkout successful!",
            [
                View::Checkouts,
                View::Warehouses,
                View::TotalInventory,
                View::LowStockCount,
                View::WarehouseInventory(draft.warehouse_id),
            ],
        ))
    }
}
