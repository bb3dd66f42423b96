use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::stock::{check_warehouse_capacity, restock_cost};
use super::{invalid_amount, parse_amount, Outcome, View};
use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{NewRestock, Product, RestockOrder};

pub const OVER_CAPACITY: &str = "This change will place the warehouse over capacity!";

#[derive(Clone, Debug, Default)]
pub struct RestockDraft {
    pub warehouse_ids: Vec<i64>,
    pub product_id: Option<i64>,
    pub amount: String,
}

/// Product details and total cost shown before a restock is confirmed.
#[derive(Clone, Debug, Serialize)]
pub struct RestockPreview {
    pub product: Product,
    pub amount: i64,
    pub total_cost: Decimal,
}

#[derive(Clone)]
pub struct RestockService {
    backend: Arc<dyn InventoryBackend>,
}

impl RestockService {
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<RestockOrder>, ServiceError> {
        self.backend.list_restocks().await
    }

    pub async fn preview(&self, product_id: i64, amount: i64) -> Result<RestockPreview, ServiceError> {
        let product = self.backend.get_product(product_id).await?;
        let total_cost = restock_cost(&product, amount).ok_or_else(invalid_amount)?;
        Ok(RestockPreview {
            product,
            amount,
            total_cost,
        })
    }

    /// Orders `amount` units of the product into every selected warehouse.
    ///
    /// All warehouses are capacity-checked first; nothing is posted unless
    /// every one of them has room.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        draft: RestockDraft,
        ordered_by: Option<String>,
    ) -> Result<Outcome, ServiceError> {
        let product_id = match draft.product_id {
            Some(id) if !draft.warehouse_ids.is_empty() => id,
            _ => {
                return Err(ServiceError::ValidationError(
                    "Please select a warehouse and a product.".to_string(),
                ))
            }
        };
        let amount = parse_amount(&draft.amount)?;

        // One order per warehouse, however often it was selected.
        let mut seen = HashSet::new();
        let warehouse_ids: Vec<i64> = draft
            .warehouse_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();

        let fits = join_all(
            warehouse_ids
                .iter()
                .map(|id| check_warehouse_capacity(self.backend.as_ref(), *id, amount)),
        )
        .await;
        if fits.iter().any(|fits| !fits) {
            warn!(product_id, amount, "restock rejected: over capacity");
            return Err(ServiceError::OverCapacity(OVER_CAPACITY.to_string()));
        }

        for warehouse_id in &warehouse_ids {
            let restock = NewRestock {
                warehouse_id: *warehouse_id,
                product_id,
                amount,
                ordered_by: ordered_by.clone(),
            };
            self.backend
                .create_restock(&restock)
                .await
                .map_err(|e| e.action_failed("Error creating restock order."))?;
        }

        info!(product_id, amount, warehouses = warehouse_ids.len(), "restock created");
        let message = if warehouse_ids.len() == 1 {
            "Restock created successfully!"
        } else {
            "Restock order(s) created successfully!"
        };
        Ok(Outcome::new(
            message,
            [
                View::Restocks,
                View::Warehouses,
                View::TotalInventory,
                View::LowStockCount,
            ],
        ))
    }
}
