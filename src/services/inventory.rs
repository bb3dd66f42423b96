use std::sync::Arc;

use tracing::{info, instrument};

use super::{Outcome, View};
use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{InventoryRecord, LocationUpdate};

/// Shelf section and minimum stock as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct LocationDraft {
    pub warehouse_location: String,
    pub minimum_stock: String,
}

impl LocationDraft {
    pub fn into_update(self) -> Result<LocationUpdate, ServiceError> {
        let minimum_stock = self
            .minimum_stock
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|min| *min >= 0)
            .ok_or_else(|| {
                ServiceError::ValidationError("Please enter a valid minimum stock value.".to_string())
            })?;

        let warehouse_location = self
            .warehouse_location
            .trim()
            .parse::<i64>()
            .map_err(|_| {
                ServiceError::ValidationError("Please enter a valid warehouse location.".to_string())
            })?;

        Ok(LocationUpdate {
            warehouse_location,
            minimum_stock,
        })
    }
}

/// Per-warehouse inventory records and the edits made from the inventory view.
#[derive(Clone)]
pub struct InventoryService {
    backend: Arc<dyn InventoryBackend>,
}

impl InventoryService {
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn for_warehouse(&self, warehouse_id: i64) -> Result<Vec<InventoryRecord>, ServiceError> {
        self.backend.inventory_for_warehouse(warehouse_id).await
    }

    pub async fn below_minimum(&self) -> Result<Vec<InventoryRecord>, ServiceError> {
        self.backend.inventory_below_minimum().await
    }

    #[instrument(skip(self))]
    pub async fn update_location(
        &self,
        warehouse_id: i64,
        inventory_id: i64,
        draft: LocationDraft,
    ) -> Result<Outcome, ServiceError> {
        let update = draft.into_update()?;
        self.backend
            .update_location_and_min_stock(inventory_id, &update)
            .await
            .map_err(|e| e.action_failed("Failed to update inventory location."))?;
        info!(inventory_id, ?update, "inventory location updated");
        Ok(Outcome::new(
            "Inventory location and minimum stock updated successfully!",
            [View::LowStockCount, View::WarehouseInventory(warehouse_id)],
        ))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, inventory_id: i64) -> Result<Outcome, ServiceError> {
        self.backend
            .delete_inventory(inventory_id)
            .await
            .map_err(|e| e.action_failed("Error deleting inventory item."))?;
        Ok(Outcome::new(
            "Inventory item deleted successfully!",
            [View::LowStockCount, View::TotalInventory, View::Warehouses],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(location: &str, minimum: &str) -> LocationDraft {
        LocationDraft {
            warehouse_location: location.into(),
            minimum_stock: minimum.into(),
        }
    }

    #[test]
    fn parses_location_and_minimum() {
        let update = draft(" 14 ", "0").into_update().unwrap();
        assert_eq!(update.warehouse_location, 14);
        assert_eq!(update.minimum_stock, 0);
    }

    #[test]
    fn minimum_is_checked_before_location() {
        let err = draft("", "-1").into_update().unwrap_err();
        assert_eq!(err.toast_message(), "Please enter a valid minimum stock value.");

        let err = draft("aisle 4", "3").into_update().unwrap_err();
        assert_eq!(err.toast_message(), "Please enter a valid warehouse location.");
    }
}
