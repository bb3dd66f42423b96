use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use super::{Outcome, View};
use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{Warehouse, WarehouseForm};

const FILL_ALL_FIELDS: &str = "Please fill out all fields.";

/// Warehouse form input as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct WarehouseDraft {
    pub name: String,
    pub location: String,
    pub capacity: String,
}

impl WarehouseDraft {
    pub fn into_form(self) -> Result<WarehouseForm, ServiceError> {
        let name = self.name.trim();
        let location = self.location.trim();
        let capacity = self
            .capacity
            .trim()
            .parse::<i64>()
            .map_err(|_| ServiceError::ValidationError(FILL_ALL_FIELDS.to_string()))?;

        if name.is_empty() || location.is_empty() {
            return Err(ServiceError::ValidationError(FILL_ALL_FIELDS.to_string()));
        }

        let form = WarehouseForm {
            name: name.to_string(),
            location: location.to_string(),
            capacity,
        };
        form.validate()?;
        Ok(form)
    }
}

/// Create, edit and delete warehouses.
#[derive(Clone)]
pub struct WarehouseService {
    backend: Arc<dyn InventoryBackend>,
}

impl WarehouseService {
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<Warehouse>, ServiceError> {
        self.backend.list_warehouses().await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, draft: WarehouseDraft) -> Result<Outcome, ServiceError> {
        let form = draft.into_form()?;
        self.backend
            .create_warehouse(&form)
            .await
            .map_err(|e| e.action_failed("Failed to create warehouse."))?;
        info!(name = %form.name, "warehouse created");
        Ok(Outcome::new("Warehouse created successfully!", [View::Warehouses]))
    }

    #[instrument(skip(self))]
    pub async fn edit(
        &self,
        warehouse_id: i64,
        draft: WarehouseDraft,
    ) -> Result<Outcome, ServiceError> {
        let form = draft.into_form()?;
        self.backend
            .edit_warehouse(warehouse_id, &form)
            .await
            .map_err(|e| e.action_failed("Failed to update warehouse."))?;
        Ok(Outcome::new("Warehouse updated successfully!", [View::Warehouses]))
    }

    /// Deletes every selected warehouse, stopping at the first failure.
    #[instrument(skip(self))]
    pub async fn delete_many(&self, warehouse_ids: &[i64]) -> Result<Outcome, ServiceError> {
        if warehouse_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "Please select at least one warehouse to delete.".to_string(),
            ));
        }

        for id in warehouse_ids {
            self.backend
                .delete_warehouse(*id)
                .await
                .map_err(|e| e.action_failed("Error deleting warehouse(s)."))?;
        }
        info!(count = warehouse_ids.len(), "warehouses deleted");
        Ok(Outcome::new(
            "Selected warehouse(s) deleted successfully!",
            [View::Warehouses, View::TotalInventory, View::LowStockCount],
        ))
    }
}
