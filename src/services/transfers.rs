//! Moving stock of one inventory record to another warehouse.
//!
//! The workflow is a small state machine:
//!
//! ```text
//! Closed -> WarehousesLoaded -> AmountEntered -> Submitted
//! ```
//!
//! `open` loads the destination candidates with their live stock of the
//! product. `submit` validates locally, runs the capacity check on the
//! destination and the stock check on the source, and only then issues the
//! transfer. Nothing guards the gap between the checks and the mutation;
//! the backend has the final word.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use strum::Display;
use tracing::{error, info, instrument, warn};

use super::stock::{check_if_in_stock, check_warehouse_capacity, quantity_of};
use super::{invalid_amount, Outcome, View};
use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{InventoryRecord, Warehouse};

pub const OVER_CAPACITY: &str = "This change will place a selected warehouse(s) over capacity!";
pub const INSUFFICIENT_STOCK: &str = "Insufficient stock to transfer the requested amount.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum TransferState {
    Closed,
    WarehousesLoaded,
    AmountEntered,
    Submitted,
}

/// A destination warehouse and how much of the product it already holds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferCandidate {
    pub warehouse: Warehouse,
    pub quantity: i64,
}

impl TransferCandidate {
    pub fn label(&self) -> String {
        format!("{} ({} in stock)", self.warehouse.name, self.quantity)
    }
}

pub struct TransferWorkflow {
    backend: Arc<dyn InventoryBackend>,
    source_warehouse_id: i64,
    record: InventoryRecord,
    state: TransferState,
    candidates: Vec<TransferCandidate>,
    amount: Option<i64>,
    destination: Option<i64>,
}

impl TransferWorkflow {
    pub fn new(
        backend: Arc<dyn InventoryBackend>,
        source_warehouse_id: i64,
        record: InventoryRecord,
    ) -> Self {
        Self {
            backend,
            source_warehouse_id,
            record,
            state: TransferState::Closed,
            candidates: Vec::new(),
            amount: None,
            destination: None,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            TransferState::WarehousesLoaded | TransferState::AmountEntered
        )
    }

    pub fn candidates(&self) -> &[TransferCandidate] {
        &self.candidates
    }

    pub fn record(&self) -> &InventoryRecord {
        &self.record
    }

    /// Loads every other warehouse, annotated with its stock of this product.
    /// A warehouse whose inventory cannot be fetched shows zero.
    #[instrument(skip(self), fields(inventory_id = self.record.inventory_id))]
    pub async fn open(&mut self) -> Result<&[TransferCandidate], ServiceError> {
        let warehouses = self.backend.list_warehouses().await?;
        let product_id = self.record.product.product_id;
        let backend = self.backend.as_ref();

        let candidates = join_all(
            warehouses
                .into_iter()
                .filter(|w| w.warehouse_id != self.source_warehouse_id)
                .map(move |warehouse| async move {
                    let quantity =
                        match backend.inventory_for_warehouse(warehouse.warehouse_id).await {
                            Ok(records) => quantity_of(&records, product_id),
                            Err(e) => {
                                error!(
                                    warehouse_id = warehouse.warehouse_id,
                                    error = %e,
                                    "Error loading warehouse stock"
                                );
                                0
                            }
                        };
                    TransferCandidate { warehouse, quantity }
                }),
        )
        .await;

        self.candidates = candidates;
        self.amount = None;
        self.destination = None;
        self.state = TransferState::WarehousesLoaded;
        Ok(&self.candidates)
    }

    /// Stores the amount as typed. It is validated on submit.
    pub fn enter_amount(&mut self, raw: &str) -> Result<(), ServiceError> {
        self.ensure_open()?;
        self.amount = raw.trim().parse::<i64>().ok();
        self.state = TransferState::AmountEntered;
        Ok(())
    }

    pub fn select_destination(&mut self, warehouse_id: i64) -> Result<(), ServiceError> {
        self.ensure_open()?;
        if !self
            .candidates
            .iter()
            .any(|c| c.warehouse.warehouse_id == warehouse_id)
        {
            return Err(ServiceError::ValidationError(
                "Select a warehouse to transfer to.".to_string(),
            ));
        }
        self.destination = Some(warehouse_id);
        Ok(())
    }

    pub fn close(&mut self) {
        self.state = TransferState::Closed;
        self.amount = None;
        self.destination = None;
    }

    #[instrument(skip(self), fields(inventory_id = self.record.inventory_id))]
    pub async fn submit(&mut self) -> Result<Outcome, ServiceError> {
        self.ensure_open()?;

        let amount = match self.amount {
            Some(amount) if amount > 0 => amount,
            _ => return Err(invalid_amount()),
        };
        let destination = self.destination.ok_or_else(|| {
            ServiceError::ValidationError("Select a warehouse to transfer to.".to_string())
        })?;

        if !check_warehouse_capacity(self.backend.as_ref(), destination, amount).await {
            warn!(destination, amount, "transfer rejected: destination over capacity");
            self.close();
            return Err(ServiceError::OverCapacity(OVER_CAPACITY.to_string()));
        }

        if !check_if_in_stock(
            self.backend.as_ref(),
            self.source_warehouse_id,
            self.record.product.product_id,
            amount,
        )
        .await
        {
            warn!(amount, "transfer rejected: insufficient stock at source");
            return Err(ServiceError::InsufficientStock(INSUFFICIENT_STOCK.to_string()));
        }

        self.backend
            .transfer_inventory(self.record.inventory_id, destination, amount)
            .await
            .map_err(|e| e.action_failed("Error transferring inventory."))?;

        info!(destination, amount, "inventory transferred");
        self.state = TransferState::Submitted;
        Ok(Outcome::new(
            "Inventory transferred successfully!",
            [
                View::LowStockCount,
                View::Warehouses,
                View::TotalInventory,
                View::WarehouseInventory(self.source_warehouse_id),
            ],
        ))
    }

    fn ensure_open(&self) -> Result<(), ServiceError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(format!(
                "Transfer is not open ({})",
                self.state
            )))
        }
    }
}
