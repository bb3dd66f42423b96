// Stateless helpers
pub mod stock;
pub mod validation;

// Entity workflows
pub mod checkouts;
pub mod inventory;
pub mod products;
pub mod restocks;
pub mod suppliers;
pub mod transfers;
pub mod warehouses;

use serde::Serialize;
use strum::Display;

use crate::errors::ServiceError;

/// A dashboard view whose data may be stale after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, Serialize)]
pub enum View {
    LowStockCount,
    TotalInventory,
    Warehouses,
    WarehouseInventory(i64),
    Products,
    Suppliers,
    Restocks,
    Checkouts,
}

/// Result of a successful workflow: the toast text and the views to refetch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outcome {
    pub message: String,
    pub refresh: Vec<View>,
}

impl Outcome {
    pub fn new(message: impl Into<String>, refresh: impl IntoIterator<Item = View>) -> Self {
        Self {
            message: message.into(),
            refresh: refresh.into_iter().collect(),
        }
    }
}

pub(crate) fn invalid_amount() -> ServiceError {
    ServiceError::ValidationError("Please enter a valid amount.".to_string())
}

/// Parses a strictly positive unit amount.
pub(crate) fn parse_amount(raw: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|amount| *amount > 0)
        .ok_or_else(invalid_amount)
}
