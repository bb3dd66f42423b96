//! Capacity and stock checks run before restocks, transfers and checkouts,
//! plus the aggregates shown on the summary cards.

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{InventoryRecord, Product, Warehouse};

/// True when `additional_amount` more units still fit in the warehouse.
///
/// Fails closed: if either fetch fails, or the sum overflows, the answer is `false`.
#[instrument(skip(backend))]
pub async fn check_warehouse_capacity(
    backend: &dyn InventoryBackend,
    warehouse_id: i64,
    additional_amount: i64,
) -> bool {
    let (records, warehouse) = tokio::join!(
        backend.inventory_for_warehouse(warehouse_id),
        backend.get_warehouse(warehouse_id)
    );

    match (records, warehouse) {
        (Ok(records), Ok(warehouse)) => {
            let current = total_quantity(&records);
            let capacity = warehouse.capacity_or_zero();
            debug!(current, capacity, additional_amount, "capacity check");
            current
                .checked_add(additional_amount)
                .map_or(false, |projected| projected <= capacity)
        }
        (Err(e), _) | (_, Err(e)) => {
            error!(warehouse_id, error = %e, "Error checking warehouse capacity");
            false
        }
    }
}

/// True when the warehouse holds at least `required_amount` of the product.
/// A missing record counts as zero stock; a failed fetch as not in stock.
#[instrument(skip(backend))]
pub async fn check_if_in_stock(
    backend: &dyn InventoryBackend,
    warehouse_id: i64,
    product_id: i64,
    required_amount: i64,
) -> bool {
    match backend.inventory_for_warehouse(warehouse_id).await {
        Ok(records) => quantity_of(&records, product_id) >= required_amount,
        Err(e) => {
            error!(warehouse_id, product_id, error = %e, "Error checking stock");
            false
        }
    }
}

/// Quantity of `product_id` among `records`, zero when absent.
pub fn quantity_of(records: &[InventoryRecord], product_id: i64) -> i64 {
    records
        .iter()
        .find(|r| r.product.product_id == product_id)
        .map(|r| r.quantity)
        .unwrap_or(0)
}

/// Sum of quantities, saturating at `i64::MAX`.
pub fn total_quantity(records: &[InventoryRecord]) -> i64 {
    records
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.quantity))
}

/// A warehouse is near capacity once `total_supply / capacity` reaches `threshold`.
/// Warehouses without a positive capacity are never flagged.
pub fn is_near_capacity(total_supply: i64, capacity: i64, threshold: f64) -> bool {
    if capacity <= 0 {
        return false;
    }
    total_supply as f64 / capacity as f64 >= threshold
}

pub fn warehouses_near_capacity(warehouses: &[Warehouse], threshold: f64) -> usize {
    warehouses
        .iter()
        .filter(|w| is_near_capacity(w.total_supply_or_zero(), w.capacity_or_zero(), threshold))
        .count()
}

/// Cost of restocking `amount` units of `product`, `None` if it does not fit in a `Decimal`.
pub fn restock_cost(product: &Product, amount: i64) -> Option<Decimal> {
    product.price.checked_mul(Decimal::from(amount))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InventoryTotals {
    pub quantity: i64,
    pub value: Decimal,
}

impl InventoryTotals {
    pub fn from_records(records: &[InventoryRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            quantity: acc.quantity.saturating_add(r.quantity),
            value: acc.value.saturating_add(r.value()),
        })
    }
}

/// Total quantity and value across every warehouse.
#[instrument(skip(backend))]
pub async fn inventory_totals(
    backend: &dyn InventoryBackend,
) -> Result<InventoryTotals, ServiceError> {
    let records = backend.list_inventory().await?;
    Ok(InventoryTotals::from_records(&records))
}

/// Number of inventory records below their minimum stock.
#[instrument(skip(backend))]
pub async fn low_stock_count(backend: &dyn InventoryBackend) -> Result<usize, ServiceError> {
    Ok(backend.inventory_below_minimum().await?.len())
}

/// Stock of a product summed over all warehouses; zero when the fetch fails.
#[instrument(skip(backend))]
pub async fn product_total_quantity(backend: &dyn InventoryBackend, product_id: i64) -> i64 {
    match backend.inventory_for_product(product_id).await {
        Ok(records) => total_quantity(&records),
        Err(e) => {
            error!(product_id, error = %e, "Error loading product stock");
            0
        }
    }
}

/// [`product_total_quantity`] for many products at once, in input order.
pub async fn product_totals(backend: &dyn InventoryBackend, product_ids: &[i64]) -> Vec<i64> {
    join_all(
        product_ids
            .iter()
            .map(|id| product_total_quantity(backend, *id)),
    )
    .await
}
