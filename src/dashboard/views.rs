//! List views: fetch a collection and turn it into a [`Table`].
//!
//! The table builders are pure so they can be tested without a backend; the
//! `load_*` functions add the fetch and map failures to [`Listing::Failed`].

use chrono::NaiveDateTime;
use console::style;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::error;

use super::table::{Column, ColumnKind, Table};
use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{CheckoutRecord, InventoryRecord, Product, RestockOrder, Supplier, Warehouse};
use crate::services::stock::{is_near_capacity, product_totals};
use crate::services::validation::format_phone;

pub const LOAD_ERROR: &str = "Error loading data";

const UNKNOWN_ITEM: &str = "Unknown Item";
const UNKNOWN_WAREHOUSE: &str = "Unknown Warehouse";
const NOT_AVAILABLE: &str = "N/A";

/// What a list view shows after a fetch.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Listing {
    Rows(Table),
    Empty(&'static str),
    Failed(String),
}

impl Listing {
    fn from_table(table: Table, placeholder: &'static str) -> Self {
        if table.is_empty() {
            Listing::Empty(placeholder)
        } else {
            Listing::Rows(table)
        }
    }

    fn failed(view: &str, err: &ServiceError) -> Self {
        error!(view, error = %err, "Error loading view");
        Listing::Failed(LOAD_ERROR.to_string())
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            Listing::Rows(table) => Some(table),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Listing::Rows(table) => Some(table),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Listing::Rows(table) => table.render(),
            Listing::Empty(placeholder) => placeholder.to_string(),
            Listing::Failed(message) => style(message).red().to_string(),
        }
    }
}

/// `1234567` -> `1,234,567`
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

pub fn format_price(price: Decimal) -> String {
    format!("${:.2}", price.round_dp(2))
}

pub fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn product_name(product: Option<&Product>) -> String {
    product
        .map(|p| p.product_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_ITEM.to_string())
}

fn warehouse_name(warehouse: Option<&Warehouse>) -> String {
    warehouse
        .map(|w| w.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_WAREHOUSE.to_string())
}

fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Restocks, newest first.
pub fn restocks_table(restocks: &[RestockOrder]) -> Table {
    let mut table = Table::new(vec![
        Column::new("ID", ColumnKind::Numeric),
        Column::text("Item"),
        Column::new("Amount", ColumnKind::Numeric).unsearchable(),
        Column::text("Warehouse"),
        Column::new("Date", ColumnKind::Date).unsearchable(),
        Column::text("Ordered By"),
    ]);
    for order in restocks.iter().rev() {
        table.push_row(vec![
            order.restock_id.to_string(),
            product_name(order.product.as_ref()),
            order.amount.to_string(),
            warehouse_name(order.warehouse.as_ref()),
            format_date(order.restock_date),
            or_na(order.ordered_by.as_deref()),
        ]);
    }
    table
}

pub fn warehouses_table(warehouses: &[Warehouse], near_capacity_threshold: f64) -> Table {
    let mut table = Table::new(vec![
        Column::text("Name"),
        Column::text("Location"),
        Column::new("Total Supply", ColumnKind::Numeric),
        Column::new("Capacity", ColumnKind::Numeric),
    ]);
    for w in warehouses {
        let flagged = is_near_capacity(
            w.total_supply_or_zero(),
            w.capacity_or_zero(),
            near_capacity_threshold,
        );
        let capacity = match w.capacity {
            Some(capacity) if capacity != 0 => format_count(capacity),
            _ => NOT_AVAILABLE.to_string(),
        };
        table.push(
            vec![
                w.name.clone(),
                w.location.clone(),
                format_count(w.total_supply_or_zero()),
                capacity,
            ],
            flagged,
        );
    }
    table
}

/// `totals[i]` is the stock of `products[i]` across all warehouses.
pub fn products_table(products: &[Product], totals: &[i64]) -> Table {
    let mut table = Table::new(vec![
        Column::new("SKU", ColumnKind::Numeric),
        Column::text("Name"),
        Column::new("Price", ColumnKind::Price).unsearchable(),
        Column::text("Category"),
        Column::text("Supplier"),
        Column::new("Total Stock", ColumnKind::Numeric).unsearchable(),
    ]);
    for (idx, product) in products.iter().enumerate() {
        let total = totals.get(idx).copied().unwrap_or(0);
        table.push_row(vec![
            product.sku().to_string(),
            product.product_name.clone(),
            format_price(product.price),
            product.category_or_na().to_string(),
            product.supplier_label(),
            format_count(total),
        ]);
    }
    table
}

pub fn suppliers_table(suppliers: &[Supplier]) -> Table {
    let mut table = Table::new(vec![
        Column::text("Name"),
        Column::text("Email"),
        Column::text("Phone"),
        Column::text("Address"),
    ]);
    for s in suppliers {
        table.push_row(vec![
            s.name.clone(),
            or_na(s.contact_email.as_deref()),
            s.phone
                .as_deref()
                .map(format_phone)
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            or_na(s.address.as_deref()),
        ]);
    }
    table
}

pub fn checkouts_table(checkouts: &[CheckoutRecord]) -> Table {
    let mut table = Table::new(vec![
        Column::new("ID", ColumnKind::Numeric),
        Column::text("Item"),
        Column::new("Amount", ColumnKind::Numeric).unsearchable(),
        Column::text("Warehouse"),
        Column::new("Date", ColumnKind::Date).unsearchable(),
        Column::text("Checked Out By"),
    ]);
    for co in checkouts {
        table.push_row(vec![
            co.checkout_id.to_string(),
            product_name(co.product.as_ref()),
            co.amount.to_string(),
            warehouse_name(co.warehouse.as_ref()),
            format_date(co.checkout_date),
            or_na(co.user_email.as_deref()),
        ]);
    }
    table
}

pub fn warehouse_inventory_table(records: &[InventoryRecord]) -> Table {
    let mut table = Table::new(vec![
        Column::new("SKU", ColumnKind::Numeric),
        Column::text("Name"),
        Column::new("Quantity", ColumnKind::Numeric).unsearchable(),
        Column::new("Price", ColumnKind::Price).unsearchable(),
        Column::text("Category"),
        Column::text("Supplier"),
        Column::text("Section"),
        Column::new("Min Stock", ColumnKind::Numeric).unsearchable(),
    ]);
    for r in records {
        table.push(
            vec![
                r.product.sku().to_string(),
                r.product.product_name.clone(),
                format_count(r.quantity),
                format_price(r.product.price),
                r.product.category_or_na().to_string(),
                r.product.supplier_label(),
                r.section_label(),
                format_count(r.minimum_stock),
            ],
            r.is_below_minimum(),
        );
    }
    table
}

pub async fn load_restocks(backend: &dyn InventoryBackend) -> Listing {
    match backend.list_restocks().await {
        Ok(restocks) => Listing::from_table(restocks_table(&restocks), "No restock orders found."),
        Err(e) => Listing::failed("restocks", &e),
    }
}

pub async fn load_warehouses(backend: &dyn InventoryBackend, near_capacity_threshold: f64) -> Listing {
    match backend.list_warehouses().await {
        Ok(warehouses) => Listing::from_table(
            warehouses_table(&warehouses, near_capacity_threshold),
            "No warehouses found.",
        ),
        Err(e) => Listing::failed("warehouses", &e),
    }
}

/// Products with their total stock; one stock fetch per product, run concurrently.
pub async fn load_products(backend: &dyn InventoryBackend) -> Listing {
    match backend.list_products().await {
        Ok(products) => {
            let ids: Vec<i64> = products.iter().map(|p| p.product_id).collect();
            let totals = product_totals(backend, &ids).await;
            Listing::from_table(products_table(&products, &totals), "No products found.")
        }
        Err(e) => Listing::failed("products", &e),
    }
}

pub async fn load_suppliers(backend: &dyn InventoryBackend) -> Listing {
    match backend.list_suppliers().await {
        Ok(suppliers) => Listing::from_table(suppliers_table(&suppliers), "No suppliers found."),
        Err(e) => Listing::failed("suppliers", &e),
    }
}

pub async fn load_checkouts(backend: &dyn InventoryBackend) -> Listing {
    match backend.list_checkouts().await {
        Ok(checkouts) => Listing::from_table(checkouts_table(&checkouts), "No checkouts found."),
        Err(e) => Listing::failed("checkouts", &e),
    }
}

pub async fn load_warehouse_inventory(backend: &dyn InventoryBackend, warehouse_id: i64) -> Listing {
    match backend.inventory_for_warehouse(warehouse_id).await {
        Ok(records) => Listing::from_table(
            warehouse_inventory_table(&records),
            "No inventory found for this warehouse.",
        ),
        Err(e) => Listing::failed("warehouse inventory", &e),
    }
}
