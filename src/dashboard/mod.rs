//! The dashboard shell: login gate, tabs, summary cards and toasts.

pub mod notifications;
pub mod table;
pub mod views;

use std::sync::Arc;

use console::style;
use rust_decimal::Decimal;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};
use tracing::{error, info, instrument};

use crate::client::InventoryBackend;
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{LoginCredentials, User};
use crate::services::stock::{inventory_totals, low_stock_count, warehouses_near_capacity};
use crate::services::{Outcome, View};

pub use notifications::{Toast, ToastLevel, ToastSender};
pub use table::{Column, ColumnKind, Row, SortDirection, Table};
pub use views::Listing;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tab {
    Restocks,
    Warehouses,
    Products,
    Suppliers,
    Checkouts,
}

/// The summary cards. A card whose fetch failed is `None` and renders as `Error`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub low_stock_count: Option<usize>,
    pub warehouses_near_capacity: Option<usize>,
    pub total_quantity: Option<i64>,
    pub total_value: Option<Decimal>,
}

impl Summary {
    pub fn render(&self) -> String {
        fn card<T: ToString>(label: &str, value: Option<T>, unit: &str) -> String {
            let value = match value {
                Some(v) => format!("{}{}", v.to_string(), unit),
                None => style("Error").red().to_string(),
            };
            format!("{:<26}{}", style(label).bold(), value)
        }

        [
            card("Low stock", self.low_stock_count.map(|c| c as i64).map(views::format_count), " items"),
            card("Near capacity", self.warehouses_near_capacity, " warehouses"),
            card("Total inventory", self.total_quantity.map(views::format_count), " units"),
            card("Inventory value", self.total_value.map(views::format_price), ""),
        ]
        .join("\n")
    }
}

/// Freshly loaded data for a view named in an [`Outcome`].
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Refreshed {
    Listing { name: String, listing: Listing },
    Summary(Summary),
}

pub struct Dashboard {
    backend: Arc<dyn InventoryBackend>,
    config: AppConfig,
    toasts: ToastSender,
    user: Option<User>,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn InventoryBackend>, config: AppConfig, toasts: ToastSender) -> Self {
        Self {
            backend,
            config,
            toasts,
            user: None,
        }
    }

    pub fn backend(&self) -> Arc<dyn InventoryBackend> {
        self.backend.clone()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_email(&self) -> Option<String> {
        self.user.as_ref().map(|u| u.email.clone())
    }

    /// Login gate: asks the backend who is logged in. Any failure means nobody.
    #[instrument(skip(self))]
    pub async fn require_login(&mut self) -> Result<&User, ServiceError> {
        match self.backend.current_user().await {
            Ok(user) => {
                info!(email = %user.email, "session active");
                Ok(self.user.insert(user))
            }
            Err(e) => {
                info!(error = %e, "no active session");
                self.user = None;
                Err(ServiceError::NotLoggedIn)
            }
        }
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&mut self, credentials: &LoginCredentials) -> Result<&User, ServiceError> {
        if let Err(e) = self.backend.login(credentials).await {
            let err = match e {
                ServiceError::Unauthorized(_) => {
                    ServiceError::Unauthorized("Invalid email or password.".to_string())
                }
                other => other.action_failed("Login failed."),
            };
            self.toast(Toast::new(login_error_message(&err), ToastLevel::Error)
                .with_duration(notifications::ERROR_DURATION))
            .await;
            return Err(err);
        }
        self.toast(Toast::success("Login successful!")).await;
        self.require_login().await
    }

    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<(), ServiceError> {
        self.user = None;
        self.backend.logout().await?;
        self.toast(Toast::info("Logged out.")).await;
        Ok(())
    }

    /// Queues a toast. Toasts left at the default duration get the configured one.
    pub async fn toast(&self, mut toast: Toast) {
        if toast.duration == notifications::DEFAULT_DURATION {
            toast.duration = self.config.toast_duration();
        }
        self.toasts.send(toast).await;
    }

    /// Reports a workflow result as a toast and hands it back.
    pub async fn finish(&self, result: Result<Outcome, ServiceError>) -> Result<Outcome, ServiceError> {
        if let Err(e) = &result {
            if !e.is_local() {
                let status = e.status_code().map(|s| s.as_u16());
                error!(error = %e, ?status, "workflow failed");
            }
        }
        self.toast(Toast::from_result(&result)).await;
        result
    }

    pub async fn open_tab(&self, tab: Tab) -> Listing {
        let backend = self.backend.as_ref();
        match tab {
            Tab::Restocks => views::load_restocks(backend).await,
            Tab::Warehouses => {
                views::load_warehouses(backend, self.config.near_capacity_threshold).await
            }
            Tab::Products => views::load_products(backend).await,
            Tab::Suppliers => views::load_suppliers(backend).await,
            Tab::Checkouts => views::load_checkouts(backend).await,
        }
    }

    pub async fn warehouse_inventory(&self, warehouse_id: i64) -> Listing {
        views::load_warehouse_inventory(self.backend.as_ref(), warehouse_id).await
    }

    /// Loads the summary cards concurrently; each card fails on its own.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Summary {
        let backend = self.backend.as_ref();
        let (low_stock, warehouses, totals) = tokio::join!(
            low_stock_count(backend),
            backend.list_warehouses(),
            inventory_totals(backend)
        );

        let low_stock_count = low_stock
            .map_err(|e| error!(error = %e, "Error fetching low-stock count"))
            .ok();
        let warehouses_near_capacity = warehouses
            .map(|w| warehouses_near_capacity(&w, self.config.near_capacity_threshold))
            .map_err(|e| error!(error = %e, "Error loading warehouses"))
            .ok();
        let totals = totals
            .map_err(|e| error!(error = %e, "Error loading inventory totals"))
            .ok();

        Summary {
            low_stock_count,
            warehouses_near_capacity,
            total_quantity: totals.map(|t| t.quantity),
            total_value: totals.map(|t| t.value),
        }
    }

    /// Reloads the views a workflow reported as stale. The count and total
    /// cards are folded into a single summary reload.
    pub async fn refresh(&self, views: &[View]) -> Vec<Refreshed> {
        let mut refreshed = Vec::new();
        let mut summary_done = false;
        for view in views {
            match view {
                View::LowStockCount | View::TotalInventory => {
                    if !summary_done {
                        summary_done = true;
                        refreshed.push(Refreshed::Summary(self.summary().await));
                    }
                }
                View::WarehouseInventory(id) => refreshed.push(Refreshed::Listing {
                    name: format!("warehouse {} inventory", id),
                    listing: self.warehouse_inventory(*id).await,
                }),
                View::Warehouses => refreshed.push(self.tab_listing(Tab::Warehouses).await),
                View::Products => refreshed.push(self.tab_listing(Tab::Products).await),
                View::Suppliers => refreshed.push(self.tab_listing(Tab::Suppliers).await),
                View::Restocks => refreshed.push(self.tab_listing(Tab::Restocks).await),
                View::Checkouts => refreshed.push(self.tab_listing(Tab::Checkouts).await),
            }
        }
        refreshed
    }

    async fn tab_listing(&self, tab: Tab) -> Refreshed {
        Refreshed::Listing {
            name: tab.to_string(),
            listing: self.open_tab(tab).await,
        }
    }
}

fn login_error_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Unauthorized(msg) => msg.clone(),
        other => other.toast_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn tabs_parse_case_insensitively() {
        assert_eq!(Tab::from_str("Warehouses").unwrap(), Tab::Warehouses);
        assert_eq!(Tab::Checkouts.to_string(), "checkouts");
        assert_eq!(Tab::iter().count(), 5);
    }

    #[test]
    fn summary_marks_failed_cards() {
        let summary = Summary {
            low_stock_count: Some(3),
            warehouses_near_capacity: None,
            total_quantity: Some(12_500),
            total_value: Some(Decimal::new(99950, 2)),
        };
        let text = console::strip_ansi_codes(&summary.render()).to_string();
        assert!(text.contains("3 items"));
        assert!(text.contains("Error"));
        assert!(text.contains("12,500 units"));
        assert!(text.contains("$999.50"));
    }
}
