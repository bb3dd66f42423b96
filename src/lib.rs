//! Warehouse Dashboard Library
//!
//! Typed client, checks and list views for a warehouse inventory REST backend.
//! The `warehouse-dashboard` binary is a terminal shell over this crate.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod client;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod services;

pub use client::{HttpBackend, InventoryBackend};
pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use errors::ServiceError;
