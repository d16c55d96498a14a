//! Back office core for a tour operator.
//!
//! Two halves share one Postgres schema: priced reference entities with
//! dated price history (hotels, museums, vehicle and activity costs), and
//! operations carrying a day grid, line items, customers and sales prices.
//! Form dropdowns and the upcoming board are served through an in-process
//! cache.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod operations;
pub mod pricing;
pub mod routes;

use sqlx::PgPool;

use cache::AppCache;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}
