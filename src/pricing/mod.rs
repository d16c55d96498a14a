//! Dated price management for hotels, museums, vehicles, and activities.
//!
//! Every save to a priced entity goes through [`services`], which keeps the
//! entity row and its append-only history table in step inside one
//! transaction. The history mechanics themselves live in [`engine`] and are
//! shared by all four entity kinds.

pub mod engine;
pub mod queries;
pub mod requests;
pub mod routes;
pub mod services;

pub use engine::{PriceSnapshot, PricedEntity};
pub use routes::router;
