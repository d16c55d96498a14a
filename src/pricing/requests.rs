//! Request DTOs for priced-entity save endpoints.
//!
//! The same body shape serves create and update; edit forms post the full
//! entity state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// Create or update a hotel
#[derive(Debug, Deserialize)]
pub struct HotelRequest {
    pub name: String,
    pub city_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub single_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub double_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub triple_price: Decimal,
    pub currency_id: Uuid,
    pub valid_until: NaiveDate,
}

/// Create or update a museum
#[derive(Debug, Deserialize)]
pub struct MuseumRequest {
    pub name: String,
    pub city_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub local_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub foreign_price: Decimal,
    pub currency_id: Uuid,
    pub valid_until: NaiveDate,
}

/// Create or update a vehicle cost; exactly one of `tour_id` / `transfer_id`
/// must be set.
#[derive(Debug, Deserialize)]
pub struct VehicleCostRequest {
    pub supplier_id: Uuid,
    #[serde(default)]
    pub tour_id: Option<Uuid>,
    #[serde(default)]
    pub transfer_id: Option<Uuid>,
    #[serde(with = "rust_decimal::serde::str")]
    pub car_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minivan_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minibus_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub midibus_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub bus_cost: Decimal,
    pub currency_id: Uuid,
    pub valid_until: NaiveDate,
}

/// Create or update an activity cost
#[derive(Debug, Deserialize)]
pub struct ActivityCostRequest {
    pub activity_id: Uuid,
    pub supplier_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub currency_id: Uuid,
    pub valid_until: NaiveDate,
}
