//! Priced-entity models and their history snapshot rows.
//!
//! Each priced entity keeps its live price fields in place; every price
//! change is recorded as an immutable snapshot row bounded by an inclusive
//! [valid_from, valid_until] window.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Hotel from hotels
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
    pub single_price: Decimal,
    pub double_price: Decimal,
    pub triple_price: Decimal,
    pub currency_id: Uuid,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot from hotel_price_histories
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HotelPriceHistory {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub single_price: Decimal,
    pub double_price: Decimal,
    pub triple_price: Decimal,
    pub currency_id: Uuid,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Museum from museums
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Museum {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
    pub local_price: Decimal,
    pub foreign_price: Decimal,
    pub currency_id: Uuid,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot from museum_price_histories
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MuseumPriceHistory {
    pub id: Uuid,
    pub museum_id: Uuid,
    pub local_price: Decimal,
    pub foreign_price: Decimal,
    pub currency_id: Uuid,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Vehicle cost from vehicle_costs; prices one tour or one transfer route
/// across the five vehicle classes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VehicleCost {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub tour_id: Option<Uuid>,
    pub transfer_id: Option<Uuid>,
    pub car_cost: Decimal,
    pub minivan_cost: Decimal,
    pub minibus_cost: Decimal,
    pub midibus_cost: Decimal,
    pub bus_cost: Decimal,
    pub currency_id: Uuid,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot from vehicle_cost_histories
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VehicleCostHistory {
    pub id: Uuid,
    pub vehicle_cost_id: Uuid,
    pub car_cost: Decimal,
    pub minivan_cost: Decimal,
    pub minibus_cost: Decimal,
    pub midibus_cost: Decimal,
    pub bus_cost: Decimal,
    pub currency_id: Uuid,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Activity cost from activity_costs
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityCost {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub supplier_id: Uuid,
    pub price: Decimal,
    pub currency_id: Uuid,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot from activity_cost_histories
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityCostHistory {
    pub id: Uuid,
    pub activity_cost_id: Uuid,
    pub price: Decimal,
    pub currency_id: Uuid,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
