//! Database queries for priced entities.
//!
//! Runtime sqlx queries; writes run on the caller's transaction so entity
//! and snapshot changes commit together.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ActivityCost, Hotel, Museum, VehicleCost};

use super::requests::{ActivityCostRequest, HotelRequest, MuseumRequest, VehicleCostRequest};

const HOTEL_COLUMNS: &str = "id, name, city_id, single_price, double_price, triple_price, \
                             currency_id, valid_until, is_active, created_at, updated_at";

/// Get a hotel by id
pub async fn get_hotel(pool: &PgPool, id: Uuid) -> Result<Hotel> {
    sqlx::query_as::<_, Hotel>(&format!(
        "SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Get a hotel by id with a row lock, serializing concurrent edits
pub async fn get_hotel_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Hotel> {
    sqlx::query_as::<_, Hotel>(&format!(
        "SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}

/// Insert a hotel
pub async fn insert_hotel(conn: &mut PgConnection, id: Uuid, req: &HotelRequest) -> Result<Hotel> {
    let hotel = sqlx::query_as::<_, Hotel>(&format!(
        "INSERT INTO hotels (id, name, city_id, single_price, double_price, triple_price, \
         currency_id, valid_until) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {HOTEL_COLUMNS}"
    ))
    .bind(id)
    .bind(&req.name)
    .bind(req.city_id)
    .bind(req.single_price)
    .bind(req.double_price)
    .bind(req.triple_price)
    .bind(req.currency_id)
    .bind(req.valid_until)
    .fetch_one(&mut *conn)
    .await?;

    Ok(hotel)
}

/// Update a hotel in place
pub async fn update_hotel(conn: &mut PgConnection, id: Uuid, req: &HotelRequest) -> Result<Hotel> {
    sqlx::query_as::<_, Hotel>(&format!(
        "UPDATE hotels SET name = $2, city_id = $3, single_price = $4, double_price = $5, \
         triple_price = $6, currency_id = $7, valid_until = $8, updated_at = now() \
         WHERE id = $1 \
         RETURNING {HOTEL_COLUMNS}"
    ))
    .bind(id)
    .bind(&req.name)
    .bind(req.city_id)
    .bind(req.single_price)
    .bind(req.double_price)
    .bind(req.triple_price)
    .bind(req.currency_id)
    .bind(req.valid_until)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}

const MUSEUM_COLUMNS: &str = "id, name, city_id, local_price, foreign_price, currency_id, \
                              valid_until, is_active, created_at, updated_at";

/// Get a museum by id
pub async fn get_museum(pool: &PgPool, id: Uuid) -> Result<Museum> {
    sqlx::query_as::<_, Museum>(&format!(
        "SELECT {MUSEUM_COLUMNS} FROM museums WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Get a museum by id with a row lock
pub async fn get_museum_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Museum> {
    sqlx::query_as::<_, Museum>(&format!(
        "SELECT {MUSEUM_COLUMNS} FROM museums WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}

/// Insert a museum
pub async fn insert_museum(
    conn: &mut PgConnection,
    id: Uuid,
    req: &MuseumRequest,
) -> Result<Museum> {
    let museum = sqlx::query_as::<_, Museum>(&format!(
        "INSERT INTO museums (id, name, city_id, local_price, foreign_price, currency_id, \
         valid_until) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {MUSEUM_COLUMNS}"
    ))
    .bind(id)
    .bind(&req.name)
    .bind(req.city_id)
    .bind(req.local_price)
    .bind(req.foreign_price)
    .bind(req.currency_id)
    .bind(req.valid_until)
    .fetch_one(&mut *conn)
    .await?;

    Ok(museum)
}

/// Update a museum in place
pub async fn update_museum(
    conn: &mut PgConnection,
    id: Uuid,
    req: &MuseumRequest,
) -> Result<Museum> {
    sqlx::query_as::<_, Museum>(&format!(
        "UPDATE museums SET name = $2, city_id = $3, local_price = $4, foreign_price = $5, \
         currency_id = $6, valid_until = $7, updated_at = now() \
         WHERE id = $1 \
         RETURNING {MUSEUM_COLUMNS}"
    ))
    .bind(id)
    .bind(&req.name)
    .bind(req.city_id)
    .bind(req.local_price)
    .bind(req.foreign_price)
    .bind(req.currency_id)
    .bind(req.valid_until)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}

const VEHICLE_COST_COLUMNS: &str = "id, supplier_id, tour_id, transfer_id, car_cost, \
                                    minivan_cost, minibus_cost, midibus_cost, bus_cost, \
                                    currency_id, valid_until, is_active, created_at, updated_at";

/// Get a vehicle cost by id
pub async fn get_vehicle_cost(pool: &PgPool, id: Uuid) -> Result<VehicleCost> {
    sqlx::query_as::<_, VehicleCost>(&format!(
        "SELECT {VEHICLE_COST_COLUMNS} FROM vehicle_costs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Get a vehicle cost by id with a row lock
pub async fn get_vehicle_cost_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<VehicleCost> {
    sqlx::query_as::<_, VehicleCost>(&format!(
        "SELECT {VEHICLE_COST_COLUMNS} FROM vehicle_costs WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}

/// Insert a vehicle cost
pub async fn insert_vehicle_cost(
    conn: &mut PgConnection,
    id: Uuid,
    req: &VehicleCostRequest,
) -> Result<VehicleCost> {
    let cost = sqlx::query_as::<_, VehicleCost>(&format!(
        "INSERT INTO vehicle_costs (id, supplier_id, tour_id, transfer_id, car_cost, \
         minivan_cost, minibus_cost, midibus_cost, bus_cost, currency_id, valid_until) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {VEHICLE_COST_COLUMNS}"
    ))
    .bind(id)
    .bind(req.supplier_id)
    .bind(req.tour_id)
    .bind(req.transfer_id)
    .bind(req.car_cost)
    .bind(req.minivan_cost)
    .bind(req.minibus_cost)
    .bind(req.midibus_cost)
    .bind(req.bus_cost)
    .bind(req.currency_id)
    .bind(req.valid_until)
    .fetch_one(&mut *conn)
    .await?;

    Ok(cost)
}

/// Update a vehicle cost in place
pub async fn update_vehicle_cost(
    conn: &mut PgConnection,
    id: Uuid,
    req: &VehicleCostRequest,
) -> Result<VehicleCost> {
    sqlx::query_as::<_, VehicleCost>(&format!(
        "UPDATE vehicle_costs SET supplier_id = $2, tour_id = $3, transfer_id = $4, \
         car_cost = $5, minivan_cost = $6, minibus_cost = $7, midibus_cost = $8, \
         bus_cost = $9, currency_id = $10, valid_until = $11, updated_at = now() \
         WHERE id = $1 \
         RETURNING {VEHICLE_COST_COLUMNS}"
    ))
    .bind(id)
    .bind(req.supplier_id)
    .bind(req.tour_id)
    .bind(req.transfer_id)
    .bind(req.car_cost)
    .bind(req.minivan_cost)
    .bind(req.minibus_cost)
    .bind(req.midibus_cost)
    .bind(req.bus_cost)
    .bind(req.currency_id)
    .bind(req.valid_until)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}

const ACTIVITY_COST_COLUMNS: &str = "id, activity_id, supplier_id, price, currency_id, \
                                     valid_until, is_active, created_at, updated_at";

/// Get an activity cost by id
pub async fn get_activity_cost(pool: &PgPool, id: Uuid) -> Result<ActivityCost> {
    sqlx::query_as::<_, ActivityCost>(&format!(
        "SELECT {ACTIVITY_COST_COLUMNS} FROM activity_costs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Get an activity cost by id with a row lock
pub async fn get_activity_cost_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<ActivityCost> {
    sqlx::query_as::<_, ActivityCost>(&format!(
        "SELECT {ACTIVITY_COST_COLUMNS} FROM activity_costs WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}

/// Insert an activity cost
pub async fn insert_activity_cost(
    conn: &mut PgConnection,
    id: Uuid,
    req: &ActivityCostRequest,
) -> Result<ActivityCost> {
    let cost = sqlx::query_as::<_, ActivityCost>(&format!(
        "INSERT INTO activity_costs (id, activity_id, supplier_id, price, currency_id, \
         valid_until) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {ACTIVITY_COST_COLUMNS}"
    ))
    .bind(id)
    .bind(req.activity_id)
    .bind(req.supplier_id)
    .bind(req.price)
    .bind(req.currency_id)
    .bind(req.valid_until)
    .fetch_one(&mut *conn)
    .await?;

    Ok(cost)
}

/// Update an activity cost in place
pub async fn update_activity_cost(
    conn: &mut PgConnection,
    id: Uuid,
    req: &ActivityCostRequest,
) -> Result<ActivityCost> {
    sqlx::query_as::<_, ActivityCost>(&format!(
        "UPDATE activity_costs SET activity_id = $2, supplier_id = $3, price = $4, \
         currency_id = $5, valid_until = $6, updated_at = now() \
         WHERE id = $1 \
         RETURNING {ACTIVITY_COST_COLUMNS}"
    ))
    .bind(id)
    .bind(req.activity_id)
    .bind(req.supplier_id)
    .bind(req.price)
    .bind(req.currency_id)
    .bind(req.valid_until)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}
