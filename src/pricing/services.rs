//! Save paths for priced entities.
//!
//! Each save validates first, then persists the entity and drives the
//! history engine on one transaction. Updates lock the entity row before
//! reading the prior state so concurrent edits cannot open duplicate
//! windows for the same day.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::{AppError, Result};
use crate::models::{ActivityCost, Hotel, Museum, VehicleCost};

use super::engine;
use super::queries;
use super::requests::{ActivityCostRequest, HotelRequest, MuseumRequest, VehicleCostRequest};

/// A vehicle cost prices either a tour route or a transfer route, never both
/// and never neither.
fn validate_route_selection(tour_id: Option<Uuid>, transfer_id: Option<Uuid>) -> Result<()> {
    match (tour_id, transfer_id) {
        (Some(_), Some(_)) => Err(AppError::Validation(
            "select either a tour or a transfer, not both".to_string(),
        )),
        (None, None) => Err(AppError::Validation(
            "select a tour or a transfer".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Create a hotel and its initial price window.
pub async fn create_hotel(pool: &PgPool, cache: &AppCache, req: HotelRequest) -> Result<Hotel> {
    let today = Utc::now().date_naive();
    engine::validate_valid_until(req.valid_until, today)?;

    let mut tx = pool.begin().await?;
    let hotel = queries::insert_hotel(&mut tx, Uuid::new_v4(), &req).await?;
    let snapshot = engine::record_initial_snapshot(&mut tx, &hotel, today).await?;
    tx.commit().await?;

    tracing::info!("hotel {} created, price window opens {}", hotel.id, snapshot.valid_from);
    cache.invalidate_choices();
    Ok(hotel)
}

/// Update a hotel, recording a new price window when a money field or the
/// currency changed.
pub async fn update_hotel(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    req: HotelRequest,
) -> Result<Hotel> {
    let today = Utc::now().date_naive();
    engine::validate_valid_until(req.valid_until, today)?;

    let mut tx = pool.begin().await?;
    let before = queries::get_hotel_for_update(&mut tx, id).await?;
    let hotel = queries::update_hotel(&mut tx, id, &req).await?;
    let snapshot = engine::reconcile_snapshot(&mut tx, &hotel, &before, today).await?;
    tx.commit().await?;

    if snapshot.is_some() {
        tracing::info!("hotel {} price change recorded", id);
    }
    cache.invalidate_choices();
    Ok(hotel)
}

/// Create a museum and its initial price window.
pub async fn create_museum(pool: &PgPool, cache: &AppCache, req: MuseumRequest) -> Result<Museum> {
    let today = Utc::now().date_naive();
    engine::validate_valid_until(req.valid_until, today)?;

    let mut tx = pool.begin().await?;
    let museum = queries::insert_museum(&mut tx, Uuid::new_v4(), &req).await?;
    let snapshot = engine::record_initial_snapshot(&mut tx, &museum, today).await?;
    tx.commit().await?;

    tracing::info!("museum {} created, price window opens {}", museum.id, snapshot.valid_from);
    cache.invalidate_choices();
    Ok(museum)
}

/// Update a museum, recording a new price window on price or currency change.
pub async fn update_museum(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    req: MuseumRequest,
) -> Result<Museum> {
    let today = Utc::now().date_naive();
    engine::validate_valid_until(req.valid_until, today)?;

    let mut tx = pool.begin().await?;
    let before = queries::get_museum_for_update(&mut tx, id).await?;
    let museum = queries::update_museum(&mut tx, id, &req).await?;
    let snapshot = engine::reconcile_snapshot(&mut tx, &museum, &before, today).await?;
    tx.commit().await?;

    if snapshot.is_some() {
        tracing::info!("museum {} price change recorded", id);
    }
    cache.invalidate_choices();
    Ok(museum)
}

/// Create a vehicle cost and its initial price window.
pub async fn create_vehicle_cost(
    pool: &PgPool,
    cache: &AppCache,
    req: VehicleCostRequest,
) -> Result<VehicleCost> {
    let today = Utc::now().date_naive();
    engine::validate_valid_until(req.valid_until, today)?;
    validate_route_selection(req.tour_id, req.transfer_id)?;

    let mut tx = pool.begin().await?;
    let cost = queries::insert_vehicle_cost(&mut tx, Uuid::new_v4(), &req).await?;
    let snapshot = engine::record_initial_snapshot(&mut tx, &cost, today).await?;
    tx.commit().await?;

    tracing::info!("vehicle cost {} created, price window opens {}", cost.id, snapshot.valid_from);
    cache.invalidate_choices();
    Ok(cost)
}

/// Update a vehicle cost, recording a new price window on price or currency
/// change.
pub async fn update_vehicle_cost(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    req: VehicleCostRequest,
) -> Result<VehicleCost> {
    let today = Utc::now().date_naive();
    engine::validate_valid_until(req.valid_until, today)?;
    validate_route_selection(req.tour_id, req.transfer_id)?;

    let mut tx = pool.begin().await?;
    let before = queries::get_vehicle_cost_for_update(&mut tx, id).await?;
    let cost = queries::update_vehicle_cost(&mut tx, id, &req).await?;
    let snapshot = engine::reconcile_snapshot(&mut tx, &cost, &before, today).await?;
    tx.commit().await?;

    if snapshot.is_some() {
        tracing::info!("vehicle cost {} price change recorded", id);
    }
    cache.invalidate_choices();
    Ok(cost)
}

/// Create an activity cost and its initial price window.
pub async fn create_activity_cost(
    pool: &PgPool,
    cache: &AppCache,
    req: ActivityCostRequest,
) -> Result<ActivityCost> {
    let today = Utc::now().date_naive();
    engine::validate_valid_until(req.valid_until, today)?;

    let mut tx = pool.begin().await?;
    let cost = queries::insert_activity_cost(&mut tx, Uuid::new_v4(), &req).await?;
    let snapshot = engine::record_initial_snapshot(&mut tx, &cost, today).await?;
    tx.commit().await?;

    tracing::info!("activity cost {} created, price window opens {}", cost.id, snapshot.valid_from);
    cache.invalidate_choices();
    Ok(cost)
}

/// Update an activity cost, recording a new price window on price or
/// currency change.
pub async fn update_activity_cost(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    req: ActivityCostRequest,
) -> Result<ActivityCost> {
    let today = Utc::now().date_naive();
    engine::validate_valid_until(req.valid_until, today)?;

    let mut tx = pool.begin().await?;
    let before = queries::get_activity_cost_for_update(&mut tx, id).await?;
    let cost = queries::update_activity_cost(&mut tx, id, &req).await?;
    let snapshot = engine::reconcile_snapshot(&mut tx, &cost, &before, today).await?;
    tx.commit().await?;

    if snapshot.is_some() {
        tracing::info!("activity cost {} price change recorded", id);
    }
    cache.invalidate_choices();
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_selection_requires_exactly_one() {
        let tour = Some(Uuid::new_v4());
        let transfer = Some(Uuid::new_v4());

        assert!(validate_route_selection(tour, None).is_ok());
        assert!(validate_route_selection(None, transfer).is_ok());
        assert!(matches!(
            validate_route_selection(tour, transfer),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_route_selection(None, None),
            Err(AppError::Validation(_))
        ));
    }
}
