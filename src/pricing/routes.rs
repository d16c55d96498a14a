//! HTTP endpoints for priced entities and their price history.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    ActivityCost, ActivityCostHistory, Hotel, HotelPriceHistory, Museum, MuseumPriceHistory,
    VehicleCost, VehicleCostHistory,
};
use crate::AppState;

use super::engine;
use super::queries;
use super::requests::{ActivityCostRequest, HotelRequest, MuseumRequest, VehicleCostRequest};
use super::services;

/// Query parameters for price-as-of lookups
#[derive(Debug, Deserialize)]
struct PriceAsOfQuery {
    date: NaiveDate,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hotels", post(create_hotel))
        .route("/hotels/:id", get(get_hotel).put(update_hotel))
        .route("/hotels/:id/history", get(hotel_history))
        .route("/hotels/:id/price", get(hotel_price_as_of))
        .route("/museums", post(create_museum))
        .route("/museums/:id", get(get_museum).put(update_museum))
        .route("/museums/:id/history", get(museum_history))
        .route("/museums/:id/price", get(museum_price_as_of))
        .route("/vehicle-costs", post(create_vehicle_cost))
        .route("/vehicle-costs/:id", get(get_vehicle_cost).put(update_vehicle_cost))
        .route("/vehicle-costs/:id/history", get(vehicle_cost_history))
        .route("/vehicle-costs/:id/price", get(vehicle_cost_price_as_of))
        .route("/activity-costs", post(create_activity_cost))
        .route("/activity-costs/:id", get(get_activity_cost).put(update_activity_cost))
        .route("/activity-costs/:id/history", get(activity_cost_history))
        .route("/activity-costs/:id/price", get(activity_cost_price_as_of))
}

async fn create_hotel(
    State(state): State<AppState>,
    Json(req): Json<HotelRequest>,
) -> Result<Json<Hotel>> {
    let hotel = services::create_hotel(&state.db, &state.cache, req).await?;
    Ok(Json(hotel))
}

async fn get_hotel(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Hotel>> {
    Ok(Json(queries::get_hotel(&state.db, id).await?))
}

async fn update_hotel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<HotelRequest>,
) -> Result<Json<Hotel>> {
    let hotel = services::update_hotel(&state.db, &state.cache, id, req).await?;
    Ok(Json(hotel))
}

async fn hotel_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<HotelPriceHistory>>> {
    queries::get_hotel(&state.db, id).await?;
    Ok(Json(engine::list_snapshots::<Hotel>(&state.db, id).await?))
}

async fn hotel_price_as_of(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PriceAsOfQuery>,
) -> Result<Json<HotelPriceHistory>> {
    queries::get_hotel(&state.db, id).await?;
    let snapshot = engine::price_as_of::<Hotel>(&state.db, id, query.date)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(snapshot))
}

async fn create_museum(
    State(state): State<AppState>,
    Json(req): Json<MuseumRequest>,
) -> Result<Json<Museum>> {
    let museum = services::create_museum(&state.db, &state.cache, req).await?;
    Ok(Json(museum))
}

async fn get_museum(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Museum>> {
    Ok(Json(queries::get_museum(&state.db, id).await?))
}

async fn update_museum(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MuseumRequest>,
) -> Result<Json<Museum>> {
    let museum = services::update_museum(&state.db, &state.cache, id, req).await?;
    Ok(Json(museum))
}

async fn museum_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MuseumPriceHistory>>> {
    queries::get_museum(&state.db, id).await?;
    Ok(Json(engine::list_snapshots::<Museum>(&state.db, id).await?))
}

async fn museum_price_as_of(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PriceAsOfQuery>,
) -> Result<Json<MuseumPriceHistory>> {
    queries::get_museum(&state.db, id).await?;
    let snapshot = engine::price_as_of::<Museum>(&state.db, id, query.date)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(snapshot))
}

async fn create_vehicle_cost(
    State(state): State<AppState>,
    Json(req): Json<VehicleCostRequest>,
) -> Result<Json<VehicleCost>> {
    let cost = services::create_vehicle_cost(&state.db, &state.cache, req).await?;
    Ok(Json(cost))
}

async fn get_vehicle_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleCost>> {
    Ok(Json(queries::get_vehicle_cost(&state.db, id).await?))
}

async fn update_vehicle_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VehicleCostRequest>,
) -> Result<Json<VehicleCost>> {
    let cost = services::update_vehicle_cost(&state.db, &state.cache, id, req).await?;
    Ok(Json(cost))
}

async fn vehicle_cost_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<VehicleCostHistory>>> {
    queries::get_vehicle_cost(&state.db, id).await?;
    Ok(Json(engine::list_snapshots::<VehicleCost>(&state.db, id).await?))
}

async fn vehicle_cost_price_as_of(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PriceAsOfQuery>,
) -> Result<Json<VehicleCostHistory>> {
    queries::get_vehicle_cost(&state.db, id).await?;
    let snapshot = engine::price_as_of::<VehicleCost>(&state.db, id, query.date)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(snapshot))
}

async fn create_activity_cost(
    State(state): State<AppState>,
    Json(req): Json<ActivityCostRequest>,
) -> Result<Json<ActivityCost>> {
    let cost = services::create_activity_cost(&state.db, &state.cache, req).await?;
    Ok(Json(cost))
}

async fn get_activity_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActivityCost>> {
    Ok(Json(queries::get_activity_cost(&state.db, id).await?))
}

async fn update_activity_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActivityCostRequest>,
) -> Result<Json<ActivityCost>> {
    let cost = services::update_activity_cost(&state.db, &state.cache, id, req).await?;
    Ok(Json(cost))
}

async fn activity_cost_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ActivityCostHistory>>> {
    queries::get_activity_cost(&state.db, id).await?;
    Ok(Json(engine::list_snapshots::<ActivityCost>(&state.db, id).await?))
}

async fn activity_cost_price_as_of(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PriceAsOfQuery>,
) -> Result<Json<ActivityCostHistory>> {
    queries::get_activity_cost(&state.db, id).await?;
    let snapshot = engine::price_as_of::<ActivityCost>(&state.db, id, query.date)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(snapshot))
}
