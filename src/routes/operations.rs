//! HTTP endpoints for operations, their day grids, line items, customers
//! and the upcoming schedule board.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Operation, OperationCustomer, OperationDay, OperationItem, OperationSalesPrice,
    OperationSubItem,
};
use crate::operations::report::MissingFieldReport;
use crate::operations::requests::{
    CustomerRequest, ItemRequest, OperationRequest, SalesPriceRequest, SubItemRequest,
};
use crate::operations::responses::{DayWithItems, ScheduleEntry, SubItemWithMuseums};
use crate::operations::{queries, services};
use crate::AppState;

/// Query parameters for the upcoming board
#[derive(Debug, Deserialize)]
struct ScheduleQuery {
    #[serde(default = "ScheduleQuery::default_days")]
    days: u32,
}

impl ScheduleQuery {
    fn default_days() -> u32 {
        7
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/operations", post(create_operation))
        .route("/operations/:id", get(get_operation).put(update_operation))
        .route("/operations/:id/days", get(list_days))
        .route("/operations/:id/customers", post(add_customer))
        .route("/operations/:id/sales-prices", post(add_sales_price))
        .route("/operations/:id/toggle", post(toggle_operation))
        .route("/days/:id/items", post(add_item))
        .route("/days/:id/toggle", post(toggle_day))
        .route("/items/:id/sub-items", post(add_sub_item))
        .route("/items/:id/missing-fields", get(missing_fields))
        .route("/items/:id/toggle", post(toggle_item))
        .route("/sub-items/:id/toggle", post(toggle_sub_item))
        .route("/customers/:id", put(update_customer).delete(delete_customer))
        .route("/customers/:id/toggle", post(toggle_customer))
        .route("/schedule/upcoming", get(upcoming_schedule))
}

async fn create_operation(
    State(state): State<AppState>,
    Json(req): Json<OperationRequest>,
) -> Result<Json<Operation>> {
    let operation = services::create_operation(&state.db, &state.cache, req).await?;
    Ok(Json(operation))
}

async fn get_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Operation>> {
    Ok(Json(queries::get_operation(&state.db, id).await?))
}

async fn update_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OperationRequest>,
) -> Result<Json<Operation>> {
    let operation = services::update_operation(&state.db, &state.cache, id, req).await?;
    Ok(Json(operation))
}

async fn list_days(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DayWithItems>>> {
    Ok(Json(services::list_days(&state.db, id).await?))
}

async fn add_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CustomerRequest>,
) -> Result<Json<OperationCustomer>> {
    let customer = services::add_customer(&state.db, &state.cache, id, req).await?;
    Ok(Json(customer))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CustomerRequest>,
) -> Result<Json<OperationCustomer>> {
    let customer = services::update_customer(&state.db, id, req).await?;
    Ok(Json(customer))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    services::delete_customer(&state.db, &state.cache, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OperationCustomer>> {
    let customer = services::toggle_customer(&state.db, &state.cache, id).await?;
    Ok(Json(customer))
}

async fn add_sales_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SalesPriceRequest>,
) -> Result<Json<OperationSalesPrice>> {
    let sales_price = services::add_sales_price(&state.db, id, req).await?;
    Ok(Json(sales_price))
}

async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ItemRequest>,
) -> Result<Json<OperationItem>> {
    let item = services::add_item(&state.db, &state.cache, id, req).await?;
    Ok(Json(item))
}

async fn add_sub_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubItemRequest>,
) -> Result<Json<SubItemWithMuseums>> {
    let sub_item = services::add_sub_item(&state.db, &state.cache, id, req).await?;
    Ok(Json(sub_item))
}

async fn missing_fields(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MissingFieldReport>> {
    Ok(Json(services::missing_fields(&state.db, id).await?))
}

async fn toggle_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Operation>> {
    let operation = services::toggle_operation(&state.db, &state.cache, id).await?;
    Ok(Json(operation))
}

async fn toggle_day(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OperationDay>> {
    let day = services::toggle_day(&state.db, &state.cache, id).await?;
    Ok(Json(day))
}

async fn toggle_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OperationItem>> {
    let item = services::toggle_item(&state.db, &state.cache, id).await?;
    Ok(Json(item))
}

async fn toggle_sub_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OperationSubItem>> {
    let sub_item = services::toggle_sub_item(&state.db, &state.cache, id).await?;
    Ok(Json(sub_item))
}

/// The board is cached per horizon for a minute; booking writes drop it
/// early so staff never read a stale day.
async fn upcoming_schedule(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Arc<Vec<ScheduleEntry>>>> {
    if let Some(entries) = state.cache.schedules.get(&query.days).await {
        tracing::debug!(days = query.days, "schedule cache hit");
        return Ok(Json(entries));
    }

    tracing::debug!(days = query.days, "schedule cache miss, rebuilding");
    let entries = Arc::new(services::upcoming_schedule(&state.db, query.days).await?);
    state
        .cache
        .schedules
        .insert(query.days, entries.clone())
        .await;
    Ok(Json(entries))
}
