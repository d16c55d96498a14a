//! Read queries for reference data and the form-choices bundle

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivitySupplier, BuyerCompany, City, Currency, FormChoices, Guide, Hotel, Museum,
    NoVehicleTour, Tour, Transfer, VehicleSupplier, VehicleType,
};

/// Get all currencies ordered by code
pub async fn get_currencies(pool: &PgPool) -> Result<Vec<Currency>> {
    let rows = sqlx::query_as::<_, Currency>("SELECT id, code, name FROM currencies ORDER BY code")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Get all cities ordered by name
pub async fn get_cities(pool: &PgPool) -> Result<Vec<City>> {
    let rows = sqlx::query_as::<_, City>("SELECT id, name FROM cities ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Get all vehicle types ordered by capacity
pub async fn get_vehicle_types(pool: &PgPool) -> Result<Vec<VehicleType>> {
    let rows = sqlx::query_as::<_, VehicleType>(
        "SELECT id, name, capacity FROM vehicle_types ORDER BY capacity, name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get active buyer companies ordered by name
pub async fn get_buyer_companies(pool: &PgPool) -> Result<Vec<BuyerCompany>> {
    let rows = sqlx::query_as::<_, BuyerCompany>(
        r#"
        SELECT id, name, short_name, contact_person, contact_phone, contact_email, is_active
        FROM buyer_companies
        WHERE is_active = TRUE
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get one buyer company by id, active or not
pub async fn get_buyer_company(pool: &PgPool, id: Uuid) -> Result<BuyerCompany> {
    let company = sqlx::query_as::<_, BuyerCompany>(
        r#"
        SELECT id, name, short_name, contact_person, contact_phone, contact_email, is_active
        FROM buyer_companies
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(company)
}

/// Get all vehicle tour routes ordered by name
pub async fn get_tours(pool: &PgPool) -> Result<Vec<Tour>> {
    let rows = sqlx::query_as::<_, Tour>("SELECT id, name, city_id FROM tours ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Get all walking tours ordered by name
pub async fn get_no_vehicle_tours(pool: &PgPool) -> Result<Vec<NoVehicleTour>> {
    let rows = sqlx::query_as::<_, NoVehicleTour>(
        "SELECT id, name, city_id FROM no_vehicle_tours ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get all transfer routes ordered by name
pub async fn get_transfers(pool: &PgPool) -> Result<Vec<Transfer>> {
    let rows = sqlx::query_as::<_, Transfer>(
        "SELECT id, name, start_city_id, end_city_id FROM transfers ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get all activities ordered by name
pub async fn get_activities(pool: &PgPool) -> Result<Vec<Activity>> {
    let rows = sqlx::query_as::<_, Activity>("SELECT id, name FROM activities ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Get all guides ordered by name
pub async fn get_guides(pool: &PgPool) -> Result<Vec<Guide>> {
    let rows =
        sqlx::query_as::<_, Guide>("SELECT id, name, phone, document_no FROM guides ORDER BY name")
            .fetch_all(pool)
            .await?;

    Ok(rows)
}

/// Get all vehicle suppliers ordered by name
pub async fn get_vehicle_suppliers(pool: &PgPool) -> Result<Vec<VehicleSupplier>> {
    let rows =
        sqlx::query_as::<_, VehicleSupplier>("SELECT id, name FROM vehicle_suppliers ORDER BY name")
            .fetch_all(pool)
            .await?;

    Ok(rows)
}

/// Get all activity suppliers ordered by name
pub async fn get_activity_suppliers(pool: &PgPool) -> Result<Vec<ActivitySupplier>> {
    let rows = sqlx::query_as::<_, ActivitySupplier>(
        "SELECT id, name FROM activity_suppliers ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get active hotels ordered by name
pub async fn get_active_hotels(pool: &PgPool) -> Result<Vec<Hotel>> {
    let rows = sqlx::query_as::<_, Hotel>(
        r#"
        SELECT id, name, city_id, single_price, double_price, triple_price,
               currency_id, valid_until, is_active, created_at, updated_at
        FROM hotels
        WHERE is_active = TRUE
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get active museums ordered by name
pub async fn get_active_museums(pool: &PgPool) -> Result<Vec<Museum>> {
    let rows = sqlx::query_as::<_, Museum>(
        r#"
        SELECT id, name, city_id, local_price, foreign_price,
               currency_id, valid_until, is_active, created_at, updated_at
        FROM museums
        WHERE is_active = TRUE
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Load every dropdown source the office forms need as one bundle
pub async fn load_form_choices(pool: &PgPool) -> Result<FormChoices> {
    let choices = FormChoices {
        currencies: get_currencies(pool).await?,
        cities: get_cities(pool).await?,
        vehicle_types: get_vehicle_types(pool).await?,
        buyer_companies: get_buyer_companies(pool).await?,
        tours: get_tours(pool).await?,
        no_vehicle_tours: get_no_vehicle_tours(pool).await?,
        transfers: get_transfers(pool).await?,
        activities: get_activities(pool).await?,
        guides: get_guides(pool).await?,
        vehicle_suppliers: get_vehicle_suppliers(pool).await?,
        activity_suppliers: get_activity_suppliers(pool).await?,
        hotels: get_active_hotels(pool).await?,
        museums: get_active_museums(pool).await?,
    };

    Ok(choices)
}
