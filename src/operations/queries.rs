//! Database access for the operation chain.
//!
//! Mutations take a `PgConnection` so callers decide the transaction scope;
//! the service layer wraps each save path in one transaction. Plain reads
//! take the pool.

use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Operation, OperationCustomer, OperationDay, OperationItem, OperationSalesPrice,
    OperationStatus, OperationSubItem,
};

use super::requests::{
    CustomerRequest, ItemRequest, OperationRequest, SalesPriceRequest, SubItemRequest,
};

const OPERATION_COLUMNS: &str = "id, reference_number, buyer_company_id, follow_by, start_date, \
     end_date, status, total_pax, notes, is_active, created_at, updated_at";

const DAY_COLUMNS: &str = "id, operation_id, date, is_active, created_at";

const ITEM_COLUMNS: &str = "id, operation_day_id, item_type, vehicle_type_id, \
     vehicle_supplier_id, no_vehicle_tour_id, no_vehicle_activity_id, activity_supplier_id, \
     pick_time, pick_up_location, drop_off_location, driver_name, driver_phone, \
     vehicle_plate_no, sales_price, sales_currency_id, cost_price, cost_currency_id, notes, \
     is_active, created_at";

const SUB_ITEM_COLUMNS: &str = "id, operation_item_id, sub_item_type, ordering, tour_id, \
     transfer_id, hotel_id, room_type, guide_id, is_guide, activity_id, activity_supplier_id, \
     other_price_description, sales_price, sales_currency_id, cost_price, cost_currency_id, \
     notes, is_active, created_at";

const CUSTOMER_COLUMNS: &str = "id, operation_id, first_name, last_name, customer_type, \
     birth_date, passport_no, contact_info, is_buyer, notes, is_active, created_at";

// ==================== operations ====================

/// Get one operation by id
pub async fn get_operation(pool: &PgPool, id: Uuid) -> Result<Operation> {
    let operation = sqlx::query_as::<_, Operation>(&format!(
        "SELECT {OPERATION_COLUMNS} FROM operations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(operation)
}

/// Get one operation with its row locked for the rest of the transaction
pub async fn get_operation_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Operation> {
    let operation = sqlx::query_as::<_, Operation>(&format!(
        "SELECT {OPERATION_COLUMNS} FROM operations WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(operation)
}

/// Insert an operation row
pub async fn insert_operation(
    conn: &mut PgConnection,
    id: Uuid,
    req: &OperationRequest,
    reference_number: &str,
) -> Result<Operation> {
    let operation = sqlx::query_as::<_, Operation>(
        r#"
        INSERT INTO operations (id, reference_number, buyer_company_id, follow_by,
                                start_date, end_date, status, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(reference_number)
    .bind(req.buyer_company_id)
    .bind(req.follow_by.as_deref())
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(req.status)
    .bind(req.notes.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    Ok(operation)
}

/// Overwrite an operation row
pub async fn update_operation(
    conn: &mut PgConnection,
    id: Uuid,
    req: &OperationRequest,
    reference_number: &str,
) -> Result<Operation> {
    let operation = sqlx::query_as::<_, Operation>(
        r#"
        UPDATE operations
        SET reference_number = $2,
            buyer_company_id = $3,
            follow_by = $4,
            start_date = $5,
            end_date = $6,
            status = $7,
            notes = $8,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(reference_number)
    .bind(req.buyer_company_id)
    .bind(req.follow_by.as_deref())
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(req.status)
    .bind(req.notes.as_deref())
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(operation)
}

/// Reference numbers already taken for one buyer/date prefix
pub async fn taken_references(conn: &mut PgConnection, prefix: &str) -> Result<Vec<String>> {
    let taken = sqlx::query_scalar::<_, String>(
        "SELECT reference_number FROM operations WHERE reference_number LIKE $1",
    )
    .bind(format!("{prefix}%"))
    .fetch_all(&mut *conn)
    .await?;

    Ok(taken)
}

// ==================== operation days ====================

/// Insert one day row per date, all active
pub async fn insert_days(
    conn: &mut PgConnection,
    operation_id: Uuid,
    dates: &[NaiveDate],
) -> Result<()> {
    for date in dates {
        sqlx::query("INSERT INTO operation_days (id, operation_id, date) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(operation_id)
            .bind(date)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Delete day rows dated strictly before `bound`; cascades take their items
pub async fn delete_days_before(
    conn: &mut PgConnection,
    operation_id: Uuid,
    bound: NaiveDate,
) -> Result<u64> {
    let deleted = sqlx::query("DELETE FROM operation_days WHERE operation_id = $1 AND date < $2")
        .bind(operation_id)
        .bind(bound)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(deleted)
}

/// Delete day rows dated strictly after `bound`; cascades take their items
pub async fn delete_days_after(
    conn: &mut PgConnection,
    operation_id: Uuid,
    bound: NaiveDate,
) -> Result<u64> {
    let deleted = sqlx::query("DELETE FROM operation_days WHERE operation_id = $1 AND date > $2")
        .bind(operation_id)
        .bind(bound)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(deleted)
}

/// Dates that currently have a day row, inside the save transaction
pub async fn day_dates(conn: &mut PgConnection, operation_id: Uuid) -> Result<Vec<NaiveDate>> {
    let dates = sqlx::query_scalar::<_, NaiveDate>(
        "SELECT date FROM operation_days WHERE operation_id = $1 ORDER BY date",
    )
    .bind(operation_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(dates)
}

/// Get one day by id
pub async fn get_day(pool: &PgPool, id: Uuid) -> Result<OperationDay> {
    let day = sqlx::query_as::<_, OperationDay>(&format!(
        "SELECT {DAY_COLUMNS} FROM operation_days WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(day)
}

/// All days of one operation, date ascending
pub async fn days_for_operation(pool: &PgPool, operation_id: Uuid) -> Result<Vec<OperationDay>> {
    let days = sqlx::query_as::<_, OperationDay>(&format!(
        "SELECT {DAY_COLUMNS} FROM operation_days WHERE operation_id = $1 ORDER BY date"
    ))
    .bind(operation_id)
    .fetch_all(pool)
    .await?;

    Ok(days)
}

// ==================== items and sub-items ====================

/// Get one item by id
pub async fn get_item(pool: &PgPool, id: Uuid) -> Result<OperationItem> {
    let item = sqlx::query_as::<_, OperationItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM operation_items WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(item)
}

/// Insert an item under a day
pub async fn insert_item(
    conn: &mut PgConnection,
    id: Uuid,
    operation_day_id: Uuid,
    req: &ItemRequest,
) -> Result<OperationItem> {
    let item = sqlx::query_as::<_, OperationItem>(
        r#"
        INSERT INTO operation_items (id, operation_day_id, item_type, vehicle_type_id,
                                     vehicle_supplier_id, no_vehicle_tour_id,
                                     no_vehicle_activity_id, activity_supplier_id, pick_time,
                                     pick_up_location, drop_off_location, driver_name,
                                     driver_phone, vehicle_plate_no, sales_price,
                                     sales_currency_id, cost_price, cost_currency_id, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(operation_day_id)
    .bind(req.item_type)
    .bind(req.vehicle_type_id)
    .bind(req.vehicle_supplier_id)
    .bind(req.no_vehicle_tour_id)
    .bind(req.no_vehicle_activity_id)
    .bind(req.activity_supplier_id)
    .bind(req.pick_time)
    .bind(req.pick_up_location.as_deref())
    .bind(req.drop_off_location.as_deref())
    .bind(req.driver_name.as_deref())
    .bind(req.driver_phone.as_deref())
    .bind(req.vehicle_plate_no.as_deref())
    .bind(req.sales_price)
    .bind(req.sales_currency_id)
    .bind(req.cost_price)
    .bind(req.cost_currency_id)
    .bind(req.notes.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    Ok(item)
}

/// Next free ordering slot within an item
pub async fn next_ordering(conn: &mut PgConnection, operation_item_id: Uuid) -> Result<i32> {
    let next = sqlx::query_scalar::<_, i32>(
        "SELECT COALESCE(MAX(ordering), 0) + 1 FROM operation_sub_items \
         WHERE operation_item_id = $1",
    )
    .bind(operation_item_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(next)
}

/// Insert a sub-item line under an item
pub async fn insert_sub_item(
    conn: &mut PgConnection,
    id: Uuid,
    operation_item_id: Uuid,
    ordering: i32,
    req: &SubItemRequest,
) -> Result<OperationSubItem> {
    let sub_item = sqlx::query_as::<_, OperationSubItem>(
        r#"
        INSERT INTO operation_sub_items (id, operation_item_id, sub_item_type, ordering,
                                         tour_id, transfer_id, hotel_id, room_type, guide_id,
                                         is_guide, activity_id, activity_supplier_id,
                                         other_price_description, sales_price,
                                         sales_currency_id, cost_price, cost_currency_id,
                                         notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(operation_item_id)
    .bind(req.sub_item_type)
    .bind(ordering)
    .bind(req.tour_id)
    .bind(req.transfer_id)
    .bind(req.hotel_id)
    .bind(req.room_type)
    .bind(req.guide_id)
    .bind(req.is_guide)
    .bind(req.activity_id)
    .bind(req.activity_supplier_id)
    .bind(req.other_price_description.as_deref())
    .bind(req.sales_price)
    .bind(req.sales_currency_id)
    .bind(req.cost_price)
    .bind(req.cost_currency_id)
    .bind(req.notes.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    Ok(sub_item)
}

/// Link museums to a museum sub-item line
pub async fn link_museums(
    conn: &mut PgConnection,
    operation_sub_item_id: Uuid,
    museum_ids: &[Uuid],
) -> Result<()> {
    for museum_id in museum_ids {
        sqlx::query(
            "INSERT INTO operation_sub_item_museums (operation_sub_item_id, museum_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(operation_sub_item_id)
        .bind(museum_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Items across a set of days, morning pickups first
pub async fn items_for_days(pool: &PgPool, day_ids: &[Uuid]) -> Result<Vec<OperationItem>> {
    let items = sqlx::query_as::<_, OperationItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM operation_items WHERE operation_day_id = ANY($1) \
         ORDER BY pick_time NULLS LAST, created_at"
    ))
    .bind(day_ids)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Sub-items across a set of items, display order ascending
pub async fn sub_items_for_items(
    pool: &PgPool,
    item_ids: &[Uuid],
) -> Result<Vec<OperationSubItem>> {
    let sub_items = sqlx::query_as::<_, OperationSubItem>(&format!(
        "SELECT {SUB_ITEM_COLUMNS} FROM operation_sub_items WHERE operation_item_id = ANY($1) \
         ORDER BY ordering, created_at"
    ))
    .bind(item_ids)
    .fetch_all(pool)
    .await?;

    Ok(sub_items)
}

/// Museum links across a set of sub-items
pub async fn museum_links(pool: &PgPool, sub_item_ids: &[Uuid]) -> Result<Vec<(Uuid, Uuid)>> {
    let links = sqlx::query_as::<_, (Uuid, Uuid)>(
        "SELECT operation_sub_item_id, museum_id FROM operation_sub_item_museums \
         WHERE operation_sub_item_id = ANY($1)",
    )
    .bind(sub_item_ids)
    .fetch_all(pool)
    .await?;

    Ok(links)
}

// ==================== customers and sales prices ====================

/// Get one customer by id
pub async fn get_customer(pool: &PgPool, id: Uuid) -> Result<OperationCustomer> {
    let customer = sqlx::query_as::<_, OperationCustomer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM operation_customers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(customer)
}

/// All customers of one operation, inside the save transaction
pub async fn customers_for_operation(
    conn: &mut PgConnection,
    operation_id: Uuid,
) -> Result<Vec<OperationCustomer>> {
    let customers = sqlx::query_as::<_, OperationCustomer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM operation_customers WHERE operation_id = $1 \
         ORDER BY created_at"
    ))
    .bind(operation_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(customers)
}

/// Insert a customer row
pub async fn insert_customer(
    conn: &mut PgConnection,
    id: Uuid,
    operation_id: Uuid,
    req: &CustomerRequest,
) -> Result<OperationCustomer> {
    let customer = sqlx::query_as::<_, OperationCustomer>(
        r#"
        INSERT INTO operation_customers (id, operation_id, first_name, last_name,
                                         customer_type, birth_date, passport_no, contact_info,
                                         is_buyer, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(operation_id)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(req.customer_type)
    .bind(req.birth_date)
    .bind(req.passport_no.as_deref())
    .bind(req.contact_info.as_deref())
    .bind(req.is_buyer)
    .bind(req.notes.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    Ok(customer)
}

/// Overwrite a customer row
pub async fn update_customer(
    conn: &mut PgConnection,
    id: Uuid,
    req: &CustomerRequest,
) -> Result<OperationCustomer> {
    let customer = sqlx::query_as::<_, OperationCustomer>(
        r#"
        UPDATE operation_customers
        SET first_name = $2,
            last_name = $3,
            customer_type = $4,
            birth_date = $5,
            passport_no = $6,
            contact_info = $7,
            is_buyer = $8,
            notes = $9
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(req.customer_type)
    .bind(req.birth_date)
    .bind(req.passport_no.as_deref())
    .bind(req.contact_info.as_deref())
    .bind(req.is_buyer)
    .bind(req.notes.as_deref())
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(customer)
}

/// Delete a customer row
pub async fn delete_customer(conn: &mut PgConnection, id: Uuid) -> Result<()> {
    let deleted = sqlx::query("DELETE FROM operation_customers WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Recompute an operation's pax from its active customers, in one statement
pub async fn recount_pax(conn: &mut PgConnection, operation_id: Uuid) -> Result<i32> {
    let total_pax = sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE operations
        SET total_pax = (SELECT COUNT(*) FROM operation_customers
                         WHERE operation_id = $1 AND is_active = TRUE),
            updated_at = now()
        WHERE id = $1
        RETURNING total_pax
        "#,
    )
    .bind(operation_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total_pax)
}

/// Insert a sales price row
pub async fn insert_sales_price(
    conn: &mut PgConnection,
    id: Uuid,
    operation_id: Uuid,
    req: &SalesPriceRequest,
) -> Result<OperationSalesPrice> {
    let sales_price = sqlx::query_as::<_, OperationSalesPrice>(
        r#"
        INSERT INTO operation_sales_prices (id, operation_id, price, currency_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(operation_id)
    .bind(req.price)
    .bind(req.currency_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(sales_price)
}

// ==================== cascade toggles ====================

/// Flip one operation's active flag, returning the new state
pub async fn toggle_operation_row(conn: &mut PgConnection, id: Uuid) -> Result<Operation> {
    let operation = sqlx::query_as::<_, Operation>(
        "UPDATE operations SET is_active = NOT is_active, updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(operation)
}

/// Push an operation's active flag onto everything it owns
pub async fn set_operation_subtree_active(
    conn: &mut PgConnection,
    operation_id: Uuid,
    active: bool,
) -> Result<()> {
    sqlx::query("UPDATE operation_customers SET is_active = $2 WHERE operation_id = $1")
        .bind(operation_id)
        .bind(active)
        .execute(&mut *conn)
        .await?;

    sqlx::query("UPDATE operation_sales_prices SET is_active = $2 WHERE operation_id = $1")
        .bind(operation_id)
        .bind(active)
        .execute(&mut *conn)
        .await?;

    sqlx::query("UPDATE operation_days SET is_active = $2 WHERE operation_id = $1")
        .bind(operation_id)
        .bind(active)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "UPDATE operation_items SET is_active = $2 WHERE operation_day_id IN \
         (SELECT id FROM operation_days WHERE operation_id = $1)",
    )
    .bind(operation_id)
    .bind(active)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "UPDATE operation_sub_items SET is_active = $2 WHERE operation_item_id IN \
         (SELECT i.id FROM operation_items i \
          JOIN operation_days d ON d.id = i.operation_day_id \
          WHERE d.operation_id = $1)",
    )
    .bind(operation_id)
    .bind(active)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Flip one day's active flag, returning the new state
pub async fn toggle_day_row(conn: &mut PgConnection, id: Uuid) -> Result<OperationDay> {
    let day = sqlx::query_as::<_, OperationDay>(
        "UPDATE operation_days SET is_active = NOT is_active WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(day)
}

/// Push a day's active flag onto its items and their sub-items
pub async fn set_day_subtree_active(
    conn: &mut PgConnection,
    day_id: Uuid,
    active: bool,
) -> Result<()> {
    sqlx::query("UPDATE operation_items SET is_active = $2 WHERE operation_day_id = $1")
        .bind(day_id)
        .bind(active)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "UPDATE operation_sub_items SET is_active = $2 WHERE operation_item_id IN \
         (SELECT id FROM operation_items WHERE operation_day_id = $1)",
    )
    .bind(day_id)
    .bind(active)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Flip one item's active flag, returning the new state
pub async fn toggle_item_row(conn: &mut PgConnection, id: Uuid) -> Result<OperationItem> {
    let item = sqlx::query_as::<_, OperationItem>(
        "UPDATE operation_items SET is_active = NOT is_active WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(item)
}

/// Push an item's active flag onto its sub-items
pub async fn set_item_sub_items_active(
    conn: &mut PgConnection,
    item_id: Uuid,
    active: bool,
) -> Result<()> {
    sqlx::query("UPDATE operation_sub_items SET is_active = $2 WHERE operation_item_id = $1")
        .bind(item_id)
        .bind(active)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Flip one sub-item's active flag; leaf of the cascade
pub async fn toggle_sub_item_row(conn: &mut PgConnection, id: Uuid) -> Result<OperationSubItem> {
    let sub_item = sqlx::query_as::<_, OperationSubItem>(
        "UPDATE operation_sub_items SET is_active = NOT is_active WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(sub_item)
}

/// Flip one customer's active flag, returning the new state
pub async fn toggle_customer_row(conn: &mut PgConnection, id: Uuid) -> Result<OperationCustomer> {
    let customer = sqlx::query_as::<_, OperationCustomer>(
        "UPDATE operation_customers SET is_active = NOT is_active WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(customer)
}

// ==================== schedule board ====================

/// One upcoming-board row: a day joined to its operation and buyer
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleDayRow {
    pub day_id: Uuid,
    pub date: NaiveDate,
    pub operation_id: Uuid,
    pub reference_number: String,
    pub buyer_company_name: String,
    pub follow_by: Option<String>,
    pub status: OperationStatus,
    pub total_pax: i32,
}

/// Active days in `[from, to)` with their operation context, date ascending
pub async fn schedule_rows(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ScheduleDayRow>> {
    let rows = sqlx::query_as::<_, ScheduleDayRow>(
        r#"
        SELECT d.id AS day_id,
               d.date,
               o.id AS operation_id,
               o.reference_number,
               b.name AS buyer_company_name,
               o.follow_by,
               o.status,
               o.total_pax
        FROM operation_days d
        JOIN operations o ON o.id = d.operation_id
        JOIN buyer_companies b ON b.id = o.buyer_company_id
        WHERE d.date >= $1
          AND d.date < $2
          AND d.is_active = TRUE
        ORDER BY d.date, o.reference_number
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
