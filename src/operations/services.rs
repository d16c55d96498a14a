//! Save paths and read assemblies for operations.
//!
//! Each save validates first, then writes on one transaction. Reference
//! numbers rely on the unique constraint as the last word: when a generated
//! candidate loses a race the save rolls back, refetches the taken set and
//! tries again.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{
    BuyerCompany, Operation, OperationCustomer, OperationDay, OperationItem, OperationSalesPrice,
    OperationSubItem,
};

use super::queries;
use super::reference::{first_free_reference, reference_prefix};
use super::report::{self, MissingFieldReport};
use super::requests::{
    CustomerRequest, ItemRequest, OperationRequest, SalesPriceRequest, SubItemRequest,
};
use super::responses::{DayWithItems, ItemWithSubItems, ScheduleEntry, SubItemWithMuseums};
use super::schedule::{date_range, plan_days};
use super::validate;

/// Saves that lose a reference race retry this many times before giving up
const REFERENCE_ATTEMPTS: usize = 3;

async fn lookup_buyer(pool: &PgPool, id: Uuid) -> Result<BuyerCompany> {
    db::queries::get_buyer_company(pool, id)
        .await
        .map_err(|err| match err {
            AppError::NotFound => AppError::Validation("buyer company not found".to_string()),
            other => other,
        })
}

fn state_word(active: bool) -> &'static str {
    if active {
        "reactivated"
    } else {
        "deactivated"
    }
}

// ==================== operation save paths ====================

/// Create an operation with its reference number and one day row per date.
pub async fn create_operation(
    pool: &PgPool,
    cache: &AppCache,
    req: OperationRequest,
) -> Result<Operation> {
    validate::validate_date_range(req.start_date, req.end_date)?;
    let buyer = lookup_buyer(pool, req.buyer_company_id).await?;

    let supplied = req
        .reference_number
        .as_deref()
        .map(str::trim)
        .filter(|reference| !reference.is_empty());

    for _ in 0..REFERENCE_ATTEMPTS {
        let mut tx = pool.begin().await?;

        let reference = match supplied {
            Some(reference) => reference.to_string(),
            None => {
                let prefix = reference_prefix(&buyer.short_name, req.start_date);
                let taken: HashSet<String> = queries::taken_references(&mut tx, &prefix)
                    .await?
                    .into_iter()
                    .collect();
                first_free_reference(&buyer.short_name, req.start_date, &taken)
            }
        };

        match queries::insert_operation(&mut tx, Uuid::new_v4(), &req, &reference).await {
            Ok(operation) => {
                let dates = date_range(operation.start_date, operation.end_date);
                queries::insert_days(&mut tx, operation.id, &dates).await?;
                tx.commit().await?;

                tracing::info!(
                    "operation {} created as {} with {} days",
                    operation.id,
                    operation.reference_number,
                    dates.len()
                );
                cache.invalidate_schedules();
                return Ok(operation);
            }
            Err(err) if err.is_unique_violation() => {
                tx.rollback().await?;
                if supplied.is_some() {
                    return Err(AppError::Conflict(format!(
                        "reference number {reference} is already in use"
                    )));
                }
                tracing::warn!("reference {} taken by a concurrent save, retrying", reference);
            }
            Err(err) => return Err(err),
        }
    }

    Err(AppError::Conflict(
        "could not allocate a unique reference number".to_string(),
    ))
}

/// Update an operation, regenerating the reference when it was left blank
/// and the buyer or start date moved, and reconciling day rows when the
/// range changed.
pub async fn update_operation(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    req: OperationRequest,
) -> Result<Operation> {
    validate::validate_date_range(req.start_date, req.end_date)?;
    let buyer = lookup_buyer(pool, req.buyer_company_id).await?;

    let supplied = req
        .reference_number
        .as_deref()
        .map(str::trim)
        .filter(|reference| !reference.is_empty());

    for _ in 0..REFERENCE_ATTEMPTS {
        let mut tx = pool.begin().await?;
        let before = queries::get_operation_for_update(&mut tx, id).await?;

        let reference = match supplied {
            Some(reference) => reference.to_string(),
            None if before.buyer_company_id != req.buyer_company_id
                || before.start_date != req.start_date =>
            {
                let prefix = reference_prefix(&buyer.short_name, req.start_date);
                let taken: HashSet<String> = queries::taken_references(&mut tx, &prefix)
                    .await?
                    .into_iter()
                    .collect();
                first_free_reference(&buyer.short_name, req.start_date, &taken)
            }
            None => before.reference_number.clone(),
        };

        match queries::update_operation(&mut tx, id, &req, &reference).await {
            Ok(operation) => {
                if before.start_date != operation.start_date
                    || before.end_date != operation.end_date
                {
                    let existing = queries::day_dates(&mut tx, id).await?;
                    let plan = plan_days(operation.start_date, operation.end_date, &existing);
                    let removed = queries::delete_days_before(&mut tx, id, plan.delete_before)
                        .await?
                        + queries::delete_days_after(&mut tx, id, plan.delete_after).await?;
                    queries::insert_days(&mut tx, id, &plan.create).await?;

                    tracing::info!(
                        "operation {} days reconciled: {} removed, {} added",
                        id,
                        removed,
                        plan.create.len()
                    );
                }
                tx.commit().await?;

                cache.invalidate_schedules();
                return Ok(operation);
            }
            Err(err) if err.is_unique_violation() => {
                tx.rollback().await?;
                if supplied.is_some() {
                    return Err(AppError::Conflict(format!(
                        "reference number {reference} is already in use"
                    )));
                }
                tracing::warn!("reference {} taken by a concurrent save, retrying", reference);
            }
            Err(err) => return Err(err),
        }
    }

    Err(AppError::Conflict(
        "could not allocate a unique reference number".to_string(),
    ))
}

// ==================== items and sub-items ====================

/// Add an item to a day after checking its reference fields fit its type.
pub async fn add_item(
    pool: &PgPool,
    cache: &AppCache,
    day_id: Uuid,
    req: ItemRequest,
) -> Result<OperationItem> {
    validate::validate_item_references(&req)?;
    queries::get_day(pool, day_id).await?;

    let mut conn = pool.acquire().await?;
    let item = queries::insert_item(&mut conn, Uuid::new_v4(), day_id, &req).await?;

    tracing::info!("item {} added to day {}", item.id, day_id);
    cache.invalidate_schedules();
    Ok(item)
}

/// Add a sub-item line to an item, appending after the current last line
/// when no ordering was given.
pub async fn add_sub_item(
    pool: &PgPool,
    cache: &AppCache,
    item_id: Uuid,
    req: SubItemRequest,
) -> Result<SubItemWithMuseums> {
    validate::validate_sub_item_references(&req)?;
    queries::get_item(pool, item_id).await?;

    let mut tx = pool.begin().await?;
    let ordering = match req.ordering {
        Some(ordering) => ordering,
        None => queries::next_ordering(&mut tx, item_id).await?,
    };
    let sub_item =
        queries::insert_sub_item(&mut tx, Uuid::new_v4(), item_id, ordering, &req).await?;
    if !req.museum_ids.is_empty() {
        queries::link_museums(&mut tx, sub_item.id, &req.museum_ids).await?;
    }
    tx.commit().await?;

    tracing::info!("sub-item {} added to item {} at position {}", sub_item.id, item_id, ordering);
    cache.invalidate_schedules();
    Ok(SubItemWithMuseums {
        sub_item,
        museum_ids: req.museum_ids,
    })
}

// ==================== customers ====================

/// Add a customer and bring the operation's pax count up to date.
pub async fn add_customer(
    pool: &PgPool,
    cache: &AppCache,
    operation_id: Uuid,
    req: CustomerRequest,
) -> Result<OperationCustomer> {
    let today = Utc::now().date_naive();
    validate::validate_customer(&req, today)?;

    let mut tx = pool.begin().await?;
    queries::get_operation_for_update(&mut tx, operation_id).await?;
    let customer = queries::insert_customer(&mut tx, Uuid::new_v4(), operation_id, &req).await?;
    let total_pax = queries::recount_pax(&mut tx, operation_id).await?;
    tx.commit().await?;

    tracing::info!(
        "customer {} added, operation {} now at {} pax",
        customer.id,
        operation_id,
        total_pax
    );
    cache.invalidate_schedules();
    Ok(customer)
}

/// Update a customer. The edit is rejected when it would strip the roster
/// of its last buyer.
pub async fn update_customer(
    pool: &PgPool,
    id: Uuid,
    req: CustomerRequest,
) -> Result<OperationCustomer> {
    let today = Utc::now().date_naive();
    validate::validate_customer(&req, today)?;
    let current = queries::get_customer(pool, id).await?;

    let mut tx = pool.begin().await?;
    queries::get_operation_for_update(&mut tx, current.operation_id).await?;

    let mut roster = queries::customers_for_operation(&mut tx, current.operation_id).await?;
    for customer in &mut roster {
        if customer.id == id {
            customer.is_buyer = req.is_buyer;
        }
    }
    validate::ensure_buyer_present(&roster)?;

    let customer = queries::update_customer(&mut tx, id, &req).await?;
    tx.commit().await?;

    Ok(customer)
}

/// Remove a customer, keeping a buyer on any non-empty roster and the pax
/// count current.
pub async fn delete_customer(pool: &PgPool, cache: &AppCache, id: Uuid) -> Result<()> {
    let current = queries::get_customer(pool, id).await?;

    let mut tx = pool.begin().await?;
    queries::get_operation_for_update(&mut tx, current.operation_id).await?;

    let roster = queries::customers_for_operation(&mut tx, current.operation_id).await?;
    let remaining: Vec<OperationCustomer> = roster
        .into_iter()
        .filter(|customer| customer.id != id)
        .collect();
    validate::ensure_buyer_present(&remaining)?;

    queries::delete_customer(&mut tx, id).await?;
    let total_pax = queries::recount_pax(&mut tx, current.operation_id).await?;
    tx.commit().await?;

    tracing::info!(
        "customer {} removed, operation {} now at {} pax",
        id,
        current.operation_id,
        total_pax
    );
    cache.invalidate_schedules();
    Ok(())
}

/// Flip a customer's active flag and recount the operation's pax.
pub async fn toggle_customer(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
) -> Result<OperationCustomer> {
    let mut tx = pool.begin().await?;
    let customer = queries::toggle_customer_row(&mut tx, id).await?;
    let total_pax = queries::recount_pax(&mut tx, customer.operation_id).await?;
    tx.commit().await?;

    tracing::info!(
        "customer {} {}, operation {} now at {} pax",
        id,
        state_word(customer.is_active),
        customer.operation_id,
        total_pax
    );
    cache.invalidate_schedules();
    Ok(customer)
}

// ==================== sales prices ====================

/// Record a sales price against an operation.
pub async fn add_sales_price(
    pool: &PgPool,
    operation_id: Uuid,
    req: SalesPriceRequest,
) -> Result<OperationSalesPrice> {
    queries::get_operation(pool, operation_id).await?;

    let mut conn = pool.acquire().await?;
    let sales_price =
        queries::insert_sales_price(&mut conn, Uuid::new_v4(), operation_id, &req).await?;

    tracing::info!("sales price recorded for operation {}", operation_id);
    Ok(sales_price)
}

// ==================== cascade toggles ====================

/// Flip an operation's active flag and push the new state onto its days,
/// items, sub-items, customers and sales prices, then recount pax so it
/// keeps tracking the active customers.
pub async fn toggle_operation(pool: &PgPool, cache: &AppCache, id: Uuid) -> Result<Operation> {
    let mut tx = pool.begin().await?;
    let mut operation = queries::toggle_operation_row(&mut tx, id).await?;
    queries::set_operation_subtree_active(&mut tx, id, operation.is_active).await?;
    operation.total_pax = queries::recount_pax(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("operation {} and its subtree {}", id, state_word(operation.is_active));
    cache.invalidate_schedules();
    Ok(operation)
}

/// Flip a day's active flag and push the new state onto its items and their
/// sub-items.
pub async fn toggle_day(pool: &PgPool, cache: &AppCache, id: Uuid) -> Result<OperationDay> {
    let mut tx = pool.begin().await?;
    let day = queries::toggle_day_row(&mut tx, id).await?;
    queries::set_day_subtree_active(&mut tx, day.id, day.is_active).await?;
    tx.commit().await?;

    tracing::info!("day {} and its items {}", id, state_word(day.is_active));
    cache.invalidate_schedules();
    Ok(day)
}

/// Flip an item's active flag and push the new state onto its sub-items.
pub async fn toggle_item(pool: &PgPool, cache: &AppCache, id: Uuid) -> Result<OperationItem> {
    let mut tx = pool.begin().await?;
    let item = queries::toggle_item_row(&mut tx, id).await?;
    queries::set_item_sub_items_active(&mut tx, item.id, item.is_active).await?;
    tx.commit().await?;

    tracing::info!("item {} and its sub-items {}", id, state_word(item.is_active));
    cache.invalidate_schedules();
    Ok(item)
}

/// Flip a sub-item's active flag; nothing hangs below it.
pub async fn toggle_sub_item(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
) -> Result<OperationSubItem> {
    let mut conn = pool.acquire().await?;
    let sub_item = queries::toggle_sub_item_row(&mut conn, id).await?;

    tracing::info!("sub-item {} {}", id, state_word(sub_item.is_active));
    cache.invalidate_schedules();
    Ok(sub_item)
}

// ==================== read assemblies ====================

fn group_items(
    items: Vec<OperationItem>,
    sub_items: Vec<OperationSubItem>,
    links: Vec<(Uuid, Uuid)>,
) -> HashMap<Uuid, Vec<ItemWithSubItems>> {
    let mut museums: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (sub_item_id, museum_id) in links {
        museums.entry(sub_item_id).or_default().push(museum_id);
    }

    let mut lines: HashMap<Uuid, Vec<SubItemWithMuseums>> = HashMap::new();
    for sub_item in sub_items {
        let museum_ids = museums.remove(&sub_item.id).unwrap_or_default();
        lines
            .entry(sub_item.operation_item_id)
            .or_default()
            .push(SubItemWithMuseums {
                sub_item,
                museum_ids,
            });
    }

    let mut grouped: HashMap<Uuid, Vec<ItemWithSubItems>> = HashMap::new();
    for item in items {
        let sub_items = lines.remove(&item.id).unwrap_or_default();
        grouped
            .entry(item.operation_day_id)
            .or_default()
            .push(ItemWithSubItems { item, sub_items });
    }
    grouped
}

/// All days of an operation, date ascending, each carrying its items with
/// their sub-item lines and museum links.
pub async fn list_days(pool: &PgPool, operation_id: Uuid) -> Result<Vec<DayWithItems>> {
    queries::get_operation(pool, operation_id).await?;

    let days = queries::days_for_operation(pool, operation_id).await?;
    let day_ids: Vec<Uuid> = days.iter().map(|day| day.id).collect();
    let items = queries::items_for_days(pool, &day_ids).await?;
    let item_ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
    let sub_items = queries::sub_items_for_items(pool, &item_ids).await?;
    let sub_item_ids: Vec<Uuid> = sub_items.iter().map(|sub_item| sub_item.id).collect();
    let links = queries::museum_links(pool, &sub_item_ids).await?;

    let mut grouped = group_items(items, sub_items, links);
    Ok(days
        .into_iter()
        .map(|day| {
            let items = grouped.remove(&day.id).unwrap_or_default();
            DayWithItems { day, items }
        })
        .collect())
}

/// Field gaps for one item and its sub-item lines.
pub async fn missing_fields(pool: &PgPool, item_id: Uuid) -> Result<MissingFieldReport> {
    let item = queries::get_item(pool, item_id).await?;
    let sub_items = queries::sub_items_for_items(pool, &[item_id]).await?;
    let sub_item_ids: Vec<Uuid> = sub_items.iter().map(|sub_item| sub_item.id).collect();
    let links = queries::museum_links(pool, &sub_item_ids).await?;

    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for (sub_item_id, _) in links {
        *counts.entry(sub_item_id).or_insert(0) += 1;
    }
    let pairs: Vec<(OperationSubItem, usize)> = sub_items
        .into_iter()
        .map(|sub_item| {
            let museum_count = counts.get(&sub_item.id).copied().unwrap_or(0);
            (sub_item, museum_count)
        })
        .collect();

    Ok(report::missing_field_report(&item, &pairs))
}

/// The board of active days from today through the horizon, each with its
/// operation context and nested items.
pub async fn upcoming_schedule(pool: &PgPool, horizon_days: u32) -> Result<Vec<ScheduleEntry>> {
    let from = Utc::now().date_naive();
    let to = from
        .checked_add_days(chrono::Days::new(u64::from(horizon_days)))
        .ok_or_else(|| AppError::Validation("schedule horizon is too large".to_string()))?;

    let rows = queries::schedule_rows(pool, from, to).await?;
    let day_ids: Vec<Uuid> = rows.iter().map(|row| row.day_id).collect();
    let items = queries::items_for_days(pool, &day_ids).await?;
    let item_ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
    let sub_items = queries::sub_items_for_items(pool, &item_ids).await?;
    let sub_item_ids: Vec<Uuid> = sub_items.iter().map(|sub_item| sub_item.id).collect();
    let links = queries::museum_links(pool, &sub_item_ids).await?;

    let mut grouped = group_items(items, sub_items, links);
    Ok(rows
        .into_iter()
        .map(|row| ScheduleEntry {
            items: grouped.remove(&row.day_id).unwrap_or_default(),
            day_id: row.day_id,
            date: row.date,
            operation_id: row.operation_id,
            reference_number: row.reference_number,
            buyer_company_name: row.buyer_company_name,
            follow_by: row.follow_by,
            status: row.status,
            total_pax: row.total_pax,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemType, SubItemType};

    fn item_row(id: Uuid, day_id: Uuid) -> OperationItem {
        OperationItem {
            id,
            operation_day_id: day_id,
            item_type: ItemType::Vehicle,
            vehicle_type_id: None,
            vehicle_supplier_id: None,
            no_vehicle_tour_id: None,
            no_vehicle_activity_id: None,
            activity_supplier_id: None,
            pick_time: None,
            pick_up_location: None,
            drop_off_location: None,
            driver_name: None,
            driver_phone: None,
            vehicle_plate_no: None,
            sales_price: None,
            sales_currency_id: None,
            cost_price: None,
            cost_currency_id: None,
            notes: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn sub_item_row(id: Uuid, item_id: Uuid, ordering: i32) -> OperationSubItem {
        OperationSubItem {
            id,
            operation_item_id: item_id,
            sub_item_type: SubItemType::Museum,
            ordering,
            tour_id: None,
            transfer_id: None,
            hotel_id: None,
            room_type: None,
            guide_id: None,
            is_guide: false,
            activity_id: None,
            activity_supplier_id: None,
            other_price_description: None,
            sales_price: None,
            sales_currency_id: None,
            cost_price: None,
            cost_currency_id: None,
            notes: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    // ==================== group_items tests ====================

    #[test]
    fn test_group_items_nests_by_day() {
        let day_one = Uuid::new_v4();
        let day_two = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        let items = vec![
            item_row(first, day_one),
            item_row(second, day_one),
            item_row(third, day_two),
        ];
        let grouped = group_items(items, Vec::new(), Vec::new());

        let day_one_items = &grouped[&day_one];
        assert_eq!(day_one_items.len(), 2);
        assert_eq!(day_one_items[0].item.id, first);
        assert_eq!(day_one_items[1].item.id, second);
        assert_eq!(grouped[&day_two].len(), 1);
        assert_eq!(grouped[&day_two][0].item.id, third);
    }

    #[test]
    fn test_group_items_attaches_museum_links() {
        let day_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let linked = Uuid::new_v4();
        let bare = Uuid::new_v4();
        let museum_one = Uuid::new_v4();
        let museum_two = Uuid::new_v4();

        let items = vec![item_row(item_id, day_id)];
        let sub_items = vec![
            sub_item_row(linked, item_id, 1),
            sub_item_row(bare, item_id, 2),
        ];
        let links = vec![(linked, museum_one), (linked, museum_two)];
        let grouped = group_items(items, sub_items, links);

        let lines = &grouped[&day_id][0].sub_items;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].museum_ids, vec![museum_one, museum_two]);
        assert!(lines[1].museum_ids.is_empty());
    }

    #[test]
    fn test_group_items_keeps_items_without_sub_items() {
        let day_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();

        let grouped = group_items(vec![item_row(item_id, day_id)], Vec::new(), Vec::new());

        assert!(grouped[&day_id][0].sub_items.is_empty());
    }
}
