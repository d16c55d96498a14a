//! Generic price-history engine.
//!
//! All four priced entities follow the same snapshot protocol: one snapshot
//! at creation, and on every edit that changes a money field or the currency,
//! close the open windows at today and open a fresh one. The protocol is
//! implemented once against the `PricedEntity` descriptor below instead of
//! per entity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    ActivityCost, ActivityCostHistory, Hotel, HotelPriceHistory, Museum, MuseumPriceHistory,
    VehicleCost, VehicleCostHistory,
};

/// Inclusive validity window of a history row.
pub trait PriceSnapshot {
    fn valid_from(&self) -> NaiveDate;
    fn valid_until(&self) -> NaiveDate;

    /// True when the window contains `date`, both bounds inclusive.
    fn covers(&self, date: NaiveDate) -> bool {
        self.valid_from() <= date && date <= self.valid_until()
    }
}

/// Capability descriptor wiring a priced entity to its history table.
///
/// `PRICE_COLUMNS` and `price_values` must list the money fields in the same
/// order. The currency counts as a price field when deciding whether an edit
/// opens a new snapshot.
pub trait PricedEntity {
    type Snapshot: for<'r> FromRow<'r, PgRow> + PriceSnapshot + Send + Unpin;

    /// Label used in logs.
    const ENTITY: &'static str;
    /// History table name.
    const HISTORY_TABLE: &'static str;
    /// Column on the history table referencing the owning entity.
    const OWNER_COLUMN: &'static str;
    /// Money columns copied into each snapshot.
    const PRICE_COLUMNS: &'static [&'static str];

    fn id(&self) -> Uuid;
    fn currency_id(&self) -> Uuid;
    fn valid_until(&self) -> NaiveDate;
    fn price_values(&self) -> Vec<Decimal>;
}

impl PricedEntity for Hotel {
    type Snapshot = HotelPriceHistory;

    const ENTITY: &'static str = "hotel";
    const HISTORY_TABLE: &'static str = "hotel_price_histories";
    const OWNER_COLUMN: &'static str = "hotel_id";
    const PRICE_COLUMNS: &'static [&'static str] =
        &["single_price", "double_price", "triple_price"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn currency_id(&self) -> Uuid {
        self.currency_id
    }

    fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    fn price_values(&self) -> Vec<Decimal> {
        vec![self.single_price, self.double_price, self.triple_price]
    }
}

impl PriceSnapshot for HotelPriceHistory {
    fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }
}

impl PricedEntity for Museum {
    type Snapshot = MuseumPriceHistory;

    const ENTITY: &'static str = "museum";
    const HISTORY_TABLE: &'static str = "museum_price_histories";
    const OWNER_COLUMN: &'static str = "museum_id";
    const PRICE_COLUMNS: &'static [&'static str] = &["local_price", "foreign_price"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn currency_id(&self) -> Uuid {
        self.currency_id
    }

    fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    fn price_values(&self) -> Vec<Decimal> {
        vec![self.local_price, self.foreign_price]
    }
}

impl PriceSnapshot for MuseumPriceHistory {
    fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }
}

impl PricedEntity for VehicleCost {
    type Snapshot = VehicleCostHistory;

    const ENTITY: &'static str = "vehicle_cost";
    const HISTORY_TABLE: &'static str = "vehicle_cost_histories";
    const OWNER_COLUMN: &'static str = "vehicle_cost_id";
    const PRICE_COLUMNS: &'static [&'static str] =
        &["car_cost", "minivan_cost", "minibus_cost", "midibus_cost", "bus_cost"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn currency_id(&self) -> Uuid {
        self.currency_id
    }

    fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    fn price_values(&self) -> Vec<Decimal> {
        vec![
            self.car_cost,
            self.minivan_cost,
            self.minibus_cost,
            self.midibus_cost,
            self.bus_cost,
        ]
    }
}

impl PriceSnapshot for VehicleCostHistory {
    fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }
}

impl PricedEntity for ActivityCost {
    type Snapshot = ActivityCostHistory;

    const ENTITY: &'static str = "activity_cost";
    const HISTORY_TABLE: &'static str = "activity_cost_histories";
    const OWNER_COLUMN: &'static str = "activity_cost_id";
    const PRICE_COLUMNS: &'static [&'static str] = &["price"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn currency_id(&self) -> Uuid {
        self.currency_id
    }

    fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    fn price_values(&self) -> Vec<Decimal> {
        vec![self.price]
    }
}

impl PriceSnapshot for ActivityCostHistory {
    fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }
}

/// True when any money field or the currency differs between the two states.
pub fn price_changed<E: PricedEntity>(new: &E, old: &E) -> bool {
    new.price_values() != old.price_values() || new.currency_id() != old.currency_id()
}

/// Reject validity dates already in the past. Runs before any write so a
/// failed save leaves neither entity nor snapshot behind.
pub fn validate_valid_until(valid_until: NaiveDate, today: NaiveDate) -> Result<()> {
    if valid_until < today {
        return Err(AppError::Validation(
            "valid_until cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

fn insert_sql<E: PricedEntity>() -> String {
    let columns = E::PRICE_COLUMNS.join(", ");
    let placeholders = (0..E::PRICE_COLUMNS.len())
        .map(|i| format!("${}", i + 6))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} (id, {}, currency_id, valid_from, valid_until, {}) \
         VALUES ($1, $2, $3, $4, $5, {}) RETURNING *",
        E::HISTORY_TABLE,
        E::OWNER_COLUMN,
        columns,
        placeholders,
    )
}

fn close_sql<E: PricedEntity>() -> String {
    format!(
        "UPDATE {} SET valid_until = $2 WHERE {} = $1 AND valid_until >= $2",
        E::HISTORY_TABLE,
        E::OWNER_COLUMN,
    )
}

fn as_of_sql<E: PricedEntity>() -> String {
    format!(
        "SELECT * FROM {} WHERE {} = $1 AND is_active = TRUE \
         AND valid_from <= $2 AND valid_until >= $2 \
         ORDER BY valid_from DESC LIMIT 1",
        E::HISTORY_TABLE,
        E::OWNER_COLUMN,
    )
}

fn list_sql<E: PricedEntity>() -> String {
    format!(
        "SELECT * FROM {} WHERE {} = $1 ORDER BY valid_from DESC",
        E::HISTORY_TABLE,
        E::OWNER_COLUMN,
    )
}

async fn insert_snapshot<E: PricedEntity>(
    conn: &mut PgConnection,
    entity: &E,
    valid_from: NaiveDate,
) -> Result<E::Snapshot> {
    let sql = insert_sql::<E>();
    let mut query = sqlx::query_as::<_, E::Snapshot>(&sql)
        .bind(Uuid::new_v4())
        .bind(entity.id())
        .bind(entity.currency_id())
        .bind(valid_from)
        .bind(entity.valid_until());
    for value in entity.price_values() {
        query = query.bind(value);
    }
    Ok(query.fetch_one(&mut *conn).await?)
}

/// Insert the first snapshot for a just-created entity, window
/// [today, entity.valid_until].
///
/// Runs on the caller's connection so the snapshot commits together with the
/// entity insert it mirrors.
pub async fn record_initial_snapshot<E: PricedEntity>(
    conn: &mut PgConnection,
    entity: &E,
    today: NaiveDate,
) -> Result<E::Snapshot> {
    insert_snapshot(conn, entity, today).await
}

/// Close open windows at `today` and open a fresh one for an updated entity.
///
/// No-op when neither a money field nor the currency changed, so repeated
/// saves never grow history. Closing hits every row with
/// `valid_until >= today` (zero, one, or many), tolerating prior irregular
/// data. Returns the newly opened snapshot, if any.
pub async fn reconcile_snapshot<E: PricedEntity>(
    conn: &mut PgConnection,
    new: &E,
    old: &E,
    today: NaiveDate,
) -> Result<Option<E::Snapshot>> {
    if !price_changed(new, old) {
        return Ok(None);
    }

    let sql = close_sql::<E>();
    let closed = sqlx::query(&sql)
        .bind(new.id())
        .bind(today)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    tracing::debug!("{} {}: closed {} open price window(s)", E::ENTITY, new.id(), closed);

    let snapshot = insert_snapshot(conn, new, today).await?;
    Ok(Some(snapshot))
}

/// Snapshot in effect on `date`, or None when no window contains it.
///
/// Windows never overlap under normal operation; if corrupt data produces an
/// overlap, the row with the newest `valid_from` wins, deterministically.
pub async fn price_as_of<E: PricedEntity>(
    pool: &PgPool,
    entity_id: Uuid,
    date: NaiveDate,
) -> Result<Option<E::Snapshot>> {
    let sql = as_of_sql::<E>();
    Ok(sqlx::query_as::<_, E::Snapshot>(&sql)
        .bind(entity_id)
        .bind(date)
        .fetch_optional(pool)
        .await?)
}

/// Full history of one entity, newest window first.
pub async fn list_snapshots<E: PricedEntity>(
    pool: &PgPool,
    entity_id: Uuid,
) -> Result<Vec<E::Snapshot>> {
    let sql = list_sql::<E>();
    Ok(sqlx::query_as::<_, E::Snapshot>(&sql)
        .bind(entity_id)
        .fetch_all(pool)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hotel(single: Decimal, double: Decimal, triple: Decimal, currency_id: Uuid) -> Hotel {
        Hotel {
            id: Uuid::nil(),
            name: "Grand Plaza".to_string(),
            city_id: Uuid::nil(),
            single_price: single,
            double_price: double,
            triple_price: triple,
            currency_id,
            valid_until: date(2024, 12, 31),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // ==================== price_changed tests ====================

    #[test]
    fn test_price_changed_detects_single_field() {
        let currency = Uuid::new_v4();
        let old = hotel(dec!(100), dec!(150), dec!(200), currency);
        let mut new = old.clone();
        new.double_price = dec!(160);
        assert!(price_changed(&new, &old));
    }

    #[test]
    fn test_price_changed_ignores_non_price_edits() {
        let currency = Uuid::new_v4();
        let old = hotel(dec!(100), dec!(150), dec!(200), currency);
        let mut new = old.clone();
        new.name = "Grand Plaza Renovated".to_string();
        new.valid_until = date(2025, 6, 30);
        assert!(!price_changed(&new, &old));
    }

    #[test]
    fn test_price_changed_currency_only_counts() {
        let old = hotel(dec!(100), dec!(150), dec!(200), Uuid::new_v4());
        let mut new = old.clone();
        new.currency_id = Uuid::new_v4();
        assert!(price_changed(&new, &old));
    }

    #[test]
    fn test_price_changed_all_vehicle_classes_compared() {
        let currency = Uuid::new_v4();
        let old = VehicleCost {
            id: Uuid::nil(),
            supplier_id: Uuid::nil(),
            tour_id: Some(Uuid::nil()),
            transfer_id: None,
            car_cost: dec!(50),
            minivan_cost: dec!(70),
            minibus_cost: dec!(90),
            midibus_cost: dec!(110),
            bus_cost: dec!(150),
            currency_id: currency,
            valid_until: date(2024, 12, 31),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut new = old.clone();
        new.bus_cost = dec!(155);
        assert!(price_changed(&new, &old));

        let unchanged = old.clone();
        assert!(!price_changed(&unchanged, &old));
    }

    // ==================== validate_valid_until tests ====================

    #[test]
    fn test_validate_valid_until_rejects_past() {
        let result = validate_valid_until(date(2024, 5, 31), date(2024, 6, 1));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_valid_until_accepts_today_and_future() {
        assert!(validate_valid_until(date(2024, 6, 1), date(2024, 6, 1)).is_ok());
        assert!(validate_valid_until(date(2025, 1, 1), date(2024, 6, 1)).is_ok());
    }

    // ==================== window tests ====================

    #[test]
    fn test_snapshot_covers_inclusive_bounds() {
        let snapshot = HotelPriceHistory {
            id: Uuid::nil(),
            hotel_id: Uuid::nil(),
            single_price: dec!(100),
            double_price: dec!(150),
            triple_price: dec!(200),
            currency_id: Uuid::nil(),
            valid_from: date(2024, 6, 1),
            valid_until: date(2024, 6, 30),
            is_active: true,
            created_at: Utc::now(),
        };
        assert!(snapshot.covers(date(2024, 6, 1)));
        assert!(snapshot.covers(date(2024, 6, 15)));
        assert!(snapshot.covers(date(2024, 6, 30)));
        assert!(!snapshot.covers(date(2024, 5, 31)));
        assert!(!snapshot.covers(date(2024, 7, 1)));
    }

    // ==================== statement builder tests ====================

    #[test]
    fn test_insert_sql_numbers_price_placeholders_after_window() {
        let sql = insert_sql::<Hotel>();
        assert_eq!(
            sql,
            "INSERT INTO hotel_price_histories (id, hotel_id, currency_id, valid_from, \
             valid_until, single_price, double_price, triple_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *"
        );
    }

    #[test]
    fn test_insert_sql_single_price_column() {
        let sql = insert_sql::<ActivityCost>();
        assert_eq!(
            sql,
            "INSERT INTO activity_cost_histories (id, activity_cost_id, currency_id, \
             valid_from, valid_until, price) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        );
    }

    #[test]
    fn test_close_sql_targets_open_windows_only() {
        let sql = close_sql::<Museum>();
        assert_eq!(
            sql,
            "UPDATE museum_price_histories SET valid_until = $2 \
             WHERE museum_id = $1 AND valid_until >= $2"
        );
    }

    #[test]
    fn test_as_of_sql_orders_newest_first() {
        let sql = as_of_sql::<VehicleCost>();
        assert_eq!(
            sql,
            "SELECT * FROM vehicle_cost_histories WHERE vehicle_cost_id = $1 \
             AND is_active = TRUE AND valid_from <= $2 AND valid_until >= $2 \
             ORDER BY valid_from DESC LIMIT 1"
        );
    }

    #[test]
    fn test_list_sql_orders_newest_first() {
        let sql = list_sql::<Hotel>();
        assert_eq!(
            sql,
            "SELECT * FROM hotel_price_histories WHERE hotel_id = $1 ORDER BY valid_from DESC"
        );
    }
}
