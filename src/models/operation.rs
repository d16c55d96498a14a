//! Operation chain models: operation -> day -> item -> sub-item, plus
//! customers and sales prices hanging off the operation.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Workflow status of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Draft,
    Confirmed,
    Completed,
    Cancelled,
}

/// Kind of bookable unit on a day; decides which reference fields apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Vehicle,
    NoVehicleTour,
    NoVehicleActivity,
    NoVehicleGuide,
}

/// Kind of priced line nested under an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubItemType {
    Tour,
    Transfer,
    Museum,
    Hotel,
    Guide,
    Activity,
    OtherPrice,
}

/// Customer age class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerType {
    Adult,
    Child,
    Infant,
}

/// Hotel room class on a hotel sub-item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Single,
    Double,
    Triple,
}

/// Operation from operations
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Operation {
    pub id: Uuid,
    pub reference_number: String,
    pub buyer_company_id: Uuid,
    pub follow_by: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: OperationStatus,
    pub total_pax: i32,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Operation day from operation_days
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OperationDay {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Operation item from operation_items
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OperationItem {
    pub id: Uuid,
    pub operation_day_id: Uuid,
    pub item_type: ItemType,
    pub vehicle_type_id: Option<Uuid>,
    pub vehicle_supplier_id: Option<Uuid>,
    pub no_vehicle_tour_id: Option<Uuid>,
    pub no_vehicle_activity_id: Option<Uuid>,
    pub activity_supplier_id: Option<Uuid>,
    pub pick_time: Option<NaiveTime>,
    pub pick_up_location: Option<String>,
    pub drop_off_location: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub vehicle_plate_no: Option<String>,
    pub sales_price: Option<Decimal>,
    pub sales_currency_id: Option<Uuid>,
    pub cost_price: Option<Decimal>,
    pub cost_currency_id: Option<Uuid>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Operation sub-item from operation_sub_items
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OperationSubItem {
    pub id: Uuid,
    pub operation_item_id: Uuid,
    pub sub_item_type: SubItemType,
    pub ordering: i32,
    pub tour_id: Option<Uuid>,
    pub transfer_id: Option<Uuid>,
    pub hotel_id: Option<Uuid>,
    pub room_type: Option<RoomType>,
    pub guide_id: Option<Uuid>,
    pub is_guide: bool,
    pub activity_id: Option<Uuid>,
    pub activity_supplier_id: Option<Uuid>,
    pub other_price_description: Option<String>,
    pub sales_price: Option<Decimal>,
    pub sales_currency_id: Option<Uuid>,
    pub cost_price: Option<Decimal>,
    pub cost_currency_id: Option<Uuid>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Operation customer from operation_customers
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OperationCustomer {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub customer_type: CustomerType,
    pub birth_date: Option<NaiveDate>,
    pub passport_no: Option<String>,
    pub contact_info: Option<String>,
    pub is_buyer: bool,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Operation sales price from operation_sales_prices
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OperationSalesPrice {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub price: Decimal,
    pub currency_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OperationStatus::Draft).unwrap();
        assert_eq!(json, r#""DRAFT""#);
        let parsed: OperationStatus = serde_json::from_str(r#""CANCELLED""#).unwrap();
        assert_eq!(parsed, OperationStatus::Cancelled);
    }

    #[test]
    fn test_item_type_wire_format() {
        let json = serde_json::to_string(&ItemType::NoVehicleTour).unwrap();
        assert_eq!(json, r#""NO_VEHICLE_TOUR""#);
    }

    #[test]
    fn test_sub_item_type_wire_format() {
        let json = serde_json::to_string(&SubItemType::OtherPrice).unwrap();
        assert_eq!(json, r#""OTHER_PRICE""#);
        let parsed: SubItemType = serde_json::from_str(r#""HOTEL""#).unwrap();
        assert_eq!(parsed, SubItemType::Hotel);
    }
}
