//! Request DTOs for the operation endpoints.
//!
//! Prices travel as strings on the wire so clients never lose cents to
//! float rounding. Reference fields are optional; which ones may be set is
//! decided by the type tag and checked in [`super::validate`].

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{CustomerType, ItemType, OperationStatus, RoomType, SubItemType};

/// Payload for creating or updating an operation
#[derive(Debug, Clone, Deserialize)]
pub struct OperationRequest {
    pub buyer_company_id: Uuid,
    /// Kept as supplied when present; generated from buyer and start date
    /// when absent
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub follow_by: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "OperationRequest::default_status")]
    pub status: OperationStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OperationRequest {
    fn default_status() -> OperationStatus {
        OperationStatus::Draft
    }
}

/// Payload for adding an item to an operation day
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRequest {
    pub item_type: ItemType,
    #[serde(default)]
    pub vehicle_type_id: Option<Uuid>,
    #[serde(default)]
    pub vehicle_supplier_id: Option<Uuid>,
    #[serde(default)]
    pub no_vehicle_tour_id: Option<Uuid>,
    #[serde(default)]
    pub no_vehicle_activity_id: Option<Uuid>,
    #[serde(default)]
    pub activity_supplier_id: Option<Uuid>,
    #[serde(default)]
    pub pick_time: Option<NaiveTime>,
    #[serde(default)]
    pub pick_up_location: Option<String>,
    #[serde(default)]
    pub drop_off_location: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_phone: Option<String>,
    #[serde(default)]
    pub vehicle_plate_no: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub sales_price: Option<Decimal>,
    #[serde(default)]
    pub sales_currency_id: Option<Uuid>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub cost_currency_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for adding a sub-item to an item
#[derive(Debug, Clone, Deserialize)]
pub struct SubItemRequest {
    pub sub_item_type: SubItemType,
    /// Display position within the item; appended after the current last
    /// line when absent
    #[serde(default)]
    pub ordering: Option<i32>,
    #[serde(default)]
    pub tour_id: Option<Uuid>,
    #[serde(default)]
    pub transfer_id: Option<Uuid>,
    #[serde(default)]
    pub hotel_id: Option<Uuid>,
    #[serde(default)]
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub guide_id: Option<Uuid>,
    #[serde(default)]
    pub is_guide: bool,
    #[serde(default)]
    pub activity_id: Option<Uuid>,
    #[serde(default)]
    pub activity_supplier_id: Option<Uuid>,
    #[serde(default)]
    pub other_price_description: Option<String>,
    /// Museum links for MUSEUM lines; empty for every other type
    #[serde(default)]
    pub museum_ids: Vec<Uuid>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub sales_price: Option<Decimal>,
    #[serde(default)]
    pub sales_currency_id: Option<Uuid>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub cost_currency_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for adding or updating an operation customer
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub customer_type: CustomerType,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub passport_no: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub is_buyer: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for recording a sales price on an operation
#[derive(Debug, Clone, Deserialize)]
pub struct SalesPriceRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub currency_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_request_defaults_to_draft() {
        let req: OperationRequest = serde_json::from_str(
            r#"{
                "buyer_company_id": "7f0c0a4e-2dcb-4f4e-9c3a-0d5b3d2c1a00",
                "start_date": "2024-06-01",
                "end_date": "2024-06-03"
            }"#,
        )
        .unwrap();
        assert_eq!(req.status, OperationStatus::Draft);
        assert!(req.reference_number.is_none());
    }

    #[test]
    fn test_item_request_parses_string_price() {
        let req: ItemRequest = serde_json::from_str(
            r#"{
                "item_type": "NO_VEHICLE_TOUR",
                "no_vehicle_tour_id": "7f0c0a4e-2dcb-4f4e-9c3a-0d5b3d2c1a00",
                "sales_price": "150.50"
            }"#,
        )
        .unwrap();
        assert_eq!(req.sales_price, Some(rust_decimal_macros::dec!(150.50)));
        assert!(req.cost_price.is_none());
        assert!(req.vehicle_type_id.is_none());
    }

    #[test]
    fn test_sub_item_request_defaults() {
        let req: SubItemRequest = serde_json::from_str(r#"{"sub_item_type": "MUSEUM"}"#).unwrap();
        assert!(req.museum_ids.is_empty());
        assert!(req.ordering.is_none());
        assert!(!req.is_guide);
    }
}
