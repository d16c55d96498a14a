//! Validation rules for operations, customers, and line items.
//!
//! Everything here runs before the first write of the save path, so a
//! rejected request leaves no partial state behind.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{CustomerType, ItemType, OperationCustomer, SubItemType};

use super::requests::{CustomerRequest, ItemRequest, SubItemRequest};

/// Reject ranges that end before they start
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(AppError::Validation(
            "end_date cannot be before start_date".to_string(),
        ));
    }
    Ok(())
}

/// Per-customer rules: the buyer carries contact info, and a given birth
/// date must fit the declared customer type.
pub fn validate_customer(req: &CustomerRequest, today: NaiveDate) -> Result<()> {
    if req.is_buyer
        && req
            .contact_info
            .as_deref()
            .map_or(true, |info| info.trim().is_empty())
    {
        return Err(AppError::Validation(
            "contact info is required for the buyer".to_string(),
        ));
    }
    if let Some(birth_date) = req.birth_date {
        validate_customer_age(req.customer_type, birth_date, today)?;
    }
    Ok(())
}

/// Age bands: ADULT at least 18, CHILD 2 to 17, INFANT under 2
pub fn validate_customer_age(
    customer_type: CustomerType,
    birth_date: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    let Some(age) = today.years_since(birth_date) else {
        return Err(AppError::Validation(
            "birth date cannot be in the future".to_string(),
        ));
    };
    match customer_type {
        CustomerType::Adult if age < 18 => Err(AppError::Validation(
            "adult customers must be at least 18".to_string(),
        )),
        CustomerType::Child if !(2..18).contains(&age) => Err(AppError::Validation(
            "child customers must be between 2 and 17".to_string(),
        )),
        CustomerType::Infant if age >= 2 => Err(AppError::Validation(
            "infant customers must be under 2".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Reject roster edits that would leave a non-empty customer set without a
/// buyer. `remaining` is the set as it will look after the mutation.
pub fn ensure_buyer_present(remaining: &[OperationCustomer]) -> Result<()> {
    if !remaining.is_empty() && !remaining.iter().any(|customer| customer.is_buyer) {
        return Err(AppError::Validation(
            "at least one customer must be marked as the buyer".to_string(),
        ));
    }
    Ok(())
}

/// Reference fields belonging to other item types must be left empty.
///
/// Fields of the own type may stay empty here; unset-but-required fields
/// surface through the missing-field report instead of blocking the save.
pub fn validate_item_references(req: &ItemRequest) -> Result<()> {
    let vehicle = req.vehicle_type_id.is_some()
        || req.vehicle_supplier_id.is_some()
        || req.driver_name.is_some()
        || req.driver_phone.is_some()
        || req.vehicle_plate_no.is_some();
    let tour = req.no_vehicle_tour_id.is_some();
    let activity = req.no_vehicle_activity_id.is_some() || req.activity_supplier_id.is_some();

    let conflict = match req.item_type {
        ItemType::Vehicle => tour || activity,
        ItemType::NoVehicleTour => vehicle || activity,
        ItemType::NoVehicleActivity => vehicle || tour,
        ItemType::NoVehicleGuide => vehicle || tour || activity,
    };
    if conflict {
        return Err(AppError::Validation(
            "reference fields from another item type must be left empty".to_string(),
        ));
    }
    Ok(())
}

/// Reference fields belonging to other sub-item types must be left empty
pub fn validate_sub_item_references(req: &SubItemRequest) -> Result<()> {
    let tour = req.tour_id.is_some();
    let transfer = req.transfer_id.is_some();
    let hotel = req.hotel_id.is_some() || req.room_type.is_some();
    let guide = req.guide_id.is_some();
    let activity = req.activity_id.is_some() || req.activity_supplier_id.is_some();
    let other = req.other_price_description.is_some();
    let museums = !req.museum_ids.is_empty();

    let conflict = match req.sub_item_type {
        SubItemType::Tour => transfer || hotel || guide || activity || other || museums,
        SubItemType::Transfer => tour || hotel || guide || activity || other || museums,
        SubItemType::Museum => tour || transfer || hotel || guide || activity || other,
        SubItemType::Hotel => tour || transfer || guide || activity || other || museums,
        SubItemType::Guide => tour || transfer || hotel || activity || other || museums,
        SubItemType::Activity => tour || transfer || hotel || guide || other || museums,
        SubItemType::OtherPrice => tour || transfer || hotel || guide || activity || museums,
    };
    if conflict {
        return Err(AppError::Validation(
            "reference fields from another sub-item type must be left empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn customer_req(customer_type: CustomerType, birth: Option<NaiveDate>) -> CustomerRequest {
        CustomerRequest {
            first_name: "Ada".to_string(),
            last_name: "Yilmaz".to_string(),
            customer_type,
            birth_date: birth,
            passport_no: None,
            contact_info: None,
            is_buyer: false,
            notes: None,
        }
    }

    fn customer_row(is_buyer: bool) -> OperationCustomer {
        OperationCustomer {
            id: Uuid::new_v4(),
            operation_id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Yilmaz".to_string(),
            customer_type: CustomerType::Adult,
            birth_date: None,
            passport_no: None,
            contact_info: is_buyer.then(|| "+90 555 000 00 00".to_string()),
            is_buyer,
            notes: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn item_req(item_type: ItemType) -> ItemRequest {
        ItemRequest {
            item_type,
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
        }
    }

    fn sub_item_req(sub_item_type: SubItemType) -> SubItemRequest {
        SubItemRequest {
            sub_item_type,
            ordering: None,
            tour_id: None,
            transfer_id: None,
            hotel_id: None,
            room_type: None,
            guide_id: None,
            is_guide: false,
            activity_id: None,
            activity_supplier_id: None,
            other_price_description: None,
            museum_ids: vec![],
            sales_price: None,
            sales_currency_id: None,
            cost_price: None,
            cost_currency_id: None,
            notes: None,
        }
    }

    // ==================== date range tests ====================

    #[test]
    fn test_end_before_start_is_rejected() {
        assert!(validate_date_range(d(2024, 6, 3), d(2024, 6, 1)).is_err());
    }

    #[test]
    fn test_single_day_range_is_allowed() {
        assert!(validate_date_range(d(2024, 6, 1), d(2024, 6, 1)).is_ok());
    }

    // ==================== customer age tests ====================

    #[test]
    fn test_adult_at_exact_boundary() {
        let today = d(2024, 6, 1);
        assert!(validate_customer_age(CustomerType::Adult, d(2006, 6, 1), today).is_ok());
        assert!(validate_customer_age(CustomerType::Adult, d(2006, 6, 2), today).is_err());
    }

    #[test]
    fn test_child_band_edges() {
        let today = d(2024, 6, 1);
        assert!(validate_customer_age(CustomerType::Child, d(2022, 6, 1), today).is_ok());
        assert!(validate_customer_age(CustomerType::Child, d(2022, 6, 2), today).is_err());
        assert!(validate_customer_age(CustomerType::Child, d(2006, 6, 2), today).is_ok());
        assert!(validate_customer_age(CustomerType::Child, d(2006, 6, 1), today).is_err());
    }

    #[test]
    fn test_infant_turns_two() {
        let today = d(2024, 6, 1);
        assert!(validate_customer_age(CustomerType::Infant, d(2022, 6, 2), today).is_ok());
        assert!(validate_customer_age(CustomerType::Infant, d(2022, 6, 1), today).is_err());
    }

    #[test]
    fn test_future_birth_date_is_rejected() {
        let result = validate_customer_age(CustomerType::Adult, d(2030, 1, 1), d(2024, 6, 1));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_birth_date_skips_age_check() {
        let req = customer_req(CustomerType::Adult, None);
        assert!(validate_customer(&req, d(2024, 6, 1)).is_ok());
    }

    // ==================== buyer rule tests ====================

    #[test]
    fn test_buyer_without_contact_info_is_rejected() {
        let mut req = customer_req(CustomerType::Adult, None);
        req.is_buyer = true;
        assert!(validate_customer(&req, d(2024, 6, 1)).is_err());

        req.contact_info = Some("  ".to_string());
        assert!(validate_customer(&req, d(2024, 6, 1)).is_err());

        req.contact_info = Some("ada@example.com".to_string());
        assert!(validate_customer(&req, d(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_empty_roster_needs_no_buyer() {
        assert!(ensure_buyer_present(&[]).is_ok());
    }

    #[test]
    fn test_roster_without_buyer_is_rejected() {
        let roster = [customer_row(false), customer_row(false)];
        assert!(ensure_buyer_present(&roster).is_err());
    }

    #[test]
    fn test_roster_with_buyer_passes() {
        let roster = [customer_row(false), customer_row(true)];
        assert!(ensure_buyer_present(&roster).is_ok());
    }

    // ==================== reference exclusivity tests ====================

    #[test]
    fn test_vehicle_item_rejects_walking_tour_reference() {
        let mut req = item_req(ItemType::Vehicle);
        req.no_vehicle_tour_id = Some(Uuid::new_v4());
        assert!(validate_item_references(&req).is_err());
    }

    #[test]
    fn test_vehicle_item_accepts_vehicle_fields() {
        let mut req = item_req(ItemType::Vehicle);
        req.vehicle_type_id = Some(Uuid::new_v4());
        req.driver_name = Some("Mehmet".to_string());
        assert!(validate_item_references(&req).is_ok());
    }

    #[test]
    fn test_guide_item_allows_only_common_fields() {
        let mut req = item_req(ItemType::NoVehicleGuide);
        req.pick_up_location = Some("Hotel lobby".to_string());
        assert!(validate_item_references(&req).is_ok());

        req.activity_supplier_id = Some(Uuid::new_v4());
        assert!(validate_item_references(&req).is_err());
    }

    #[test]
    fn test_incomplete_own_fields_do_not_block_save() {
        // Completeness is the report's business, not validation's.
        let req = item_req(ItemType::NoVehicleTour);
        assert!(validate_item_references(&req).is_ok());
    }

    #[test]
    fn test_hotel_sub_item_rejects_tour_reference() {
        let mut req = sub_item_req(SubItemType::Hotel);
        req.tour_id = Some(Uuid::new_v4());
        assert!(validate_sub_item_references(&req).is_err());
    }

    #[test]
    fn test_room_type_is_a_hotel_field() {
        let mut req = sub_item_req(SubItemType::Tour);
        req.room_type = Some(crate::models::RoomType::Double);
        assert!(validate_sub_item_references(&req).is_err());
    }

    #[test]
    fn test_museum_sub_item_accepts_museum_links() {
        let mut req = sub_item_req(SubItemType::Museum);
        req.museum_ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        assert!(validate_sub_item_references(&req).is_ok());
    }

    #[test]
    fn test_museum_links_conflict_elsewhere() {
        let mut req = sub_item_req(SubItemType::Guide);
        req.museum_ids = vec![Uuid::new_v4()];
        assert!(validate_sub_item_references(&req).is_err());
    }
}
