//! Completeness reporting for operation items.
//!
//! Items and sub-items are saved half-filled while the office chases
//! details, so unset fields never block a save. This report lists what is
//! still required, by human-readable name, so staff can close the gaps
//! before the operation date. Which fields count as required depends on
//! the item and sub-item types.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{ItemType, OperationItem, OperationSubItem, SubItemType};

/// Missing required fields for one item and each of its sub-item lines
#[derive(Debug, Clone, Serialize)]
pub struct MissingFieldReport {
    pub item_id: Uuid,
    pub item_fields: Vec<String>,
    pub sub_items: Vec<SubItemGaps>,
}

/// Missing required fields of a single sub-item line
#[derive(Debug, Clone, Serialize)]
pub struct SubItemGaps {
    pub sub_item_id: Uuid,
    pub ordering: i32,
    pub fields: Vec<String>,
}

impl MissingFieldReport {
    /// True when the item and every sub-item are fully filled in
    pub fn is_complete(&self) -> bool {
        self.item_fields.is_empty() && self.sub_items.iter().all(|gaps| gaps.fields.is_empty())
    }
}

/// Build the report for an item and its sub-items.
///
/// `museum_counts` carries, per sub-item, how many museums are linked;
/// museum lines need at least one.
pub fn missing_field_report(
    item: &OperationItem,
    sub_items: &[(OperationSubItem, usize)],
) -> MissingFieldReport {
    MissingFieldReport {
        item_id: item.id,
        item_fields: missing_item_fields(item),
        sub_items: sub_items
            .iter()
            .map(|(sub_item, museum_count)| SubItemGaps {
                sub_item_id: sub_item.id,
                ordering: sub_item.ordering,
                fields: missing_sub_item_fields(sub_item, *museum_count),
            })
            .collect(),
    }
}

/// Required-but-unset fields of one item
pub fn missing_item_fields(item: &OperationItem) -> Vec<String> {
    let mut missing: Vec<&str> = Vec::new();

    if item.pick_time.is_none() {
        missing.push("Pick-up time");
    }
    if blank(&item.pick_up_location) {
        missing.push("Pick-up location");
    }
    if blank(&item.drop_off_location) {
        missing.push("Drop-off location");
    }

    match item.item_type {
        ItemType::Vehicle => {
            if item.vehicle_type_id.is_none() {
                missing.push("Vehicle type");
            }
            if item.vehicle_supplier_id.is_none() {
                missing.push("Vehicle supplier");
            }
            if blank(&item.driver_name) {
                missing.push("Driver name");
            }
            if blank(&item.driver_phone) {
                missing.push("Driver phone");
            }
            if blank(&item.vehicle_plate_no) {
                missing.push("Vehicle plate number");
            }
        }
        ItemType::NoVehicleTour => {
            if item.no_vehicle_tour_id.is_none() {
                missing.push("Tour");
            }
        }
        ItemType::NoVehicleActivity => {
            if item.no_vehicle_activity_id.is_none() {
                missing.push("Activity");
            }
            if item.activity_supplier_id.is_none() {
                missing.push("Activity supplier");
            }
        }
        ItemType::NoVehicleGuide => {}
    }

    if item.sales_price.is_none() {
        missing.push("Sales price");
    }
    if item.sales_currency_id.is_none() {
        missing.push("Sales currency");
    }
    if item.cost_price.is_none() {
        missing.push("Cost price");
    }
    if item.cost_currency_id.is_none() {
        missing.push("Cost currency");
    }

    missing.into_iter().map(String::from).collect()
}

/// Required-but-unset fields of one sub-item line
pub fn missing_sub_item_fields(sub_item: &OperationSubItem, museum_count: usize) -> Vec<String> {
    let mut missing: Vec<&str> = Vec::new();

    match sub_item.sub_item_type {
        SubItemType::Tour => {
            if sub_item.tour_id.is_none() {
                missing.push("Tour");
            }
        }
        SubItemType::Transfer => {
            if sub_item.transfer_id.is_none() {
                missing.push("Transfer");
            }
        }
        SubItemType::Museum => {
            if museum_count == 0 {
                missing.push("Museums");
            }
        }
        SubItemType::Hotel => {
            if sub_item.hotel_id.is_none() {
                missing.push("Hotel");
            }
            if sub_item.room_type.is_none() {
                missing.push("Room type");
            }
        }
        SubItemType::Guide => {
            if sub_item.guide_id.is_none() {
                missing.push("Guide");
            }
        }
        SubItemType::Activity => {
            if sub_item.activity_id.is_none() {
                missing.push("Activity");
            }
            if sub_item.activity_supplier_id.is_none() {
                missing.push("Activity supplier");
            }
        }
        SubItemType::OtherPrice => {
            if blank(&sub_item.other_price_description) {
                missing.push("Description");
            }
        }
    }

    if sub_item.sales_price.is_none() {
        missing.push("Sales price");
    }
    if sub_item.sales_currency_id.is_none() {
        missing.push("Sales currency");
    }
    if sub_item.cost_price.is_none() {
        missing.push("Cost price");
    }
    if sub_item.cost_currency_id.is_none() {
        missing.push("Cost currency");
    }

    missing.into_iter().map(String::from).collect()
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |text| text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};
    use rust_decimal_macros::dec;

    fn item(item_type: ItemType) -> OperationItem {
        OperationItem {
            id: Uuid::new_v4(),
            operation_day_id: Uuid::new_v4(),
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
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn sub_item(sub_item_type: SubItemType) -> OperationSubItem {
        OperationSubItem {
            id: Uuid::new_v4(),
            operation_item_id: Uuid::new_v4(),
            sub_item_type,
            ordering: 1,
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

    fn fill_common(item: &mut OperationItem) {
        item.pick_time = NaiveTime::from_hms_opt(9, 0, 0);
        item.pick_up_location = Some("Hotel lobby".to_string());
        item.drop_off_location = Some("Airport".to_string());
        item.sales_price = Some(dec!(100));
        item.sales_currency_id = Some(Uuid::new_v4());
        item.cost_price = Some(dec!(80));
        item.cost_currency_id = Some(Uuid::new_v4());
    }

    // ==================== item report tests ====================

    #[test]
    fn test_empty_vehicle_item_reports_everything() {
        let fields = missing_item_fields(&item(ItemType::Vehicle));
        assert_eq!(
            fields,
            vec![
                "Pick-up time",
                "Pick-up location",
                "Drop-off location",
                "Vehicle type",
                "Vehicle supplier",
                "Driver name",
                "Driver phone",
                "Vehicle plate number",
                "Sales price",
                "Sales currency",
                "Cost price",
                "Cost currency",
            ]
        );
    }

    #[test]
    fn test_filled_guide_item_is_complete() {
        let mut guide_item = item(ItemType::NoVehicleGuide);
        fill_common(&mut guide_item);
        assert!(missing_item_fields(&guide_item).is_empty());
    }

    #[test]
    fn test_walking_tour_item_requires_only_its_tour() {
        let mut tour_item = item(ItemType::NoVehicleTour);
        fill_common(&mut tour_item);
        assert_eq!(missing_item_fields(&tour_item), vec!["Tour"]);

        tour_item.no_vehicle_tour_id = Some(Uuid::new_v4());
        assert!(missing_item_fields(&tour_item).is_empty());
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let mut vehicle_item = item(ItemType::Vehicle);
        fill_common(&mut vehicle_item);
        vehicle_item.driver_name = Some("   ".to_string());
        let fields = missing_item_fields(&vehicle_item);
        assert!(fields.contains(&"Driver name".to_string()));
    }

    // ==================== sub-item report tests ====================

    #[test]
    fn test_hotel_line_requires_room_type() {
        let mut line = sub_item(SubItemType::Hotel);
        line.hotel_id = Some(Uuid::new_v4());
        let fields = missing_sub_item_fields(&line, 0);
        assert!(fields.contains(&"Room type".to_string()));
        assert!(!fields.contains(&"Hotel".to_string()));
    }

    #[test]
    fn test_museum_line_needs_at_least_one_museum() {
        let line = sub_item(SubItemType::Museum);
        assert!(missing_sub_item_fields(&line, 0).contains(&"Museums".to_string()));
        assert!(!missing_sub_item_fields(&line, 2).contains(&"Museums".to_string()));
    }

    #[test]
    fn test_prices_always_required_on_lines() {
        let fields = missing_sub_item_fields(&sub_item(SubItemType::OtherPrice), 0);
        assert_eq!(
            fields,
            vec![
                "Description",
                "Sales price",
                "Sales currency",
                "Cost price",
                "Cost currency",
            ]
        );
    }

    #[test]
    fn test_report_rolls_up_item_and_lines() {
        let mut vehicle_item = item(ItemType::Vehicle);
        fill_common(&mut vehicle_item);
        vehicle_item.vehicle_type_id = Some(Uuid::new_v4());
        vehicle_item.vehicle_supplier_id = Some(Uuid::new_v4());
        vehicle_item.driver_name = Some("Mehmet".to_string());
        vehicle_item.driver_phone = Some("+90 555 111 22 33".to_string());
        vehicle_item.vehicle_plate_no = Some("34 ABC 123".to_string());

        let mut guide_line = sub_item(SubItemType::Guide);
        guide_line.guide_id = Some(Uuid::new_v4());
        guide_line.sales_price = Some(dec!(50));
        guide_line.sales_currency_id = Some(Uuid::new_v4());
        guide_line.cost_price = Some(dec!(30));
        guide_line.cost_currency_id = Some(Uuid::new_v4());

        let report = missing_field_report(&vehicle_item, &[(guide_line, 0)]);
        assert!(report.is_complete());

        let report = missing_field_report(&vehicle_item, &[(sub_item(SubItemType::Tour), 0)]);
        assert!(!report.is_complete());
        assert!(report.item_fields.is_empty());
        assert_eq!(report.sub_items.len(), 1);
    }
}
