//! Response shapes for the operation read endpoints.
//!
//! The day listing and the upcoming board both nest sub-items inside items
//! inside days; rows are flattened into the JSON objects so clients see
//! one level per entity, not wrapper envelopes.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{OperationDay, OperationItem, OperationStatus, OperationSubItem};

/// One sub-item line with its linked museums
#[derive(Debug, Clone, Serialize)]
pub struct SubItemWithMuseums {
    #[serde(flatten)]
    pub sub_item: OperationSubItem,
    pub museum_ids: Vec<Uuid>,
}

/// One item with its sub-item lines, ordering ascending
#[derive(Debug, Clone, Serialize)]
pub struct ItemWithSubItems {
    #[serde(flatten)]
    pub item: OperationItem,
    pub sub_items: Vec<SubItemWithMuseums>,
}

/// One operation day with everything booked on it
#[derive(Debug, Clone, Serialize)]
pub struct DayWithItems {
    #[serde(flatten)]
    pub day: OperationDay,
    pub items: Vec<ItemWithSubItems>,
}

/// A day on the upcoming board, with its operation context attached
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub day_id: Uuid,
    pub date: NaiveDate,
    pub operation_id: Uuid,
    pub reference_number: String,
    pub buyer_company_name: String,
    pub follow_by: Option<String>,
    pub status: OperationStatus,
    pub total_pax: i32,
    pub items: Vec<ItemWithSubItems>,
}
