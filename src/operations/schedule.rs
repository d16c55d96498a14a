//! Day planning for operation date ranges.
//!
//! Pure functions deciding which day rows to create and delete when a date
//! range is set or edited. No database access; the service layer executes
//! the plan inside the operation's save transaction.

use chrono::NaiveDate;
use std::collections::HashSet;

/// Every calendar date in `[start, end]` inclusive, ascending.
///
/// Empty when `end` is before `start`; range validation happens before
/// planning, so that case never reaches the writes.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|date| *date <= end).collect()
}

/// The writes that line an operation's day rows up with its date range.
///
/// Days strictly before `delete_before` and strictly after `delete_after`
/// are removed (their items and sub-items cascade away); every date in
/// `create` gets a fresh empty day. Days already inside the range are not
/// named by the plan at all, which is what keeps their items untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub delete_before: NaiveDate,
    pub delete_after: NaiveDate,
    pub create: Vec<NaiveDate>,
}

/// Plan the reconciliation of existing day rows against `[start, end]`.
///
/// After execution the day set equals the inclusive range exactly: no
/// missing date in range, no row outside it, wherever the range moved.
pub fn plan_days(start: NaiveDate, end: NaiveDate, existing: &[NaiveDate]) -> DayPlan {
    let existing: HashSet<NaiveDate> = existing.iter().copied().collect();
    DayPlan {
        delete_before: start,
        delete_after: end,
        create: date_range(start, end)
            .into_iter()
            .filter(|date| !existing.contains(date))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // ==================== date_range tests ====================

    #[test]
    fn test_range_includes_both_endpoints() {
        let dates = date_range(d(2024, 6, 1), d(2024, 6, 3));
        assert_eq!(dates, vec![d(2024, 6, 1), d(2024, 6, 2), d(2024, 6, 3)]);
    }

    #[test]
    fn test_single_day_range() {
        assert_eq!(date_range(d(2024, 6, 1), d(2024, 6, 1)), vec![d(2024, 6, 1)]);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        assert!(date_range(d(2024, 6, 3), d(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_range_crosses_month_boundary() {
        let dates = date_range(d(2024, 6, 29), d(2024, 7, 2));
        assert_eq!(
            dates,
            vec![d(2024, 6, 29), d(2024, 6, 30), d(2024, 7, 1), d(2024, 7, 2)]
        );
    }

    #[test]
    fn test_range_crosses_leap_day() {
        let dates = date_range(d(2024, 2, 28), d(2024, 3, 1));
        assert_eq!(dates, vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
    }

    // ==================== plan_days tests ====================

    #[test]
    fn test_new_operation_creates_every_day() {
        let plan = plan_days(d(2024, 6, 1), d(2024, 6, 3), &[]);
        assert_eq!(plan.create, vec![d(2024, 6, 1), d(2024, 6, 2), d(2024, 6, 3)]);
        assert_eq!(plan.delete_before, d(2024, 6, 1));
        assert_eq!(plan.delete_after, d(2024, 6, 3));
    }

    #[test]
    fn test_shift_later_drops_leading_day_and_adds_trailing() {
        // 06-01..06-03 edited to 06-02..06-04: 06-01 must fall to the
        // delete-before bound, 06-02 and 06-03 keep their rows, 06-04 is new.
        let existing = [d(2024, 6, 1), d(2024, 6, 2), d(2024, 6, 3)];
        let plan = plan_days(d(2024, 6, 2), d(2024, 6, 4), &existing);
        assert_eq!(plan.delete_before, d(2024, 6, 2));
        assert!(existing[0] < plan.delete_before);
        assert_eq!(plan.create, vec![d(2024, 6, 4)]);
    }

    #[test]
    fn test_shift_back_recreates_leading_day_and_drops_trailing() {
        // The reverse edit back to 06-01..06-03: 06-01 is recreated empty,
        // 06-04 falls to the delete-after bound.
        let existing = [d(2024, 6, 2), d(2024, 6, 3), d(2024, 6, 4)];
        let plan = plan_days(d(2024, 6, 1), d(2024, 6, 3), &existing);
        assert_eq!(plan.create, vec![d(2024, 6, 1)]);
        assert_eq!(plan.delete_after, d(2024, 6, 3));
        assert!(existing[2] > plan.delete_after);
    }

    #[test]
    fn test_unchanged_range_plans_no_creates() {
        let existing = [d(2024, 6, 1), d(2024, 6, 2), d(2024, 6, 3)];
        let plan = plan_days(d(2024, 6, 1), d(2024, 6, 3), &existing);
        assert!(plan.create.is_empty());
    }

    #[test]
    fn test_gap_inside_range_is_refilled() {
        let existing = [d(2024, 6, 1), d(2024, 6, 3)];
        let plan = plan_days(d(2024, 6, 1), d(2024, 6, 3), &existing);
        assert_eq!(plan.create, vec![d(2024, 6, 2)]);
    }

    #[test]
    fn test_disjoint_move_replaces_every_day() {
        let existing = [d(2024, 6, 1), d(2024, 6, 2)];
        let plan = plan_days(d(2024, 7, 10), d(2024, 7, 11), &existing);
        assert_eq!(plan.create, vec![d(2024, 7, 10), d(2024, 7, 11)]);
        assert!(existing.iter().all(|date| *date < plan.delete_before));
    }
}
