//! Reference number generation for operations.
//!
//! A reference number encodes the buyer and the start date so office staff
//! can read a booking at a glance: `{buyer short name}{ddMMyy}{seq}`, with
//! the sequence zero-padded to three digits.

use chrono::NaiveDate;
use std::collections::HashSet;

/// Candidate reference for a buyer/date pairing and sequence number
pub fn format_reference(short_name: &str, start_date: NaiveDate, sequence: u32) -> String {
    format!("{}{}{:03}", short_name, start_date.format("%d%m%y"), sequence)
}

/// Prefix shared by every reference for one buyer/date pairing
pub fn reference_prefix(short_name: &str, start_date: NaiveDate) -> String {
    format!("{}{}", short_name, start_date.format("%d%m%y"))
}

/// First candidate not present in `taken`, sequence starting at 1.
///
/// Callers must still enforce uniqueness at the storage layer: two requests
/// planning concurrently see the same taken set and pick the same candidate.
/// The unique constraint rejects the loser, who refetches and retries.
pub fn first_free_reference(
    short_name: &str,
    start_date: NaiveDate,
    taken: &HashSet<String>,
) -> String {
    let mut sequence = 1;
    loop {
        let candidate = format_reference(short_name, start_date, sequence);
        if !taken.contains(&candidate) {
            return candidate;
        }
        sequence += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_first_reference_for_buyer_and_date() {
        let taken = HashSet::new();
        let reference = first_free_reference("ABC", d(2024, 6, 1), &taken);
        assert_eq!(reference, "ABC010624001");
    }

    #[test]
    fn test_sequence_increments_past_taken() {
        let taken: HashSet<String> = ["ABC010624001".to_string()].into_iter().collect();
        let reference = first_free_reference("ABC", d(2024, 6, 1), &taken);
        assert_eq!(reference, "ABC010624002");
    }

    #[test]
    fn test_sequence_skips_contiguous_block() {
        let taken: HashSet<String> = (1..=3)
            .map(|seq| format_reference("ABC", d(2024, 6, 1), seq))
            .collect();
        let reference = first_free_reference("ABC", d(2024, 6, 1), &taken);
        assert_eq!(reference, "ABC010624004");
    }

    #[test]
    fn test_date_formats_day_month_year() {
        assert_eq!(format_reference("XY", d(2024, 12, 9), 1), "XY091224001");
    }

    #[test]
    fn test_sequence_pads_to_three_digits() {
        assert_eq!(format_reference("ABC", d(2024, 6, 1), 42), "ABC010624042");
    }

    #[test]
    fn test_prefix_matches_formatted_reference() {
        let prefix = reference_prefix("ABC", d(2024, 6, 1));
        assert!(format_reference("ABC", d(2024, 6, 1), 7).starts_with(&prefix));
    }
}
