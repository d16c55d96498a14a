//! Operation back office: bookings, their day grids and line items,
//! customer rosters, and the upcoming schedule board.
//!
//! An operation owns one day row per date in its range. Days carry items,
//! items carry ordered sub-item lines, and museum links hang off museum
//! lines. Saves funnel through [`services`]; the pure planning pieces live
//! in [`schedule`], [`reference`], [`validate`] and [`report`].

pub mod queries;
pub mod reference;
pub mod report;
pub mod requests;
pub mod responses;
pub mod schedule;
pub mod services;
pub mod validate;

pub use report::MissingFieldReport;
pub use responses::ScheduleEntry;
