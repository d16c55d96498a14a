//! Database models

pub mod catalog;
pub mod operation;
pub mod refdata;

pub use catalog::*;
pub use operation::*;
pub use refdata::*;
