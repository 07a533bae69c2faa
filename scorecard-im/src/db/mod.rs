//! Database access for the import module
//!
//! Schema lives in `scorecard_common::db`; these modules hold the
//! import-side queries.

pub mod people;
pub mod records;
