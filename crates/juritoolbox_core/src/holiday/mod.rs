//! Holiday list ingestion.
//!
//! # Responsibility
//! - Turn uploaded tabular data into a `HolidaySet`.
//! - Report leniency decisions (dropped rows, total failure) to callers.

pub mod import;
