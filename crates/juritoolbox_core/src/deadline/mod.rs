//! Deadline date arithmetic.
//!
//! # Responsibility
//! - Classify days as business/non-business against a holiday set.
//! - Count business or calendar days forward from a start date.
//! - Postpone non-business end dates and build the audit timeline.
//!
//! # Invariants
//! - A single predicate (`is_business_day`) drives counting, postponement and
//!   timeline annotation.
//! - Every loop is bounded by `CalculatorConfig` limits.

pub mod calculator;
