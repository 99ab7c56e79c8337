//! Calculation domain model.
//!
//! # Responsibility
//! - Define the value types exchanged between presentation layers and the
//!   calculators.
//! - Keep every type request-scoped: constructed per calculation, dropped after.
//!
//! # Invariants
//! - Dates carry no time component and order naturally.
//! - A `DeadlineRequest` that passed `validate()` always has `amount >= 1`.

pub mod calendar;
pub mod deadline;
