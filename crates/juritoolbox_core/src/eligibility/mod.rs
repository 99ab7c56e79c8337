//! Eligibility checklists.

pub mod anpp;
