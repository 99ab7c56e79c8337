//! Core use-case services.
//!
//! # Responsibility
//! - Turn raw presentation-layer input into validated requests.
//! - Keep CLI/FFI layers decoupled from parsing and calculation details.

pub mod deadline_service;
