//! Flutter-facing bridge for JuriToolbox.

pub mod api;
