//! Sentencing estimators.

pub mod dosimetry;
