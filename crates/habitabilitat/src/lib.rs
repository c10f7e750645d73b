//! Habitability pre-validation for Catalan dwellings ("cédula de habitabilitat").
//!
//! The rule engine under [`workflows::habitability::evaluation`] is pure and synchronous; the
//! remaining modules wrap it with intake validation, case tracking, and reporting.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
