//! Row models and DTOs, one module per table.

pub mod activity;
pub mod campaign;
pub mod review;
pub mod user;
