//! Request handlers, one module per resource.

pub mod activity;
pub mod approve;
pub mod calendar;
pub mod campaign;
pub mod kpi;
pub mod product;
pub mod review;
pub mod user;
