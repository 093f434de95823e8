//! Domain logic for the campaign planner: campaign lifecycle, audit actions,
//! review statuses, scheduling dates, notification batches and KPI reshaping.
//!
//! Nothing in this crate performs I/O; the `db`, `workflow` and `api` crates
//! build on these types.

pub mod activity;
pub mod analytics;
pub mod campaign;
pub mod error;
pub mod lifecycle;
pub mod notification;
pub mod products;
pub mod review;
pub mod roles;
pub mod schedule;
pub mod types;
