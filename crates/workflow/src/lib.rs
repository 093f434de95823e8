//! Client for the external workflow-execution service.
//!
//! Content generation, product search, KPI reporting and notification email
//! all run as hosted workflows behind one GraphQL endpoint. Callers go
//! through the [`WorkflowExecutor`] trait so the HTTP layer can be swapped
//! for an in-process fake in tests.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod generation;
pub mod kpi;
pub mod notify;
pub mod products;

pub use client::WorkflowClient;
pub use config::WorkflowConfig;
pub use error::WorkflowError;
pub use executor::{WorkflowExecutor, WorkflowKind};

#[cfg(test)]
mod testing;
