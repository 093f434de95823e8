//! Reviewer directory model. Read-only from this service.

use serde::Serialize;
use sqlx::FromRow;
use regatta_core::types::DbId;

/// A row from the `users` table, as exposed to the reviewer picker.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
}
