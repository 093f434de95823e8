//! Campaign activity (audit log) model and DTOs.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use regatta_core::types::{DbId, Timestamp};

/// A row from the `campaign_activities` table. Never updated once written.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignActivity {
    pub id: DbId,
    pub campaign_id: DbId,
    pub user_email: String,
    pub action: String,
    pub details: Option<Value>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub campaign_id: DbId,
    pub user_email: String,
    pub action: String,
    pub details: Option<Value>,
}
