//! Campaign entity model and DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use regatta_core::types::{DbId, Timestamp};

/// A row from the `campaigns` table.
///
/// `status` holds a `CampaignStatus` wire string; `channels`, `imageChannels`,
/// `products` and `termSales` are stored as validated JSON.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: DbId,
    pub title: String,
    pub topic: String,
    pub notes: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub status: String,
    pub channels: Value,
    pub image_channels: Option<Value>,
    pub products: Value,
    pub term_sales: Value,
    pub content_focus: i16,
    pub generated_content: Option<Value>,
    pub doc_url: Option<String>,
    pub folder_url: Option<String>,
    pub created_by_id: Option<DbId>,
    pub last_modified_by_id: Option<DbId>,
    pub assigned_to_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload. Every field has already been validated by the caller;
/// status is always DRAFT on insert.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub title: String,
    pub topic: String,
    pub notes: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub channels: Value,
    pub image_channels: Option<Value>,
    pub products: Value,
    pub term_sales: Value,
    pub content_focus: i16,
    pub assigned_to_id: Option<DbId>,
    /// Content imported with the campaign, e.g. from an earlier draft.
    pub generated_content: Option<Value>,
    pub doc_url: Option<String>,
    pub folder_url: Option<String>,
    /// The acting user. Recorded only if the id exists in `users`.
    pub created_by_id: Option<DbId>,
}

/// Update payload. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateCampaign {
    pub title: Option<String>,
    pub topic: Option<String>,
    pub notes: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub channels: Option<Value>,
    pub image_channels: Option<Value>,
    pub products: Option<Value>,
    pub term_sales: Option<Value>,
    pub content_focus: Option<i16>,
    pub assigned_to_id: Option<DbId>,
    pub generated_content: Option<Value>,
    pub doc_url: Option<String>,
    pub folder_url: Option<String>,
    pub last_modified_by_id: Option<DbId>,
}

/// Filter and paging for campaign listings.
#[derive(Debug, Clone, Default)]
pub struct CampaignFilter {
    pub status: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
