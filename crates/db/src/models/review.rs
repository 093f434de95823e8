//! Campaign review request model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use regatta_core::types::{DbId, Timestamp};

/// A row from the `campaign_reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignReview {
    pub id: DbId,
    pub campaign_id: DbId,
    pub requested_by_email: String,
    pub reviewer_id: Option<DbId>,
    pub reviewer_email: String,
    pub status: String,
    pub comments: Option<String>,
    pub created_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

/// One reviewer to add to a review round.
#[derive(Debug, Clone)]
pub struct NewReviewer {
    /// Recorded only if the id exists in `users`.
    pub reviewer_id: Option<DbId>,
    pub reviewer_email: String,
}

/// A reviewer's answer.
#[derive(Debug, Clone)]
pub struct ReviewResponse {
    pub status: String,
    pub comments: Option<String>,
}
