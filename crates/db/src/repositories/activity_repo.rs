//! Repository for the `campaign_activities` table.

use sqlx::PgPool;
use regatta_core::types::DbId;

use crate::models::activity::{CampaignActivity, CreateActivity};

const COLUMNS: &str = "id, campaign_id, user_email, action, details, created_at";

/// Append-only access to the campaign audit log.
pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateActivity,
    ) -> Result<CampaignActivity, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_activities (campaign_id, user_email, action, details)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignActivity>(&query)
            .bind(input.campaign_id)
            .bind(&input.user_email)
            .bind(&input.action)
            .bind(&input.details)
            .fetch_one(pool)
            .await
    }

    /// Most recent activities for a campaign, newest first.
    ///
    /// Works whether or not the campaign row still exists.
    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
    ) -> Result<Vec<CampaignActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaign_activities
             WHERE campaign_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, CampaignActivity>(&query)
            .bind(campaign_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
