//! Repository for the `campaign_reviews` table.
//!
//! Review rounds and approvals change the owning campaign's status in the
//! same transaction as the review rows.

use sqlx::PgPool;
use regatta_core::types::DbId;

use crate::models::campaign::Campaign;
use crate::models::review::{CampaignReview, NewReviewer, ReviewResponse};
use crate::repositories::CampaignRepo;

const COLUMNS: &str = "id, campaign_id, requested_by_email, reviewer_id, reviewer_email, \
     status, comments, created_at, responded_at";

const STATUS_PENDING_REVIEW: &str = "PENDING_REVIEW";

/// A campaign status change to apply alongside review writes.
#[derive(Debug, Clone, Copy)]
pub struct StatusChange<'a> {
    pub expected: &'a str,
    pub status: &'a str,
}

pub struct ReviewRepo;

impl ReviewRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CampaignReview>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaign_reviews WHERE id = $1");
        sqlx::query_as::<_, CampaignReview>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All reviews for a campaign, newest first.
    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CampaignReview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaign_reviews
             WHERE campaign_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CampaignReview>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Open a review round: one PENDING review per reviewer, and the campaign
    /// moved from `expected_status` to PENDING_REVIEW.
    ///
    /// Returns `None` (and writes nothing) when the campaign is gone or its
    /// status is no longer `expected_status`.
    pub async fn open_round(
        pool: &PgPool,
        campaign_id: DbId,
        expected_status: &str,
        requested_by_email: &str,
        reviewers: &[NewReviewer],
        actor_id: Option<DbId>,
    ) -> Result<Option<(Campaign, Vec<CampaignReview>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(campaign) = CampaignRepo::set_status_inner(
            &mut tx,
            campaign_id,
            expected_status,
            STATUS_PENDING_REVIEW,
            actor_id,
        )
        .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let insert_query = format!(
            "INSERT INTO campaign_reviews
                (campaign_id, requested_by_email, reviewer_id, reviewer_email, status)
             VALUES ($1, $2, (SELECT id FROM users WHERE id = $3), $4, 'PENDING')
             RETURNING {COLUMNS}"
        );
        let mut reviews = Vec::with_capacity(reviewers.len());
        for reviewer in reviewers {
            let review = sqlx::query_as::<_, CampaignReview>(&insert_query)
                .bind(campaign_id)
                .bind(requested_by_email)
                .bind(reviewer.reviewer_id)
                .bind(&reviewer.reviewer_email)
                .fetch_one(&mut *tx)
                .await?;
            reviews.push(review);
        }

        tx.commit().await?;
        Ok(Some((campaign, reviews)))
    }

    /// Approve a campaign: apply `change` and flip every PENDING review of
    /// the campaign to APPROVED. Answered reviews are left as they are.
    ///
    /// Returns the updated campaign and the number of reviews flipped, or
    /// `None` when the status guard no longer holds.
    pub async fn approve_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        change: StatusChange<'_>,
        actor_id: Option<DbId>,
    ) -> Result<Option<(Campaign, u64)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(campaign) = CampaignRepo::set_status_inner(
            &mut tx,
            campaign_id,
            change.expected,
            change.status,
            actor_id,
        )
        .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let result = sqlx::query(
            "UPDATE campaign_reviews SET status = 'APPROVED', responded_at = NOW()
             WHERE campaign_id = $1 AND status = 'PENDING'",
        )
        .bind(campaign_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some((campaign, result.rows_affected())))
    }

    /// Record a reviewer's answer on a PENDING review, optionally moving the
    /// campaign in the same transaction.
    ///
    /// Returns `None` (and writes nothing) when the review is no longer
    /// PENDING or the campaign status guard no longer holds. The campaign is
    /// `None` in the result when no change was requested.
    pub async fn respond(
        pool: &PgPool,
        review_id: DbId,
        response: &ReviewResponse,
        campaign_change: Option<StatusChange<'_>>,
        actor_id: Option<DbId>,
    ) -> Result<Option<(CampaignReview, Option<Campaign>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE campaign_reviews SET status = $2, comments = $3, responded_at = NOW()
             WHERE id = $1 AND status = 'PENDING'
             RETURNING {COLUMNS}"
        );
        let Some(review) = sqlx::query_as::<_, CampaignReview>(&query)
            .bind(review_id)
            .bind(&response.status)
            .bind(&response.comments)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let campaign = match campaign_change {
            Some(change) => {
                let updated = CampaignRepo::set_status_inner(
                    &mut tx,
                    review.campaign_id,
                    change.expected,
                    change.status,
                    actor_id,
                )
                .await?;
                if updated.is_none() {
                    tx.rollback().await?;
                    return Ok(None);
                }
                updated
            }
            None => None,
        };

        tx.commit().await?;
        Ok(Some((review, campaign)))
    }
}
