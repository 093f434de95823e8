//! Repository for the `campaigns` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use regatta_core::types::DbId;

use crate::models::campaign::{Campaign, CampaignFilter, CreateCampaign, UpdateCampaign};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, title, topic, notes, scheduled_date, status, channels, \
     image_channels, products, term_sales, content_focus, generated_content, doc_url, \
     folder_url, created_by_id, last_modified_by_id, assigned_to_id, created_at, updated_at";

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new DRAFT campaign, returning the created row.
    ///
    /// The actor id is stored as both creator and last modifier when it
    /// matches a row in `users`, otherwise both stay NULL.
    pub async fn create(pool: &PgPool, input: &CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns
                (title, topic, notes, scheduled_date, status, channels, image_channels,
                 products, term_sales, content_focus, assigned_to_id,
                 generated_content, doc_url, folder_url,
                 created_by_id, last_modified_by_id)
             VALUES ($1, $2, $3, $4, 'DRAFT', $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     (SELECT id FROM users WHERE id = $14),
                     (SELECT id FROM users WHERE id = $14))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(&input.title)
            .bind(&input.topic)
            .bind(&input.notes)
            .bind(input.scheduled_date)
            .bind(&input.channels)
            .bind(&input.image_channels)
            .bind(&input.products)
            .bind(&input.term_sales)
            .bind(input.content_focus)
            .bind(input.assigned_to_id)
            .bind(&input.generated_content)
            .bind(&input.doc_url)
            .bind(&input.folder_url)
            .bind(input.created_by_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of campaigns, newest first, optionally filtered by status.
    pub async fn list(pool: &PgPool, filter: &CampaignFilter) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC, id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(&filter.status)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Number of campaigns matching the status filter, ignoring paging.
    pub async fn count(pool: &PgPool, status: Option<&str>) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM campaigns WHERE ($1::text IS NULL OR status = $1)")
                .bind(status)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Update a campaign. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        Self::update_where(pool, id, None, input).await
    }

    /// Update a campaign only while it is still in `expected_status`.
    ///
    /// Used whenever `input` moves the status. Returns `None` when the
    /// campaign is gone or another request changed its status first.
    pub async fn update_from_status(
        pool: &PgPool,
        id: DbId,
        expected_status: &str,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        Self::update_where(pool, id, Some(expected_status), input).await
    }

    async fn update_where(
        pool: &PgPool,
        id: DbId,
        expected_status: Option<&str>,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                title = COALESCE($2, title),
                topic = COALESCE($3, topic),
                notes = COALESCE($4, notes),
                scheduled_date = COALESCE($5, scheduled_date),
                status = COALESCE($6, status),
                channels = COALESCE($7, channels),
                image_channels = COALESCE($8, image_channels),
                products = COALESCE($9, products),
                term_sales = COALESCE($10, term_sales),
                content_focus = COALESCE($11, content_focus),
                assigned_to_id = COALESCE($12, assigned_to_id),
                generated_content = COALESCE($13, generated_content),
                doc_url = COALESCE($14, doc_url),
                folder_url = COALESCE($15, folder_url),
                last_modified_by_id = COALESCE((SELECT id FROM users WHERE id = $16), last_modified_by_id)
             WHERE id = $1 AND ($17::text IS NULL OR status = $17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.topic)
            .bind(&input.notes)
            .bind(input.scheduled_date)
            .bind(&input.status)
            .bind(&input.channels)
            .bind(&input.image_channels)
            .bind(&input.products)
            .bind(&input.term_sales)
            .bind(input.content_focus)
            .bind(input.assigned_to_id)
            .bind(&input.generated_content)
            .bind(&input.doc_url)
            .bind(&input.folder_url)
            .bind(input.last_modified_by_id)
            .bind(expected_status)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a campaign. Returns `true` if a row was removed.
    ///
    /// Activities and reviews referencing the campaign are left in place.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Campaigns scheduled within `[start, end]`, by date then creation time.
    pub async fn list_scheduled_between(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE scheduled_date BETWEEN $1 AND $2
             ORDER BY scheduled_date, created_at"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    /// Move a campaign from `expected` to `status` inside an open transaction.
    ///
    /// Returns `None` when the campaign is gone or no longer in `expected`.
    pub(crate) async fn set_status_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        expected: &str,
        status: &str,
        actor_id: Option<DbId>,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                status = $3,
                last_modified_by_id = COALESCE((SELECT id FROM users WHERE id = $4), last_modified_by_id)
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(expected)
            .bind(status)
            .bind(actor_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Guarded status change in its own transaction.
    ///
    /// Returns `None` when the campaign is gone or its status moved on.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        expected: &str,
        status: &str,
        actor_id: Option<DbId>,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let campaign = Self::set_status_inner(&mut tx, id, expected, status, actor_id).await?;
        tx.commit().await?;
        Ok(campaign)
    }
}
