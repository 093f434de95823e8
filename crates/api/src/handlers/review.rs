//! Handlers for review rounds.
//!
//! Sending a campaign for review writes one PENDING review per recipient and
//! moves the campaign to PENDING_REVIEW in a single transaction. Emails go
//! out only after the commit, and their failure is reported in the response
//! rather than undoing the transition.

use axum::extract::{Path, Query, State};
use axum::Json;
use regatta_core::activity::ActivityAction;
use regatta_core::campaign::CampaignStatus;
use regatta_core::error::CoreError;
use regatta_core::lifecycle::{self, Transition, Trigger};
use regatta_core::notification::{
    all_succeeded, campaign_url, sender_or_default, title_or_default, validate_recipients,
    NotificationKind, Recipient, RecipientResult,
};
use regatta_core::review::{ensure_can_respond, validate_response, ReviewStatus};
use regatta_core::types::DbId;
use regatta_db::models::campaign::Campaign;
use regatta_db::models::review::{NewReviewer, ReviewResponse};
use regatta_db::repositories::review_repo::StatusChange;
use regatta_db::repositories::{CampaignRepo, ReviewRepo};
use regatta_workflow::notify::{dispatch_batch, NotificationContext};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::handlers::activity::record_activity;
use crate::handlers::campaign::{find_campaign, status_moved, stored_status};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::query::ReviewListParams;
use crate::response::{ReviewAnswerResponse, ReviewListResponse, SendForReviewResponse};
use crate::state::AppState;

/// Body shared by `POST /reviews` and `POST /approve`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    pub campaign_id: DbId,
    pub campaign_title: Option<String>,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
    pub sender_name: Option<String>,
    /// Ignored. The sender is the token's user.
    #[serde(default)]
    pub sender_email: Option<String>,
    /// Ignored. The actor comes from the token.
    #[serde(default)]
    pub user_email: Option<String>,
}

/// Body of `POST /reviews/{id}/respond`.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub status: String,
    pub comments: Option<String>,
}

/// `[{ email, name }]`, as recorded in activity details.
pub(crate) fn recipient_summary(recipients: &[Recipient]) -> Value {
    Value::Array(
        recipients
            .iter()
            .map(|r| json!({ "email": r.email, "name": r.name }))
            .collect(),
    )
}

/// Email every recipient about `campaign`. Never fails: each recipient's
/// outcome is in the returned list, in input order.
pub(crate) async fn notify_recipients(
    state: &AppState,
    kind: NotificationKind,
    campaign: &Campaign,
    request: &NotifyRequest,
    sender: &AuthUser,
) -> Vec<RecipientResult> {
    let title = request
        .campaign_title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&campaign.title);
    let context = NotificationContext {
        kind,
        campaign_title: title_or_default(Some(title)).to_string(),
        campaign_url: campaign_url(&state.config.site_url, campaign.id),
        sender_name: sender_or_default(request.sender_name.as_deref()).to_string(),
        sender_email: sender.email.clone(),
    };

    let results = dispatch_batch(
        state.workflow.as_ref(),
        &context,
        &request.recipients,
        state.config.notification_concurrency,
    )
    .await;

    if !all_succeeded(&results) {
        let failed: Vec<&str> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.email.as_str())
            .collect();
        tracing::warn!(
            campaign_id = %campaign.id,
            kind = kind.as_str(),
            failed = ?failed,
            "Some notifications were not sent",
        );
    }
    results
}

/// POST /api/v1/reviews
///
/// Open a review round. Allowed from SCHEDULED, or from PENDING_REVIEW to
/// add reviewers to a round already in progress.
pub async fn send_for_review(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<NotifyRequest>,
) -> AppResult<Json<SendForReviewResponse>> {
    validate_recipients(&input.recipients, true)?;

    let current = find_campaign(&state.pool, input.campaign_id).await?;
    let from = stored_status(&current)?;
    lifecycle::plan(from, CampaignStatus::PendingReview, Trigger::SendForReview)?;

    let reviewers: Vec<NewReviewer> = input
        .recipients
        .iter()
        .map(|r| NewReviewer {
            reviewer_id: r.id,
            reviewer_email: r.email.clone(),
        })
        .collect();

    let (campaign, reviews) = ReviewRepo::open_round(
        &state.pool,
        current.id,
        from.as_str(),
        &user.email,
        &reviewers,
        Some(user.user_id),
    )
    .await?
    .ok_or_else(|| status_moved(current.id))?;

    tracing::info!(
        campaign_id = %campaign.id,
        reviewers = reviews.len(),
        user = %user.email,
        "Campaign sent for review",
    );
    record_activity(
        &state,
        campaign.id,
        &user.email,
        ActivityAction::SentForReview,
        json!({ "recipients": recipient_summary(&input.recipients) }),
    )
    .await;

    let email_results =
        notify_recipients(&state, NotificationKind::ReviewRequest, &campaign, &input, &user)
            .await;

    Ok(Json(SendForReviewResponse {
        reviews,
        success: true,
        emails_sent: all_succeeded(&email_results),
        email_results,
    }))
}

/// GET /api/v1/reviews?campaignId=
pub async fn list_reviews(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ReviewListParams>,
) -> AppResult<Json<ReviewListResponse>> {
    let campaign_id = params
        .campaign_id
        .ok_or_else(|| AppError::BadRequest("campaignId is required".into()))?;
    let reviews = ReviewRepo::list_for_campaign(&state.pool, campaign_id).await?;
    Ok(Json(ReviewListResponse { reviews }))
}

/// POST /api/v1/reviews/{id}/respond
///
/// The addressed reviewer (or an admin) answers a PENDING review. Rejecting
/// or requesting changes sends a PENDING_REVIEW campaign back to SCHEDULED
/// in the same transaction. An approval is recorded on the review only.
pub async fn respond_to_review(
    user: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<ReviewAnswerResponse>> {
    let answer: ReviewStatus = input.status.parse()?;

    let review = ReviewRepo::find_by_id(&state.pool, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;
    ensure_can_respond(&review.reviewer_email, &user.email, &user.role)?;

    let current: ReviewStatus = review.status.parse().map_err(|_| {
        AppError::Core(CoreError::Internal(format!(
            "Review {review_id} has unknown status '{}'",
            review.status
        )))
    })?;
    validate_response(current, answer)?;

    // A pushback moves a campaign that is still under review. Otherwise
    // (answered already, archived, deleted) only the answer is recorded.
    let mut expected = None;
    if answer.pushes_back() {
        if let Some(campaign) = CampaignRepo::find_by_id(&state.pool, review.campaign_id).await? {
            let from = stored_status(&campaign)?;
            if from == CampaignStatus::PendingReview {
                if let Transition::Change { .. } =
                    lifecycle::plan(from, CampaignStatus::Scheduled, Trigger::ReviewerPushback)?
                {
                    expected = Some(from);
                }
            }
        }
    }
    let change = expected.map(|from| StatusChange {
        expected: from.as_str(),
        status: CampaignStatus::Scheduled.as_str(),
    });

    let response = ReviewResponse {
        status: answer.as_str().to_string(),
        comments: input.comments.clone(),
    };
    let (review, campaign) =
        ReviewRepo::respond(&state.pool, review_id, &response, change, Some(user.user_id))
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Review was answered or its campaign moved concurrently; reload and retry"
                        .into(),
                ))
            })?;

    tracing::info!(
        review_id = %review_id,
        campaign_id = %review.campaign_id,
        answer = answer.as_str(),
        user = %user.email,
        "Review answered",
    );

    if answer.pushes_back() {
        if let Some(action) = ActivityAction::for_review_response(answer) {
            record_activity(
                &state,
                review.campaign_id,
                &user.email,
                action,
                json!({
                    "reviewId": review.id,
                    "reviewerEmail": review.reviewer_email,
                    "comments": review.comments,
                }),
            )
            .await;
        }
    }

    Ok(Json(ReviewAnswerResponse { review, campaign }))
}
