//! Campaign approval.

use axum::extract::State;
use axum::Json;
use regatta_core::activity::ActivityAction;
use regatta_core::campaign::CampaignStatus;
use regatta_core::lifecycle::{self, Trigger};
use regatta_core::notification::{all_succeeded, validate_recipients, NotificationKind};
use regatta_db::repositories::review_repo::StatusChange;
use regatta_db::repositories::ReviewRepo;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::activity::record_activity;
use crate::handlers::campaign::{find_campaign, status_moved, stored_status};
use crate::handlers::review::{notify_recipients, recipient_summary, NotifyRequest};
use crate::middleware::rbac::RequireEditor;
use crate::response::ApproveResponse;
use crate::state::AppState;

/// POST /api/v1/approve
///
/// Moves the campaign PENDING_REVIEW -> APPROVED and flips every still
/// PENDING review to APPROVED in one transaction, then emails the supplied
/// recipients. The recipient list may differ from the reviewers and may be
/// empty.
pub async fn approve_campaign(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<NotifyRequest>,
) -> AppResult<Json<ApproveResponse>> {
    validate_recipients(&input.recipients, false)?;

    let current = find_campaign(&state.pool, input.campaign_id).await?;
    let from = stored_status(&current)?;
    lifecycle::plan(from, CampaignStatus::Approved, Trigger::Approve)?;

    let change = StatusChange {
        expected: from.as_str(),
        status: CampaignStatus::Approved.as_str(),
    };
    let (campaign, approved_reviews) =
        ReviewRepo::approve_campaign(&state.pool, current.id, change, Some(user.user_id))
            .await?
            .ok_or_else(|| status_moved(current.id))?;

    tracing::info!(
        campaign_id = %campaign.id,
        approved_reviews,
        user = %user.email,
        "Campaign approved",
    );
    record_activity(
        &state,
        campaign.id,
        &user.email,
        ActivityAction::Approved,
        json!({
            "recipients": recipient_summary(&input.recipients),
            "approvedReviews": approved_reviews,
        }),
    )
    .await;

    let email_results =
        notify_recipients(&state, NotificationKind::Approval, &campaign, &input, &user).await;

    Ok(Json(ApproveResponse {
        success: true,
        emails_sent: all_succeeded(&email_results),
        email_results,
        approved_reviews,
    }))
}
