//! Campaign activity log: reads, manual entries, and the audit helper every
//! mutating handler calls after its write commits.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use regatta_core::activity::{clamp_activity_limit, ActivityAction};
use regatta_core::types::DbId;
use regatta_db::models::activity::CreateActivity;
use regatta_db::repositories::ActivityRepo;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::handlers::campaign::find_campaign;
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::query::ActivityLimitParams;
use crate::response::{ActivityListResponse, ActivityResponse};
use crate::state::AppState;

/// Append an audit row for a mutation that has already committed.
///
/// Failures are logged and dropped: the mutation stands either way.
pub(crate) async fn record_activity(
    state: &AppState,
    campaign_id: DbId,
    actor_email: &str,
    action: ActivityAction,
    details: Value,
) {
    let input = CreateActivity {
        campaign_id,
        user_email: actor_email.to_string(),
        action: action.as_str().to_string(),
        details: Some(details),
    };
    if let Err(e) = ActivityRepo::create(&state.pool, &input).await {
        tracing::error!(
            campaign_id = %campaign_id,
            action = action.as_str(),
            error = %e,
            "Failed to record campaign activity",
        );
    }
}

/// Body of `POST /campaigns/{id}/activity`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub action: String,
    pub details: Option<Value>,
    /// Ignored. The actor comes from the token.
    #[serde(default)]
    pub user_email: Option<String>,
}

/// GET /api/v1/campaigns/{id}/activity
///
/// Newest first. Works for campaigns that have since been deleted.
pub async fn list_activity(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(params): Query<ActivityLimitParams>,
) -> AppResult<Json<ActivityListResponse>> {
    let limit = clamp_activity_limit(params.limit);
    let activities = ActivityRepo::list_for_campaign(&state.pool, campaign_id, limit).await?;
    Ok(Json(ActivityListResponse { activities }))
}

/// POST /api/v1/campaigns/{id}/activity
///
/// Manual log entry. Unlike the automatic entries, a failed insert here is
/// the request's failure.
pub async fn create_activity(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateActivityRequest>,
) -> AppResult<impl IntoResponse> {
    let action: ActivityAction = input.action.parse()?;
    find_campaign(&state.pool, campaign_id).await?;

    let create = CreateActivity {
        campaign_id,
        user_email: user.email.clone(),
        action: action.as_str().to_string(),
        details: input.details,
    };
    let activity = ActivityRepo::create(&state.pool, &create).await?;

    tracing::info!(
        campaign_id = %campaign_id,
        action = action.as_str(),
        user = %user.email,
        "Activity recorded",
    );

    Ok((StatusCode::CREATED, Json(ActivityResponse { activity })))
}
