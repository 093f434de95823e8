//! Marketing KPI passthrough.
//!
//! All figures come pre-computed from the KPI workflows. This layer resolves
//! the date window, picks the platforms, and reshapes the result.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use regatta_core::analytics::{KpiPlatform, DEFAULT_KPI_WINDOW_DAYS};
use regatta_core::schedule::{today_eastern, DateRange};
use regatta_workflow::kpi::{fetch_detail, fetch_overview, fetch_platform};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::KpiParams;
use crate::state::AppState;

/// Body of `POST /kpi`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiDetailRequest {
    pub platform: String,
    /// The platform's own campaign id, not a planner campaign id.
    pub campaign_id: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/v1/kpi?platform=&startDate=&endDate=
///
/// With `platform`, returns that platform's section. Without it, fetches
/// every platform concurrently and returns the merged overview; any one
/// platform failing fails the request.
pub async fn get_kpi(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<KpiParams>,
) -> AppResult<Response> {
    let range = DateRange::resolve(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        today_eastern(),
        DEFAULT_KPI_WINDOW_DAYS,
    )?;

    match params.platform.as_deref().filter(|p| !p.is_empty()) {
        Some(raw) => {
            let platform: KpiPlatform = raw.parse()?;
            let section = fetch_platform(state.workflow.as_ref(), platform, &range).await?;
            Ok(Json(section).into_response())
        }
        None => {
            let overview = fetch_overview(state.workflow.as_ref(), &range, Utc::now()).await?;
            tracing::debug!(
                start = %range.start,
                end = %range.end,
                "KPI overview fetched",
            );
            Ok(Json(overview).into_response())
        }
    }
}

/// POST /api/v1/kpi
///
/// Drill-down for one platform campaign. Dates are optional; without them
/// the workflow reports its default range.
pub async fn get_kpi_detail(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<KpiDetailRequest>,
) -> AppResult<Json<Value>> {
    let platform: KpiPlatform = input.platform.parse()?;
    if input.campaign_id.trim().is_empty() {
        return Err(AppError::BadRequest("campaignId is required".into()));
    }

    let range = if input.start_date.is_none() && input.end_date.is_none() {
        None
    } else {
        Some(DateRange::resolve(
            input.start_date.as_deref(),
            input.end_date.as_deref(),
            today_eastern(),
            DEFAULT_KPI_WINDOW_DAYS,
        )?)
    };

    let detail = fetch_detail(
        state.workflow.as_ref(),
        platform,
        input.campaign_id.trim(),
        range.as_ref(),
    )
    .await?;
    Ok(Json(detail))
}
