use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use regatta_core::schedule::{month_range, today_eastern, year_month, DISPLAY_TZ};
use regatta_db::models::campaign::Campaign;
use regatta_db::repositories::CampaignRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::CalendarParams;
use crate::response::{CalendarDay, CalendarResponse};
use crate::state::AppState;

/// GET /api/v1/calendar?year=&month=
///
/// One entry per day of the month, each holding the campaigns scheduled on
/// it. Defaults to the current month in the display timezone.
pub async fn get_calendar(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> AppResult<Json<CalendarResponse>> {
    let today = today_eastern();
    let (this_year, this_month) = year_month(today);
    let year = params.year.unwrap_or(this_year);
    let month = params.month.unwrap_or(this_month);
    let range = month_range(year, month)?;

    let campaigns = CampaignRepo::list_scheduled_between(&state.pool, range.start, range.end).await?;
    let mut by_day: BTreeMap<NaiveDate, Vec<Campaign>> = BTreeMap::new();
    for campaign in campaigns {
        if let Some(date) = campaign.scheduled_date {
            by_day.entry(date).or_default().push(campaign);
        }
    }

    let days = range
        .days()
        .map(|date| CalendarDay {
            date,
            campaigns: by_day.remove(&date).unwrap_or_default(),
        })
        .collect();

    Ok(Json(CalendarResponse {
        year,
        month,
        timezone: DISPLAY_TZ.name(),
        today,
        days,
    }))
}
