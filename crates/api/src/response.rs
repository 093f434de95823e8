//! Shared response envelope types for API handlers.
//!
//! Every response names its payload (`{ "campaign": ... }`,
//! `{ "reviews": ... }`) rather than using a generic wrapper, matching what
//! the planner UI reads. Keys are camelCase.

use chrono::NaiveDate;
use regatta_core::notification::RecipientResult;
use regatta_db::models::activity::CampaignActivity;
use regatta_db::models::campaign::Campaign;
use regatta_db::models::review::CampaignReview;
use regatta_db::models::user::User;
use serde::Serialize;

/// `{ "campaign": ... }`
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub campaign: Campaign,
}

/// `GET /campaigns/{id}`: the campaign plus its most recent activity.
#[derive(Debug, Serialize)]
pub struct CampaignDetailResponse {
    pub campaign: Campaign,
    pub activities: Vec<CampaignActivity>,
}

/// A page of campaigns. `count` is the total matching the filter.
#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<Campaign>,
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub activity: CampaignActivity,
}

#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub activities: Vec<CampaignActivity>,
}

/// `{ "success": true }`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<CampaignReview>,
}

/// Result of opening a review round.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendForReviewResponse {
    pub reviews: Vec<CampaignReview>,
    pub success: bool,
    pub emails_sent: bool,
    pub email_results: Vec<RecipientResult>,
}

/// Result of approving a campaign.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub success: bool,
    pub emails_sent: bool,
    pub email_results: Vec<RecipientResult>,
    /// Reviews flipped from PENDING to APPROVED.
    pub approved_reviews: u64,
}

/// A recorded review answer. `campaign` is set when the answer moved it.
#[derive(Debug, Serialize)]
pub struct ReviewAnswerResponse {
    pub review: CampaignReview,
    pub campaign: Option<Campaign>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

/// One cell of the calendar grid.
#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub campaigns: Vec<Campaign>,
}

/// A month of scheduled campaigns in the display timezone.
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub timezone: &'static str,
    pub today: NaiveDate,
    pub days: Vec<CalendarDay>,
}
