//! Query parameter types for API handlers.
//!
//! Wire names are camelCase to match the JSON bodies.

use regatta_core::types::DbId;
use serde::Deserialize;

/// Default and maximum page size for campaign listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

/// `GET /campaigns?status=&limit=&offset=`.
#[derive(Debug, Deserialize)]
pub struct CampaignListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl CampaignListParams {
    pub fn clamped_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn clamped_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// `?limit=` on the activity log.
#[derive(Debug, Deserialize)]
pub struct ActivityLimitParams {
    pub limit: Option<i64>,
}

/// `GET /reviews?campaignId=`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListParams {
    pub campaign_id: Option<DbId>,
}

/// `GET /kpi?platform=&startDate=&endDate=`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiParams {
    pub platform: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /calendar?year=&month=`.
#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// `GET /products/search?keyword=`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
}
