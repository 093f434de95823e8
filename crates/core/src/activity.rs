//! Audit-log actions recorded against a campaign.
//!
//! Activity rows are append-only. The action string is stored as TEXT and
//! constrained by a CHECK in the `campaign_activities` table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::campaign::CampaignStatus;
use crate::error::CoreError;
use crate::review::ReviewStatus;

/// Default page size for activity listings.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 50;

/// Upper bound on any activity listing.
pub const MAX_ACTIVITY_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Created,
    Edited,
    SentForReview,
    Approved,
    Rejected,
    ChangesRequested,
    Scheduled,
    Published,
    Archived,
}

impl ActivityAction {
    pub const ALL: [ActivityAction; 9] = [
        ActivityAction::Created,
        ActivityAction::Edited,
        ActivityAction::SentForReview,
        ActivityAction::Approved,
        ActivityAction::Rejected,
        ActivityAction::ChangesRequested,
        ActivityAction::Scheduled,
        ActivityAction::Published,
        ActivityAction::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::Created => "CREATED",
            ActivityAction::Edited => "EDITED",
            ActivityAction::SentForReview => "SENT_FOR_REVIEW",
            ActivityAction::Approved => "APPROVED",
            ActivityAction::Rejected => "REJECTED",
            ActivityAction::ChangesRequested => "CHANGES_REQUESTED",
            ActivityAction::Scheduled => "SCHEDULED",
            ActivityAction::Published => "PUBLISHED",
            ActivityAction::Archived => "ARCHIVED",
        }
    }

    /// Label for a partial update.
    ///
    /// Only a status that actually changes to SCHEDULED, PUBLISHED or
    /// ARCHIVED gets its own label. Everything else, including a same-status
    /// write, is an edit.
    pub fn for_status_change(new_status: Option<CampaignStatus>, changed: bool) -> Self {
        match new_status {
            Some(CampaignStatus::Scheduled) if changed => ActivityAction::Scheduled,
            Some(CampaignStatus::Published) if changed => ActivityAction::Published,
            Some(CampaignStatus::Archived) if changed => ActivityAction::Archived,
            _ => ActivityAction::Edited,
        }
    }

    /// Label for a reviewer's answer.
    pub fn for_review_response(status: ReviewStatus) -> Option<Self> {
        match status {
            ReviewStatus::Approved => Some(ActivityAction::Approved),
            ReviewStatus::Rejected => Some(ActivityAction::Rejected),
            ReviewStatus::ChangesRequested => Some(ActivityAction::ChangesRequested),
            ReviewStatus::Pending => None,
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = ActivityAction::ALL.iter().map(|a| a.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid activity action '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Clamp a caller-supplied activity limit.
pub fn clamp_activity_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT)
}
