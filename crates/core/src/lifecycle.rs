//! Campaign status state machine.
//!
//! Every permitted status change is an edge in [`EDGES`], labelled with the
//! operations ([`Trigger`]) allowed to take it. A request for a change that is
//! not in the table is rejected with [`CoreError::InvalidTransition`] and the
//! campaign is left as it was.
//!
//! ```text
//! DRAFT          --Edit|Generate-->     SCHEDULED
//! SCHEDULED      --SendForReview-->     PENDING_REVIEW
//! PENDING_REVIEW --Approve-->           APPROVED
//! PENDING_REVIEW --ReviewerPushback-->  SCHEDULED
//! APPROVED       --Edit-->              PUBLISHED | COMPLETED
//! PUBLISHED      --Edit-->              COMPLETED
//! (not ARCHIVED) --Archive-->           ARCHIVED
//! ```
//!
//! Asking for the status a campaign already has is a no-op and always allowed.

use crate::campaign::CampaignStatus;
use crate::error::CoreError;

use CampaignStatus::*;

/// The operation requesting a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A PUT or PATCH carrying a `status` field.
    Edit,
    /// Content generation finished.
    Generate,
    /// The campaign was sent to reviewers.
    SendForReview,
    /// The campaign was approved.
    Approve,
    /// A reviewer rejected the campaign or asked for changes.
    ReviewerPushback,
    /// Administrative archive override.
    Archive,
}

/// `(from, to, triggers allowed to take the edge)`.
const EDGES: &[(CampaignStatus, CampaignStatus, &[Trigger])] = &[
    (Draft, Scheduled, &[Trigger::Edit, Trigger::Generate]),
    (Scheduled, PendingReview, &[Trigger::SendForReview]),
    (PendingReview, Approved, &[Trigger::Approve]),
    (PendingReview, Scheduled, &[Trigger::ReviewerPushback]),
    (Approved, Published, &[Trigger::Edit]),
    (Approved, Completed, &[Trigger::Edit]),
    (Published, Completed, &[Trigger::Edit]),
];

/// Outcome of a permitted status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The campaign already has the requested status.
    NoOp,
    /// The status changes.
    Change {
        from: CampaignStatus,
        to: CampaignStatus,
    },
}

impl Transition {
    pub fn is_change(&self) -> bool {
        matches!(self, Transition::Change { .. })
    }
}

/// Decide whether `trigger` may move a campaign from `from` to `to`.
pub fn plan(
    from: CampaignStatus,
    to: CampaignStatus,
    trigger: Trigger,
) -> Result<Transition, CoreError> {
    if from == to {
        return Ok(Transition::NoOp);
    }

    let allowed = if trigger == Trigger::Archive {
        to == Archived
    } else {
        EDGES
            .iter()
            .any(|(f, t, triggers)| *f == from && *t == to && triggers.contains(&trigger))
    };

    if allowed {
        Ok(Transition::Change { from, to })
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}

/// Statuses reachable from `from` through `trigger`, excluding the no-op.
pub fn targets(from: CampaignStatus, trigger: Trigger) -> Vec<CampaignStatus> {
    CampaignStatus::ALL
        .into_iter()
        .filter(|to| *to != from && plan(from, *to, trigger).is_ok())
        .collect()
}

/// Content generation is only offered before review starts.
pub fn ensure_generatable(status: CampaignStatus) -> Result<(), CoreError> {
    plan(status, Scheduled, Trigger::Generate).map(|_| ())
}
