//! Review request statuses and response validation.
//!
//! A review starts PENDING and is answered at most once. Answers never move a
//! review back to PENDING.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    ChangesRequested,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 4] = [
        ReviewStatus::Pending,
        ReviewStatus::Approved,
        ReviewStatus::Rejected,
        ReviewStatus::ChangesRequested,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "PENDING",
            ReviewStatus::Approved => "APPROVED",
            ReviewStatus::Rejected => "REJECTED",
            ReviewStatus::ChangesRequested => "CHANGES_REQUESTED",
        }
    }

    /// Whether this answer sends the campaign back for rework.
    pub fn pushes_back(self) -> bool {
        matches!(self, ReviewStatus::Rejected | ReviewStatus::ChangesRequested)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReviewStatus::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = ReviewStatus::ALL.iter().map(|r| r.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid review status '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Check that `answer` may be recorded on a review currently in `current`.
pub fn validate_response(current: ReviewStatus, answer: ReviewStatus) -> Result<(), CoreError> {
    if answer == ReviewStatus::Pending {
        return Err(CoreError::Validation(
            "A review response must be APPROVED, REJECTED or CHANGES_REQUESTED".to_string(),
        ));
    }
    if current != ReviewStatus::Pending {
        return Err(CoreError::Conflict(format!(
            "Review has already been answered with {current}"
        )));
    }
    Ok(())
}

/// Only the addressed reviewer or an admin may answer a review.
pub fn ensure_can_respond(
    reviewer_email: &str,
    actor_email: &str,
    actor_role: &str,
) -> Result<(), CoreError> {
    if actor_role == ROLE_ADMIN || reviewer_email.eq_ignore_ascii_case(actor_email) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the assigned reviewer can respond to this review".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pending_review_accepts_answers() {
        assert!(validate_response(ReviewStatus::Pending, ReviewStatus::Approved).is_ok());
        assert!(validate_response(ReviewStatus::Pending, ReviewStatus::Rejected).is_ok());
    }

    #[test]
    fn answer_cannot_be_pending() {
        assert_matches!(
            validate_response(ReviewStatus::Pending, ReviewStatus::Pending),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn answered_review_is_final() {
        assert_matches!(
            validate_response(ReviewStatus::Approved, ReviewStatus::Rejected),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn pushback_statuses() {
        assert!(ReviewStatus::Rejected.pushes_back());
        assert!(ReviewStatus::ChangesRequested.pushes_back());
        assert!(!ReviewStatus::Approved.pushes_back());
    }

    #[test]
    fn respond_permissions() {
        assert!(ensure_can_respond("Ann@shop.com", "ann@shop.com", "EDITOR").is_ok());
        assert!(ensure_can_respond("ann@shop.com", "boss@shop.com", "ADMIN").is_ok());
        assert_matches!(
            ensure_can_respond("ann@shop.com", "bob@shop.com", "EDITOR"),
            Err(CoreError::Forbidden(_))
        );
    }
}
