//! Notification recipients, per-recipient results and batch aggregation.
//!
//! Sending is done by the workflow crate. This module owns the shapes that
//! cross the HTTP boundary and the rule that a batch only counts as sent when
//! every recipient succeeded.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;

pub const DEFAULT_CAMPAIGN_TITLE: &str = "Untitled Campaign";
pub const DEFAULT_SENDER_NAME: &str = "A team member";

/// Which email template the notification workflow renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ReviewRequest,
    Approval,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ReviewRequest => "review_request",
            NotificationKind::Approval => "approval",
        }
    }
}

/// A person to notify, as picked from the reviewer directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: Option<DbId>,
    #[validate(email(message = "Recipient email must be a valid address"))]
    pub email: String,
    pub name: Option<String>,
}

impl Recipient {
    /// The name shown in the email greeting.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Outcome of one send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientResult {
    pub email: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecipientResult {
    pub fn sent(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(email: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// True when every send in the batch succeeded. An empty batch counts as sent.
pub fn all_succeeded(results: &[RecipientResult]) -> bool {
    results.iter().all(|r| r.success)
}

/// Shareable link to a campaign's detail page.
pub fn campaign_url(site_url: &str, campaign_id: DbId) -> String {
    format!("{}/campaigns/{campaign_id}", site_url.trim_end_matches('/'))
}

/// Validate a recipient list. `required` rejects an empty list.
pub fn validate_recipients(recipients: &[Recipient], required: bool) -> Result<(), CoreError> {
    if required && recipients.is_empty() {
        return Err(CoreError::Validation(
            "At least one recipient is required".to_string(),
        ));
    }
    for recipient in recipients {
        if recipient.email.trim().is_empty() {
            return Err(CoreError::Validation(
                "Recipient email must not be empty".to_string(),
            ));
        }
        recipient.validate().map_err(|_| {
            CoreError::Validation(format!(
                "Recipient email '{}' is not a valid address",
                recipient.email
            ))
        })?;
    }
    Ok(())
}

/// Fill display defaults for title and sender name.
pub fn title_or_default(title: Option<&str>) -> &str {
    title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_CAMPAIGN_TITLE)
}

pub fn sender_or_default(name: Option<&str>) -> &str {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_SENDER_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient(email: &str) -> Recipient {
        Recipient {
            id: None,
            email: email.to_string(),
            name: None,
        }
    }

    #[test]
    fn empty_batch_counts_as_sent() {
        assert!(all_succeeded(&[]));
    }

    #[test]
    fn one_failure_fails_the_batch() {
        let results = vec![
            RecipientResult::sent("a@shop.com"),
            RecipientResult::failed("b@shop.com", "timeout"),
        ];
        assert!(!all_succeeded(&results));
        assert!(all_succeeded(&results[..1]));
    }

    #[test]
    fn result_omits_error_on_success() {
        let json = serde_json::to_value(RecipientResult::sent("a@shop.com")).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@shop.com", "success": true}));
    }

    #[test]
    fn kind_wire_names() {
        assert_eq!(
            serde_json::to_value(NotificationKind::ReviewRequest).unwrap(),
            serde_json::json!("review_request")
        );
        assert_eq!(NotificationKind::Approval.as_str(), "approval");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            campaign_url("https://plan.example.com/", id),
            format!("https://plan.example.com/campaigns/{id}")
        );
    }

    #[test]
    fn recipients_validation() {
        assert!(validate_recipients(&[], true).is_err());
        assert!(validate_recipients(&[], false).is_ok());
        assert!(validate_recipients(&[recipient("ann@shop.com")], true).is_ok());
        assert!(validate_recipients(&[recipient("")], true).is_err());
        assert!(validate_recipients(&[recipient("not-an-email")], true).is_err());
    }

    #[test]
    fn display_defaults() {
        let mut r = recipient("ann@shop.com");
        assert_eq!(r.display_name(), "ann@shop.com");
        r.name = Some("Ann".into());
        assert_eq!(r.display_name(), "Ann");
        assert_eq!(title_or_default(Some("  ")), DEFAULT_CAMPAIGN_TITLE);
        assert_eq!(sender_or_default(None), DEFAULT_SENDER_NAME);
    }
}
