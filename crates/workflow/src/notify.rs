//! Notification fan-out through the review-notification workflow.
//!
//! One workflow call per recipient, run concurrently up to a bound. Every
//! recipient gets a result in input order; failures are reported, never
//! retried, and never abort the rest of the batch.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use regatta_core::notification::{NotificationKind, Recipient, RecipientResult};
use serde_json::{Map, Value};

use crate::executor::{WorkflowExecutor, WorkflowKind};

/// Fallback fan-out bound when the caller passes zero.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// What every email in a batch shares.
#[derive(Debug, Clone)]
pub struct NotificationContext {
    pub kind: NotificationKind,
    pub campaign_title: String,
    pub campaign_url: String,
    pub sender_name: String,
    pub sender_email: String,
}

impl NotificationContext {
    fn variables_for(&self, recipient: &Recipient) -> Map<String, Value> {
        let mut vars = Map::new();
        vars.insert("notificationType".into(), self.kind.as_str().into());
        vars.insert("campaignTitle".into(), self.campaign_title.clone().into());
        vars.insert("campaignUrl".into(), self.campaign_url.clone().into());
        vars.insert("recipientEmail".into(), recipient.email.clone().into());
        vars.insert("recipientName".into(), recipient.display_name().into());
        vars.insert("senderName".into(), self.sender_name.clone().into());
        vars.insert("senderEmail".into(), self.sender_email.clone().into());
        vars
    }
}

/// Send one notification.
pub async fn send_one(
    executor: &dyn WorkflowExecutor,
    context: &NotificationContext,
    recipient: &Recipient,
) -> RecipientResult {
    match executor
        .execute(WorkflowKind::ReviewNotification, context.variables_for(recipient))
        .await
    {
        Ok(_) => RecipientResult::sent(&recipient.email),
        Err(e) => {
            tracing::warn!(
                recipient = %recipient.email,
                kind = context.kind.as_str(),
                error = %e,
                "Notification failed",
            );
            RecipientResult::failed(&recipient.email, e.to_string())
        }
    }
}

/// Send to every recipient, at most `concurrency` at a time.
pub async fn dispatch_batch(
    executor: &dyn WorkflowExecutor,
    context: &NotificationContext,
    recipients: &[Recipient],
    concurrency: usize,
) -> Vec<RecipientResult> {
    let limit = if concurrency == 0 {
        DEFAULT_CONCURRENCY
    } else {
        concurrency
    };

    // Boxed up front: the batch future must stay `Send` inside handlers.
    let sends: Vec<BoxFuture<'_, RecipientResult>> = recipients
        .iter()
        .map(|recipient| send_one(executor, context, recipient).boxed())
        .collect();
    let results: Vec<RecipientResult> = stream::iter(sends).buffered(limit).collect().await;

    let failed = results.iter().filter(|r| !r.success).count();
    tracing::info!(
        kind = context.kind.as_str(),
        total = results.len(),
        failed,
        "Notification batch dispatched",
    );
    results
}
