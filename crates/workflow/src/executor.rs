//! The workflow kinds this service invokes and the executor seam.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;

/// A hosted workflow, identified by its own env-configured workflow id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    CampaignGeneration,
    ProductSearch,
    KpiSummary,
    KpiDetail,
    ReviewNotification,
}

impl WorkflowKind {
    /// Env var holding this workflow's id.
    pub fn env_var(self) -> &'static str {
        match self {
            WorkflowKind::CampaignGeneration => "WORKFLOW_CAMPAIGN_ID",
            WorkflowKind::ProductSearch => "WORKFLOW_PRODUCT_SEARCH_ID",
            WorkflowKind::KpiSummary => "WORKFLOW_KPI_SUMMARY_ID",
            WorkflowKind::KpiDetail => "WORKFLOW_KPI_DETAIL_ID",
            WorkflowKind::ReviewNotification => "WORKFLOW_REVIEW_NOTIFICATION_ID",
        }
    }

    /// KPI workflows run without a project header when none is configured.
    pub fn requires_project_id(self) -> bool {
        !matches!(self, WorkflowKind::KpiSummary | WorkflowKind::KpiDetail)
    }

    pub fn workflow_id(self, config: &WorkflowConfig) -> Option<&str> {
        match self {
            WorkflowKind::CampaignGeneration => config.campaign_workflow_id.as_deref(),
            WorkflowKind::ProductSearch => config.product_search_workflow_id.as_deref(),
            WorkflowKind::KpiSummary => config.kpi_summary_workflow_id.as_deref(),
            WorkflowKind::KpiDetail => config.kpi_detail_workflow_id.as_deref(),
            WorkflowKind::ReviewNotification => config.review_notification_workflow_id.as_deref(),
        }
    }

    /// GraphQL document sent for this workflow. Variables map onto the
    /// workflow's payload fields.
    pub fn query(self) -> &'static str {
        match self {
            WorkflowKind::CampaignGeneration => GENERATE_CAMPAIGN_QUERY,
            WorkflowKind::ProductSearch => PRODUCT_SEARCH_QUERY,
            WorkflowKind::KpiSummary => KPI_SUMMARY_QUERY,
            WorkflowKind::KpiDetail => KPI_DETAIL_QUERY,
            WorkflowKind::ReviewNotification => NOTIFICATION_QUERY,
        }
    }
}

/// Runs a workflow and returns its `result` object.
///
/// Implementations must fail with [`WorkflowError::NotConfigured`] before
/// doing any I/O when the workflow cannot be addressed.
#[async_trait]
pub trait WorkflowExecutor: Send + Sync {
    async fn execute(
        &self,
        kind: WorkflowKind,
        variables: Map<String, Value>,
    ) -> Result<Value, WorkflowError>;
}

/* --------------------------------------------------------------------------
GraphQL documents
-------------------------------------------------------------------------- */

const GENERATE_CAMPAIGN_QUERY: &str = r#"query ExecuteWorkflow(
  $workflowId: String!
  $topic: String
  $bundleId: String
  $products: [String]
  $channels_blog: String
  $channels_email: String
  $channels_sms: String
  $channels_facebook: String
  $channels_instagram: String
  $channels_twitter: String
  $imageChannels_blog: String
  $imageChannels_facebook: String
  $imageChannels_instagram: String
  $imageChannels_twitter: String
  $notes: String
  $contentFocus: String
) {
  executeWorkflow(
    workflowId: $workflowId
    payload: {
      topic: $topic
      bundleId: $bundleId
      products: $products
      channels: {
        blog: $channels_blog
        email: $channels_email
        sms: $channels_sms
        facebook: $channels_facebook
        instagram: $channels_instagram
        twitter: $channels_twitter
      }
      imageChannels: {
        blog: $imageChannels_blog
        facebook: $imageChannels_facebook
        instagram: $imageChannels_instagram
        twitter: $imageChannels_twitter
      }
      notes: $notes
      contentFocus: $contentFocus
    }
  ) {
    status
    result
  }
}"#;

const PRODUCT_SEARCH_QUERY: &str = r#"query ExecuteWorkflow($workflowId: String!, $keyword: String) {
  executeWorkflow(workflowId: $workflowId, payload: { keyword: $keyword }) {
    status
    result
  }
}"#;

const KPI_SUMMARY_QUERY: &str = r#"query ExecuteWorkflow($workflowId: String!, $platform: String, $startDate: String, $endDate: String) {
  executeWorkflow(workflowId: $workflowId, payload: { platform: $platform, startDate: $startDate, endDate: $endDate }) {
    status
    result
  }
}"#;

const KPI_DETAIL_QUERY: &str = r#"query ExecuteWorkflow($workflowId: String!, $platform: String, $campaignId: String, $startDate: String, $endDate: String) {
  executeWorkflow(workflowId: $workflowId, payload: { platform: $platform, campaignId: $campaignId, startDate: $startDate, endDate: $endDate }) {
    status
    result
  }
}"#;

const NOTIFICATION_QUERY: &str = r#"query ExecuteWorkflow(
  $workflowId: String!
  $notificationType: String
  $campaignTitle: String
  $campaignUrl: String
  $recipientEmail: String
  $recipientName: String
  $senderName: String
  $senderEmail: String
) {
  executeWorkflow(
    workflowId: $workflowId
    payload: {
      notificationType: $notificationType
      campaignTitle: $campaignTitle
      campaignUrl: $campaignUrl
      recipientEmail: $recipientEmail
      recipientName: $recipientName
      senderName: $senderName
      senderEmail: $senderEmail
    }
  ) {
    status
    result
  }
}"#;
