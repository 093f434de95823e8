//! Workflow service configuration loaded from environment variables.

/// Connection settings and per-workflow identifiers.
///
/// Every field is optional. A workflow whose settings are missing fails with
/// [`WorkflowError::NotConfigured`](crate::WorkflowError::NotConfigured) when
/// invoked, without touching the network.
#[derive(Debug, Clone, Default)]
pub struct WorkflowConfig {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub project_id: Option<String>,
    pub campaign_workflow_id: Option<String>,
    pub product_search_workflow_id: Option<String>,
    pub kpi_summary_workflow_id: Option<String>,
    pub kpi_detail_workflow_id: Option<String>,
    pub review_notification_workflow_id: Option<String>,
}

impl WorkflowConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var                            | Field                             |
    /// |------------------------------------|-----------------------------------|
    /// | `WORKFLOW_API_URL`                 | `api_url`                         |
    /// | `WORKFLOW_API_TOKEN`               | `api_token`                       |
    /// | `WORKFLOW_PROJECT_ID`              | `project_id`                      |
    /// | `WORKFLOW_CAMPAIGN_ID`             | `campaign_workflow_id`            |
    /// | `WORKFLOW_PRODUCT_SEARCH_ID`       | `product_search_workflow_id`      |
    /// | `WORKFLOW_KPI_SUMMARY_ID`          | `kpi_summary_workflow_id`         |
    /// | `WORKFLOW_KPI_DETAIL_ID`           | `kpi_detail_workflow_id`          |
    /// | `WORKFLOW_REVIEW_NOTIFICATION_ID`  | `review_notification_workflow_id` |
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            api_url: var("WORKFLOW_API_URL"),
            api_token: var("WORKFLOW_API_TOKEN"),
            project_id: var("WORKFLOW_PROJECT_ID"),
            campaign_workflow_id: var("WORKFLOW_CAMPAIGN_ID"),
            product_search_workflow_id: var("WORKFLOW_PRODUCT_SEARCH_ID"),
            kpi_summary_workflow_id: var("WORKFLOW_KPI_SUMMARY_ID"),
            kpi_detail_workflow_id: var("WORKFLOW_KPI_DETAIL_ID"),
            review_notification_workflow_id: var("WORKFLOW_REVIEW_NOTIFICATION_ID"),
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
