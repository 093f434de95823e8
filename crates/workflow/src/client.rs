//! HTTP implementation of [`WorkflowExecutor`] over the GraphQL endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::executor::{WorkflowExecutor, WorkflowKind};

/// Upper bound on a single workflow call. Generation can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything needed to address one workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub url: &'a str,
    pub token: &'a str,
    pub project_id: Option<&'a str>,
    pub workflow_id: &'a str,
}

/// GraphQL client for the workflow service.
pub struct WorkflowClient {
    client: reqwest::Client,
    config: WorkflowConfig,
}

impl WorkflowClient {
    pub fn new(config: WorkflowConfig) -> Result<Self, WorkflowError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: WorkflowConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Resolve the settings for `kind`, naming the first missing variable.
    pub fn endpoint(&self, kind: WorkflowKind) -> Result<Endpoint<'_>, WorkflowError> {
        resolve_endpoint(&self.config, kind)
    }
}

pub(crate) fn resolve_endpoint(
    config: &WorkflowConfig,
    kind: WorkflowKind,
) -> Result<Endpoint<'_>, WorkflowError> {
    let url = config
        .api_url
        .as_deref()
        .ok_or(WorkflowError::NotConfigured("WORKFLOW_API_URL"))?;
    let token = config
        .api_token
        .as_deref()
        .ok_or(WorkflowError::NotConfigured("WORKFLOW_API_TOKEN"))?;
    let project_id = config.project_id.as_deref();
    if kind.requires_project_id() && project_id.is_none() {
        return Err(WorkflowError::NotConfigured("WORKFLOW_PROJECT_ID"));
    }
    let workflow_id = kind
        .workflow_id(config)
        .ok_or(WorkflowError::NotConfigured(kind.env_var()))?;
    Ok(Endpoint {
        url,
        token,
        project_id,
        workflow_id,
    })
}

/// Extract `data.executeWorkflow.result` from a GraphQL response body.
///
/// An `errors` array wins over any data and surfaces its first message.
/// A missing result is returned as `null`.
pub fn parse_envelope(body: Value) -> Result<Value, WorkflowError> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let message = errors[0]
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("GraphQL Error");
            return Err(WorkflowError::GraphQl(message.to_string()));
        }
    }
    if !body.is_object() {
        return Err(WorkflowError::MalformedResponse(format!(
            "expected a JSON object, got {body}"
        )));
    }
    Ok(body
        .pointer("/data/executeWorkflow/result")
        .cloned()
        .unwrap_or(Value::Null))
}

#[async_trait]
impl WorkflowExecutor for WorkflowClient {
    async fn execute(
        &self,
        kind: WorkflowKind,
        mut variables: Map<String, Value>,
    ) -> Result<Value, WorkflowError> {
        let endpoint = self.endpoint(kind)?;
        variables.insert("workflowId".into(), Value::from(endpoint.workflow_id));

        let body = json!({
            "query": kind.query(),
            "variables": variables,
        });

        let mut request = self
            .client
            .post(endpoint.url)
            .bearer_auth(endpoint.token)
            .json(&body);
        if let Some(project_id) = endpoint.project_id {
            request = request.header("x-project-id", project_id);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(WorkflowError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Value = response.json().await?;
        let result = parse_envelope(envelope);
        if let Err(e) = &result {
            tracing::error!(workflow = ?kind, error = %e, "Workflow returned an error");
        }
        result
    }
}
