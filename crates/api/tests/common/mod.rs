#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use regatta_api::auth::jwt::{generate_access_token, JwtConfig};
use regatta_api::config::ServerConfig;
use regatta_api::router::build_app_router;
use regatta_api::state::AppState;
use regatta_workflow::{WorkflowError, WorkflowExecutor, WorkflowKind};
use serde_json::{Map, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const SITE_URL: &str = "https://plan.example.com";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        site_url: SITE_URL.to_string(),
        notification_concurrency: 2,
    }
}

// ---------------------------------------------------------------------------
// Fake workflow service
// ---------------------------------------------------------------------------

/// Records every workflow call and answers with canned results.
#[derive(Default)]
pub struct FakeWorkflow {
    calls: Mutex<Vec<(WorkflowKind, Map<String, Value>)>>,
    results: HashMap<WorkflowKind, Value>,
    failing_recipients: Vec<String>,
    failing_platform: Option<String>,
    unconfigured: bool,
}

impl FakeWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, kind: WorkflowKind, result: Value) -> Self {
        self.results.insert(kind, result);
        self
    }

    /// Notification sends to `email` fail.
    pub fn failing_for(mut self, email: &str) -> Self {
        self.failing_recipients.push(email.to_string());
        self
    }

    /// KPI calls for `platform` fail.
    pub fn failing_platform(mut self, platform: &str) -> Self {
        self.failing_platform = Some(platform.to_string());
        self
    }

    /// Every call fails as if the workflow had no configuration.
    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }

    pub fn calls_of(&self, kind: WorkflowKind) -> Vec<Map<String, Value>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, vars)| vars.clone())
            .collect()
    }
}

#[async_trait]
impl WorkflowExecutor for FakeWorkflow {
    async fn execute(
        &self,
        kind: WorkflowKind,
        variables: Map<String, Value>,
    ) -> Result<Value, WorkflowError> {
        if self.unconfigured {
            return Err(WorkflowError::NotConfigured(kind.env_var()));
        }
        self.calls.lock().unwrap().push((kind, variables.clone()));

        let recipient = variables.get("recipientEmail").and_then(Value::as_str);
        if recipient.is_some_and(|r| self.failing_recipients.iter().any(|f| f == r)) {
            return Err(WorkflowError::GraphQl("Mailbox unavailable".into()));
        }
        let platform = variables.get("platform").and_then(Value::as_str);
        if platform.is_some() && platform == self.failing_platform.as_deref() {
            return Err(WorkflowError::GraphQl("Platform API quota exceeded".into()));
        }
        Ok(self.results.get(&kind).cloned().unwrap_or(Value::Null))
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Full application router over `pool` with a fake workflow service that
/// answers every call with `null`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(FakeWorkflow::new()))
}

/// Full application router using the given fake workflow service.
pub fn build_test_app_with(pool: PgPool, workflow: Arc<FakeWorkflow>) -> Router {
    build_test_app_with_executor(pool, workflow)
}

/// Full application router over any workflow executor.
pub fn build_test_app_with_executor(pool: PgPool, workflow: Arc<dyn WorkflowExecutor>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        workflow,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

pub fn token_for(user_id: Uuid, email: &str, role: &str) -> String {
    generate_access_token(user_id, email, role, &test_config().jwt)
        .expect("token generation should succeed")
}

pub fn admin_token() -> String {
    token_for(Uuid::new_v4(), "admin@shop.com", "ADMIN")
}

pub fn editor_token() -> String {
    token_for(Uuid::new_v4(), "editor@shop.com", "EDITOR")
}

pub fn viewer_token() -> String {
    token_for(Uuid::new_v4(), "viewer@shop.com", "VIEWER")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a campaign through the API and return its JSON.
pub async fn create_campaign(app: &Router, title: &str) -> Value {
    let body = serde_json::json!({
        "title": title,
        "topic": "diving gear",
        "channels": {"email": true, "blog": true},
    });
    let response = post_json_auth(app.clone(), "/api/v1/campaigns", body, &editor_token()).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["campaign"].clone()
}

/// PATCH a campaign's status as an editor and return the response.
pub async fn set_status(app: &Router, id: &str, status: &str) -> Response<Body> {
    patch_json_auth(
        app.clone(),
        &format!("/api/v1/campaigns/{id}"),
        serde_json::json!({ "status": status }),
        &editor_token(),
    )
    .await
}
