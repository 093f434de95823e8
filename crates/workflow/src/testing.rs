//! In-process executor for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::WorkflowError;
use crate::executor::{WorkflowExecutor, WorkflowKind};

type ErrorFactory = Box<dyn Fn() -> WorkflowError + Send + Sync>;

/// Records calls and answers with canned results.
#[derive(Default)]
pub struct FakeExecutor {
    calls: Mutex<Vec<(WorkflowKind, Map<String, Value>)>>,
    results: HashMap<WorkflowKind, Value>,
    fail_on: Option<(String, Value)>,
    always: Option<ErrorFactory>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, kind: WorkflowKind, result: Value) -> Self {
        self.results.insert(kind, result);
        self
    }

    /// Fail any call whose `key` variable equals `value`.
    pub fn fail_when(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fail_on = Some((key.to_string(), value.into()));
        self
    }

    pub fn always_fail(mut self, error: impl Fn() -> WorkflowError + Send + Sync + 'static) -> Self {
        self.always = Some(Box::new(error));
        self
    }

    pub fn calls(&self) -> Vec<(WorkflowKind, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowExecutor for FakeExecutor {
    async fn execute(
        &self,
        kind: WorkflowKind,
        variables: Map<String, Value>,
    ) -> Result<Value, WorkflowError> {
        if let Some(error) = &self.always {
            return Err(error());
        }
        self.calls.lock().unwrap().push((kind, variables.clone()));
        if let Some((key, value)) = &self.fail_on {
            if variables.get(key) == Some(value) {
                return Err(WorkflowError::GraphQl(format!("{key} rejected")));
            }
        }
        Ok(self.results.get(&kind).cloned().unwrap_or(Value::Null))
    }
}
