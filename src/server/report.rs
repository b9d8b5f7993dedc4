use crate::k8s::Outcome;
use crate::metrics::MetricsCollector;
use crate::HarnessError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

/// Result of one cluster step within an operation.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    failure_status: Option<StatusCode>,
    #[serde(skip)]
    created: bool,
}

/// Per-step results of one HTTP operation, in execution order.
#[derive(Debug, Serialize)]
pub struct OperationReport {
    pub operation: &'static str,
    pub steps: Vec<StepReport>,
}

impl OperationReport {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            steps: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        metrics: &MetricsCollector,
        kind: String,
        namespace: &str,
        name: &str,
        result: crate::Result<Outcome>,
    ) {
        let step = match result {
            Ok(outcome) => {
                info!(
                    "{}: {} {}/{} {}",
                    self.operation,
                    kind,
                    namespace,
                    name,
                    outcome.as_str()
                );
                metrics.record_step(self.operation, &kind, Some(outcome));
                StepReport {
                    kind,
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    outcome: outcome.as_str(),
                    error: None,
                    failure_status: None,
                    created: outcome == Outcome::Created,
                }
            }
            Err(e) => {
                warn!(
                    "{}: {} {}/{} failed: {}",
                    self.operation, kind, namespace, name, e
                );
                metrics.record_step(self.operation, &kind, None);
                StepReport {
                    kind,
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    outcome: "failed",
                    failure_status: Some(e.status_code()),
                    error: Some(e.to_string()),
                    created: false,
                }
            }
        };
        self.steps.push(step);
    }

    /// First failure wins; otherwise 201 if anything was created, else 200.
    pub fn status_code(&self) -> StatusCode {
        if let Some(status) = self.steps.iter().find_map(|s| s.failure_status) {
            return status;
        }
        if self.steps.iter().any(|s| s.created) {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        }
    }

    #[cfg(test)]
    pub(crate) fn failed(&self) -> bool {
        self.steps.iter().any(|s| s.failure_status.is_some())
    }
}

impl IntoResponse for OperationReport {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Status for errors raised outside a reconcile step.
impl IntoResponse for HarnessError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}
