use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Kubernetes error: {0}")]
    KubernetesError(String),

    #[error("Kubernetes API rejected {kind} {namespace}/{name}: {message} ({code})")]
    ApiRejected {
        kind: String,
        namespace: String,
        name: String,
        code: u16,
        message: String,
    },

    #[error("Kubernetes API call did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Probe error: {0}")]
    ProbeError(String),

    #[error("Metrics error: {0}")]
    MetricsError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HarnessError {
    /// HTTP status reported to the caller when a cluster step fails with this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            HarnessError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            HarnessError::ApiRejected { .. } => StatusCode::BAD_GATEWAY,
            HarnessError::KubernetesError(_) | HarnessError::ProbeError(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            HarnessError::MetricsError(_)
            | HarnessError::ConfigError(_)
            | HarnessError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = HarnessError::Timeout(Duration::from_secs(60));
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert!(err.to_string().contains("60s"));
    }

    #[test]
    fn test_api_rejection_maps_to_bad_gateway() {
        let err = HarnessError::ApiRejected {
            kind: "HelmRelease".to_string(),
            namespace: "notifications-test".to_string(),
            name: "nginx".to_string(),
            code: 422,
            message: "spec.chart: Required value".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            "Kubernetes API rejected HelmRelease notifications-test/nginx: spec.chart: Required value (422)"
        );
    }

    #[test]
    fn test_transport_error_maps_to_service_unavailable() {
        let err = HarnessError::KubernetesError("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
