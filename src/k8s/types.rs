//! Flux custom resources submitted by the harness.
//!
//! Only the fields the harness sets are modelled; anything else the cluster
//! returns is ignored on read. The schemas themselves are owned by the Flux
//! source, helm and notification controllers.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const HELM_REPOSITORY_NAME: &str = "bitnami";
pub const HELM_REPOSITORY_URL: &str = "https://charts.bitnami.com/bitnami";
pub const HELM_REPOSITORY_INTERVAL: Duration = Duration::from_secs(30 * 60);

pub const HELM_RELEASE_NAME: &str = "nginx";
pub const HELM_RELEASE_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const HELM_CHART_NAME: &str = "nginx";
pub const HELM_CHART_VERSION: &str = "8.x";

pub const PROVIDER_NAME: &str = "webhook-test";
pub const PROVIDER_TYPE_GENERIC: &str = "generic";

pub const ALERT_NAME: &str = "alert-test";
pub const ALERT_SUMMARY: &str = "teeeest";
pub const ALERT_SEVERITY: &str = "info";

pub const KUSTOMIZATION_KIND: &str = "Kustomization";

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "source.toolkit.fluxcd.io",
    version = "v1beta2",
    kind = "HelmRepository",
    plural = "helmrepositories",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HelmRepositorySpec {
    pub url: String,
    pub interval: String,
}

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "helm.toolkit.fluxcd.io",
    version = "v2beta1",
    kind = "HelmRelease",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseSpec {
    pub chart: HelmChartTemplate,
    pub interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    /// Chart values, passed through to Helm untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<serde_json::Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema)]
pub struct HelmChartTemplate {
    pub spec: HelmChartTemplateSpec,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartTemplateSpec {
    pub chart: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub source_ref: ChartSourceReference,
}

/// Reference from a chart template to the source that serves it.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
pub struct ChartSourceReference {
    pub kind: String,
    pub name: String,
}

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "notification.toolkit.fluxcd.io",
    version = "v1beta2",
    kind = "Provider",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpec {
    #[serde(rename = "type")]
    pub provider_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "notification.toolkit.fluxcd.io",
    version = "v1beta2",
    kind = "Alert",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct AlertSpec {
    pub provider_ref: LocalObjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_severity: Option<String>,
    pub event_sources: Vec<EventSourceReference>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
pub struct LocalObjectReference {
    pub name: String,
}

/// Selector for the objects whose events an alert forwards. `name` may be `*`.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
pub struct EventSourceReference {
    pub kind: String,
    pub name: String,
}

/// Render a duration the way Go's `time.Duration` prints it (`30m0s`, `1h5m0s`, `500ms`).
pub fn format_go_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms == 0 {
        return "0s".to_string();
    }
    if total_ms < 1000 {
        return format!("{}ms", total_ms);
    }

    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let millis = duration.subsec_millis();

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if millis > 0 {
        let frac = format!("{:03}", millis);
        out.push_str(&format!("{}.{}s", seconds, frac.trim_end_matches('0')));
    } else {
        out.push_str(&format!("{}s", seconds));
    }
    out
}

pub fn helm_repository(namespace: &str) -> HelmRepository {
    let mut repository = HelmRepository::new(
        HELM_REPOSITORY_NAME,
        HelmRepositorySpec {
            url: HELM_REPOSITORY_URL.to_string(),
            interval: format_go_duration(HELM_REPOSITORY_INTERVAL),
        },
    );
    repository.metadata.namespace = Some(namespace.to_string());
    repository
}

pub fn helm_release(namespace: &str) -> HelmRelease {
    let mut release = HelmRelease::new(
        HELM_RELEASE_NAME,
        HelmReleaseSpec {
            chart: HelmChartTemplate {
                spec: HelmChartTemplateSpec {
                    chart: HELM_CHART_NAME.to_string(),
                    version: Some(HELM_CHART_VERSION.to_string()),
                    source_ref: ChartSourceReference {
                        kind: "HelmRepository".to_string(),
                        name: HELM_REPOSITORY_NAME.to_string(),
                    },
                },
            },
            interval: format_go_duration(HELM_RELEASE_INTERVAL),
            release_name: Some(HELM_RELEASE_NAME.to_string()),
            values: Some(serde_json::json!({ "service": { "type": "ClusterIP" } })),
        },
    );
    release.metadata.namespace = Some(namespace.to_string());
    release
}

pub fn provider(namespace: &str, address: &str) -> Provider {
    let mut provider = Provider::new(
        PROVIDER_NAME,
        ProviderSpec {
            provider_type: PROVIDER_TYPE_GENERIC.to_string(),
            address: Some(address.to_string()),
        },
    );
    provider.metadata.namespace = Some(namespace.to_string());
    provider
}

/// Alert forwarding events from every Kustomization in the namespace to [`provider`].
pub fn alert(namespace: &str) -> Alert {
    let mut alert = Alert::new(
        ALERT_NAME,
        AlertSpec {
            provider_ref: LocalObjectReference {
                name: PROVIDER_NAME.to_string(),
            },
            summary: Some(ALERT_SUMMARY.to_string()),
            event_severity: Some(ALERT_SEVERITY.to_string()),
            event_sources: vec![EventSourceReference {
                kind: KUSTOMIZATION_KIND.to_string(),
                name: "*".to_string(),
            }],
        },
    );
    alert.metadata.namespace = Some(namespace.to_string());
    alert
}
