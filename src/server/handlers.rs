use crate::k8s::Deadline;
use crate::k8s::types::{
    self, Alert, HelmRelease, HelmRepository, Provider, ALERT_NAME, HELM_RELEASE_NAME,
    HELM_REPOSITORY_NAME, PROVIDER_NAME,
};
use crate::server::probe::{self, ProbeReport};
use crate::server::report::OperationReport;
use crate::server::AppState;
use crate::Result;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use k8s_openapi::NamespaceResourceScope;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

pub async fn healthy() -> StatusCode {
    StatusCode::OK
}

pub async fn ready() -> StatusCode {
    StatusCode::OK
}

/// Connectivity smoke test. Always 200; the body says what the peer did.
pub async fn smoke_test(State(state): State<AppState>) -> (StatusCode, Json<ProbeReport>) {
    let report = probe::probe_peer(&state.http, &state.settings.probe_url).await;
    state.metrics.record_probe(report.reachable);
    (StatusCode::OK, Json(report))
}

pub async fn install(State(state): State<AppState>) -> OperationReport {
    let ns = state.client.namespace().to_string();
    let mut report = OperationReport::new("install");
    let deadline = state.client.deadline();

    // no rollback: the release is attempted even if the repository step failed
    ensure_present(&state, &mut report, deadline, types::helm_repository(&ns)).await;
    ensure_present(&state, &mut report, deadline, types::helm_release(&ns)).await;

    report
}

pub async fn uninstall(State(state): State<AppState>) -> OperationReport {
    let mut report = OperationReport::new("uninstall");
    let deadline = state.client.deadline();

    ensure_absent::<HelmRepository>(&state, &mut report, deadline, HELM_REPOSITORY_NAME).await;
    ensure_absent::<HelmRelease>(&state, &mut report, deadline, HELM_RELEASE_NAME).await;

    report
}

pub async fn install_notifications(State(state): State<AppState>) -> OperationReport {
    let ns = state.client.namespace().to_string();
    let mut report = OperationReport::new("installNotifications");
    let deadline = state.client.deadline();

    let provider = types::provider(&ns, &state.settings.provider_address);
    ensure_present(&state, &mut report, deadline, provider).await;
    ensure_present(&state, &mut report, deadline, types::alert(&ns)).await;

    report
}

pub async fn uninstall_notifications(State(state): State<AppState>) -> OperationReport {
    let mut report = OperationReport::new("uninstallNotifications");
    let deadline = state.client.deadline();

    ensure_absent::<Provider>(&state, &mut report, deadline, PROVIDER_NAME).await;
    ensure_absent::<Alert>(&state, &mut report, deadline, ALERT_NAME).await;

    report
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let text = state.exporter.format_current_metrics()?;
    Ok(([(header::CONTENT_TYPE, state.exporter.content_type())], text))
}

async fn ensure_present<K>(
    state: &AppState,
    report: &mut OperationReport,
    deadline: Deadline,
    object: K,
) where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + DeserializeOwned
        + Serialize
        + Debug,
{
    let reconciler = state.client.reconciler::<K>(deadline);
    let name = object.name_any();
    let result = reconciler.ensure_present(&object).await;
    report.record(
        &state.metrics,
        reconciler.kind(),
        state.client.namespace(),
        &name,
        result,
    );
}

async fn ensure_absent<K>(
    state: &AppState,
    report: &mut OperationReport,
    deadline: Deadline,
    name: &str,
) where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + DeserializeOwned
        + Serialize
        + Debug,
{
    let reconciler = state.client.reconciler::<K>(deadline);
    let result = reconciler.ensure_absent(name).await;
    report.record(
        &state.metrics,
        reconciler.kind(),
        state.client.namespace(),
        name,
        result,
    );
}
