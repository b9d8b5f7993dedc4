use gitops_harness::config::{parse_duration, Settings};
use gitops_harness::error::HarnessError;
use gitops_harness::k8s::types::{alert, helm_release, helm_repository, provider};
use kube::ResourceExt;
use std::time::Duration;

#[test]
fn test_error_types() {
    let err = HarnessError::ApiRejected {
        kind: "Alert".to_string(),
        namespace: "notifications-test".to_string(),
        name: "alert-test".to_string(),
        code: 403,
        message: "forbidden".to_string(),
    };

    assert!(err.to_string().contains("alert-test"));
    assert!(err.to_string().contains("notifications-test"));
    assert_eq!(err.status_code().as_u16(), 502);
}

#[test]
fn test_version_const() {
    assert!(!gitops_harness::VERSION.is_empty());
}

#[test]
fn test_descriptors_share_namespace() {
    let settings = Settings::default();
    let ns = settings.namespace.as_str();

    let namespaces = [
        helm_repository(ns).namespace(),
        helm_release(ns).namespace(),
        provider(ns, &settings.provider_address).namespace(),
        alert(ns).namespace(),
    ];

    assert!(namespaces.iter().all(|n| n.as_deref() == Some("notifications-test")));
}

#[test]
fn test_default_deadline() {
    assert_eq!(Settings::default().kube_timeout, parse_duration("60s").unwrap());
    assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
}
