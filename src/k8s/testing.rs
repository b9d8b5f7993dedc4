//! Mock API server for exercising cluster calls without a cluster.

use crate::config::DEFAULT_NAMESPACE;
use crate::k8s::HarnessClient;
use http::{Method, Request, Response};
use kube::client::Body;
use kube::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tower_test::mock;

pub const HELM_REPOSITORIES_PATH: &str =
    "/apis/source.toolkit.fluxcd.io/v1beta2/namespaces/notifications-test/helmrepositories";
pub const HELM_RELEASES_PATH: &str =
    "/apis/helm.toolkit.fluxcd.io/v2beta1/namespaces/notifications-test/helmreleases";
pub const PROVIDERS_PATH: &str =
    "/apis/notification.toolkit.fluxcd.io/v1beta2/namespaces/notifications-test/providers";
pub const ALERTS_PATH: &str =
    "/apis/notification.toolkit.fluxcd.io/v1beta2/namespaces/notifications-test/alerts";

type ApiServerHandle = mock::Handle<Request<Body>, Response<Body>>;

/// Answers the requests a test expects, in order.
///
/// Dropping it while the client still has calls in flight makes those calls
/// fail with a closed-service error.
pub struct ApiServerVerifier(ApiServerHandle);

pub fn mock_client(deadline: Duration) -> (HarnessClient, ApiServerVerifier) {
    let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
    let client = Client::new(mock_service, "default");
    (
        HarnessClient::from_client(client, DEFAULT_NAMESPACE, deadline),
        ApiServerVerifier(handle),
    )
}

pub async fn timeout_after_1s(handle: tokio::task::JoinHandle<()>) {
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("timeout on mock apiserver")
        .expect("scenario succeeded")
}

pub fn status_body(code: u16, reason: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": format!("{} ({})", reason, code),
        "reason": reason,
        "code": code,
    }))
    .unwrap()
}

fn reason_for(code: u16) -> &'static str {
    match code {
        404 => "NotFound",
        409 => "AlreadyExists",
        422 => "Invalid",
        _ => "InternalError",
    }
}

impl ApiServerVerifier {
    /// Expect a create on `path`; echo the object back on 201, otherwise fail with `code`.
    /// Returns the submitted object.
    pub async fn handle_create(&mut self, path: &str, code: u16) -> Value {
        let (request, send) = self.0.next_request().await.expect("service not called");
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri().path(), path);

        let body = request.into_body().collect_bytes().await.unwrap();
        let object: Value = serde_json::from_slice(&body).expect("create body is json");

        let response = if code == 201 {
            Response::builder()
                .status(201)
                .body(Body::from(body.to_vec()))
                .unwrap()
        } else {
            Response::builder()
                .status(code)
                .body(Body::from(status_body(code, reason_for(code))))
                .unwrap()
        };
        send.send_response(response);
        object
    }

    /// Expect a create on `path` and accept it, but only after `delay`.
    pub async fn handle_create_after(&mut self, path: &str, delay: Duration) -> Value {
        let (request, send) = self.0.next_request().await.expect("service not called");
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri().path(), path);

        let body = request.into_body().collect_bytes().await.unwrap();
        let object: Value = serde_json::from_slice(&body).expect("create body is json");
        tokio::time::sleep(delay).await;

        send.send_response(
            Response::builder()
                .status(201)
                .body(Body::from(body.to_vec()))
                .unwrap(),
        );
        object
    }

    /// Expect a get on `path`; answer with `object` or a 404.
    pub async fn handle_get(&mut self, path: &str, object: Option<Value>) {
        let (request, send) = self.0.next_request().await.expect("service not called");
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().path(), path);

        let response = match object {
            Some(object) => Response::builder()
                .body(Body::from(serde_json::to_vec(&object).unwrap()))
                .unwrap(),
            None => Response::builder()
                .status(404)
                .body(Body::from(status_body(404, "NotFound")))
                .unwrap(),
        };
        send.send_response(response);
    }

    /// Expect a delete on `path`; answer with the deleted object.
    pub async fn handle_delete(&mut self, path: &str, object: Value) {
        let (request, send) = self.0.next_request().await.expect("service not called");
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.uri().path(), path);

        send.send_response(
            Response::builder()
                .body(Body::from(serde_json::to_vec(&object).unwrap()))
                .unwrap(),
        );
    }

    /// Expect a delete on `path`; fail it with `code`.
    pub async fn reject_delete(&mut self, path: &str, code: u16) {
        let (request, send) = self.0.next_request().await.expect("service not called");
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.uri().path(), path);

        send.send_response(
            Response::builder()
                .status(code)
                .body(Body::from(status_body(code, reason_for(code))))
                .unwrap(),
        );
    }
}
