use crate::k8s::reconcile::{Deadline, Reconciler};
use crate::{HarnessError, Result};
use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, info};

/// Cluster handle shared by every request.
///
/// Holds one kube [`Client`] built at startup. Cloning is cheap and keeps no
/// per-request state; the namespace and time budget are fixed for the process.
#[derive(Clone)]
pub struct HarnessClient {
    client: Client,
    namespace: String,
    deadline: Duration,
}

impl HarnessClient {
    pub async fn try_default(namespace: &str, deadline: Duration) -> Result<Self> {
        debug!("Initializing Kubernetes client");

        let client = Client::try_default().await.map_err(|e| {
            HarnessError::KubernetesError(format!("Failed to create K8s client: {}", e))
        })?;

        info!(
            "Connected to Kubernetes cluster, managing resources in namespace {}",
            namespace
        );

        Ok(Self::from_client(client, namespace, deadline))
    }

    pub fn from_client(client: Client, namespace: impl Into<String>, deadline: Duration) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            deadline,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Start the shared deadline for one request's cluster calls.
    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.deadline)
    }

    pub fn api<K>(&self) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    /// Present/absent helpers for `K` in the harness namespace.
    pub fn reconciler<K>(&self, deadline: Deadline) -> Reconciler<K>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Serialize
            + Debug,
    {
        Reconciler::new(self.api(), &self.namespace, deadline)
    }
}
