//! Declarative "ensure present" / "ensure absent" helpers.
//!
//! Each helper performs a one-shot call against the API server and folds the
//! expected conflict/not-found answers into an [`Outcome`]. Anything else is
//! returned as an error for the caller to report. All calls made for one
//! request share a single [`Deadline`].

use crate::{HarnessError, Result};
use kube::api::{DeleteParams, PostParams};
use kube::{Api, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Time budget shared by every cluster call made for one request.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start the clock now. Budgets past the end of the clock never expire.
    pub fn after(budget: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(budget)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self { at, budget }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    AlreadyExists,
    Deleted,
    AlreadyAbsent,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::AlreadyExists => "already_exists",
            Outcome::Deleted => "deleted",
            Outcome::AlreadyAbsent => "already_absent",
        }
    }
}

pub struct Reconciler<K> {
    api: Api<K>,
    namespace: String,
    deadline: Deadline,
}

impl<K> Reconciler<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Serialize + Debug,
{
    pub fn new(api: Api<K>, namespace: &str, deadline: Deadline) -> Self {
        Self {
            api,
            namespace: namespace.to_string(),
            deadline,
        }
    }

    pub fn kind(&self) -> String {
        K::kind(&()).into_owned()
    }

    /// Create `object`. An existing object with the same identity is not an error.
    pub async fn ensure_present(&self, object: &K) -> Result<Outcome> {
        let name = object.name_any();

        match self
            .bounded(self.api.create(&PostParams::default(), object))
            .await?
        {
            Ok(_) => Ok(Outcome::Created),
            Err(kube::Error::Api(resp)) if resp.code == 409 => {
                debug!(
                    "{} {}/{} already exists: {}",
                    self.kind(),
                    self.namespace,
                    name,
                    resp.message
                );
                Ok(Outcome::AlreadyExists)
            }
            Err(e) => Err(self.rejected(&name, e)),
        }
    }

    /// Look up `name` and delete it if present.
    pub async fn ensure_absent(&self, name: &str) -> Result<Outcome> {
        self.bounded(self.lookup_and_delete(name)).await?
    }

    async fn lookup_and_delete(&self, name: &str) -> Result<Outcome> {
        let existing = self
            .api
            .get_opt(name)
            .await
            .map_err(|e| self.rejected(name, e))?;

        if existing.is_none() {
            return Ok(Outcome::AlreadyAbsent);
        }

        match self.api.delete(name, &DeleteParams::default()).await {
            Ok(_) => Ok(Outcome::Deleted),
            // deleted by someone else between the lookup and the delete
            Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(Outcome::AlreadyAbsent),
            Err(e) => Err(self.rejected(name, e)),
        }
    }

    async fn bounded<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout_at(self.deadline.at, fut)
            .await
            .map_err(|_| HarnessError::Timeout(self.deadline.budget))
    }

    fn rejected(&self, name: &str, err: kube::Error) -> HarnessError {
        match err {
            kube::Error::Api(resp) => HarnessError::ApiRejected {
                kind: self.kind(),
                namespace: self.namespace.clone(),
                name: name.to_string(),
                code: resp.code,
                message: resp.message,
            },
            other => HarnessError::KubernetesError(format!(
                "{} {}/{}: {}",
                self.kind(),
                self.namespace,
                name,
                other
            )),
        }
    }
}
