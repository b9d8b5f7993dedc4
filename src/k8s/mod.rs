pub mod client;
pub mod reconcile;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::HarnessClient;
pub use reconcile::{Deadline, Outcome, Reconciler};
pub use types::{Alert, HelmRelease, HelmRepository, Provider};
