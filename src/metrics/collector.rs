use crate::k8s::Outcome;
use crate::{HarnessError, Result};
use prometheus::{IntCounterVec, Opts, Registry};

/// Counters for every cluster step and peer probe the harness performs.
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Registry,
    operations: IntCounterVec,
    probes: IntCounterVec,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let operations = IntCounterVec::new(
            Opts::new(
                "harness_operations_total",
                "Cluster steps performed, by operation, resource kind and outcome",
            ),
            &["operation", "kind", "outcome"],
        )
        .map_err(|e| HarnessError::MetricsError(e.to_string()))?;

        let probes = IntCounterVec::new(
            Opts::new("harness_probe_total", "Peer connectivity probes, by result"),
            &["result"],
        )
        .map_err(|e| HarnessError::MetricsError(e.to_string()))?;

        registry
            .register(Box::new(operations.clone()))
            .map_err(|e| HarnessError::MetricsError(e.to_string()))?;
        registry
            .register(Box::new(probes.clone()))
            .map_err(|e| HarnessError::MetricsError(e.to_string()))?;

        Ok(Self {
            registry,
            operations,
            probes,
        })
    }

    /// Record one step; `None` means the step failed.
    pub fn record_step(&self, operation: &str, kind: &str, outcome: Option<Outcome>) {
        let outcome = outcome.map(|o| o.as_str()).unwrap_or("failed");
        self.operations
            .with_label_values(&[operation, kind, outcome])
            .inc();
    }

    pub fn record_probe(&self, reachable: bool) {
        let result = if reachable { "reachable" } else { "unreachable" };
        self.probes.with_label_values(&[result]).inc();
    }

    #[cfg(test)]
    pub(crate) fn step_count(&self, operation: &str, kind: &str, outcome: &str) -> u64 {
        self.operations
            .with_label_values(&[operation, kind, outcome])
            .get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_step() {
        let metrics = MetricsCollector::new().unwrap();

        metrics.record_step("install", "HelmRepository", Some(Outcome::Created));
        metrics.record_step("install", "HelmRepository", Some(Outcome::AlreadyExists));
        metrics.record_step("install", "HelmRepository", None);
        metrics.record_step("install", "HelmRepository", None);

        assert_eq!(metrics.step_count("install", "HelmRepository", "created"), 1);
        assert_eq!(
            metrics.step_count("install", "HelmRepository", "already_exists"),
            1
        );
        assert_eq!(metrics.step_count("install", "HelmRepository", "failed"), 2);
        assert_eq!(metrics.step_count("uninstall", "HelmRepository", "deleted"), 0);
    }
}
