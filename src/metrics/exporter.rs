use crate::metrics::collector::MetricsCollector;
use crate::{HarnessError, Result};
use prometheus::{Encoder, TextEncoder};

pub struct PrometheusExporter {
    collector: MetricsCollector,
}

impl PrometheusExporter {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn format_current_metrics(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.collector.registry().gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| HarnessError::MetricsError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| HarnessError::MetricsError(e.to_string()))
    }
}
