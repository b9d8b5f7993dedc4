use crate::{HarnessError, Result};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8888";
pub const DEFAULT_NAMESPACE: &str = "notifications-test";
pub const DEFAULT_PROBE_URL: &str = "http://notification-receiver.notifications-test/ready";
pub const DEFAULT_PROVIDER_ADDRESS: &str = "http://192.168.105.7:31759/notifications";
pub const DEFAULT_KUBE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub listen: SocketAddr,
    pub namespace: String,
    pub probe_url: String,
    pub provider_address: String,
    pub kube_timeout: Duration,
    pub probe_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8888)),
            namespace: DEFAULT_NAMESPACE.to_string(),
            probe_url: DEFAULT_PROBE_URL.to_string(),
            provider_address: DEFAULT_PROVIDER_ADDRESS.to_string(),
            kube_timeout: DEFAULT_KUBE_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Parse durations like `500ms`, `30s`, `5m` or `1h`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    let (num, unit_ms) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1u64)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1_000u64)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60_000u64)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3_600_000u64)
    } else {
        return Err(HarnessError::ConfigError(format!(
            "invalid duration {:?}, use: 30s, 5m, 1h, 500ms",
            s
        )));
    };

    let value: u64 = num
        .parse()
        .map_err(|_| HarnessError::ConfigError(format!("invalid duration number {:?}", num)))?;

    if value == 0 {
        return Err(HarnessError::ConfigError(
            "duration must be greater than zero".to_string(),
        ));
    }

    let millis = value
        .checked_mul(unit_ms)
        .ok_or_else(|| HarnessError::ConfigError(format!("duration {:?} is too large", s)))?;

    Ok(Duration::from_millis(millis))
}
