use crate::{HarnessError, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Most of the peer's body kept for the log and the report.
pub const MAX_BODY_BYTES: usize = 4096;

/// What the peer answered, or why it could not be reached.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub url: String,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// The peer sent more than [`MAX_BODY_BYTES`]; the rest was not read.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| HarnessError::ProbeError(format!("Failed to build HTTP client: {}", e)))
}

/// GET `url` once. Never fails: errors end up in the report.
pub async fn probe_peer(http: &reqwest::Client, url: &str) -> ProbeReport {
    match fetch(http, url).await {
        Ok((status, body, truncated)) => {
            info!(
                "Probe {} answered {}{}: {}",
                url,
                status,
                if truncated { " (truncated)" } else { "" },
                body
            );
            ProbeReport {
                url: url.to_string(),
                reachable: true,
                status: Some(status),
                body: Some(body),
                truncated,
                error: None,
            }
        }
        Err(e) => {
            warn!("Probe {} failed: {}", url, e);
            ProbeReport {
                url: url.to_string(),
                reachable: false,
                status: None,
                body: None,
                truncated: false,
                error: Some(e.to_string()),
            }
        }
    }
}

async fn fetch(http: &reqwest::Client, url: &str) -> Result<(u16, String, bool)> {
    let mut response = http
        .get(url)
        .send()
        .await
        .map_err(|e| HarnessError::ProbeError(e.to_string()))?;
    let status = response.status().as_u16();

    let mut body = Vec::new();
    let mut truncated = false;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| HarnessError::ProbeError(e.to_string()))?
    {
        let room = MAX_BODY_BYTES - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            truncated = true;
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok((status, decode_capped(&body), truncated))
}

fn decode_capped(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // drop a multi-byte character cut in half at the cap
        Err(e) if e.error_len().is_none() => {
            String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned()
        }
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
