//! Device address handling and identification.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Substrings whose presence in the landing page identifies a PicoKVM-family
/// device.  Matched case-insensitively.
pub const DEVICE_MARKERS: [&str; 5] = ["pikvm", "picokvm", "luckfox", "kvmd", "kvm-video"];

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("device address is empty")]
    EmptyAddress,
    #[error("invalid device address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("could not reach {url}: {reason}")]
    Unreachable { url: String, reason: String },
    #[error("{url} answered with HTTP status {status}")]
    UnexpectedStatus { url: String, status: u16 },
    #[error("{0} is not a PicoKVM device")]
    NotAKvmDevice(String),
}

/// Trims `input` and prepends `http://` unless it already has an http(s) scheme.
pub fn normalize_device_url(input: &str) -> Result<String, ProbeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ProbeError::EmptyAddress);
    }

    let lower = trimmed.to_ascii_lowercase();
    let url = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    match Url::parse(&url) {
        Ok(parsed) if parsed.host_str().is_some() => Ok(url),
        Ok(_) => Err(ProbeError::InvalidAddress {
            address: trimmed.to_string(),
            reason: "missing host".to_string(),
        }),
        Err(e) => Err(ProbeError::InvalidAddress {
            address: trimmed.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Returns `true` if the landing page mentions one of [`DEVICE_MARKERS`].
pub fn looks_like_kvm_page(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    DEVICE_MARKERS.iter().any(|marker| body.contains(marker))
}

/// Checks that `url` serves a PicoKVM-family web console.
///
/// A 401 counts as a device (authentication is enabled and the landing page
/// is protected).  A 2xx page must contain one of the device markers.
pub async fn probe_device(url: &str, timeout: Duration) -> Result<(), ProbeError> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProbeError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProbeError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    debug!("probe {url}: {status}");
    if status == StatusCode::UNAUTHORIZED {
        return Ok(());
    }
    if !status.is_success() {
        return Err(ProbeError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| ProbeError::Unreachable {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if looks_like_kvm_page(&body) {
        Ok(())
    } else {
        Err(ProbeError::NotAKvmDevice(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::network::stub::{http_response, serve_once};

    #[test]
    fn test_normalize_prepends_scheme() {
        assert_eq!(normalize_device_url("10.126.126.5").unwrap(), "http://10.126.126.5");
        assert_eq!(normalize_device_url("  kvm.local:8080 ").unwrap(), "http://kvm.local:8080");
    }

    #[test]
    fn test_normalize_keeps_existing_scheme_any_case() {
        assert_eq!(normalize_device_url("https://kvm.local").unwrap(), "https://kvm.local");
        assert_eq!(normalize_device_url("HTTP://kvm.local").unwrap(), "HTTP://kvm.local");
    }

    #[test]
    fn test_normalize_rejects_empty_input() {
        assert!(matches!(normalize_device_url("   "), Err(ProbeError::EmptyAddress)));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_device_url("http://"),
            Err(ProbeError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_marker_match_is_case_insensitive() {
        assert!(looks_like_kvm_page("<title>LuckFox PicoKVM</title>"));
        assert!(looks_like_kvm_page("<script src=/kvmd/app.js>"));
        assert!(!looks_like_kvm_page("<title>Router admin</title>"));
    }

    #[tokio::test]
    async fn test_probe_accepts_device_landing_page() {
        let (base, _server) =
            serve_once(http_response("200 OK", &[], "<html><title>PicoKVM</title></html>")).await;

        assert!(probe_device(&base, DEFAULT_PROBE_TIMEOUT).await.is_ok());
    }

    #[tokio::test]
    async fn test_probe_accepts_401() {
        let (base, _server) = serve_once(http_response("401 Unauthorized", &[], "")).await;

        assert!(probe_device(&base, DEFAULT_PROBE_TIMEOUT).await.is_ok());
    }

    #[tokio::test]
    async fn test_probe_rejects_other_sites() {
        let (base, _server) =
            serve_once(http_response("200 OK", &[], "<html>printer status</html>")).await;

        let result = probe_device(&base, DEFAULT_PROBE_TIMEOUT).await;

        assert!(matches!(result, Err(ProbeError::NotAKvmDevice(_))));
    }

    #[tokio::test]
    async fn test_probe_rejects_server_errors() {
        let (base, _server) = serve_once(http_response("500 Internal Server Error", &[], "kvmd")).await;

        let result = probe_device(&base, DEFAULT_PROBE_TIMEOUT).await;

        assert!(matches!(result, Err(ProbeError::UnexpectedStatus { status: 500, .. })));
    }
}
