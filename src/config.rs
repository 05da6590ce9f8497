//! # Client Configuration
//!
//! Where the DeepResearch backend lives and how long we wait for it.
//! The base URL comes from `DEEPRESEARCH_API_URL` when set, otherwise the
//! local development default. Timeouts are split between research calls,
//! which can legitimately run for minutes, and reachability probes, which
//! must answer fast or not at all.

use std::env;
use std::time::Duration;

/// Default backend address used when no environment override is present.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the backend base URL.
pub const API_URL_ENV: &str = "DEEPRESEARCH_API_URL";

/// Timeout for research requests. Deep research runs are slow, so this is
/// deliberately generous (10 minutes).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Timeout for reachability probes. A probe that takes longer than this
/// is treated as a failed probe.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`crate::api::ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
    /// Upper bound for research requests (send, history).
    pub request_timeout: Duration,
    /// Upper bound for reachability probes.
    pub health_check_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with default timeouts.
    ///
    /// Trailing slashes are trimmed so endpoint paths can always be
    /// appended with a single `/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: REQUEST_TIMEOUT,
            health_check_timeout: HEALTH_CHECK_TIMEOUT,
        }
    }

    /// Creates a configuration from the environment.
    ///
    /// Reads the backend address from `DEEPRESEARCH_API_URL`, falling back
    /// to [`DEFAULT_BASE_URL`] when the variable is unset or empty.
    pub fn from_env() -> Self {
        let base_url = env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
