//! # API Client Core
//!
//! HTTP client for the DeepResearch backend. This module owns the pieces
//! shared by every endpoint: the [`ApiClient`] itself, the [`ApiError`]
//! taxonomy callers match on, and the request transport that applies
//! per-call timeouts, default headers, and observer notifications.
//!
//! Endpoint methods live in [`crate::api::chat`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;

use crate::config::ClientConfig;

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by backend calls.
///
/// Every failure is normalized into one of these variants so callers can
/// branch on the kind of failure without inspecting transport internals.
#[derive(Debug)]
pub enum ApiError {
    /// Input was rejected locally before any request was issued.
    InvalidInput { message: String },
    /// The request did not settle within its timeout window.
    Timeout,
    /// The backend answered with a non-success status.
    Http { status: u16, body: String },
    /// The backend could not be reached at the transport level.
    Network { message: String },
    /// The backend answered, but the payload could not be encoded or decoded.
    Parse { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            ApiError::Timeout => write!(
                f,
                "Research request timed out - the backend may still be processing. \
                 Try again, or ask a more specific question."
            ),
            ApiError::Http { status, body } => {
                if body.is_empty() {
                    write!(f, "HTTP {}: request failed", status)
                } else {
                    write!(f, "HTTP {}: {}", status, body)
                }
            }
            ApiError::Network { message } => write!(
                f,
                "Network error: {} - check that the research server is running and reachable",
                message
            ),
            ApiError::Parse { message } => write!(f, "Parse error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns true if this is a local validation failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ApiError::InvalidInput { .. })
    }

    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }

    /// Returns true if the backend answered with a non-success status.
    pub fn is_http_error(&self) -> bool {
        matches!(self, ApiError::Http { .. })
    }

    /// Returns true if the backend could not be reached at all.
    pub fn is_network_error(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Returns true if a payload could not be encoded or decoded.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ApiError::Parse { .. })
    }
}

// ============================================================================
// Request Observer
// ============================================================================

/// Hook notified at the edges of every backend call.
///
/// The client invokes the observer once when a request starts and once when
/// it settles, either with a success status or an [`ApiError`]. Implementors
/// must not panic; the default [`LogObserver`] forwards events to the `log`
/// facade.
pub trait RequestObserver: Send + Sync {
    /// Called immediately before a request is issued.
    fn on_request(&self, method: &str, url: &str);

    /// Called when a request settles with a success status.
    fn on_response(&self, method: &str, url: &str, status: u16);

    /// Called when a request fails, including non-success statuses.
    fn on_error(&self, method: &str, url: &str, error: &ApiError);
}

/// Default observer that forwards request lifecycle events to `log`.
pub struct LogObserver;

impl RequestObserver for LogObserver {
    fn on_request(&self, method: &str, url: &str) {
        debug!("[API] {} {}", method, url);
    }

    fn on_response(&self, method: &str, url: &str, status: u16) {
        debug!("[API] {} {} -> {}", method, url, status);
    }

    fn on_error(&self, method: &str, url: &str, error: &ApiError) {
        warn!("[API] {} {} failed: {}", method, url, error);
    }
}

// ============================================================================
// API Client
// ============================================================================

/// Client for the DeepResearch backend.
///
/// Holds the HTTP connection pool, the connection settings, and the cached
/// conversation thread id that links successive research exchanges. The
/// client sends no credentials; the backend is an unauthenticated service.
///
/// # Example
///
/// ```rust,no_run
/// use deepresearch::api::chat::RequestOptions;
/// use deepresearch::api::{ApiClient, ApiError};
///
/// async fn ask() -> Result<(), ApiError> {
///     let mut client = ApiClient::new("http://localhost:8000");
///     let reply = client
///         .send_message("What is quantum computing?", &RequestOptions::default())
///         .await?;
///     println!("{}", reply.response);
///     Ok(())
/// }
/// ```
pub struct ApiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) config: ClientConfig,
    pub(crate) thread_id: Option<String>,
    pub(crate) observer: Arc<dyn RequestObserver>,
}

impl ApiClient {
    /// Creates a client for the given backend base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Creates a client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            thread_id: None,
            observer: Arc::new(LogObserver),
        }
    }

    /// Creates a client configured from the environment.
    ///
    /// See [`ClientConfig::from_env`] for the resolution rules.
    pub fn from_env() -> Self {
        Self::with_config(ClientConfig::from_env())
    }

    /// Replaces the request observer.
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the backend base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Issues a request with a per-call timeout and normalized errors.
    ///
    /// This is the single transport path used by every endpoint method:
    /// default JSON headers are merged with `extra_headers` (caller wins
    /// per key), the call is bounded by `timeout`, and any failure comes
    /// back as an [`ApiError`]. A response is only returned for success
    /// statuses; non-success responses are drained into
    /// [`ApiError::Http`] with the body text preserved.
    pub(crate) async fn send_request(
        &self,
        method: Method,
        url: &str,
        extra_headers: Option<HeaderMap>,
        body: Option<String>,
        timeout: Duration,
    ) -> Result<reqwest::Response, ApiError> {
        let headers = merged_headers(extra_headers);
        self.observer.on_request(method.as_str(), url);

        let mut builder = self
            .client
            .request(method.clone(), url)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = if e.is_timeout() {
                    ApiError::Timeout
                } else {
                    ApiError::Network {
                        message: e.to_string(),
                    }
                };
                self.observer.on_error(method.as_str(), url, &error);
                return Err(error);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::Http {
                status: status.as_u16(),
                body,
            };
            self.observer.on_error(method.as_str(), url, &error);
            return Err(error);
        }

        self.observer.on_response(method.as_str(), url, status.as_u16());
        Ok(response)
    }
}

/// Maps a failed body read to an [`ApiError`].
///
/// The per-request timeout keeps running while the body streams in, so a
/// stall after success headers is still a timeout, not a malformed payload.
pub(crate) fn to_body_error(context: &str, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Parse {
            message: format!("{}: {}", context, error),
        }
    }
}

/// Builds the header set for a request: JSON defaults overlaid with any
/// caller-provided headers, where the caller wins per key.
fn merged_headers(extra_headers: Option<HeaderMap>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(extra) = extra_headers {
        for (name, value) in extra.iter() {
            headers.insert(name, value.clone());
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_timeout_mentions_ongoing_processing() {
        let message = ApiError::Timeout.to_string();
        assert!(message.contains("timed out"));
        assert!(message.contains("may still be processing"));
    }

    #[test]
    fn test_display_http_includes_status_and_body() {
        let error = ApiError::Http {
            status: 500,
            body: "internal error".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("internal error"));
    }

    #[test]
    fn test_display_http_with_empty_body_still_names_status() {
        let error = ApiError::Http {
            status: 503,
            body: String::new(),
        };
        let message = error.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("request failed"));
    }

    #[test]
    fn test_display_network_suggests_checking_the_server() {
        let error = ApiError::Network {
            message: "connection refused".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("connection refused"));
        assert!(message.contains("running and reachable"));
    }

    #[test]
    fn test_predicates_match_their_variant_only() {
        let invalid = ApiError::InvalidInput {
            message: "empty".to_string(),
        };
        assert!(invalid.is_invalid_input());
        assert!(!invalid.is_timeout());
        assert!(!invalid.is_http_error());
        assert!(!invalid.is_network_error());
        assert!(!invalid.is_parse_error());

        assert!(ApiError::Timeout.is_timeout());
        assert!(ApiError::Http {
            status: 404,
            body: String::new()
        }
        .is_http_error());
        assert!(ApiError::Network {
            message: "down".to_string()
        }
        .is_network_error());
        assert!(ApiError::Parse {
            message: "bad json".to_string()
        }
        .is_parse_error());
    }

    #[test]
    fn test_merged_headers_defaults_to_json() {
        let headers = merged_headers(None);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_merged_headers_caller_wins_per_key() {
        let mut extra = HeaderMap::new();
        extra.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        extra.insert("x-request-id", HeaderValue::from_static("abc-123"));

        let headers = merged_headers(Some(extra));
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get("x-request-id").unwrap(), "abc-123");
        // Untouched defaults survive the merge.
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_base_url_comes_from_config() {
        let client = ApiClient::new("http://example.com:8000/");
        assert_eq!(client.base_url(), "http://example.com:8000");
    }
}
