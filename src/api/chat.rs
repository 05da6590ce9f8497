//! # Chat API
//!
//! Endpoint methods and wire types for the DeepResearch chat backend:
//! sending research messages, conversation thread tracking, reachability
//! probes, and stored history retrieval.
//!
//! ## Conversation Threads
//!
//! The backend links successive exchanges through an opaque thread id. The
//! client caches the most recent id returned by the backend and sends it
//! with every following message, so clarification rounds land in the same
//! research run. [`ApiClient::start_new_conversation`] drops the cached id
//! and the next send starts a fresh thread.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::client::{ApiClient, ApiError, to_body_error};

// ============================================================================
// Request Types
// ============================================================================

/// Request payload for the chat endpoint.
///
/// `thread_id` is omitted from the JSON entirely when absent; the backend
/// treats a missing key as "start a new conversation".
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The research question or clarification answer.
    pub message: String,
    /// Conversation thread to continue, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// Per-call options for chat operations.
///
/// Every field is optional; [`RequestOptions::default`] selects the cached
/// conversation state and the backend's default history scope.
///
/// # Example
///
/// ```rust
/// use deepresearch::api::chat::RequestOptions;
///
/// let options = RequestOptions {
///     thread_id: Some("abc123".to_string()),
///     ..Default::default()
/// };
/// assert!(options.session_id.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Overrides the cached conversation thread for a single send.
    pub thread_id: Option<String>,
    /// Scopes [`ApiClient::chat_history`] to one session.
    pub session_id: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Raw response payload from the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Display text: either the final report or a clarification question.
    pub response: String,
    /// Thread id for continuing this conversation.
    pub thread_id: Option<String>,
    /// True when the backend is asking for clarification instead of
    /// delivering a report.
    #[serde(default)]
    pub is_followup: bool,
    /// Structured research report, present once research has completed.
    pub report: Option<Value>,
}

/// Outcome of a research exchange, as handed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Display text: either the final report or a clarification question.
    pub response: String,
    /// Thread id that continues this conversation, if the backend issued one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// True when the backend needs an answer before it can research.
    pub is_followup: bool,
    /// Structured research report, present once research has completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Value>,
}

/// Acknowledgment returned by [`ApiClient::clear_chat_session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCleared {
    /// Always true; the reset is local and cannot fail.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

// ============================================================================
// Validation
// ============================================================================

/// Checks that a message is non-empty after trimming and returns the
/// trimmed form, which is exactly what gets sent to the backend.
pub fn validate_message(message: &str) -> Result<&str, ApiError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput {
            message: "message must be a non-empty string".to_string(),
        });
    }
    Ok(trimmed)
}

/// Checks that a thread id is non-empty after trimming.
///
/// Absent thread ids are legal everywhere, so callers only validate ids
/// they actually have.
pub fn validate_thread_id(thread_id: &str) -> Result<&str, ApiError> {
    if thread_id.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            message: "thread id must be a non-empty string".to_string(),
        });
    }
    Ok(thread_id)
}

// ============================================================================
// API Methods
// ============================================================================

impl ApiClient {
    /// Sends a research message and returns the backend's reply.
    ///
    /// The message is validated and trimmed before anything is sent; blank
    /// input fails with [`ApiError::InvalidInput`] and never touches the
    /// network. The conversation thread resolves in order: explicit
    /// `options.thread_id`, then the cached thread from earlier exchanges,
    /// then none. When the reply carries a thread id, it becomes the new
    /// cached thread.
    ///
    /// Research calls are bounded by the request timeout (10 minutes by
    /// default); a timed-out call fails with [`ApiError::Timeout`] even
    /// though the backend may still be working.
    ///
    /// # Arguments
    ///
    /// * `message` - The research question or clarification answer
    /// * `options` - Per-call overrides, usually `RequestOptions::default()`
    ///
    /// # Returns
    ///
    /// The reply text plus conversation metadata, or an [`ApiError`]
    /// describing what failed.
    pub async fn send_message(
        &mut self,
        message: &str,
        options: &RequestOptions,
    ) -> Result<ChatReply, ApiError> {
        let message = validate_message(message)?;
        if let Some(thread_id) = options.thread_id.as_deref() {
            validate_thread_id(thread_id)?;
        }

        let thread_id = options
            .thread_id
            .as_deref()
            .or(self.thread_id.as_deref())
            .map(str::to_string);

        let request = ChatRequest {
            message: message.to_string(),
            thread_id,
        };
        let body = serde_json::to_string(&request).map_err(|e| ApiError::Parse {
            message: format!("Failed to encode chat request: {}", e),
        })?;

        let url = format!("{}/chat", self.base_url());
        let response = self
            .send_request(
                Method::POST,
                &url,
                None,
                Some(body),
                self.config.request_timeout,
            )
            .await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| to_body_error("Failed to parse chat response", e))?;

        let thread_id = chat_response
            .thread_id
            .filter(|id| !id.trim().is_empty());
        if let Some(ref id) = thread_id {
            self.thread_id = Some(id.clone());
        }

        Ok(ChatReply {
            response: chat_response.response,
            thread_id,
            is_followup: chat_response.is_followup,
            report: chat_response.report,
        })
    }

    /// Returns the cached conversation thread id, if any.
    pub fn current_thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// Pins the conversation to a specific thread id.
    ///
    /// Fails with [`ApiError::InvalidInput`] when the id is blank.
    pub fn set_thread_id(&mut self, thread_id: &str) -> Result<(), ApiError> {
        validate_thread_id(thread_id)?;
        self.thread_id = Some(thread_id.to_string());
        Ok(())
    }

    /// Drops the cached thread id; the next send starts a fresh conversation.
    pub fn start_new_conversation(&mut self) {
        self.thread_id = None;
    }

    /// Resets the local conversation state and returns an acknowledgment.
    ///
    /// The backend holds no session state worth clearing from here, so
    /// this never issues a request and never fails.
    pub fn clear_chat_session(&mut self) -> SessionCleared {
        self.start_new_conversation();
        SessionCleared {
            success: true,
            message: "Chat session cleared locally".to_string(),
        }
    }

    /// Probes the dedicated health endpoint.
    ///
    /// Returns true iff the backend answered with a success status within
    /// the probe timeout. Never returns an error; any failure, including
    /// an unreachable host, reads as "not healthy".
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url());
        self.send_request(
            Method::GET,
            &url,
            None,
            None,
            self.config.health_check_timeout,
        )
        .await
        .is_ok()
    }

    /// Probes the test endpoint. Same contract as [`ApiClient::health_check`].
    pub async fn test_connection(&self) -> bool {
        let url = format!("{}/test", self.base_url());
        self.send_request(
            Method::GET,
            &url,
            None,
            None,
            self.config.health_check_timeout,
        )
        .await
        .is_ok()
    }

    /// Probes the chat endpoint itself with a synthetic message.
    ///
    /// Last-resort probe for backends without a dedicated health route. The
    /// synthetic exchange does not touch the cached conversation thread,
    /// and the reply body is discarded. Same boolean contract as
    /// [`ApiClient::health_check`].
    pub async fn health_check_with_chat(&self) -> bool {
        let request = ChatRequest {
            message: "health check".to_string(),
            thread_id: None,
        };
        let Ok(body) = serde_json::to_string(&request) else {
            return false;
        };

        let url = format!("{}/chat", self.base_url());
        self.send_request(
            Method::POST,
            &url,
            None,
            Some(body),
            self.config.health_check_timeout,
        )
        .await
        .is_ok()
    }

    /// Fetches stored chat history from the backend.
    ///
    /// When `options.session_id` is set, it is percent-encoded into the
    /// query string to scope the result to one session; blank ids are
    /// treated as absent. The payload shape is owned by the backend, so
    /// it is returned as raw JSON.
    ///
    /// Unlike the reachability probes, failures here propagate as
    /// [`ApiError`] values.
    pub async fn chat_history(&self, options: &RequestOptions) -> Result<Value, ApiError> {
        let session_id = options
            .session_id
            .as_deref()
            .filter(|id| !id.trim().is_empty());
        let url = match session_id {
            Some(session_id) => format!(
                "{}/chat/history?session_id={}",
                self.base_url(),
                urlencoding::encode(session_id)
            ),
            None => format!("{}/chat/history", self.base_url()),
        };

        let response = self
            .send_request(Method::GET, &url, None, None, self.config.request_timeout)
            .await?;

        response
            .json()
            .await
            .map_err(|e| to_body_error("Failed to parse history response", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_omits_absent_thread_id() {
        let request = ChatRequest {
            message: "What is quantum computing?".to_string(),
            thread_id: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"message":"What is quantum computing?"}"#);
    }

    #[test]
    fn test_chat_request_includes_present_thread_id() {
        let request = ChatRequest {
            message: "Yes, focus on hardware.".to_string(),
            thread_id: Some("abc123".to_string()),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""thread_id":"abc123""#));
    }

    #[test]
    fn test_chat_response_defaults_optional_fields() {
        let json = r#"{"response":"Here is what I found."}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.response, "Here is what I found.");
        assert!(response.thread_id.is_none());
        assert!(!response.is_followup);
        assert!(response.report.is_none());
    }

    #[test]
    fn test_chat_response_parses_full_payload() {
        let json = r###"{
            "response": "## Report\nFindings...",
            "thread_id": "abc123",
            "is_followup": false,
            "report": "## Report\nFindings..."
        }"###;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.thread_id.as_deref(), Some("abc123"));
        assert!(response.report.is_some());
    }

    #[test]
    fn test_chat_response_accepts_null_thread_id() {
        let json = r#"{"response":"Which aspect?","thread_id":null,"is_followup":true}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.thread_id.is_none());
        assert!(response.is_followup);
    }

    #[test]
    fn test_chat_reply_serializes_without_empty_keys() {
        let reply = ChatReply {
            response: "ok".to_string(),
            thread_id: None,
            is_followup: false,
            report: None,
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"response":"ok","is_followup":false}"#);
    }

    #[test]
    fn test_validate_message_trims_surrounding_whitespace() {
        let message = validate_message("  What is Rust?  ").unwrap();
        assert_eq!(message, "What is Rust?");
    }

    #[test]
    fn test_validate_message_rejects_blank_input() {
        assert!(validate_message("").unwrap_err().is_invalid_input());
        assert!(validate_message("   \t\n").unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_validate_thread_id_rejects_blank_input() {
        assert!(validate_thread_id("").unwrap_err().is_invalid_input());
        assert!(validate_thread_id("   ").unwrap_err().is_invalid_input());
        assert!(validate_thread_id("abc123").is_ok());
    }

    #[test]
    fn test_thread_id_round_trips_through_setter() {
        let mut client = ApiClient::new("http://localhost:8000");
        assert_eq!(client.current_thread_id(), None);

        client.set_thread_id("abc123").unwrap();
        assert_eq!(client.current_thread_id(), Some("abc123"));
    }

    #[test]
    fn test_set_thread_id_rejects_blank_and_keeps_state() {
        let mut client = ApiClient::new("http://localhost:8000");
        client.set_thread_id("abc123").unwrap();

        assert!(client.set_thread_id("   ").unwrap_err().is_invalid_input());
        assert_eq!(client.current_thread_id(), Some("abc123"));
    }

    #[test]
    fn test_start_new_conversation_drops_cached_thread() {
        let mut client = ApiClient::new("http://localhost:8000");
        client.set_thread_id("abc123").unwrap();

        client.start_new_conversation();
        assert_eq!(client.current_thread_id(), None);
    }

    #[test]
    fn test_clear_chat_session_resets_and_acknowledges() {
        let mut client = ApiClient::new("http://localhost:8000");
        client.set_thread_id("abc123").unwrap();

        let ack = client.clear_chat_session();
        assert!(ack.success);
        assert_eq!(ack.message, "Chat session cleared locally");
        assert_eq!(client.current_thread_id(), None);
    }

    #[test]
    fn test_request_options_default_is_empty() {
        let options = RequestOptions::default();
        assert!(options.thread_id.is_none());
        assert!(options.session_id.is_none());
    }
}
