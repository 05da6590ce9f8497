//! # Error Display
//!
//! User-facing error output shared by every command, plus the mapping from
//! [`ApiError`] to process exit codes. Commands report failures through
//! [`handle_api_error`] so the same failure always prints the same way and
//! exits with the same code.

use colored::Colorize;

use crate::api::ApiError;
use crate::exit_codes::{
    EXIT_ERROR, EXIT_INVALID_INPUT, EXIT_NETWORK_ERROR, EXIT_SERVICE_UNAVAILABLE, EXIT_TIMEOUT,
};

/// Prints a validation failure.
pub fn display_invalid_input_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Prints a timeout with a reminder that the backend may still be working.
pub fn display_timeout_error() {
    eprintln!(
        "{} Research request timed out.",
        "Error:".red().bold()
    );
    eprintln!(
        "  {}",
        "The backend may still be processing. Try again, or ask a more specific question."
            .dimmed()
    );
}

/// Prints a non-success backend response with its status and body.
pub fn display_http_error(status: u16, body: &str) {
    eprintln!(
        "{} The backend rejected the request (HTTP {}).",
        "Error:".red().bold(),
        status
    );
    if !body.is_empty() {
        eprintln!("  {}: {}", "Details".dimmed(), body);
    }
}

/// Prints a transport failure with a hint to check the server.
pub fn display_network_error(message: &str) {
    eprintln!(
        "{} Cannot reach the research backend. Check that the server is running.",
        "Error:".red().bold()
    );
    eprintln!("  {}: {}", "Details".dimmed(), message);
}

/// Prints a payload encode/decode failure.
pub fn display_parse_error(message: &str) {
    eprintln!(
        "{} The backend answered with an unexpected payload.",
        "Error:".red().bold()
    );
    eprintln!("  {}: {}", "Details".dimmed(), message);
}

/// Reports an API error to stderr and returns the exit code for it.
///
/// Server-side failures (HTTP 5xx) map to [`EXIT_SERVICE_UNAVAILABLE`] so
/// scripts can tell "backend down" from "backend refused this request".
pub fn handle_api_error(error: ApiError) -> i32 {
    match error {
        ApiError::InvalidInput { message } => {
            display_invalid_input_error(&message);
            EXIT_INVALID_INPUT
        }
        ApiError::Timeout => {
            display_timeout_error();
            EXIT_TIMEOUT
        }
        ApiError::Http { status, body } => {
            display_http_error(status, &body);
            if status >= 500 {
                EXIT_SERVICE_UNAVAILABLE
            } else {
                EXIT_ERROR
            }
        }
        ApiError::Network { message } => {
            display_network_error(&message);
            EXIT_NETWORK_ERROR
        }
        ApiError::Parse { message } => {
            display_parse_error(&message);
            EXIT_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_invalid_input_code() {
        let code = handle_api_error(ApiError::InvalidInput {
            message: "message must be a non-empty string".to_string(),
        });
        assert_eq!(code, EXIT_INVALID_INPUT);
    }

    #[test]
    fn test_timeout_maps_to_timeout_code() {
        assert_eq!(handle_api_error(ApiError::Timeout), EXIT_TIMEOUT);
    }

    #[test]
    fn test_network_maps_to_network_code() {
        let code = handle_api_error(ApiError::Network {
            message: "connection refused".to_string(),
        });
        assert_eq!(code, EXIT_NETWORK_ERROR);
    }

    #[test]
    fn test_server_errors_map_to_service_unavailable() {
        let code = handle_api_error(ApiError::Http {
            status: 503,
            body: "overloaded".to_string(),
        });
        assert_eq!(code, EXIT_SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_client_errors_map_to_generic_failure() {
        let code = handle_api_error(ApiError::Http {
            status: 404,
            body: "not found".to_string(),
        });
        assert_eq!(code, EXIT_ERROR);
    }

    #[test]
    fn test_parse_maps_to_generic_failure() {
        let code = handle_api_error(ApiError::Parse {
            message: "unexpected token".to_string(),
        });
        assert_eq!(code, EXIT_ERROR);
    }
}
