//! # Exit Codes
//!
//! Process exit codes shared by every CLI command. Scripts drive the CLI
//! by exit code, so each failure class gets a stable value.

/// Command completed successfully.
pub const EXIT_SUCCESS: i32 = 0;

/// Generic failure not covered by a more specific code.
pub const EXIT_ERROR: i32 = 1;

/// Input was rejected by local validation before any network activity.
pub const EXIT_INVALID_INPUT: i32 = 2;

/// The backend could not be reached at the transport level.
pub const EXIT_NETWORK_ERROR: i32 = 3;

/// The request did not settle within its timeout window.
pub const EXIT_TIMEOUT: i32 = 4;

/// The backend is unreachable or answering with server errors.
pub const EXIT_SERVICE_UNAVAILABLE: i32 = 5;
