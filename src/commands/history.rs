//! # History Command
//!
//! Fetch stored chat history from the DeepResearch backend. The payload
//! shape is owned by the backend, so the command prints it as
//! pretty-printed JSON rather than guessing at a rendering.
//!
//! ## Usage
//!
//! ```bash
//! deepresearch history
//! deepresearch history --session sess-42
//! ```

use anyhow::Result;
use colored::Colorize;

use crate::api::chat::RequestOptions;
use crate::api::ApiClient;
use crate::errors::handle_api_error;
use crate::exit_codes::EXIT_SUCCESS;

/// Arguments for the history command
pub struct HistoryArgs {
    /// Restrict history to a single session
    pub session_id: Option<String>,
    /// Enable verbose output
    pub verbose: bool,
}

/// Execute the history command
pub async fn execute(args: HistoryArgs) -> Result<i32> {
    let client = ApiClient::from_env();

    if args.verbose {
        eprintln!("{} Fetching history from {}", "→".cyan(), client.base_url());
        if let Some(ref session_id) = args.session_id {
            eprintln!("{} Session: {}", "→".cyan(), session_id);
        }
    }

    let options = RequestOptions {
        thread_id: None,
        session_id: args.session_id,
    };

    let history = match client.chat_history(&options).await {
        Ok(history) => history,
        Err(e) => return Ok(handle_api_error(e)),
    };

    println!("{}", serde_json::to_string_pretty(&history)?);
    Ok(EXIT_SUCCESS)
}
