//! # Status Command
//!
//! Check whether the DeepResearch backend is reachable. Probes are tried
//! from cheapest to most expensive: the dedicated health endpoint, then
//! the test endpoint, then a synthetic chat exchange for backends that
//! expose neither. The first probe that answers wins.
//!
//! ## Usage
//!
//! ```bash
//! deepresearch status
//! deepresearch status --json
//! ```

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::api::ApiClient;
use crate::exit_codes::{EXIT_SERVICE_UNAVAILABLE, EXIT_SUCCESS};

/// Arguments for the status command
pub struct StatusArgs {
    /// Print the result as JSON instead of human-readable text
    pub json: bool,
    /// Enable verbose output
    pub verbose: bool,
}

/// Machine-readable status report for `--json` output.
#[derive(Debug, Serialize)]
struct StatusReport {
    base_url: String,
    healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    probe: Option<String>,
}

/// Execute the status command
pub async fn execute(args: StatusArgs) -> Result<i32> {
    let client = ApiClient::from_env();
    let quiet = args.json;

    if !quiet {
        println!("{} Checking {}", "→".cyan(), client.base_url());
    }

    let probe = run_probes(&client, quiet, args.verbose).await;

    if args.json {
        let report = StatusReport {
            base_url: client.base_url().to_string(),
            healthy: probe.is_some(),
            probe: probe.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    match probe {
        Some(_) => Ok(EXIT_SUCCESS),
        None => {
            if !quiet {
                eprintln!(
                    "{} Backend is unreachable. Check that the server is running at {}",
                    "✗".red().bold(),
                    client.base_url()
                );
            }
            Ok(EXIT_SERVICE_UNAVAILABLE)
        }
    }
}

/// Runs the probe chain and returns the endpoint that answered, if any.
async fn run_probes(client: &ApiClient, quiet: bool, verbose: bool) -> Option<String> {
    if client.health_check().await {
        if !quiet {
            println!("{} {} responded", "✓".green().bold(), "/health");
        }
        return Some("/health".to_string());
    }
    if !quiet && verbose {
        println!("{} /health did not answer, trying /test", "⚠".yellow());
    }

    if client.test_connection().await {
        if !quiet {
            println!("{} {} responded", "✓".green().bold(), "/test");
        }
        return Some("/test".to_string());
    }
    if !quiet && verbose {
        println!("{} /test did not answer, probing the chat endpoint", "⚠".yellow());
    }

    if client.health_check_with_chat().await {
        if !quiet {
            println!("{} {} responded", "✓".green().bold(), "/chat");
        }
        return Some("/chat".to_string());
    }

    None
}
