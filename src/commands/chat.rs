//! # Chat Command
//!
//! Send a research question to the DeepResearch backend, or hold a whole
//! conversation. With a message argument the command performs a single
//! exchange and exits; without one it drops into an interactive session
//! that keeps the conversation thread across turns.
//!
//! ## Usage
//!
//! ```bash
//! # One-shot research question
//! deepresearch chat "What is quantum computing?"
//!
//! # Continue an existing conversation thread
//! deepresearch chat -t abc123 "Focus on hardware, please"
//!
//! # Machine-readable output
//! deepresearch chat --json "What is quantum computing?"
//!
//! # Interactive session
//! deepresearch chat
//! ```

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use termimad::MadSkin;

use crate::api::chat::{ChatReply, RequestOptions};
use crate::api::ApiClient;
use crate::errors::handle_api_error;
use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS};

/// Maximum width for rendered markdown output
const MARKDOWN_MAX_WIDTH: usize = 80;

/// Arguments for the chat command
pub struct ChatArgs {
    /// Message to send; `None` starts an interactive session
    pub message: Option<String>,
    /// Conversation thread to continue
    pub thread_id: Option<String>,
    /// Print the reply as JSON instead of rendered text
    pub json: bool,
    /// Enable verbose output
    pub verbose: bool,
}

/// Execute the chat command
pub async fn execute(args: ChatArgs) -> Result<i32> {
    let mut client = ApiClient::from_env();

    if args.verbose {
        eprintln!("{} Backend: {}", "→".cyan(), client.base_url());
    }

    match args.message {
        Some(message) => {
            run_single(
                &mut client,
                &message,
                args.thread_id.as_deref(),
                args.json,
                args.verbose,
            )
            .await
        }
        None => run_interactive(&mut client, args.thread_id.as_deref(), args.verbose).await,
    }
}

/// Performs one research exchange and prints the reply.
async fn run_single(
    client: &mut ApiClient,
    message: &str,
    thread_id: Option<&str>,
    json: bool,
    verbose: bool,
) -> Result<i32> {
    let options = RequestOptions {
        thread_id: thread_id.map(str::to_string),
        session_id: None,
    };

    let started = Instant::now();
    let spinner = research_spinner();
    let reply = match client.send_message(message, &options).await {
        Ok(reply) => {
            spinner.finish_and_clear();
            reply
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Ok(handle_api_error(e));
        }
    };

    if verbose {
        eprintln!(
            "{} Research completed in {:.1}s",
            "✓".green().bold(),
            started.elapsed().as_secs_f64()
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(EXIT_SUCCESS);
    }

    print_reply(&reply, true);
    Ok(EXIT_SUCCESS)
}

/// Runs the interactive session loop.
///
/// The conversation thread carries across turns automatically. Directives:
/// `/new` resets the conversation, `/thread` shows the current thread id,
/// `/quit` or `/exit` leaves the session (as does EOF).
async fn run_interactive(
    client: &mut ApiClient,
    thread_id: Option<&str>,
    verbose: bool,
) -> Result<i32> {
    if let Some(thread_id) = thread_id {
        if let Err(e) = client.set_thread_id(thread_id) {
            return Ok(handle_api_error(e));
        }
    }

    println!("{}", "DeepResearch interactive session".bold());
    println!(
        "{}",
        "Ask anything. /new starts a fresh conversation, /thread shows the current thread, \
         /quit exits."
            .dimmed()
    );
    println!();

    loop {
        eprint!("{} ", "you>".green().bold());
        io::stderr().flush().ok();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{} Failed to read input: {}", "✗".red().bold(), e);
                return Ok(EXIT_ERROR);
            }
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" | "/exit" => break,
            "/new" => {
                let ack = client.clear_chat_session();
                println!("{} {}", "✓".green(), ack.message);
                continue;
            }
            "/thread" => {
                match client.current_thread_id() {
                    Some(id) => println!("{} Current thread: {}", "→".cyan(), id),
                    None => println!("{} No active thread yet", "→".cyan()),
                }
                continue;
            }
            _ => {}
        }

        let started = Instant::now();
        let spinner = research_spinner();
        match client.send_message(line, &RequestOptions::default()).await {
            Ok(reply) => {
                spinner.finish_and_clear();
                if verbose {
                    eprintln!(
                        "{} Research completed in {:.1}s",
                        "✓".green().bold(),
                        started.elapsed().as_secs_f64()
                    );
                }
                println!();
                print_reply(&reply, false);
                println!();
            }
            Err(e) => {
                spinner.finish_and_clear();
                eprintln!("{} {}", "✗".red().bold(), e);
            }
        }
    }

    Ok(EXIT_SUCCESS)
}

/// Prints a reply: the report rendered as markdown when present, the plain
/// response text otherwise, plus the thread hint for one-shot exchanges.
fn print_reply(reply: &ChatReply, show_thread: bool) {
    if reply.is_followup {
        println!(
            "{} {}",
            "?".yellow().bold(),
            "The agent needs a clarification before researching:".bold()
        );
        println!();
    }

    match report_markdown(reply) {
        Some(report) => render_markdown(&report),
        None => println!("{}", reply.response),
    }

    if !show_thread {
        return;
    }

    if let Some(thread_id) = reply.thread_id.as_deref() {
        println!();
        println!("{} {} {}", "→".cyan(), "Thread:".dimmed(), thread_id.dimmed());
        if reply.is_followup {
            println!(
                "  {}",
                format!(
                    "Answer with `deepresearch chat -t {} \"...\"` to continue.",
                    thread_id
                )
                .dimmed()
            );
        }
    }
}

/// Extracts the report as markdown text, if the reply carries one.
///
/// The backend sends the report as a markdown string; anything else is
/// pretty-printed JSON so unexpected shapes still render readably.
fn report_markdown(reply: &ChatReply) -> Option<String> {
    match reply.report.as_ref()? {
        serde_json::Value::String(text) => Some(text.clone()),
        other => serde_json::to_string_pretty(other).ok(),
    }
}

/// Creates the spinner shown while research is in flight.
fn research_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Researching... deep runs can take several minutes");
    spinner
}

/// Creates a markdown skin for terminal rendering
fn create_markdown_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.set_headers_fg(termimad::crossterm::style::Color::Cyan);
    skin.bold.set_fg(termimad::crossterm::style::Color::White);
    skin.italic.set_fg(termimad::crossterm::style::Color::Yellow);
    skin.code_block
        .set_fg(termimad::crossterm::style::Color::Green);
    skin
}

/// Renders markdown text to the terminal
fn render_markdown(text: &str) {
    let skin = create_markdown_skin();
    let fmt_text = termimad::FmtText::from(&skin, text, Some(MARKDOWN_MAX_WIDTH));
    print!("{}", fmt_text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply_with_report(report: Option<serde_json::Value>) -> ChatReply {
        ChatReply {
            response: "display text".to_string(),
            thread_id: None,
            is_followup: false,
            report,
        }
    }

    #[test]
    fn test_report_markdown_returns_string_report_verbatim() {
        let reply = reply_with_report(Some(json!("## Report\n\nFindings.")));
        assert_eq!(
            report_markdown(&reply).as_deref(),
            Some("## Report\n\nFindings.")
        );
    }

    #[test]
    fn test_report_markdown_pretty_prints_structured_reports() {
        let reply = reply_with_report(Some(json!({"sections": ["intro", "findings"]})));
        let rendered = report_markdown(&reply).unwrap();
        assert!(rendered.contains("\"sections\""));
        assert!(rendered.contains("intro"));
    }

    #[test]
    fn test_report_markdown_is_none_without_report() {
        let reply = reply_with_report(None);
        assert!(report_markdown(&reply).is_none());
    }
}
