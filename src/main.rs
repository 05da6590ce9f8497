//! # DeepResearch CLI
//!
//! DeepResearch — a research agent in your terminal
//!
//! DeepResearch sends your questions to a deep-research backend that
//! plans, searches, and writes a sourced report — and brings the answer
//! back to your shell.
//!
//! ## Usage
//!
//! ```bash
//! # Ask a research question
//! deepresearch chat "What is quantum computing?"
//!
//! # Check that the backend is reachable
//! deepresearch status
//!
//! # Inspect stored conversations
//! deepresearch history
//! ```

use clap::{Parser, Subcommand};
use deepresearch::commands;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "deepresearch")]
#[command(about = "DeepResearch — a research agent in your terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Send a research question, or start an interactive session
    Chat {
        /// Message to send; omit to start an interactive session
        #[arg(value_name = "MESSAGE")]
        message: Option<String>,
        /// Continue a specific conversation thread
        #[arg(long, short = 't', value_name = "THREAD_ID")]
        thread: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Enable verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },
    /// Check whether the research backend is reachable
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Enable verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },
    /// Fetch stored chat history from the backend
    History {
        /// Restrict history to a specific session ID
        #[arg(long, short = 's', value_name = "SESSION_ID")]
        session: Option<String>,
        /// Enable verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let exit_code = run_command(cli.command).await;
    std::process::exit(exit_code);
}

async fn run_command(command: Commands) -> i32 {
    use deepresearch::exit_codes::*;

    match command {
        Commands::Chat {
            message,
            thread,
            json,
            verbose,
        } => {
            let args = commands::chat::ChatArgs {
                message,
                thread_id: thread,
                json,
                verbose,
            };
            match commands::chat::execute(args).await {
                Ok(exit_code) => exit_code,
                Err(e) => {
                    eprintln!("Chat error: {}", e);
                    EXIT_ERROR
                }
            }
        }
        Commands::Status { json, verbose } => {
            let args = commands::status::StatusArgs { json, verbose };
            match commands::status::execute(args).await {
                Ok(exit_code) => exit_code,
                Err(e) => {
                    eprintln!("Status error: {}", e);
                    EXIT_ERROR
                }
            }
        }
        Commands::History { session, verbose } => {
            let args = commands::history::HistoryArgs {
                session_id: session,
                verbose,
            };
            match commands::history::execute(args).await {
                Ok(exit_code) => exit_code,
                Err(e) => {
                    eprintln!("History error: {}", e);
                    EXIT_ERROR
                }
            }
        }
    }
}
