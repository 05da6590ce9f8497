//! # DeepResearch CLI Library
//!
//! This crate provides the core functionality for the DeepResearch CLI,
//! a client for a deep-research chat backend.
//!
//! ## Modules
//!
//! - [`api`] - API client for communicating with the DeepResearch backend
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration management
//! - [`errors`] - Error handling and display
//! - [`exit_codes`] - Standard exit codes

pub mod api;
pub mod commands;
pub mod config;
pub mod errors;
pub mod exit_codes;

// Re-export commonly used types
pub use api::{ApiClient, ApiError};
pub use config::ClientConfig;
