//! # CLI Commands Module
//!
//! Implementations for all CLI subcommands. Each command takes a typed
//! argument struct and returns the process exit code it wants.

pub mod chat;
pub mod history;
pub mod status;
