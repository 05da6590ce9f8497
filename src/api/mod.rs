//! # API Client Module
//!
//! This module provides the HTTP client for communicating with the
//! DeepResearch backend.

pub mod chat;
pub mod client;

// Re-export commonly used types for convenience
pub use chat::*;
pub use client::{ApiClient, ApiError, LogObserver, RequestObserver};
