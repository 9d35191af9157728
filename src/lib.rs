#![deny(missing_docs)]
//! Homework status bot
//!
//! Polls the Practicum homework statuses API and relays review status
//! changes to a Telegram chat.

/// Practicum API client
pub mod api;
/// Telegram notification delivery
pub mod bot;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Response validation and status parsing
pub mod homework;
/// Tracing setup with secret redaction
pub mod logging;
/// Poll loop
pub mod poller;
