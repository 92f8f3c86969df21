//! Utils module - Shared utilities and helpers
//!
//! Pure helpers used across layers. Nothing here performs network I/O.

/// Size and timestamp formatting
pub mod format;

/// Logger initialization for the binary
pub mod logging;

/// Retry policy shared by the client and the poller
pub mod retry;

/// Display-width aware text helpers
pub mod text;

/// Upload, form and configuration validation
pub mod validation;
