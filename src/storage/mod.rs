//! Storage layer
//!
//! TOML configuration with named profiles, plus the JSON-backed session
//! store that remembers the current project between invocations.

use crate::error::StorageError;

pub mod config;
pub mod session;

type Result<T> = std::result::Result<T, StorageError>;
