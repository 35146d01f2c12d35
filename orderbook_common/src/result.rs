//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `BookError`, so functions can simply return `Result<T>`.
use crate::error::BookError;

/// Workspace-wide `Result` alias with `BookError` as the default error.
pub type Result<T, E = BookError> = std::result::Result<T, E>;
