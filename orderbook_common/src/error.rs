//! Error types shared between client and server.
//!
//! The `BookError` enum unifies load-time failures (I/O, malformed quote files), transport
//! failures (JSON, channels, poisoned locks) and the query-time outcomes that are reported
//! back to clients as plain text. The `Display` text of the query variants is exactly what a
//! client sees.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

use crate::side::Side;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum BookError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A row of the quotes file could not be turned into a `Quote`.
    #[error("Quotes file error at line {line}: {reason}")]
    QuotesFile {
        /// 1-based line number in the source file.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },

    /// The quotes file held no quote rows at all.
    #[error("Quotes file contains no quotes")]
    NoQuotes,

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// The requested symbol has no quotes.
    #[error("Invalid Request: \"{0}\" is not a valid symbol")]
    InvalidSymbol(String),

    /// The requested timestamp is not an ISO-8601 / RFC 3339 timestamp.
    #[error("Invalid Request: \"{0}\" is not a valid ISO-8601 timestamp")]
    InvalidTimestamp(String),

    /// No snapshot precedes the requested timestamp for this side.
    #[error("No {0} available, timestamp precedes all known quotes")]
    TooOldTimestamp(Side),

    /// The timestamp is covered by data but no quote is active at it.
    #[error("No active {0} found at this timestamp")]
    NoActiveOrders(Side),
}

impl<T> From<PoisonError<T>> for BookError {
    fn from(err: PoisonError<T>) -> Self {
        BookError::MutexLock(err.to_string())
    }
}

impl BookError {
    /// Returns `true` for outcomes that replace one side of a response rather than
    /// failing the whole request.
    pub fn is_side_outcome(&self) -> bool {
        matches!(
            self,
            BookError::TooOldTimestamp(_) | BookError::NoActiveOrders(_)
        )
    }
}
