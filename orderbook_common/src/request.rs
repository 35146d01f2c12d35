//! Request payload sent from client to server.
//!
//! A request is a single JSON object terminated by a newline. The server answers with the
//! plain-text order book (or a one-line error) and closes the connection.
use serde::{Deserialize, Serialize};

use crate::result::Result;

/// Point-in-time order book request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookRequest {
    /// Symbol whose book is requested (e.g., `AAPL`).
    pub symbol: String,
    /// ISO-8601 instant the book is evaluated at.
    pub timestamp: String,
}

impl OrderBookRequest {
    /// Creates a new request.
    pub fn new(symbol: &str, timestamp: &str) -> Self {
        OrderBookRequest {
            symbol: String::from(symbol),
            timestamp: String::from(timestamp),
        }
    }

    /// Encodes the request as one newline-terminated JSON line.
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Decodes a request from a JSON line, ignoring surrounding whitespace.
    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }
}
