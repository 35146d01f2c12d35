//! Canonical timestamp form.
//!
//! Quote intervals and query instants are compared as strings. That is only sound when every
//! timestamp shares one layout, so all of them are rewritten to UTC with nanosecond
//! precision: `YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ`. Nanoseconds are chrono's full resolution, so
//! no instant is moved by the rewrite.
use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::BookError;
use crate::result::Result;

/// Parses an RFC 3339 timestamp and returns it in canonical form.
///
/// Offsets are converted to UTC; fractional digits are padded to nine.
pub fn canonicalize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map_err(|_| BookError::InvalidTimestamp(trimmed.to_string()))?;
    Ok(format_utc(&parsed.with_timezone(&Utc)))
}

/// Formats an instant in canonical form.
pub fn format_utc(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parses a canonical (or any RFC 3339) timestamp back into an instant.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| BookError::InvalidTimestamp(raw.trim().to_string()))
}
