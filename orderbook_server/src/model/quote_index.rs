//! Per-symbol quote storage and scan ledger.
//!
//! `QuoteIndex` owns the symbol's quotes sorted by `start_time` and never changes them after
//! construction. Alongside it keeps the scan ledger: for every timestamp an engine has
//! resolved, the index of the first quote that starts after that timestamp. Resuming a scan
//! from the ledger avoids walking the quotes from the beginning again.
//!
//! The ledger is shared by the bid and ask caches of the symbol. The value recorded for a
//! timestamp does not depend on where the scan started, so either side may write it first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::TimeDelta;
use orderbook_common::{BookError, Result, timestamp};

use crate::model::quote::Quote;
use crate::model::snapshot_cache::CacheKey;

/// Sorted quotes of one symbol plus the scan ledger.
#[derive(Debug)]
pub struct QuoteIndex {
    symbol: String,
    quotes: Vec<Arc<Quote>>,
    latest_end: String,
    /// Longest `end - start` of any quote; `None` if some timestamp does not parse.
    max_lifetime: Option<TimeDelta>,
    scan_progress: Mutex<HashMap<String, usize>>,
}

impl QuoteIndex {
    /// Builds the index. `quotes` must be non-empty and sorted by `start_time`.
    pub fn new(symbol: &str, quotes: Vec<Quote>) -> Result<Self> {
        if quotes.is_empty() {
            return Err(BookError::NoQuotes);
        }
        if let Some(pos) = quotes
            .windows(2)
            .position(|pair| pair[0].start_time > pair[1].start_time)
        {
            return Err(BookError::Format(format!(
                "quotes for {} are not sorted by start time at position {}",
                symbol,
                pos + 1
            )));
        }
        let latest_end = quotes
            .iter()
            .map(|q| q.end_time.as_str())
            .max()
            .unwrap_or_default()
            .to_string();
        let max_lifetime = max_lifetime(&quotes);

        Ok(Self {
            symbol: symbol.to_string(),
            quotes: quotes.into_iter().map(Arc::new).collect(),
            latest_end,
            max_lifetime,
            scan_progress: Mutex::new(HashMap::new()),
        })
    }

    /// Index of the first quote that can still be active at `timestamp`.
    ///
    /// Every quote starting at or before `timestamp - max_lifetime` has ended by `timestamp`.
    /// Falls back to 0 when lifetimes are unknown.
    pub fn earliest_candidate(&self, at: &str) -> usize {
        let Some(lifetime) = self.max_lifetime else {
            return 0;
        };
        let Ok(instant) = timestamp::parse_utc(at) else {
            return 0;
        };
        let Some(cutoff) = instant.checked_sub_signed(lifetime) else {
            return 0;
        };
        let cutoff = timestamp::format_utc(&cutoff);
        self.quotes.partition_point(|q| q.start_time <= cutoff)
    }

    /// Symbol the quotes belong to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Read-only view of the quotes starting at `index`. Past-the-end yields an empty slice.
    pub fn quotes_from(&self, index: usize) -> &[Arc<Quote>] {
        &self.quotes[index.min(self.quotes.len())..]
    }

    /// Number of quotes.
    pub(crate) fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Start time of the earliest quote.
    pub fn earliest_start(&self) -> &str {
        self.quotes
            .first()
            .map(|q| q.start_time.as_str())
            .unwrap_or_default()
    }

    /// Latest end time across all quotes.
    pub fn latest_end(&self) -> &str {
        &self.latest_end
    }

    /// Records how far a scan for `timestamp` advanced. An existing record is kept.
    pub fn record_scan_progress(&self, timestamp: &str, index: usize) -> Result<()> {
        let mut ledger = self.scan_progress.lock()?;
        ledger.entry(timestamp.to_string()).or_insert(index);
        Ok(())
    }

    /// Scan position to resume from for a cache key. The seed entry always resumes at 0.
    pub fn scan_progress(&self, key: &CacheKey) -> Result<usize> {
        match key {
            CacheKey::Seed => Ok(0),
            CacheKey::At(timestamp) => {
                let ledger = self.scan_progress.lock()?;
                ledger.get(timestamp).copied().ok_or_else(|| {
                    BookError::Format(format!(
                        "no scan progress recorded for {}@{}",
                        self.symbol, timestamp
                    ))
                })
            }
        }
    }

    /// Number of timestamps in the scan ledger.
    pub fn ledger_len(&self) -> Result<usize> {
        Ok(self.scan_progress.lock()?.len())
    }
}

fn max_lifetime(quotes: &[Quote]) -> Option<TimeDelta> {
    let mut longest = TimeDelta::zero();
    for q in quotes {
        let start = timestamp::parse_utc(&q.start_time).ok()?;
        let end = timestamp::parse_utc(&q.end_time).ok()?;
        longest = longest.max(end - start);
    }
    Some(longest)
}
