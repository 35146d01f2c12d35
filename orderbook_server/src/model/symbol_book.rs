//! Everything the engine needs for one symbol.
//!
//! A `SymbolBook` owns the symbol's `QuoteIndex` and one `SnapshotCache` per side. Each cache
//! sits behind its own `Mutex`: a query holds the lock for the whole floor -> advance -> put
//! sequence, so queries for the same symbol and side are serialized while the other side and
//! other symbols proceed in parallel. The scan ledger inside the index has its own lock and
//! is only ever taken while a cache lock is held, never the other way round.

use std::sync::Mutex;

use orderbook_common::{Result, Side};

use crate::model::query_side::QuerySide;
use crate::model::quote::Quote;
use crate::model::quote_index::QuoteIndex;
use crate::model::snapshot_cache::SnapshotCache;

/// Quotes and per-side snapshot caches of one symbol.
#[derive(Debug)]
pub struct SymbolBook {
    index: QuoteIndex,
    bids: Mutex<SnapshotCache>,
    asks: Mutex<SnapshotCache>,
}

impl SymbolBook {
    /// Builds the index and seeds both caches.
    pub fn new(symbol: &str, quotes: Vec<Quote>, bids: &QuerySide, asks: &QuerySide) -> Result<Self> {
        let index = QuoteIndex::new(symbol, quotes)?;
        let horizon = index.earliest_start().to_string();
        Ok(Self {
            bids: Mutex::new(SnapshotCache::new(Side::Bid, &horizon, bids.empty_snapshot())),
            asks: Mutex::new(SnapshotCache::new(Side::Ask, &horizon, asks.empty_snapshot())),
            index,
        })
    }

    /// Symbol name.
    pub fn symbol(&self) -> &str {
        self.index.symbol()
    }

    /// The symbol's quotes and scan ledger.
    pub fn index(&self) -> &QuoteIndex {
        &self.index
    }

    /// Snapshot cache of `side`.
    pub fn cache(&self, side: Side) -> &Mutex<SnapshotCache> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }
}
