//! Time-indexed snapshot cache for one side of one symbol.
//!
//! Every resolved query timestamp leaves a `Snapshot` behind. A later query looks up the
//! closest earlier snapshot (the *floor*) and only has to expire what ended since then and
//! scan the quotes that started since then.
//!
//! The cache is seeded with a `CacheKey::Seed` entry that orders before every timestamp and
//! holds an empty snapshot, so any timestamp at or after the symbol's first quote has a floor.
//! Timestamps before the first quote (the *horizon*) have none.
//!
//! Entries are never replaced or evicted; the number of entries grows with the number of
//! distinct timestamps queried.

use std::collections::BTreeMap;

use log::debug;
use orderbook_common::Side;

use crate::model::snapshot::Snapshot;

/// Key of a cache entry. `Seed` sorts before every `At`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheKey {
    /// Sentinel entry present from construction.
    Seed,
    /// Snapshot resolved at a canonical timestamp.
    At(String),
}

impl CacheKey {
    /// Key for a canonical timestamp.
    pub fn at(timestamp: &str) -> Self {
        CacheKey::At(timestamp.to_string())
    }
}

/// Ordered `timestamp -> Snapshot` map with floor lookup.
#[derive(Debug)]
pub struct SnapshotCache {
    side: Side,
    horizon: String,
    entries: BTreeMap<CacheKey, Snapshot>,
}

impl SnapshotCache {
    /// Creates a seeded cache.
    ///
    /// - horizon: start time of the symbol's earliest quote.
    /// - empty: the empty snapshot stored under the seed key; it fixes capacity and ranking.
    pub fn new(side: Side, horizon: &str, empty: Snapshot) -> Self {
        let mut cache = Self {
            side,
            horizon: horizon.to_string(),
            entries: BTreeMap::new(),
        };
        cache.seed(empty);
        cache
    }

    /// Inserts the sentinel entry unless it is already present.
    pub fn seed(&mut self, empty: Snapshot) {
        self.entries.entry(CacheKey::Seed).or_insert(empty);
    }

    /// Exact-match lookup.
    pub fn get(&self, timestamp: &str) -> Option<&Snapshot> {
        self.entries.get(&CacheKey::at(timestamp))
    }

    /// Greatest entry whose key is not after `timestamp`.
    ///
    /// Returns `None` when `timestamp` precedes all known quotes.
    pub fn floor(&self, timestamp: &str) -> Option<(&CacheKey, &Snapshot)> {
        if timestamp < self.horizon.as_str() {
            return None;
        }
        self.entries.range(..=CacheKey::at(timestamp)).next_back()
    }

    /// Stores a snapshot for `timestamp`. An existing entry wins; returns whether it was stored.
    pub fn put(&mut self, timestamp: &str, snapshot: Snapshot) -> bool {
        let key = CacheKey::at(timestamp);
        if self.entries.contains_key(&key) {
            debug!("{} cache already holds {}, keeping it", self.side, timestamp);
            return false;
        }
        self.entries.insert(key, snapshot);
        true
    }

    /// Number of entries, seed included.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
