//! Incremental top-N resolution.
//!
//! `TopOrdersEngine` answers "which N quotes of this side are best at `timestamp`" for a
//! `SymbolBook`, reusing the book's snapshot cache:
//!
//! 1. An exact cache hit is returned as is.
//! 2. Otherwise the floor snapshot (closest earlier timestamp) is copied, quotes that ended by
//!    `timestamp` are expired, and the quotes that started since the floor's scan position are
//!    admitted if they are still live.
//! 3. The result is stored under `timestamp` and its scan position recorded in the ledger.
//!
//! A floor snapshot drops quotes that did not make its top N. If it was full and one of its
//! quotes expires, a dropped quote may belong in the new top N, so in that case the engine
//! rebuilds from the first quote that can still be live instead of resuming.

use std::sync::Arc;

use log::{debug, info};
use orderbook_common::{BookError, Result, Side};

use crate::model::query_side::QuerySide;
use crate::model::quote::Quote;
use crate::model::snapshot_cache::CacheKey;
use crate::model::symbol_book::SymbolBook;

/// How a query was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Served from the snapshot stored under the exact timestamp.
    CacheHit,
    /// Derived from a floor snapshot.
    Scanned {
        /// Index the scan started at.
        from: usize,
        /// Index one past the last quote starting at or before the timestamp.
        to: usize,
        /// Quotes of the floor snapshot that had ended.
        expired: usize,
        /// Whether the floor snapshot was discarded and rebuilt.
        rebuilt: bool,
    },
}

/// Top-N resolver for one side.
#[derive(Debug, Clone, Copy)]
pub struct TopOrdersEngine {
    side: QuerySide,
}

impl TopOrdersEngine {
    /// Engine configured by `side`.
    pub fn new(side: QuerySide) -> Self {
        Self { side }
    }

    /// Side configuration.
    pub fn side(&self) -> &QuerySide {
        &self.side
    }

    /// Best-first active quotes at `timestamp` (canonical form).
    ///
    /// Fails with `TooOldTimestamp` before the symbol's first quote and with
    /// `NoActiveOrders` when nothing is live.
    pub fn query(&self, book: &SymbolBook, timestamp: &str) -> Result<Vec<Arc<Quote>>> {
        self.resolve(book, timestamp).map(|(quotes, _)| quotes)
    }

    /// Like `query`, also reporting how the answer was obtained.
    pub fn resolve(
        &self,
        book: &SymbolBook,
        timestamp: &str,
    ) -> Result<(Vec<Arc<Quote>>, Resolution)> {
        let side = self.side.side;
        let symbol = book.symbol();
        info!(
            "Processing top {} for symbol: {} at timestamp: {}",
            side, symbol, timestamp
        );

        let mut cache = book.cache(side).lock()?;
        if let Some(cached) = cache.get(timestamp) {
            debug!("{}@{}: {} found in cache", symbol, timestamp, side);
            let ranked = self.non_empty(cached.ranked(), symbol, timestamp)?;
            return Ok((ranked, Resolution::CacheHit));
        }

        let Some((floor_key, floor)) = cache.floor(timestamp) else {
            let err = BookError::TooOldTimestamp(side);
            info!("{}@{}: {}", symbol, timestamp, err);
            return Err(err);
        };
        let index = book.index();
        let resumed_at = index.scan_progress(floor_key)?;
        let mut snapshot = floor.clone();
        debug!(
            "{}@{}: {} floor {:?} holds {} quotes, resuming at index {}",
            symbol,
            timestamp,
            side,
            floor_key,
            snapshot.len(),
            resumed_at
        );

        let was_full = snapshot.len() == snapshot.capacity();
        let expired = snapshot.expire(timestamp);
        let to = resumed_at
            + index
                .quotes_from(resumed_at)
                .iter()
                .take_while(|q| q.start_time.as_str() <= timestamp)
                .count();

        let rebuilt = was_full && expired > 0;
        let from = if rebuilt {
            snapshot = self.side.empty_snapshot();
            let from = index.earliest_candidate(timestamp).min(to);
            debug!(
                "{}@{}: {} expired from a full {} snapshot, rebuilding from index {}",
                symbol, timestamp, expired, side, from
            );
            from
        } else {
            resumed_at
        };

        for (offset, quote) in index.quotes_from(from)[..to - from].iter().enumerate() {
            if quote.has_not_ended(timestamp) {
                snapshot.admit(from + offset, Arc::clone(quote));
            }
        }
        index.record_scan_progress(timestamp, to)?;

        let ranked = snapshot.ranked();
        cache.put(timestamp, snapshot);
        debug!(
            "{} {} cache holds {} snapshots, scan ledger {} timestamps",
            symbol,
            side,
            cache.len(),
            index.ledger_len()?
        );

        let ranked = self.non_empty(ranked, symbol, timestamp)?;
        Ok((
            ranked,
            Resolution::Scanned {
                from,
                to,
                expired,
                rebuilt,
            },
        ))
    }

    fn non_empty(
        &self,
        ranked: Vec<Arc<Quote>>,
        symbol: &str,
        timestamp: &str,
    ) -> Result<Vec<Arc<Quote>>> {
        if ranked.is_empty() {
            let err = BookError::NoActiveOrders(self.side.side);
            info!("{}@{}: {}", symbol, timestamp, err);
            return Err(err);
        }
        Ok(ranked)
    }
}

/// Engines for both sides sharing one capacity.
pub fn engines(capacity: usize) -> [TopOrdersEngine; 2] {
    Side::ALL.map(|side| TopOrdersEngine::new(QuerySide::new(side, capacity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::fixtures::quote;

    const T0: &str = "2021-02-18T10:10:10.000000000Z";

    fn ts(millis: u32) -> String {
        format!(
            "2021-02-18T10:10:{:02}.{:03}000000Z",
            10 + millis / 1000,
            millis % 1000
        )
    }

    fn q(start: u32, end: u32, price: f64, qty: i64) -> Quote {
        quote(&ts(start), &ts(end), price, qty)
    }

    fn book(quotes: Vec<Quote>, capacity: usize) -> (SymbolBook, TopOrdersEngine, TopOrdersEngine) {
        let [bids, asks] = engines(capacity);
        let book = SymbolBook::new("TEST", quotes, bids.side(), asks.side()).unwrap();
        (book, bids, asks)
    }

    fn quantities(quotes: &[Arc<Quote>]) -> Vec<i64> {
        quotes.iter().map(|q| q.bid_quantity).collect()
    }

    #[test]
    fn fake_scenario_returns_both_bids() {
        let mut first = q(0, 100, 0.0, 0);
        first.bid_price = 128.28;
        first.bid_quantity = 300;
        let mut second = q(1, 90, 0.0, 0);
        second.bid_price = 128.27;
        second.bid_quantity = 100;
        let (book, bids, _) = book(vec![first, second], 5);

        let top = bids.query(&book, &ts(50)).unwrap();
        let rendered = crate::formatter::format("Best Bids", &top, bids.side().render);
        assert_eq!(rendered, "Best Bids: 128.28 (300); 128.27 (100)");
    }

    #[test]
    fn orders_bids_and_asks_with_time_tie_break() {
        let quotes = vec![
            q(0, 900, 10.0, 1),
            q(1, 900, 12.0, 2),
            q(2, 900, 10.0, 3),
            q(3, 900, 11.0, 4),
        ];
        let (book, bids, asks) = book(quotes, 5);
        assert_eq!(quantities(&bids.query(&book, &ts(10)).unwrap()), vec![2, 4, 1, 3]);
        assert_eq!(quantities(&asks.query(&book, &ts(10)).unwrap()), vec![1, 3, 4, 2]);
    }

    #[test]
    fn boundaries_are_half_open() {
        let quotes = vec![q(0, 10, 1.0, 1), q(10, 20, 2.0, 2)];
        let (book, bids, _) = book(quotes, 5);
        assert_eq!(quantities(&bids.query(&book, &ts(10)).unwrap()), vec![2]);
        assert_eq!(quantities(&bids.query(&book, &ts(9)).unwrap()), vec![1]);
        assert!(matches!(
            bids.query(&book, &ts(20)),
            Err(BookError::NoActiveOrders(Side::Bid))
        ));
    }

    #[test]
    fn sub_millisecond_intervals_are_honoured() {
        let canonical = |raw: &str| orderbook_common::timestamp::canonicalize(raw).unwrap();
        let inside = quote(
            &canonical("2021-02-18T10:10:10.0005Z"),
            &canonical("2021-02-18T10:10:10.0015Z"),
            7.0,
            1,
        );
        let (book, bids, asks) = book(vec![inside], 5);

        let at = canonical("2021-02-18T10:10:10.0012Z");
        assert_eq!(quantities(&bids.query(&book, &at).unwrap()), vec![1]);
        assert_eq!(asks.query(&book, &at).unwrap().len(), 1);
        assert!(matches!(
            bids.query(&book, &canonical("2021-02-18T10:10:10.0015Z")),
            Err(BookError::NoActiveOrders(Side::Bid))
        ));
        assert!(matches!(
            bids.query(&book, &canonical("2021-02-18T10:10:10.0004Z")),
            Err(BookError::TooOldTimestamp(Side::Bid))
        ));
    }

    #[test]
    fn before_first_quote_is_too_old_for_both_sides() {
        let (book, bids, asks) = book(vec![q(5, 10, 1.0, 1)], 5);
        assert!(matches!(
            bids.query(&book, T0),
            Err(BookError::TooOldTimestamp(Side::Bid))
        ));
        assert!(matches!(
            asks.query(&book, T0),
            Err(BookError::TooOldTimestamp(Side::Ask))
        ));
        assert_eq!(book.cache(Side::Bid).lock().unwrap().len(), 1);
    }

    #[test]
    fn repeated_query_is_a_cache_hit() {
        let (book, bids, _) = book(vec![q(0, 100, 1.0, 1), q(5, 100, 2.0, 2)], 5);
        let (first, how) = bids.resolve(&book, &ts(50)).unwrap();
        assert!(matches!(how, Resolution::Scanned { from: 0, to: 2, .. }));
        let (second, how) = bids.resolve(&book, &ts(50)).unwrap();
        assert_eq!(how, Resolution::CacheHit);
        assert_eq!(quantities(&first), quantities(&second));
    }

    #[test]
    fn later_query_resumes_from_floor() {
        let quotes = vec![q(0, 500, 1.0, 1), q(10, 500, 2.0, 2), q(20, 500, 3.0, 3)];
        let (book, bids, _) = book(quotes, 5);
        bids.query(&book, &ts(10)).unwrap();
        let (top, how) = bids.resolve(&book, &ts(30)).unwrap();
        assert_eq!(
            how,
            Resolution::Scanned {
                from: 2,
                to: 3,
                expired: 0,
                rebuilt: false
            }
        );
        assert_eq!(quantities(&top), vec![3, 2, 1]);
    }

    #[test]
    fn expired_quotes_are_dropped_when_moving_forward() {
        let quotes = vec![q(0, 15, 5.0, 1), q(1, 100, 1.0, 2)];
        let (book, bids, _) = book(quotes, 5);
        assert_eq!(quantities(&bids.query(&book, &ts(10)).unwrap()), vec![1, 2]);
        let (top, how) = bids.resolve(&book, &ts(20)).unwrap();
        assert!(matches!(how, Resolution::Scanned { expired: 1, rebuilt: false, .. }));
        assert_eq!(quantities(&top), vec![2]);
    }

    #[test]
    fn evicted_quote_resurfaces_after_a_better_one_expires() {
        let quotes = vec![q(0, 15, 9.0, 1), q(1, 100, 5.0, 2), q(2, 100, 1.0, 3)];
        let (book, bids, _) = book(quotes, 2);
        assert_eq!(quantities(&bids.query(&book, &ts(10)).unwrap()), vec![1, 2]);

        let (top, how) = bids.resolve(&book, &ts(20)).unwrap();
        assert!(matches!(how, Resolution::Scanned { rebuilt: true, .. }));
        assert_eq!(quantities(&top), vec![2, 3]);
    }

    #[test]
    fn capacity_bounds_the_result() {
        let quotes = (0..10).map(|i| q(i, 1000, i as f64, i as i64)).collect();
        let (book, bids, asks) = book(quotes, 3);
        assert_eq!(quantities(&bids.query(&book, &ts(500)).unwrap()), vec![9, 8, 7]);
        assert_eq!(quantities(&asks.query(&book, &ts(500)).unwrap()), vec![0, 1, 2]);
    }

    #[test]
    fn empty_results_are_cached_too() {
        let (book, bids, _) = book(vec![q(0, 10, 1.0, 1), q(50, 60, 1.0, 2)], 5);
        assert!(bids.query(&book, &ts(20)).is_err());
        assert!(book.cache(Side::Bid).lock().unwrap().get(&ts(20)).is_some());
        assert!(matches!(
            bids.query(&book, &ts(20)),
            Err(BookError::NoActiveOrders(Side::Bid))
        ));
        assert_eq!(quantities(&bids.query(&book, &ts(55)).unwrap()), vec![2]);
    }

    #[test]
    fn out_of_order_queries_use_the_seed_or_closest_floor() {
        let quotes = vec![q(0, 100, 1.0, 1), q(40, 100, 2.0, 2), q(80, 100, 3.0, 3)];
        let (book, bids, _) = book(quotes, 5);
        assert_eq!(quantities(&bids.query(&book, &ts(90)).unwrap()), vec![3, 2, 1]);
        let (top, how) = bids.resolve(&book, &ts(50)).unwrap();
        assert!(matches!(how, Resolution::Scanned { from: 0, to: 2, .. }));
        assert_eq!(quantities(&top), vec![2, 1]);
    }
}
