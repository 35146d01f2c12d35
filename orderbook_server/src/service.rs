//! Request handling on top of the engines.
//!
//! `OrderBookService` owns one `SymbolBook` per loaded symbol and the bid/ask engines. It
//! validates a request, resolves both sides and renders the two-line response. A side that
//! is too old or has nothing active is rendered as its message; any other failure replaces
//! the whole response with a single line.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::{TimeDelta, Timelike};
use log::{debug, error, info, warn};
use orderbook_common::{BookError, OrderBookRequest, Result, Side, timestamp};

use crate::engine::{TopOrdersEngine, engines};
use crate::formatter;
use crate::model::quote::Quote;
use crate::model::symbol_book::SymbolBook;

/// Loaded symbols and the engines answering queries against them.
#[derive(Debug)]
pub struct OrderBookService {
    books: HashMap<String, SymbolBook>,
    engines: [TopOrdersEngine; 2],
}

impl OrderBookService {
    /// Builds a book per symbol. `capacity` is the number of quotes returned per side.
    pub fn new(quotes_by_symbol: BTreeMap<String, Vec<Quote>>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(BookError::Format(
                "top orders limit must be at least 1".to_string(),
            ));
        }
        let engines = engines(capacity);
        let [bids, asks] = &engines;
        let mut books = HashMap::with_capacity(quotes_by_symbol.len());
        for (symbol, quotes) in quotes_by_symbol {
            let book = SymbolBook::new(&symbol, quotes, bids.side(), asks.side())?;
            debug!(
                "Built book for {}: {} quotes from {} to {}",
                symbol,
                book.index().len(),
                book.index().earliest_start(),
                book.index().latest_end()
            );
            books.insert(symbol, book);
        }
        info!("Symbol map size: {}", books.len());
        Ok(Self { books, engines })
    }

    /// Loaded symbol names, unordered.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    /// Book of `symbol`, or `InvalidSymbol`.
    pub fn validate_symbol(&self, symbol: &str) -> Result<&SymbolBook> {
        self.books.get(symbol).ok_or_else(|| {
            let err = BookError::InvalidSymbol(symbol.to_string());
            error!("{}", err);
            err
        })
    }

    /// Best-first quotes of one side; `raw_timestamp` may be any RFC 3339 form.
    pub fn top_orders(
        &self,
        symbol: &str,
        side: Side,
        raw_timestamp: &str,
    ) -> Result<Vec<Arc<Quote>>> {
        let book = self.validate_symbol(symbol)?;
        let timestamp = timestamp::canonicalize(raw_timestamp)?;
        self.engine(side).query(book, &timestamp)
    }

    /// Full text response for a request. Never fails; errors become their message.
    pub fn respond(&self, request: &OrderBookRequest) -> String {
        let started = Instant::now();
        let response = match self.render(request) {
            Ok(text) => text,
            Err(e) => {
                error!(
                    "Request {}@{} failed: {}",
                    request.symbol, request.timestamp, e
                );
                e.to_string()
            }
        };
        info!("Execution Time: {} ms", started.elapsed().as_millis());
        debug!("Result: {}", response);
        response
    }

    /// Resolves both sides at every whole second spanned by each symbol's quotes.
    ///
    /// Returns the number of timestamps resolved.
    pub fn prewarm(&self) -> Result<usize> {
        let mut resolved = 0;
        for book in self.books.values() {
            let index = book.index();
            let Some(seconds) = second_boundaries(index.earliest_start(), index.latest_end())
            else {
                warn!("Skipping prewarm for {}: unparsable bounds", book.symbol());
                continue;
            };
            for at in &seconds {
                for engine in &self.engines {
                    match engine.query(book, at) {
                        Ok(_) => {}
                        Err(e) if e.is_side_outcome() => {}
                        Err(e) => return Err(e),
                    }
                }
            }
            info!("Prewarmed {} at {} timestamps", book.symbol(), seconds.len());
            resolved += seconds.len();
        }
        Ok(resolved)
    }

    fn render(&self, request: &OrderBookRequest) -> Result<String> {
        let book = self.validate_symbol(&request.symbol)?;
        let timestamp = timestamp::canonicalize(&request.timestamp)?;
        let lines = self
            .engines
            .iter()
            .map(|engine| render_side(engine, book, &timestamp))
            .collect::<Result<Vec<String>>>()?;
        Ok(lines.join("\n"))
    }

    fn engine(&self, side: Side) -> &TopOrdersEngine {
        match side {
            Side::Bid => &self.engines[0],
            Side::Ask => &self.engines[1],
        }
    }
}

fn render_side(engine: &TopOrdersEngine, book: &SymbolBook, timestamp: &str) -> Result<String> {
    let side = engine.side();
    match engine.query(book, timestamp) {
        Ok(quotes) => Ok(formatter::format(side.label, &quotes, side.render)),
        Err(e) if e.is_side_outcome() => Ok(formatter::format_message(side.label, &e.to_string())),
        Err(e) => Err(e),
    }
}

/// Canonical `…:SS.000000000Z` instants from the first whole second at or after `first`
/// up to, but excluding, `last`.
fn second_boundaries(first: &str, last: &str) -> Option<Vec<String>> {
    let start = timestamp::parse_utc(first).ok()?;
    let end = timestamp::parse_utc(last).ok()?;
    let mut at = start.with_nanosecond(0)?;
    if at < start {
        at += TimeDelta::seconds(1);
    }
    let mut seconds = Vec::new();
    while at < end {
        seconds.push(timestamp::format_utc(&at));
        at += TimeDelta::seconds(1);
    }
    Some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::fixtures::quote;

    fn fake(start: &str, end: &str, bid: f64, bid_qty: i64, ask: f64, ask_qty: i64) -> Quote {
        let mut q = quote(
            &timestamp::canonicalize(start).unwrap(),
            &timestamp::canonicalize(end).unwrap(),
            0.0,
            0,
        );
        q.symbol = "FAKE".to_string();
        q.bid_price = bid;
        q.bid_quantity = bid_qty;
        q.ask_price = ask;
        q.ask_quantity = ask_qty;
        q
    }

    fn service() -> OrderBookService {
        let quotes = vec![
            fake("2021-02-18T10:10:10.000Z", "2021-02-18T10:10:10.100Z", 128.28, 300, 128.31, 100),
            fake("2021-02-18T10:10:10.001Z", "2021-02-18T10:10:10.090Z", 128.27, 100, 128.30, 200),
            fake("2021-02-18T10:10:12.000Z", "2021-02-18T10:10:14.000Z", 128.10, 50, 128.50, 70),
        ];
        let mut by_symbol = BTreeMap::new();
        by_symbol.insert("FAKE".to_string(), quotes);
        OrderBookService::new(by_symbol, 5).unwrap()
    }

    #[test]
    fn renders_both_sides() {
        let response = service().respond(&OrderBookRequest::new("FAKE", "2021-02-18T10:10:10.050Z"));
        assert_eq!(
            response,
            "Best Bids: 128.28 (300); 128.27 (100)\nBest Asks: 128.30 (200); 128.31 (100)"
        );
    }

    #[test]
    fn unknown_symbol_is_a_single_line() {
        let service = service();
        let response = service.respond(&OrderBookRequest::new("ZZZZ", "2021-02-18T10:10:10.050Z"));
        assert_eq!(response, "Invalid Request: \"ZZZZ\" is not a valid symbol");
        let book = service.validate_symbol("FAKE").unwrap();
        assert_eq!(book.cache(Side::Bid).lock().unwrap().len(), 1);
    }

    #[test]
    fn invalid_timestamp_is_a_single_line() {
        let response = service().respond(&OrderBookRequest::new("FAKE", "noon"));
        assert_eq!(response, "Invalid Request: \"noon\" is not a valid ISO-8601 timestamp");
    }

    #[test]
    fn too_old_applies_to_both_sides() {
        let response = service().respond(&OrderBookRequest::new("FAKE", "2021-02-18T10:10:09.999Z"));
        assert_eq!(
            response,
            "Best Bids: No bids available, timestamp precedes all known quotes\n\
             Best Asks: No asks available, timestamp precedes all known quotes"
        );
    }

    #[test]
    fn gaps_report_no_active_orders() {
        let response = service().respond(&OrderBookRequest::new("FAKE", "2021-02-18T10:10:11Z"));
        assert_eq!(
            response,
            "Best Bids: No active bids found at this timestamp\n\
             Best Asks: No active asks found at this timestamp"
        );
    }

    #[test]
    fn request_timestamps_are_canonicalized() {
        let service = service();
        let a = service.top_orders("FAKE", Side::Bid, "2021-02-18T12:10:10.05+02:00").unwrap();
        let b = service.top_orders("FAKE", Side::Bid, "2021-02-18T10:10:10.050Z").unwrap();
        assert_eq!(a, b);
        let book = service.validate_symbol("FAKE").unwrap();
        assert_eq!(book.cache(Side::Bid).lock().unwrap().len(), 2);
    }

    #[test]
    fn sub_millisecond_quotes_answer_requests_inside_them() {
        let quotes = vec![fake(
            "2021-02-18T10:10:10.0005Z",
            "2021-02-18T10:10:10.0015Z",
            128.28,
            300,
            128.31,
            100,
        )];
        let mut by_symbol = BTreeMap::new();
        by_symbol.insert("FAKE".to_string(), quotes);
        let service = OrderBookService::new(by_symbol, 5).unwrap();

        let response = service.respond(&OrderBookRequest::new("FAKE", "2021-02-18T10:10:10.0012Z"));
        assert_eq!(response, "Best Bids: 128.28 (300)\nBest Asks: 128.31 (100)");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(OrderBookService::new(BTreeMap::new(), 0).is_err());
    }

    #[test]
    fn prewarm_fills_caches_at_whole_seconds() {
        let service = service();
        // quotes span 10:10:10.000 .. 10:10:14.000 -> 10, 11, 12, 13
        assert_eq!(service.prewarm().unwrap(), 4);
        let book = service.validate_symbol("FAKE").unwrap();
        let cache = book.cache(Side::Ask).lock().unwrap();
        assert_eq!(cache.len(), 5);
        assert!(cache.get("2021-02-18T10:10:13.000000000Z").is_some());
    }

    #[test]
    fn second_boundaries_round_up_to_whole_seconds() {
        let seconds =
            second_boundaries("2021-02-18T10:10:10.500Z", "2021-02-18T10:10:12.000Z").unwrap();
        assert_eq!(seconds, vec!["2021-02-18T10:10:11.000000000Z".to_string()]);
        assert!(second_boundaries("t1", "t2").is_none());
    }
}
