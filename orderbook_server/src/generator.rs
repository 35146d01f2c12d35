//! Synthetic quotes file generator.
//!
//! `QuoteGenerator` produces a chronologically increasing stream of quotes for a fixed set of
//! symbols. Each symbol keeps a mid price that follows a small random walk; every quote places
//! a bid and an ask a random half-spread around it and lives for a random duration. The output
//! loads with `loader::load_quotes_file`.
//!
//! Design notes:
//! - Seeded `StdRng` makes files reproducible for tests and benchmarks.
//! - Liquid names (AAPL/MSFT/TSLA) get larger quantities, like the live feed.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, TimeDelta, Utc};
use orderbook_common::{Result, timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::quote::{CSV_HEADER, Quote};

const MARKET_CENTERS: [&str; 4] = ["NSDQ", "ARCA", "BATS", "EDGX"];
const INITIAL_PRICE: f64 = 100.0;

/// Random quote source.
pub struct QuoteGenerator<R: Rng> {
    rng: R,
    clock: DateTime<Utc>,
    symbols: Vec<String>,
    mids: BTreeMap<String, f64>,
    seq: i64,
}

impl QuoteGenerator<StdRng> {
    /// Reproducible generator starting at `start`.
    pub fn seeded(symbols: &[String], start: DateTime<Utc>, seed: u64) -> Self {
        QuoteGenerator::new(StdRng::seed_from_u64(seed), symbols, start)
    }
}

impl<R: Rng> QuoteGenerator<R> {
    /// Generator drawing from `rng`.
    pub fn new(rng: R, symbols: &[String], start: DateTime<Utc>) -> Self {
        Self {
            rng,
            clock: start,
            symbols: symbols.to_vec(),
            mids: symbols
                .iter()
                .map(|s| (s.clone(), INITIAL_PRICE))
                .collect(),
            seq: 0,
        }
    }

    /// Next mid price: a uniform step in `[-0.05%, +0.05%]`, floored at one cent.
    pub fn next_price(&mut self, current_price: f64) -> f64 {
        let change: f64 = self.rng.random_range(-0.0005..0.0005);
        (current_price * (1.0 + change)).max(0.01)
    }

    /// Next quote; start times never decrease.
    pub fn next_quote(&mut self) -> Option<Quote> {
        if self.symbols.is_empty() {
            return None;
        }
        let symbol = self.symbols[self.rng.random_range(0..self.symbols.len())].clone();
        let current = self.mids.get(&symbol).copied().unwrap_or(INITIAL_PRICE);
        let mid = self.next_price(current);
        self.mids.insert(symbol.clone(), mid);

        self.clock += TimeDelta::milliseconds(self.rng.random_range(0..=25));
        let start = self.clock;
        let end = start + TimeDelta::milliseconds(self.rng.random_range(1..=2_000));

        let half_spread = self.rng.random_range(1..=5) as f64 / 100.0;
        let base_qty = match symbol.as_str() {
            "AAPL" | "MSFT" | "TSLA" => 1_000,
            _ => 100,
        };
        let mut quantity = || (base_qty + self.rng.random_range(0..10) * 100) as i64;
        let bid_quantity = quantity();
        let ask_quantity = quantity();

        self.seq += 1;
        Some(Quote {
            symbol,
            market_center: MARKET_CENTERS[self.rng.random_range(0..MARKET_CENTERS.len())]
                .to_string(),
            bid_quantity,
            ask_quantity,
            bid_price: cents(mid - half_spread),
            ask_price: cents(mid + half_spread),
            start_time: timestamp::format_utc(&start),
            end_time: timestamp::format_utc(&end),
            quote_conditions: "R".to_string(),
            sipfeed_seq: self.seq,
            sipfeed: "C".to_string(),
        })
    }

    /// `count` consecutive quotes.
    pub fn generate(&mut self, count: usize) -> Vec<Quote> {
        (0..count).map_while(|_| self.next_quote()).collect()
    }
}

fn cents(price: f64) -> f64 {
    ((price * 100.0).round() / 100.0).max(0.01)
}

/// Writes a header line followed by one row per quote.
pub fn write_csv<W: Write>(mut writer: W, quotes: &[Quote]) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for quote in quotes {
        writeln!(writer, "{}", quote.to_csv_row())?;
    }
    writer.flush()?;
    Ok(())
}
