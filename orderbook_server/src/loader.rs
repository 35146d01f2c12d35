//! Quotes file loading.
//!
//! The quotes file is delimited text with one quote per line in `CSV_HEADER` column order.
//! Blank lines are skipped, and so is an optional header (the first non-blank line, when it
//! starts with `symbol`).
//! Any malformed row fails the whole load; there is no partial load.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};
use orderbook_common::{BookError, Result};

use crate::model::quote::Quote;

/// Trait providing file parsing for quotes.
pub trait QuoteParser {
    /// Parses quotes from a buffered reader.
    ///
    /// Each non-empty line after the optional header is parsed as a single `Quote`.
    /// Returns an error naming the line if any row cannot be parsed.
    fn parse_from_reader<R: BufRead>(reader: R, delimiter: &str) -> Result<Vec<Quote>>;
}

impl QuoteParser for Quote {
    fn parse_from_reader<R: BufRead>(reader: R, delimiter: &str) -> Result<Vec<Quote>> {
        let mut quotes = Vec::new();
        let mut seen_row = false;

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(BookError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() {
                continue;
            }
            let first_row = !seen_row;
            seen_row = true;
            if first_row && is_header(trimmed_line) {
                continue;
            }
            quotes.push(Quote::from_csv_row(trimmed_line, delimiter, idx + 1)?);
        }
        Ok(quotes)
    }
}

fn is_header(line: &str) -> bool {
    line.get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("symbol"))
}

/// Groups quotes by symbol, keeping file order and then stably sorting each group by start.
pub fn group_by_symbol(quotes: Vec<Quote>) -> BTreeMap<String, Vec<Quote>> {
    let mut by_symbol: BTreeMap<String, Vec<Quote>> = BTreeMap::new();
    for quote in quotes {
        by_symbol.entry(quote.symbol.clone()).or_default().push(quote);
    }
    for (symbol, quotes) in by_symbol.iter_mut() {
        let sorted = quotes
            .windows(2)
            .all(|pair| pair[0].start_time <= pair[1].start_time);
        if !sorted {
            warn!("Quotes for {} are not sorted by start time, sorting", symbol);
            quotes.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        }
    }
    by_symbol
}

/// Reads, parses and groups a quotes file.
pub fn load_quotes_file(path: &Path, delimiter: &str) -> Result<BTreeMap<String, Vec<Quote>>> {
    info!("Parsing quotes file: {}", path.display());
    let file = File::open(path)?;
    let quotes = Quote::parse_from_reader(BufReader::new(file), delimiter)?;
    if quotes.is_empty() {
        return Err(BookError::NoQuotes);
    }
    let total = quotes.len();
    let by_symbol = group_by_symbol(quotes);

    info!("Successfully parsed and loaded quotes file");
    info!("Total Symbols Found: {}", by_symbol.len());
    info!("Total Quotes Loaded: {}", total);
    Ok(by_symbol)
}
