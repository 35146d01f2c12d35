//! Quote data model and CSV row helpers.
//!
//! A `Quote` is one immutable top-of-book interval from the historical quotes file: a bid and
//! an ask that were live from `start_time` (inclusive) until `end_time` (exclusive). Both
//! timestamps are kept in canonical form (see `orderbook_common::timestamp`) so they can be
//! compared as strings.

use orderbook_common::BookError;
use orderbook_common::timestamp;

/// Number of delimiter-separated columns in a quotes file row.
pub const CSV_COLUMNS: usize = 11;

/// Header line written by the generator and skipped by the loader.
pub const CSV_HEADER: &str = "symbol,marketCenter,bidQuantity,askQuantity,bidPrice,askPrice,startTime,endTime,quoteConditions,sipfeedSeq,sipfeed";

/// Historical quote for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Symbol identifier.
    pub symbol: String,
    /// Venue that published the quote.
    pub market_center: String,
    /// Shares offered at the bid.
    pub bid_quantity: i64,
    /// Shares offered at the ask.
    pub ask_quantity: i64,
    /// Bid price.
    pub bid_price: f64,
    /// Ask price.
    pub ask_price: f64,
    /// First instant the quote is live, canonical form.
    pub start_time: String,
    /// First instant the quote is no longer live, canonical form.
    pub end_time: String,
    /// Raw condition codes.
    pub quote_conditions: String,
    /// Feed sequence number.
    pub sipfeed_seq: i64,
    /// Feed name.
    pub sipfeed: String,
}

impl Quote {
    /// Returns `true` if the quote is live at `timestamp`, i.e. `start <= timestamp < end`.
    pub fn is_active_at(&self, timestamp: &str) -> bool {
        self.start_time.as_str() <= timestamp && self.has_not_ended(timestamp)
    }

    /// Returns `true` if the quote has not ended by `timestamp`.
    pub fn has_not_ended(&self, timestamp: &str) -> bool {
        self.end_time.as_str() > timestamp
    }

    /// Parses one delimited row. Timestamps are canonicalized on the way in.
    ///
    /// - line_no: 1-based line number, used only for error reporting.
    pub fn from_csv_row(row: &str, delimiter: &str, line_no: usize) -> Result<Quote, BookError> {
        let cols: Vec<&str> = row.split(delimiter).map(str::trim).collect();
        if cols.len() != CSV_COLUMNS {
            return Err(row_error(
                line_no,
                format!("expected {} columns, found {}", CSV_COLUMNS, cols.len()),
            ));
        }

        let int = |idx: usize, name: &str| -> Result<i64, BookError> {
            cols[idx]
                .parse::<i64>()
                .map_err(|e| row_error(line_no, format!("{} {:?}: {}", name, cols[idx], e)))
        };
        let price = |idx: usize, name: &str| -> Result<f64, BookError> {
            cols[idx]
                .parse::<f64>()
                .map_err(|e| row_error(line_no, format!("{} {:?}: {}", name, cols[idx], e)))
        };
        let time = |idx: usize, name: &str| -> Result<String, BookError> {
            timestamp::canonicalize(cols[idx])
                .map_err(|_| row_error(line_no, format!("{} {:?} is not RFC 3339", name, cols[idx])))
        };

        Ok(Quote {
            symbol: cols[0].to_string(),
            market_center: cols[1].to_string(),
            bid_quantity: int(2, "bidQuantity")?,
            ask_quantity: int(3, "askQuantity")?,
            bid_price: price(4, "bidPrice")?,
            ask_price: price(5, "askPrice")?,
            start_time: time(6, "startTime")?,
            end_time: time(7, "endTime")?,
            quote_conditions: cols[8].to_string(),
            sipfeed_seq: int(9, "sipfeedSeq")?,
            sipfeed: cols[10].to_string(),
        })
    }

    /// Renders the quote as a comma-separated row in `CSV_HEADER` order.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{}",
            self.symbol,
            self.market_center,
            self.bid_quantity,
            self.ask_quantity,
            self.bid_price,
            self.ask_price,
            self.start_time,
            self.end_time,
            self.quote_conditions,
            self.sipfeed_seq,
            self.sipfeed,
        )
    }
}

fn row_error(line: usize, reason: String) -> BookError {
    BookError::QuotesFile { line, reason }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Quote;

    /// Minimal quote for tests; prices are used for both sides.
    pub fn quote(start: &str, end: &str, price: f64, qty: i64) -> Quote {
        Quote {
            symbol: "TEST".to_string(),
            market_center: "NSDQ".to_string(),
            bid_quantity: qty,
            ask_quantity: qty,
            bid_price: price,
            ask_price: price,
            start_time: start.to_string(),
            end_time: end.to_string(),
            quote_conditions: "R".to_string(),
            sipfeed_seq: 0,
            sipfeed: "C".to_string(),
        }
    }
}
