//! Side configuration for the top orders engine.
//!
//! A `QuerySide` is plain data: how to rank quotes, how many to keep, how to label and render
//! them. The bid and ask instances differ only in these values.

use std::cmp::Ordering;

use orderbook_common::Side;

use crate::formatter::format_price;
use crate::model::quote::Quote;
use crate::model::snapshot::{RankFn, Snapshot};

/// Response label of the bid line.
pub const BIDS_LABEL: &str = "Best Bids";
/// Response label of the ask line.
pub const ASKS_LABEL: &str = "Best Asks";

/// Ranking, capacity and rendering for one side of the book.
#[derive(Debug, Clone, Copy)]
pub struct QuerySide {
    /// Which side this configures.
    pub side: Side,
    /// Number of quotes returned (top N).
    pub capacity: usize,
    /// Response line label.
    pub label: &'static str,
    /// `Less` when the left quote is better.
    pub rank: RankFn,
    /// Renders one quote as `price (quantity)`.
    pub render: fn(&Quote) -> String,
}

impl QuerySide {
    /// Configuration for `side` keeping `capacity` quotes.
    pub fn new(side: Side, capacity: usize) -> Self {
        match side {
            Side::Bid => QuerySide {
                side,
                capacity,
                label: BIDS_LABEL,
                rank: rank_bids,
                render: render_bid,
            },
            Side::Ask => QuerySide {
                side,
                capacity,
                label: ASKS_LABEL,
                rank: rank_asks,
                render: render_ask,
            },
        }
    }

    /// An empty snapshot ranked and bounded for this side.
    pub fn empty_snapshot(&self) -> Snapshot {
        Snapshot::new(self.capacity, self.rank)
    }
}

/// Highest bid first; on equal price the earlier quote wins.
pub fn rank_bids(a: &Quote, b: &Quote) -> Ordering {
    b.bid_price
        .total_cmp(&a.bid_price)
        .then_with(|| a.start_time.cmp(&b.start_time))
}

/// Lowest ask first; on equal price the earlier quote wins.
pub fn rank_asks(a: &Quote, b: &Quote) -> Ordering {
    a.ask_price
        .total_cmp(&b.ask_price)
        .then_with(|| a.start_time.cmp(&b.start_time))
}

fn render_bid(q: &Quote) -> String {
    format!("{} ({})", format_price(q.bid_price), q.bid_quantity)
}

fn render_ask(q: &Quote) -> String {
    format!("{} ({})", format_price(q.ask_price), q.ask_quantity)
}
