//! Domain models of the order book server.
//!
//! This module groups the data types the engine works on:
//! - `quote` — historical `Quote` intervals and CSV row parsing.
//! - `quote_index` — per-symbol sorted quotes and the scan ledger.
//! - `snapshot` — bounded, ranked queue of quotes.
//! - `snapshot_cache` — time-indexed snapshots with floor lookup.
//! - `query_side` — ranking/label/rendering configuration for bids and asks.
//! - `symbol_book` — index plus both caches of one symbol.

pub mod query_side;
pub mod quote;
pub mod quote_index;
pub mod snapshot;
pub mod snapshot_cache;
pub mod symbol_book;
