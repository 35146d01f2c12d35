//! Point-in-time order book server.
//!
//! Answers "what were the best N bids and asks of a symbol at instant T" against a historical
//! quotes file loaded once at startup. The building blocks:
//!
//! - `model` — quotes, the per-symbol `QuoteIndex`, bounded `Snapshot`s and the time-indexed
//!   `SnapshotCache`, side configuration.
//! - `engine` — `TopOrdersEngine`, the incremental floor -> expire -> advance resolver.
//! - `formatter` — `price (quantity)` rendering.
//! - `loader` — quotes file parsing.
//! - `service` — request validation and two-line responses.
//! - `receiver` — TCP accept loop and worker pool.
//! - `generator` — synthetic quotes files.
//! - `args` — command-line configuration of the server binary.
#![warn(missing_docs)]

pub mod args;
pub mod engine;
pub mod formatter;
pub mod generator;
pub mod loader;
pub mod model;
pub mod receiver;
pub mod service;

pub use engine::{Resolution, TopOrdersEngine};
pub use service::OrderBookService;
