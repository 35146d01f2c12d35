//!
//! Common types and utilities shared by the order book server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `BookError` used across the workspace.
//! - `result` — handy `Result<T, BookError>` alias.
//! - `side` — the `Side` tag selecting bids or asks.
//! - `request` — the `OrderBookRequest` payload sent from client to server.
//! - `timestamp` — canonical ISO-8601 timestamp handling.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod request;
pub mod result;
pub mod side;
pub mod timestamp;

pub use error::BookError;
pub use request::OrderBookRequest;
pub use result::Result;
pub use side::Side;
