//! Point-in-time order book TCP server.
//!
//! This binary loads a historical quotes file, builds one `SymbolBook` per symbol and answers
//! order book requests over TCP. Internally, it wires together three main building blocks:
//!
//! - `loader` — parses the quotes file and groups quotes by symbol. Any malformed row aborts
//!   startup.
//! - `OrderBookService` — validates a request and resolves the best bids and asks through the
//!   per-side `TopOrdersEngine`s and their snapshot caches.
//! - `RequestReceiver` + worker pool — the accept loop hands connections over a
//!   `crossbeam_channel` to a fixed number of worker threads.
//!
//! Concurrency:
//! - Every `(symbol, side)` snapshot cache has its own lock, held for the whole resolution.
//! - A failing connection is logged and only affects that client.
//!
//! Network protocol (high-level):
//! - Bind address: `0.0.0.0:8080` by default (see `COMMAND_PORT`).
//! - Client sends one JSON line `{"symbol": "...", "timestamp": "..."}`.
//! - Server answers with `Best Bids: ...` and `Best Asks: ...` lines, or a single error line,
//!   and closes the connection.
#![warn(missing_docs)]
use clap::Parser;
use crossbeam_channel::unbounded;
use log::{error, info};
use orderbook_common::Result;
use orderbook_common::net::addr;
use orderbook_server::OrderBookService;
use orderbook_server::args::Args;
use orderbook_server::loader::load_quotes_file;
use orderbook_server::receiver::{RequestReceiver, spawn_workers};
use std::net::TcpStream;
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let quotes = load_quotes_file(Path::new(args.quotes_file.trim()), &args.delimiter)?;
    let service = Arc::new(OrderBookService::new(
        quotes,
        usize::from(args.top_orders_limit),
    )?);

    if args.prewarm {
        let resolved = service.prewarm()?;
        info!("Prewarm resolved {} timestamps", resolved);
    }

    let (conn_tx, conn_rx) = unbounded::<TcpStream>();
    let workers = spawn_workers(args.workers, conn_rx, Arc::clone(&service));
    info!("{} workers started", workers.len());

    let receiver = RequestReceiver::new(&addr(&args.bind_ip, args.port))?;
    if let Err(e) = receiver.receive_loop_with_channel(conn_tx) {
        error!("Receiver loop failed: {}", e);
        return Err(e);
    }
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
