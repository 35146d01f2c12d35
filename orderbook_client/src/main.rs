//! Order book client: asks the server for the best bids and asks of a symbol at one or
//! more instants and prints every answer to stdout.
//!
//! Usage example (CLI):
//! ```bash
//! orderbook_client --server-ip 192.168.0.10 --symbol AAPL \
//!     --timestamp 2021-02-18T10:10:10.000Z --timestamp 2021-02-18T10:10:12.500Z
//! ```
//!
//! Every timestamp is sent over its own TCP connection. A timestamp that is not RFC 3339
//! is still sent, so the server's own validation message is printed for it.
#![warn(missing_docs)]
mod args;
mod sender;

use crate::args::Args;
use crate::sender::RequestSender;
use clap::Parser;
use log::{error, info, warn};
use orderbook_common::net::addr;
use orderbook_common::{BookError, OrderBookRequest, Result, timestamp};
use std::net::TcpStream;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let server_ip = args.server_ip.trim().replace('"', "");
    let server_address = addr(&server_ip, args.port);
    let symbol = args.symbol.trim().to_string();

    let mut failed = 0;
    for raw in &args.timestamp {
        let at = match timestamp::canonicalize(raw) {
            Ok(canonical) => canonical,
            Err(e) => {
                warn!("{}; sending it unchanged", e);
                raw.trim().to_string()
            }
        };
        match query(&server_address, &OrderBookRequest::new(&symbol, &at)) {
            Ok(response) => println!("{}@{}\n{}", symbol, at, response),
            Err(e) => {
                error!("Request for {}@{} failed: {}", symbol, at, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(BookError::Format(format!(
            "{} of {} requests failed",
            failed,
            args.timestamp.len()
        )));
    }
    Ok(())
}

fn query(server_address: &str, request: &OrderBookRequest) -> Result<String> {
    info!("Connecting to TCP server at {}", server_address);
    let mut stream = TcpStream::connect(server_address)?;
    RequestSender::send_request(&mut stream, request)?;
    RequestSender::read_response(&mut stream)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
