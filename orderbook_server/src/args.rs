//! Command-line arguments for the order book server.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use orderbook_common::net::COMMAND_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the quotes file.
    #[clap(long)]
    pub quotes_file: String,

    /// Column delimiter of the quotes file.
    #[clap(long, default_value = ",")]
    pub delimiter: String,

    /// Number of bids and asks returned per request.
    #[clap(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
    pub top_orders_limit: u16,

    /// IP address to bind the request listener to.
    #[clap(long, default_value = "0.0.0.0")]
    pub bind_ip: String,

    /// TCP port of the request listener.
    #[clap(long, default_value_t = COMMAND_PORT)]
    pub port: u16,

    /// Number of worker threads answering requests.
    #[clap(long, default_value_t = 4)]
    pub workers: usize,

    /// Resolve every whole second of the loaded data before accepting requests.
    #[clap(long)]
    pub prewarm: bool,
}
