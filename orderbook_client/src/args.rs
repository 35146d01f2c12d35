//! Command-line arguments for the order book client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use orderbook_common::net::COMMAND_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server IP address (IPv4 or IPv6) where the order book service is running.
    #[clap(long, default_value = "127.0.0.1")]
    pub server_ip: String,

    /// TCP port of the order book service.
    #[clap(long, default_value_t = COMMAND_PORT)]
    pub port: u16,

    /// Symbol to query, e.g. `AAPL`.
    #[clap(long)]
    pub symbol: String,

    /// Instant to query (RFC 3339). Repeat the flag to query several instants.
    #[clap(long, required = true, num_args = 1..)]
    pub timestamp: Vec<String>,
}
