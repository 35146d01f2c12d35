//! Writes a synthetic quotes file the server can load.
//!
//! Usage example (CLI):
//! ```bash
//! generate_quotes --output quotes.csv --symbols AAPL,MSFT,FAKE --count 100000 --seed 42
//! ```
use clap::Parser;
use log::info;
use orderbook_common::{Result, timestamp};
use orderbook_server::generator::{QuoteGenerator, write_csv};
use std::fs::File;
use std::io::BufWriter;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Destination file.
    #[clap(long)]
    output: String,

    /// Comma-separated symbols to generate quotes for.
    #[clap(long, value_delimiter = ',', default_value = "AAPL,MSFT,TSLA,FAKE")]
    symbols: Vec<String>,

    /// Number of quotes to write.
    #[clap(long, default_value_t = 100_000)]
    count: usize,

    /// Start time of the first quote (RFC 3339).
    #[clap(long, default_value = "2021-02-18T10:10:10.000Z")]
    start: String,

    /// RNG seed; the same seed produces the same file.
    #[clap(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let args = Args::parse();

    let symbols: Vec<String> = args
        .symbols
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let start = timestamp::parse_utc(&args.start)?;

    let quotes = QuoteGenerator::seeded(&symbols, start, args.seed).generate(args.count);
    let writer = BufWriter::new(File::create(&args.output)?);
    write_csv(writer, &quotes)?;

    info!(
        "Wrote {} quotes for {} symbols to {}",
        quotes.len(),
        symbols.len(),
        args.output
    );
    Ok(())
}
