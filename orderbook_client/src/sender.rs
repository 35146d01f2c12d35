//! Sending order book requests to the server over TCP.
//!
//! One connection carries one request: the JSON line goes out, the write half is closed and
//! the text response is read until the server closes the connection.
use log::info;
use orderbook_common::{OrderBookRequest, Result};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

/// Helper type for sending requests to the server.
pub struct RequestSender;

impl RequestSender {
    /// Writes `request` as one JSON line and closes the write half.
    pub fn send_request(stream: &mut TcpStream, request: &OrderBookRequest) -> Result<()> {
        let line = request.to_line()?;
        info!("Sending request: {}", line.trim_end());
        stream.write_all(line.as_bytes())?;
        stream.flush()?;
        stream.shutdown(Shutdown::Write)?;
        Ok(())
    }

    /// Reads the response until the server closes the connection.
    pub fn read_response(stream: &mut TcpStream) -> Result<String> {
        let mut response = String::new();
        stream.read_to_string(&mut response)?;
        Ok(response.trim_end().to_string())
    }
}
