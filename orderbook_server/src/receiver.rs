use crate::service::OrderBookService;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info};
use orderbook_common::net::MAX_REQUEST_BYTES;
use orderbook_common::{BookError, OrderBookRequest, Result};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long a worker waits for a client to send its request line.
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// TCP receiver that accepts order book requests.
///
/// Creates a listening socket and hands every accepted connection to the worker pool
/// through a channel. Parsing and answering happen on the workers.
pub struct RequestReceiver {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl RequestReceiver {
    /// Bind a new TCP receiver to the provided `bind_addr` (e.g., `0.0.0.0:8080`).
    pub fn new(bind_addr: &str) -> Result<Self, BookError> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking loop that accepts TCP connections and forwards them to `tx`.
    ///
    /// A failed accept is logged and skipped. The loop ends only when every worker is gone.
    pub fn receive_loop_with_channel(self, tx: Sender<TcpStream>) -> Result<()> {
        info!("Order book TCP server is started on {}", self.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client_tcp_addr: {:?}", stream.peer_addr());
                    tx.send(stream)
                        .map_err(|e| BookError::ChannelSend(e.to_string()))?;
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Reads one request line from `stream`, answers it and closes the write half.
pub fn handle_connection(mut stream: TcpStream, service: &OrderBookService) -> Result<()> {
    let peer = stream.peer_addr()?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;

    let mut line = Vec::new();
    BufReader::new(stream.try_clone()?.take(MAX_REQUEST_BYTES)).read_until(b'\n', &mut line)?;

    let response = match decode_request(&line) {
        Ok(request) => {
            info!("Received request {:?} from {}", request, peer);
            service.respond(&request)
        }
        Err(e) => {
            error!("Malformed request from {}: {}", peer, e);
            format!("Invalid Request: {}", e)
        }
    };

    stream.write_all(response.as_bytes())?;
    stream.write_all(b"\n")?;
    stream.flush()?;
    if let Err(e) = stream.shutdown(Shutdown::Write) {
        debug!("Shutdown of {} failed: {}", peer, e);
    }
    Ok(())
}

/// Decodes one request line. Bytes that are not UTF-8 are reported like malformed JSON.
fn decode_request(line: &[u8]) -> Result<OrderBookRequest> {
    let text = std::str::from_utf8(line)
        .map_err(|e| BookError::Format(format!("request is not valid UTF-8: {}", e)))?;
    OrderBookRequest::from_line(text)
}

/// Starts `count` workers answering connections from `rx`.
///
/// A failing connection is logged and does not affect the worker or other clients.
pub fn spawn_workers(
    count: usize,
    rx: Receiver<TcpStream>,
    service: Arc<OrderBookService>,
) -> Vec<JoinHandle<()>> {
    (0..count.max(1))
        .map(|id| {
            let rx = rx.clone();
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for stream in rx.iter() {
                    if let Err(e) = handle_connection(stream, &service) {
                        error!("Worker {}: client connection failed: {}", id, e);
                    }
                }
                debug!("Worker {} stopping", id);
            })
        })
        .collect()
}
