//! Shared networking constants and helpers used by client and server.

/// TCP port for the request channel (client -> server).
pub const COMMAND_PORT: u16 = 8080;

/// Upper bound on a single request line, in bytes.
pub const MAX_REQUEST_BYTES: u64 = 1024;

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
