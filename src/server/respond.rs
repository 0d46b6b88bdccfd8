//! Canned plain-HTTP responses for the non-websocket surface
//!
//! All of these write a complete response and expect the caller to close
//! the connection afterwards; only the upgrade path keeps a socket open.

use std::io::{self, Write};


/// Body of the health route, matching the original backend's payload
const HEALTH_BODY: &'static str =
    "{\"status\":\"ok\",\"service\":\"backend\",\"version\":\"1.0\"}";


pub fn health<W: Write>(sock: &mut W) -> io::Result<()> {
    write!(sock, "HTTP/1.1 200 OK\r\n\
                  Content-Type: application/json\r\n\
                  Cache-Control: no-store\r\n\
                  Content-Length: {}\r\n\
                  Connection: close\r\n\
                  \r\n\
                  {}", HEALTH_BODY.len(), HEALTH_BODY)
}

pub fn bad_request<W: Write>(sock: &mut W) -> io::Result<()> {
    error_page(sock, "400 Bad Request")
}

pub fn not_found<W: Write>(sock: &mut W) -> io::Result<()> {
    error_page(sock, "404 Not Found")
}

fn error_page<W: Write>(sock: &mut W, status: &str) -> io::Result<()> {
    write!(sock, "HTTP/1.1 {}\r\n\
                  Content-Type: text/plain\r\n\
                  Content-Length: {}\r\n\
                  Connection: close\r\n\
                  \r\n\
                  {}\n", status, status.len() + 1, status)
}
