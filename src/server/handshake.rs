//! Upgrade handshake: request-head parsing and accept negotiation
//!
//! Negotiation itself does no IO; it turns parsed headers into the
//! response headers and leaves writing the `101` line to the caller.

use std::io::{self, Write};
use std::net::TcpStream;
use std::str::from_utf8;

use httparse;
use netbuf::Buf;

use error::Error;
use websocket::Accept;


/// Number of headers to allocate on a stack
const MAX_HEADERS: usize = 64;


/// The parts of a request head that routing and the handshake care about
#[derive(Debug)]
pub struct RequestHead {
    pub method: String,
    pub path: String,
    /// True when the `Upgrade` header is `websocket`, case-insensitively
    pub upgrade: bool,
    /// Raw value of `Sec-WebSocket-Key`, if the header was present
    pub key: Option<Vec<u8>>,
    /// Offered sub-protocol, passed through without any selection logic
    pub protocol: Option<String>,
}

/// Headers for a `101 Switching Protocols` answer
#[derive(Debug)]
pub struct HandshakeResponse {
    pub accept: Accept,
    pub protocol: Option<String>,
}


fn bytes_trim(mut x: &[u8]) -> &[u8] {
    while x.len() > 0 && matches!(x[0], b'\r' | b'\n' | b' ' | b'\t') {
        x = &x[1..];
    }
    while x.len() > 0 && matches!(x[x.len()-1], b'\r' | b'\n' | b' ' | b'\t')
    {
        x = &x[..x.len()-1];
    }
    return x;
}

/// Read from the socket until a full request head is buffered
///
/// Whatever follows the head (a client may start sending frames right
/// after the handshake) is left in `buf` for the session loop.
pub fn read_request_head(stream: &mut TcpStream, buf: &mut Buf)
    -> Result<RequestHead, Error>
{
    loop {
        if let Some((head, bytes)) = parse_head(buf)? {
            buf.consume(bytes);
            return Ok(head);
        }
        if buf.read_from(stream)? == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
    }
}

fn parse_head(buf: &mut Buf) -> Result<Option<(RequestHead, usize)>, Error> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);
    let bytes = match req.parse(&buf[..])? {
        httparse::Status::Complete(bytes) => bytes,
        httparse::Status::Partial => return Ok(None),
    };
    let mut upgrade = false;
    let mut key = None;
    let mut protocol = None;
    for h in req.headers.iter() {
        if h.name.eq_ignore_ascii_case("Upgrade") {
            upgrade = h.value.eq_ignore_ascii_case(b"websocket");
        } else if h.name.eq_ignore_ascii_case("Sec-WebSocket-Key") {
            key = Some(bytes_trim(h.value).to_vec());
        } else if h.name.eq_ignore_ascii_case("Sec-WebSocket-Protocol") {
            protocol = from_utf8(h.value).ok()
                .map(|x| x.trim().to_string());
        }
    }
    Ok(Some((RequestHead {
        method: req.method.unwrap_or("").to_string(),
        path: req.path.unwrap_or("").to_string(),
        upgrade: upgrade,
        key: key,
        protocol: protocol,
    }, bytes)))
}

/// Turn an upgrade request into the headers of a `101` response
///
/// Fails with `MissingKey` when there is no `Sec-WebSocket-Key`; the
/// connection must then be answered `400` and not promoted.  An offered
/// sub-protocol is echoed back verbatim.
pub fn negotiate(head: &RequestHead) -> Result<HandshakeResponse, Error> {
    let key = match head.key {
        Some(ref key) => key,
        None => return Err(Error::MissingKey),
    };
    Ok(HandshakeResponse {
        accept: Accept::from_key_bytes(key),
        protocol: head.protocol.clone(),
    })
}

impl HandshakeResponse {
    /// Write the `101` status line and the upgrade headers
    ///
    /// The socket is left open for framed IO afterwards.
    pub fn write<W: Write>(&self, sock: &mut W) -> io::Result<()> {
        write!(sock, "HTTP/1.1 101 Switching Protocols\r\n\
                      Upgrade: websocket\r\n\
                      Connection: Upgrade\r\n\
                      Sec-WebSocket-Accept: {}\r\n", self.accept)?;
        if let Some(ref protocol) = self.protocol {
            write!(sock, "Sec-WebSocket-Protocol: {}\r\n", protocol)?;
        }
        sock.write_all(b"\r\n")
    }
}
