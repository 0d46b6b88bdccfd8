use std::fmt;
use std::str::from_utf8_unchecked;

use sha1::Sha1;


/// WebSocket GUID constant (provided by spec)
pub const GUID: &'static str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// The `Sec-WebSocket-Accept` header value
///
/// Holds the raw SHA-1 digest; the base64 text form is produced by the
/// `Display` impl, so it can be written straight into a response with
/// `write!`.
pub struct Accept([u8; 20]);

impl Accept {
    /// Compute the accept signature for a key received in a header
    ///
    /// The key is taken as the raw header value (base64 text); the spec
    /// doesn't require validating it, just hashing it with the GUID.
    pub fn from_key_bytes(key: &[u8]) -> Accept {
        let mut sha1 = Sha1::new();
        sha1.update(key);
        sha1.update(GUID.as_bytes());
        Accept(sha1.digest().bytes())
    }
}

impl fmt::Display for Accept {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const CHARS: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                       abcdefghijklmnopqrstuvwxyz\
                                       0123456789+/";
        // 20 digest bytes -> 28 chars, the last one is always padding
        let mut buf = [b'='; 28];
        for (i, chunk) in self.0.chunks(3).enumerate() {
            let n = ((chunk[0] as usize) << 16)
                | ((*chunk.get(1).unwrap_or(&0) as usize) << 8)
                | (*chunk.get(2).unwrap_or(&0) as usize);
            buf[i*4] = CHARS[(n >> 18) & 63];
            buf[i*4+1] = CHARS[(n >> 12) & 63];
            if chunk.len() > 1 {
                buf[i*4+2] = CHARS[(n >> 6) & 63];
            }
            if chunk.len() > 2 {
                buf[i*4+3] = CHARS[n & 63];
            }
        }
        fmt::Write::write_str(f, unsafe {
            from_utf8_unchecked(&buf)
        })
    }
}

impl fmt::Debug for Accept {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "websocket::Accept({})", self)
    }
}
