use byteorder::{BigEndian, ByteOrder};
use netbuf::Buf;

use error::Error;


/// Frame purpose as encoded in the low four bits of the first header byte
///
/// Codes we don't know about decode into `Unknown` instead of failing, so
/// a peer sending an exotic frame can't kill the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Continuation,
    Text,
    Binary,
    Close,
    Ping,
    Pong,
    Unknown(u8),
}

impl Opcode {
    pub fn from_code(code: u8) -> Opcode {
        match code {
            0x0 => Opcode::Continuation,
            0x1 => Opcode::Text,
            0x2 => Opcode::Binary,
            0x8 => Opcode::Close,
            0x9 => Opcode::Ping,
            0xA => Opcode::Pong,
            x => Opcode::Unknown(x & 0x0F),
        }
    }
    pub fn code(&self) -> u8 {
        match *self {
            Opcode::Continuation => 0x0,
            Opcode::Text => 0x1,
            Opcode::Binary => 0x2,
            Opcode::Close => 0x8,
            Opcode::Ping => 0x9,
            Opcode::Pong => 0xA,
            Opcode::Unknown(x) => x,
        }
    }
}


/// A single decoded frame, borrowing its payload from the read buffer
#[derive(Debug)]
pub struct Frame<'a> {
    pub opcode: Opcode,
    pub payload: &'a [u8],
}


/// Parse one frame from the front of `buf`
///
/// Returns `Ok(None)` while the buffer doesn't hold a complete frame yet
/// (header, extended length, mask key and payload are each checked in
/// turn).  On success the payload is unmasked in place and the second
/// tuple element is the number of bytes the caller must `consume()`.
///
/// The FIN bit is not interpreted: every frame is treated as a whole
/// message, there is no fragment reassembly.
pub fn parse_frame<'x>(buf: &'x mut Buf, limit: usize)
    -> Result<Option<(Frame<'x>, usize)>, Error>
{
    if buf.len() < 2 {
        return Ok(None);
    }
    let masked = buf[1] & 0x80 != 0;
    let (size, fsize) = {
        match buf[1] & 0x7F {
            126 => {
                if buf.len() < 4 {
                    return Ok(None);
                }
                (BigEndian::read_u16(&buf[2..4]) as u64, 4)
            }
            127 => {
                if buf.len() < 10 {
                    return Ok(None);
                }
                (BigEndian::read_u64(&buf[2..10]), 10)
            }
            size => (size as u64, 2),
        }
    };
    if size > limit as u64 {
        return Err(Error::TooLong);
    }
    let size = size as usize;
    let start = fsize + if masked { 4 } else { 0 };
    if buf.len() < start + size {
        return Ok(None);
    }
    let opcode = Opcode::from_code(buf[0] & 0x0F);
    if masked {
        let mask = [buf[start-4], buf[start-3], buf[start-2], buf[start-1]];
        for idx in 0..size {
            buf[start + idx] ^= mask[idx % 4];
        }
    }
    let payload = &buf[start..(start + size)];
    Ok(Some((Frame { opcode: opcode, payload: payload }, start + size)))
}

/// Append one server-to-client frame to `buf`
///
/// Server frames are always final and never masked.  Encoding can't fail:
/// any payload length picks one of the three length encodings.
pub fn write_frame(buf: &mut Buf, opcode: Opcode, data: &[u8]) {
    let first_byte = 0x80 | opcode.code();  // always fin
    match data.len() {
        len @ 0...125 => {
            buf.extend(&[first_byte, len as u8]);
        }
        len @ 126...65535 => {
            buf.extend(&[first_byte, 126,
                (len >> 8) as u8, (len & 0xFF) as u8]);
        }
        len => {
            buf.extend(&[first_byte, 127,
                ((len >> 56) & 0xFF) as u8,
                ((len >> 48) & 0xFF) as u8,
                ((len >> 40) & 0xFF) as u8,
                ((len >> 32) & 0xFF) as u8,
                ((len >> 24) & 0xFF) as u8,
                ((len >> 16) & 0xFF) as u8,
                ((len >> 8) & 0xFF) as u8,
                (len & 0xFF) as u8]);
        }
    }
    buf.extend(data);
}

/// Append one client-to-server frame to `buf`
///
/// Same as `write_frame` but with the MASK bit set, the key emitted after
/// the length and the payload XORed with it, as the protocol requires for
/// everything a client sends.  Used by tests and by client code.
pub fn write_masked_frame(buf: &mut Buf, opcode: Opcode, data: &[u8],
    mask: [u8; 4])
{
    let first_byte = 0x80 | opcode.code();
    match data.len() {
        len @ 0...125 => {
            buf.extend(&[first_byte, 0x80 | len as u8]);
        }
        len @ 126...65535 => {
            buf.extend(&[first_byte, 0x80 | 126,
                (len >> 8) as u8, (len & 0xFF) as u8]);
        }
        len => {
            buf.extend(&[first_byte, 0x80 | 127,
                ((len >> 56) & 0xFF) as u8,
                ((len >> 48) & 0xFF) as u8,
                ((len >> 40) & 0xFF) as u8,
                ((len >> 32) & 0xFF) as u8,
                ((len >> 24) & 0xFF) as u8,
                ((len >> 16) & 0xFF) as u8,
                ((len >> 8) & 0xFF) as u8,
                (len & 0xFF) as u8]);
        }
    }
    buf.extend(&mask);
    let start = buf.len();
    buf.extend(data);
    for idx in 0..data.len() {
        buf[start + idx] ^= mask[idx % 4];
    }
}
