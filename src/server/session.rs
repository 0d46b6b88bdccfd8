//! Post-handshake lifecycle of one connection
//!
//! The session owns its socket exclusively, so reads and writes are
//! serialized by construction and no locking is needed anywhere.

use std::io::Write;
use std::net::{TcpStream, Shutdown};

use netbuf::Buf;

use error::Error;
use server::Config;
use websocket::{Opcode, parse_frame, write_frame};


/// Lifecycle state of one accepted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Handshaking,
    Open,
    Closing,
    Closed,
}

/// One accepted TCP socket, before and after promotion to websocket
pub struct Connection {
    stream: TcpStream,
    state: State,
    protocol: Option<String>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            stream: stream,
            state: State::Handshaking,
            protocol: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Sub-protocol echoed during the handshake, if the client offered one
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_ref().map(|x| &x[..])
    }

    pub fn stream(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Mark the handshake as done
    ///
    /// Must only be called after a valid key produced an accept signature
    /// and the `101` response was written.
    pub fn open(&mut self, protocol: Option<String>) {
        debug_assert_eq!(self.state, State::Handshaking);
        self.protocol = protocol;
        self.state = State::Open;
    }

    /// Shut down both halves of the socket
    ///
    /// Runs on every session exit path and is idempotent: the transition
    /// to `Closed` happens exactly once, the second and later calls are
    /// no-ops.  A shutdown error just means the peer beat us to it.
    pub fn close(&mut self) {
        if self.state == State::Closed {
            return;
        }
        self.state = State::Closed;
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}


/// Drive the read-decode-react-encode-write loop until the peer is gone
///
/// Every exit is quiet: a close frame, a peer dropping the connection
/// (mid-frame or between frames) and a failed write are all the normal
/// ends of a session, none of them is escalated anywhere.
pub fn echo_loop(conn: &mut Connection, buf: &mut Buf, config: &Config) {
    match run(conn, buf, config) {
        Ok(()) => debug!("session finished"),
        Err(Error::TruncatedFrame) => debug!("peer disconnected mid-frame"),
        Err(e) => debug!("session ended: {}", e),
    }
    conn.state = State::Closing;
    conn.close();
}

fn run(conn: &mut Connection, buf: &mut Buf, config: &Config)
    -> Result<(), Error>
{
    let mut out = Buf::new();
    loop {
        let mut consumed = None;
        if let Some((frame, bytes)) = parse_frame(buf, config.max_frame_size)?
        {
            match frame.opcode {
                Opcode::Close => {
                    // no close acknowledgment is sent, the loop just stops
                    return Ok(());
                }
                Opcode::Ping => {
                    write_frame(&mut out, Opcode::Pong, frame.payload);
                }
                Opcode::Text => {
                    write_frame(&mut out, Opcode::Text, frame.payload);
                }
                opcode => {
                    debug!("ignoring frame with opcode {:?}", opcode);
                }
            }
            consumed = Some(bytes);
        }
        match consumed {
            Some(bytes) => {
                buf.consume(bytes);
                if out.len() > 0 {
                    flush(conn, &mut out)?;
                }
            }
            None => {
                // not enough buffered bytes for a whole frame yet
                if buf.read_from(&mut conn.stream)? == 0 {
                    if buf.len() == 0 {
                        return Ok(());
                    }
                    return Err(Error::TruncatedFrame);
                }
            }
        }
    }
}

fn flush(conn: &mut Connection, out: &mut Buf) -> Result<(), Error> {
    let len = out.len();
    conn.stream.write_all(&out[..]).map_err(Error::WriteFailure)?;
    out.consume(len);
    Ok(())
}
