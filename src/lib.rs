//! A websocket echo server implemented by hand on raw TCP sockets
//!
//! The crate is split the same way the protocol is: the `websocket` module
//! holds the pure frame codec and the accept-key computation (no IO), and
//! the `server` module holds the blocking acceptor, the upgrade handshake
//! and the per-connection session loop.

#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate matches;
#[macro_use] extern crate log;
extern crate byteorder;
extern crate httparse;
extern crate netbuf;
extern crate sha1;

pub mod server;
pub mod websocket;
mod error;

pub use error::Error;
