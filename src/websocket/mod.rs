//! Websocket protocol pieces: the frame codec and the accept signature
//!
//! Nothing here does IO, everything operates on in-memory buffers, so
//! the whole module is testable without sockets.

mod accept;
mod frame;

pub use self::accept::{Accept, GUID};
pub use self::frame::{Frame, Opcode};
pub use self::frame::{parse_frame, write_frame, write_masked_frame};
