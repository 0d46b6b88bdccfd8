use std::io;

use httparse;


quick_error! {
    /// Error for everything that can happen to a single connection
    ///
    /// All of these are local to the connection they happened on and never
    /// propagate to the accept loop or to other connections.
    #[derive(Debug)]
    pub enum Error {
        /// Upgrade request carries no `Sec-WebSocket-Key` header
        ///
        /// The caller answers `400 Bad Request` and does not promote
        /// the connection
        MissingKey {
            description("handshake has no Sec-WebSocket-Key header")
            display("handshake has no Sec-WebSocket-Key header")
        }
        /// Peer closed the socket in the middle of a frame
        ///
        /// This is the normal way for a peer to disappear, not a fault
        TruncatedFrame {
            description("connection closed mid-frame")
            display("connection closed in the middle of a frame")
        }
        /// Writing a frame back to the peer failed
        WriteFailure(err: io::Error) {
            description("write error")
            display("write error: {}", err)
        }
        /// Request matches no configured route, answered with `404`
        UnroutableRequest {
            description("no route for request")
            display("no route for request")
        }
        /// Received frame is longer than the configured limit
        TooLong {
            description("received frame that is too long")
        }
        /// Request head can't be parsed, answered with `400`
        BadRequest(err: httparse::Error) {
            description("bad request")
            display("bad request: {:?}", err)
            from()
        }
        /// Any other socket IO error
        Io(err: io::Error) {
            description("IO error")
            display("IO error: {}", err)
            from()
        }
    }
}


#[test]
fn send_sync() {
    fn send_sync<T: Send+Sync>(_: T) {}
    send_sync(Error::TooLong);
}
