//! Blocking acceptor, request routing and the per-connection machinery
//!
//! One thread per accepted connection; the accept loop is the only
//! single-threaded point and it never blocks on per-connection IO.

mod config;
mod handshake;
mod respond;
mod session;

pub use self::handshake::{RequestHead, HandshakeResponse};
pub use self::handshake::{read_request_head, negotiate};
pub use self::session::{Connection, State};

use std::io;
use std::net::{TcpListener, TcpStream, SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::thread;

use netbuf::Buf;

use error::Error;


/// Server configuration
///
/// Built with the setters in `config.rs` and passed explicitly into
/// `Server::bind`; there is no global instance anywhere.
#[derive(Debug, Clone)]
pub struct Config {
    max_frame_size: usize,
    ws_route: String,
    health_route: String,
}


/// Listens on one port and spawns a thread per accepted connection
pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
}

impl Server {
    pub fn bind<A: ToSocketAddrs>(addr: A, config: &Arc<Config>)
        -> io::Result<Server>
    {
        Ok(Server {
            listener: TcpListener::bind(addr)?,
            config: config.clone(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop forever
    ///
    /// An individual accept failure is logged and the loop keeps serving;
    /// nothing that happens on an accepted connection can reach this loop.
    pub fn run(&self) {
        for stream in self.listener.incoming() {
            match stream {
                Ok(sock) => {
                    let config = self.config.clone();
                    thread::spawn(move || handle_connection(sock, config));
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
    }
}

fn handle_connection(sock: TcpStream, config: Arc<Config>) {
    let peer = sock.peer_addr().ok();
    let mut conn = Connection::new(sock);
    let mut buf = Buf::new();
    match serve_request(&mut conn, &mut buf, &config) {
        Ok(()) => {}
        Err(Error::UnroutableRequest) => {
            let _ = respond::not_found(conn.stream());
        }
        Err(Error::MissingKey) => {
            debug!("upgrade request without Sec-WebSocket-Key");
            let _ = respond::bad_request(conn.stream());
        }
        Err(Error::BadRequest(e)) => {
            debug!("unparseable request from {:?}: {:?}", peer, e);
            let _ = respond::bad_request(conn.stream());
        }
        Err(e) => {
            // peer went away before we could answer, nothing left to do
            debug!("request from {:?} aborted: {}", peer, e);
        }
    }
    conn.close();
}

fn serve_request(conn: &mut Connection, buf: &mut Buf, config: &Arc<Config>)
    -> Result<(), Error>
{
    let head = read_request_head(conn.stream(), buf)?;
    if head.upgrade && route_matches(&head.path, &config.ws_route) {
        let resp = negotiate(&head)?;
        resp.write(conn.stream()).map_err(Error::WriteFailure)?;
        conn.open(resp.protocol.clone());
        debug!("websocket open on {}", head.path);
        session::echo_loop(conn, buf, config);
        Ok(())
    } else if head.method == "GET"
        && route_matches(&head.path, &config.health_route)
    {
        respond::health(conn.stream()).map_err(Error::WriteFailure)
    } else {
        debug!("no route for {} {}", head.method, head.path);
        Err(Error::UnroutableRequest)
    }
}

/// Compare a request path against a route, ignoring a trailing slash
///
/// The original deployment serves the websocket on `/ws/`, clients
/// commonly dial `/ws`; both must land on the same route.
fn route_matches(path: &str, route: &str) -> bool {
    path.trim_right_matches('/') == route.trim_right_matches('/')
}


#[cfg(test)]
mod test {
    use super::route_matches;

    #[test]
    fn trailing_slash() {
        assert!(route_matches("/ws", "/ws"));
        assert!(route_matches("/ws/", "/ws"));
        assert!(route_matches("/ws", "/ws/"));
        assert!(!route_matches("/wsx", "/ws"));
        assert!(!route_matches("/", "/ws"));
    }
}
