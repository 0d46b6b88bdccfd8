extern crate netbuf;
extern crate rand;
extern crate tk_wsecho;

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

use netbuf::Buf;
use rand::Rng;

use tk_wsecho::server::{Config, Connection, Server, State};
use tk_wsecho::websocket::{Opcode, parse_frame, write_masked_frame};


fn start_server() -> SocketAddr {
    let cfg = Config::new().done();
    let server = Server::bind("127.0.0.1:0", &cfg).unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    addr
}

fn read_head(sock: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        let bytes = sock.read(&mut byte).unwrap();
        assert!(bytes > 0, "eof before end of headers");
        head.push(byte[0]);
    }
    String::from_utf8(head).unwrap()
}

fn connect(addr: &SocketAddr, path: &str) -> TcpStream {
    let mut sock = TcpStream::connect(addr).unwrap();
    write!(sock, "GET {} HTTP/1.1\r\n\
                  Host: localhost\r\n\
                  Connection: Upgrade\r\n\
                  Upgrade: websocket\r\n\
                  Sec-WebSocket-Version: 13\r\n\
                  Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
                  \r\n", path).unwrap();
    let head = read_head(&mut sock);
    assert!(head.starts_with("HTTP/1.1 101 Switching Protocols\r\n"),
        "unexpected response: {}", head);
    assert!(head.contains(
        "Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n"));
    sock
}

fn send_frame(sock: &mut TcpStream, opcode: Opcode, payload: &[u8]) {
    let mut mask = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut mask);
    let mut buf = Buf::new();
    write_masked_frame(&mut buf, opcode, payload, mask);
    sock.write_all(&buf[..]).unwrap();
}

fn recv_frame(sock: &mut TcpStream) -> (Opcode, Vec<u8>) {
    let mut buf = Buf::new();
    loop {
        let parsed = {
            match parse_frame(&mut buf, 1 << 20).unwrap() {
                Some((frame, _)) => {
                    Some((frame.opcode, frame.payload.to_vec()))
                }
                None => None,
            }
        };
        if let Some(frame) = parsed {
            return frame;
        }
        assert!(buf.read_from(sock).unwrap() > 0, "eof waiting for frame");
    }
}


#[test]
fn text_is_echoed() {
    let addr = start_server();
    let mut sock = connect(&addr, "/ws");
    send_frame(&mut sock, Opcode::Text, b"hi");
    assert_eq!(recv_frame(&mut sock), (Opcode::Text, b"hi".to_vec()));
}

#[test]
fn ping_gets_pong() {
    let addr = start_server();
    let mut sock = connect(&addr, "/ws");
    send_frame(&mut sock, Opcode::Ping, b"");
    assert_eq!(recv_frame(&mut sock), (Opcode::Pong, Vec::new()));
    send_frame(&mut sock, Opcode::Ping, b"stamp");
    assert_eq!(recv_frame(&mut sock), (Opcode::Pong, b"stamp".to_vec()));
}

#[test]
fn close_stops_the_session() {
    let addr = start_server();
    let mut sock = connect(&addr, "/ws");
    send_frame(&mut sock, Opcode::Text, b"last words");
    assert_eq!(recv_frame(&mut sock), (Opcode::Text, b"last words".to_vec()));
    send_frame(&mut sock, Opcode::Close, b"");
    // the loop exits and releases the socket without sending anything else
    let mut rest = Vec::new();
    sock.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"");
}

#[test]
fn unknown_opcode_is_ignored() {
    let addr = start_server();
    let mut sock = connect(&addr, "/ws");
    send_frame(&mut sock, Opcode::Unknown(0x3), b"???");
    send_frame(&mut sock, Opcode::Binary, b"also ignored");
    send_frame(&mut sock, Opcode::Text, b"still alive");
    assert_eq!(recv_frame(&mut sock), (Opcode::Text, b"still alive".to_vec()));
}

#[test]
fn trailing_slash_route() {
    let addr = start_server();
    let mut sock = connect(&addr, "/ws/");
    send_frame(&mut sock, Opcode::Text, b"slashed");
    assert_eq!(recv_frame(&mut sock), (Opcode::Text, b"slashed".to_vec()));
}

#[test]
fn health_route() {
    let addr = start_server();
    let mut sock = TcpStream::connect(&addr).unwrap();
    write!(sock, "GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
    let mut text = String::new();
    sock.read_to_string(&mut text).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("Cache-Control: no-store\r\n"));
    assert!(text.contains("Content-Type: application/json\r\n"));
    assert!(text.ends_with(
        "{\"status\":\"ok\",\"service\":\"backend\",\"version\":\"1.0\"}"));
}

#[test]
fn unknown_route_is_404() {
    let addr = start_server();
    let mut sock = TcpStream::connect(&addr).unwrap();
    write!(sock, "GET /nowhere HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
    let mut text = String::new();
    sock.read_to_string(&mut text).unwrap();
    assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn upgrade_without_key_is_400() {
    let addr = start_server();
    let mut sock = TcpStream::connect(&addr).unwrap();
    write!(sock, "GET /ws HTTP/1.1\r\n\
                  Host: localhost\r\n\
                  Connection: Upgrade\r\n\
                  Upgrade: websocket\r\n\
                  Sec-WebSocket-Version: 13\r\n\
                  \r\n").unwrap();
    let mut text = String::new();
    sock.read_to_string(&mut text).unwrap();
    assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[test]
fn close_is_idempotent() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let sock = TcpStream::connect(&listener.local_addr().unwrap()).unwrap();
    let mut conn = Connection::new(sock);
    assert_eq!(conn.state(), State::Handshaking);
    conn.close();
    assert_eq!(conn.state(), State::Closed);
    // a second release, as after a close frame followed by an IO error,
    // must not fail or release anything twice
    conn.close();
    assert_eq!(conn.state(), State::Closed);
}
