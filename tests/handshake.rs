extern crate tk_wsecho;
#[macro_use] extern crate matches;

use tk_wsecho::Error;
use tk_wsecho::server::{RequestHead, negotiate};


fn upgrade_head(key: Option<&str>, protocol: Option<&str>) -> RequestHead {
    RequestHead {
        method: "GET".to_string(),
        path: "/ws".to_string(),
        upgrade: true,
        key: key.map(|x| x.as_bytes().to_vec()),
        protocol: protocol.map(|x| x.to_string()),
    }
}

#[test]
fn rfc6455_vector() {
    let resp = negotiate(&upgrade_head(Some("dGhlIHNhbXBsZSBub25jZQ=="),
        None)).unwrap();
    assert_eq!(resp.accept.to_string(), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
    assert!(resp.protocol.is_none());
}

#[test]
fn missing_key() {
    assert!(matches!(negotiate(&upgrade_head(None, None)),
        Err(Error::MissingKey)));
}

#[test]
fn protocol_echoed_verbatim() {
    let resp = negotiate(&upgrade_head(Some("x3JJHMbDL1EzLkh9GBhXDw=="),
        Some("chat"))).unwrap();
    assert_eq!(resp.protocol.as_ref().map(|x| &x[..]), Some("chat"));
}

#[test]
fn response_headers() {
    let resp = negotiate(&upgrade_head(Some("dGhlIHNhbXBsZSBub25jZQ=="),
        Some("chat"))).unwrap();
    let mut out = Vec::new();
    resp.write(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("HTTP/1.1 101 Switching Protocols\r\n"));
    assert!(text.contains("Upgrade: websocket\r\n"));
    assert!(text.contains("Connection: Upgrade\r\n"));
    assert!(text.contains(
        "Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n"));
    assert!(text.contains("Sec-WebSocket-Protocol: chat\r\n"));
    assert!(text.ends_with("\r\n\r\n"));
}
