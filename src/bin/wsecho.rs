extern crate argparse;
extern crate env_logger;
extern crate tk_wsecho;
#[macro_use] extern crate log;

use std::env;
use std::process::exit;

use argparse::{ArgumentParser, Store};

use tk_wsecho::server::{Config, Server};


fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init().expect("init logging");

    let mut addr = "0.0.0.0:8080".to_string();
    let mut ws_route = "/ws".to_string();
    let mut health_route = "/health".to_string();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Websocket echo server on raw TCP sockets");
        ap.refer(&mut addr)
            .add_option(&["-l", "--listen"], Store,
                "Address to listen on (default 0.0.0.0:8080)");
        ap.refer(&mut ws_route)
            .add_option(&["--ws-route"], Store,
                "Path of the websocket route (default /ws)");
        ap.refer(&mut health_route)
            .add_option(&["--health-route"], Store,
                "Path of the health-check route (default /health)");
        ap.parse_args_or_exit();
    }

    let cfg = Config::new()
        .ws_route(ws_route)
        .health_route(health_route)
        .done();
    let server = match Server::bind(&addr[..], &cfg) {
        Ok(server) => server,
        Err(e) => {
            error!("can't listen on {}: {}", addr, e);
            exit(1);
        }
    };
    info!("listening on {}", addr);
    server.run();
}
