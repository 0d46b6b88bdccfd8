use std::sync::Arc;

use server::Config;

/// Frames above this size terminate the session
const MAX_FRAME_SIZE: usize = 10 << 20;


impl Config {
    /// Create a config with defaults
    pub fn new() -> Config {
        Config {
            max_frame_size: MAX_FRAME_SIZE,
            ws_route: "/ws".to_string(),
            health_route: "/health".to_string(),
        }
    }
    /// Largest frame payload accepted from a peer
    pub fn max_frame_size(&mut self, value: usize) -> &mut Self {
        self.max_frame_size = value;
        self
    }
    /// Path of the websocket route (trailing slash is ignored)
    pub fn ws_route<S: Into<String>>(&mut self, value: S) -> &mut Self {
        self.ws_route = value.into();
        self
    }
    /// Path of the health-check route
    pub fn health_route<S: Into<String>>(&mut self, value: S) -> &mut Self {
        self.health_route = value.into();
        self
    }
    /// Create a Arc'd config clone to pass to the constructor
    ///
    /// This is just a convenience method.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}
