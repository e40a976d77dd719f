//! Server configuration.

use std::time::Duration;

/// Default for both transport deadlines.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to listen and how long to wait on clients and handlers.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `host:port`. Host names are resolved at bind time.
    pub addr: String,
    /// How long a client may take to send the request head.
    pub header_read_timeout: Duration,
    /// How long a chain may run before its future is dropped and the client
    /// gets `503 Service Unavailable`.
    pub handler_timeout: Duration,
}

impl ServerConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into(), ..Self::default() }
    }

    pub fn header_read_timeout(mut self, timeout: Duration) -> Self {
        self.header_read_timeout = timeout;
        self
    }

    pub fn handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "localhost:8080".to_owned(),
            header_read_timeout: DEFAULT_TIMEOUT,
            handler_timeout: DEFAULT_TIMEOUT,
        }
    }
}
